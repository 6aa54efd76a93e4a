//! Text translation through the public MyMemory API.

use std::time::Duration;

use async_trait::async_trait;
use cropsage_core::{AppConfig, Language};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::TranslateError;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Any [`TranslateError`]; callers normally degrade to the source text via
    /// [`translate_or_original`].
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError>;
}

/// Translates `text`, or returns it unchanged.
///
/// No call is made when `from == to`. Any failure is logged and the source
/// text is returned instead.
pub async fn translate_or_original(
    translator: &dyn Translator,
    text: &str,
    from: Language,
    to: Language,
) -> String {
    if from == to {
        return text.to_owned();
    }
    match translator.translate(text, from, to).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!(from = %from, to = %to, error = %e, "translation degraded to source text");
            text.to_owned()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    #[serde(default)]
    response_data: Option<ResponseData>,
    #[serde(default)]
    response_status: Option<serde_json::Value>,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    translated_text: Option<String>,
}

/// Client for `GET {url}?q={text}&langpair={from}|{to}`.
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    client: Client,
    url: Url,
}

impl MyMemoryTranslator {
    /// # Errors
    ///
    /// [`TranslateError::InvalidUrl`] if `url` does not parse, or
    /// [`TranslateError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let url = Url::parse(url).map_err(|e| TranslateError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, url })
    }

    /// # Errors
    ///
    /// See [`MyMemoryTranslator::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, TranslateError> {
        Self::new(
            &config.translate_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    fn request_url(&self, text: &str, from: Language, to: Language) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("langpair", &format!("{}|{}", from.code(), to.code()));
        url
    }
}

/// `responseStatus` arrives as a number or as a numeric string (`"403"`).
fn status_code(value: &serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslateError> {
        if from == to {
            return Ok(text.to_owned());
        }

        let url = self.request_url(text, from, to);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: MyMemoryResponse =
            serde_json::from_str(&body).map_err(TranslateError::Deserialize)?;

        // The service reports quota and language-pair errors in-band with a
        // 200 transport status.
        if let Some(code) = parsed.response_status.as_ref().and_then(status_code) {
            if code != 200 {
                return Err(TranslateError::Service {
                    status: code,
                    message: parsed.response_details.unwrap_or_default(),
                });
            }
        }

        let translated = parsed
            .response_data
            .and_then(|d| d.translated_text)
            .map(|t| t.trim().to_owned())
            .unwrap_or_default();
        if translated.is_empty() {
            return Err(TranslateError::Empty);
        }

        tracing::debug!(from = %from, to = %to, "translated text");
        Ok(translated)
    }
}
