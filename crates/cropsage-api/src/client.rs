//! HTTP client for the CropSage backend REST API.
//!
//! Wraps `reqwest` with typed request/response bodies and maps non-2xx
//! statuses onto [`ApiError`] variants. Nothing here retries: a failed call is
//! reported once and the caller decides whether it is fatal.

use std::time::Duration;

use cropsage_core::{AppConfig, Coordinates, DiagnosisResult, StoreRecord};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::{
    AdminToken, ClassifyRequest, ClassifyResponse, ErrorBody, LoginRequest, LoginResponse,
    NearbyStoresResponse,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Client for the diagnosis backend.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CropSageClient {
    client: Client,
    base_url: Url,
}

impl CropSageClient {
    /// Creates a client pointed at the default local backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`CropSageClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.request_timeout_secs,
            &config.user_agent,
            &config.api_base_url,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// The base is the API root, e.g. `http://127.0.0.1:8000/api`; endpoint
    /// paths are resolved relative to it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends to the API root instead
        // of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submits an English query to the classifier.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on any non-2xx status (including the
    ///   backend's 400 for an empty query).
    /// - [`ApiError::Deserialize`] if the body is not a classification result.
    pub async fn classify(&self, query: &str) -> Result<DiagnosisResult, ApiError> {
        let url = self.endpoint("classify/")?;
        let request = self
            .client
            .post(url.clone())
            .json(&ClassifyRequest { query });
        let response: ClassifyResponse = Self::send_json(request, &url, "classify").await?;
        tracing::debug!(issue = %response.issue, "classification received");
        Ok(response.into())
    }

    /// Lists stores within `radius` kilometres of `coords`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ApiError::Deserialize`] if the body does not match `{stores: [...]}`.
    pub async fn nearby_stores(
        &self,
        coords: Coordinates,
        radius: f64,
    ) -> Result<Vec<StoreRecord>, ApiError> {
        let mut url = self.endpoint("nearby_stores/")?;
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lng", &coords.longitude.to_string())
            .append_pair("radius", &radius.to_string());

        let request = self.client.get(url.clone());
        let response: NearbyStoresResponse =
            Self::send_json(request, &url, "nearby_stores").await?;
        tracing::debug!(count = response.stores.len(), "nearby stores received");
        Ok(response.stores)
    }

    /// Exchanges admin credentials for a session token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidCredentials`] when the backend answers 400
    ///   (wrong password) or 404 (unknown user).
    /// - [`ApiError::Http`], [`ApiError::UnexpectedStatus`],
    ///   [`ApiError::Deserialize`] otherwise.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<AdminToken, ApiError> {
        let url = self.endpoint("admin_login/")?;
        let response = self
            .client
            .post(url.clone())
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(|_| format!("HTTP {}", status.as_u16()), |b| b.error);
            return Err(ApiError::InvalidCredentials(message));
        }

        let response = Self::check_status(response, &url)?;
        let login: LoginResponse = Self::decode(response, "admin_login").await?;
        tracing::info!(username, "admin login succeeded");
        Ok(AdminToken::new(login.token))
    }

    /// Registers a new store through the public `add_store/` endpoint.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedStatus`] when the backend rejects the record
    ///   (400 with field errors).
    /// - [`ApiError::Http`] or [`ApiError::Deserialize`] otherwise.
    pub async fn add_store(&self, store: &StoreRecord) -> Result<StoreRecord, ApiError> {
        let url = self.endpoint("add_store/")?;
        let request = self.client.post(url.clone()).json(store);
        Self::send_json(request, &url, "add_store").await
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Resolves an endpoint path against the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// Sends a request, asserts a 2xx status, and decodes the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let response = Self::check_status(response, url)?;
        Self::decode(response, context).await
    }

    /// Sends a request and asserts a 2xx status, discarding the body.
    pub(crate) async fn send_empty(request: RequestBuilder, url: &Url) -> Result<(), ApiError> {
        let response = request.send().await?;
        Self::check_status(response, url)?;
        Ok(())
    }

    fn check_status(response: Response, url: &Url) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = url.to_string();
        tracing::debug!(status = status.as_u16(), url = %url, "backend returned error status");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized {
                status: status.as_u16(),
                url,
            }),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound { url }),
            _ => Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            }),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
