//! Request and response bodies for the backend REST API.

use cropsage_core::{DiagnosisResult, StoreRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyRequest<'a> {
    pub query: &'a str,
}

/// `classify/` response: `{ "issue": ..., "details": { "remedies": [...] } }`.
///
/// The backend may attach more detail fields; only remedies are read.
#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyResponse {
    pub issue: String,
    #[serde(default)]
    pub details: Option<ClassifyDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClassifyDetails {
    #[serde(default)]
    pub remedies: Option<Vec<String>>,
}

impl From<ClassifyResponse> for DiagnosisResult {
    fn from(response: ClassifyResponse) -> Self {
        let remedies = response
            .details
            .and_then(|d| d.remedies)
            .unwrap_or_default();
        DiagnosisResult {
            issue: response.issue,
            remedies,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyStoresResponse {
    #[serde(default)]
    pub stores: Vec<StoreRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

/// Error body the backend sends with 4xx responses: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// Admin session token issued by `admin_login/`.
///
/// Sent as `Authorization: Token <key>`. The key never appears in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken(String);

impl AdminToken {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn header_value(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken([redacted])")
    }
}
