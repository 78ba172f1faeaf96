//! Wire types private to the directory-service adapter.

use serde::Deserialize;

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Collection wrapper used by the directory API (`{"value": [...]}`).
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// OData error envelope returned on failed requests.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub error: ODataError,
}

#[derive(Debug, Deserialize)]
pub struct ODataError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
