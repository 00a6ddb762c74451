//! Outbound request headers: API credential and User-Agent construction.
//!
//! Single source for the project URL, UA format, and the credential header so
//! every request this crate issues identifies itself consistently.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "DATASET_FETCHER_API_KEY";

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce-labs/dataset-fetcher";

/// API credential attached to outbound requests as the `Authorization` header.
///
/// The value is never validated locally; a missing or invalid credential is
/// only discovered when the remote server rejects the request. An empty
/// credential is legal and produces an empty `Authorization` value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Wraps a credential value. Empty is allowed.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reads the credential from [`API_KEY_ENV`], empty if unset.
    ///
    /// Each call re-reads the environment, so a rotated credential is picked
    /// up by constructing a fresh value.
    #[must_use]
    pub fn from_env() -> Self {
        Self(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Returns true when no credential value is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

// Credentials must not leak into logs or error chains.
impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiCredential(<unset>)")
        } else {
            f.write_str("ApiCredential(<redacted>)")
        }
    }
}

/// Builds the header map attached to every outbound request.
///
/// The credential is injected at construction rather than read from ambient
/// process state inside the request path, so tests can fabricate credentials
/// and a rotation is an explicit rebuild via [`HeaderProvider::from_env`].
#[derive(Debug, Clone)]
pub struct HeaderProvider {
    credential: ApiCredential,
}

impl HeaderProvider {
    /// Creates a provider with an explicit credential.
    #[must_use]
    pub fn new(credential: ApiCredential) -> Self {
        Self { credential }
    }

    /// Creates a provider from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiCredential::from_env())
    }

    /// Returns the headers for an outbound request:
    /// `Content-Type`, `Authorization` (possibly empty), and `User-Agent`.
    #[must_use]
    pub fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(self.credential.as_str())
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&default_user_agent())
                .unwrap_or_else(|_| HeaderValue::from_static("dataset-fetcher")),
        );
        headers
    }
}

/// Default User-Agent for fetch requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("dataset-fetcher/{version} (batch-input-fetcher; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_contains_all_three() {
        let provider = HeaderProvider::new(ApiCredential::new("secret-token"));
        let headers = provider.build_headers();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "secret-token");
        assert!(
            headers
                .get(USER_AGENT)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("dataset-fetcher/")
        );
    }

    #[test]
    fn test_empty_credential_yields_empty_authorization() {
        let provider = HeaderProvider::new(ApiCredential::default());
        let headers = provider.build_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = ApiCredential::new("super-secret");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"), "leaked: {debug}");
        assert!(debug.contains("redacted"));

        let unset = ApiCredential::default();
        assert!(format!("{unset:?}").contains("unset"));
    }

    #[test]
    fn test_ua_format_contains_version_and_project_url() {
        let ua = default_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("dataset-fetcher/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }
}
