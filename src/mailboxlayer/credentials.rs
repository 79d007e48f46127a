use std::fmt;

use url::Url;

use super::ConfigError;

/// MailboxLayer check endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://apilayer.net/api/check";

/// Environment variable read by [`Credentials::from_env`].
pub const API_KEY_ENV: &str = "MAILBOXLAYER_KEY";

/// API key and endpoint, fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    endpoint: Url,
}

impl Credentials {
    /// Credentials for the public endpoint. A blank key is rejected.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|source| ConfigError::invalid_endpoint(DEFAULT_ENDPOINT, source))?;
        Ok(Self { api_key, endpoint })
    }

    /// Read the key from `MAILBOXLAYER_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        Self::new(key)
    }

    /// Point the client at another endpoint (mirror, proxy, local stub).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint =
            Url::parse(endpoint).map_err(|source| ConfigError::invalid_endpoint(endpoint, source))?;
        Ok(self)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `endpoint?access_key={key}&email={email}`, query values percent-encoded.
    pub(crate) fn request_url(&self, email: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("access_key", &self.api_key)
            .append_pair("email", email);
        url
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_request_url() {
        let credentials = Credentials::new("abc123").unwrap();
        let url = credentials.request_url("alice@example.com");
        assert_eq!(
            url.as_str(),
            "https://apilayer.net/api/check?access_key=abc123&email=alice%40example.com"
        );
    }

    #[test]
    fn encodes_query_values() {
        let credentials = Credentials::new("k").unwrap();
        let url = credentials.request_url("a+b&x=1@example.com");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![
            ("access_key".to_string(), "k".to_string()),
            ("email".to_string(), "a+b&x=1@example.com".to_string()),
        ]);
    }

    #[test]
    fn blank_key_rejected() {
        assert!(matches!(
            Credentials::new("  "),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            Credentials::from_lookup(|_| None),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn key_read_from_lookup() {
        let credentials = Credentials::from_lookup(|name| {
            assert_eq!(name, API_KEY_ENV);
            Some("from-env".to_string())
        })
        .unwrap();
        assert_eq!(credentials.api_key(), "from-env");
    }

    #[test]
    fn custom_endpoint() {
        let credentials = Credentials::new("k")
            .unwrap()
            .with_endpoint("http://127.0.0.1:8080/api/check")
            .unwrap();
        assert_eq!(credentials.endpoint().as_str(), "http://127.0.0.1:8080/api/check");
        assert!(Credentials::new("k").unwrap().with_endpoint("not a url").is_err());
    }

    #[test]
    fn debug_hides_key() {
        let credentials = Credentials::new("super-secret").unwrap();
        assert!(!format!("{credentials:?}").contains("super-secret"));
    }
}
