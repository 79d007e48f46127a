use thiserror::Error;

use super::ProviderErrorBody;

/// Errors surfaced by a MailboxLayer check.
///
/// Every variant is fatal to the call that produced it. An address without MX
/// records is *not* an error, see [`Genuineness::NotGenuine`](super::Genuineness).
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The API answered with a status other than 200.
    #[error("MailboxLayer API request failed with HTTP status {status}")]
    Transport { status: u16 },

    /// The API answered 200 but flagged the request as failed.
    #[error("{kind}: {info} (code {code})")]
    Provider { kind: String, info: String, code: i64 },

    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid MailboxLayer response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl VerifyError {
    pub(crate) fn provider(body: ProviderErrorBody) -> Self {
        Self::Provider {
            kind: body.kind.unwrap_or_else(|| "unknown".to_string()),
            info: body.info.unwrap_or_default(),
            code: body.code.unwrap_or_default(),
        }
    }

    /// HTTP status of a [`VerifyError::Transport`] failure.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status } => Some(*status),
            _ => None,
        }
    }

    /// Provider error code (e.g. `101` for an invalid access key).
    #[must_use]
    pub const fn provider_code(&self) -> Option<i64> {
        match self {
            Self::Provider { code, .. } => Some(*code),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

/// Errors raised while building [`Credentials`](super::Credentials).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing MailboxLayer API key (pass one explicitly or set MAILBOXLAYER_KEY)")]
    MissingApiKey,
    #[error("invalid endpoint URL '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    pub(crate) fn invalid_endpoint(endpoint: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            source,
        }
    }
}
