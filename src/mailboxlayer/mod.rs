//! MailboxLayer deliverability API client.
//!
//! [`MailboxLayer::check`] issues one blocking `GET /api/check` per call and
//! returns the decoded response, or a [`VerifyError`] when the HTTP status is
//! not 200 or the provider flags the request as failed. There is no retry and
//! no caching: every call consumes provider quota.

mod credentials;
mod error;
mod transport;
mod types;

pub use credentials::{API_KEY_ENV, Credentials, DEFAULT_ENDPOINT};
pub use error::{ConfigError, VerifyError};
pub use transport::{HttpGet, HttpResponse, ReqwestTransport};
pub use types::{Genuineness, ProviderErrorBody, VerificationResult};

use tracing::{debug, warn};

/// MailboxLayer client over an [`HttpGet`] transport.
#[derive(Debug, Clone)]
pub struct MailboxLayer<T = ReqwestTransport> {
    credentials: Credentials,
    transport: T,
}

impl MailboxLayer {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, ReqwestTransport::new())
    }
}

impl<T: HttpGet> MailboxLayer<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Check `email` against the API and return the decoded response as is.
    /// Any JSON object is accepted; only a non-object body is a
    /// [`VerifyError::Decode`].
    pub fn check(&self, email: &str) -> Result<VerificationResult, VerifyError> {
        let url = self.credentials.request_url(email);
        debug!(email, endpoint = %self.credentials.endpoint(), "MailboxLayer check");

        let response = self.transport.get(&url).inspect_err(|err| {
            warn!(email, error = %err, "MailboxLayer request failed");
        })?;
        debug!(email, status = response.status, "MailboxLayer response");

        if response.status != 200 {
            warn!(email, status = response.status, "MailboxLayer returned non-200 status");
            return Err(VerifyError::Transport {
                status: response.status,
            });
        }

        let result: VerificationResult = serde_json::from_str(&response.body)?;
        if result.is_failure() {
            let err = VerifyError::provider(result.provider_error());
            warn!(email, error = %err, "MailboxLayer reported an error");
            return Err(err);
        }

        Ok(result)
    }

    /// [`check`](Self::check), folded into [`Genuineness`] on the `mx_found`
    /// flag.
    pub fn genuineness(&self, email: &str) -> Result<Genuineness, VerifyError> {
        self.check(email).map(Genuineness::from)
    }
}
