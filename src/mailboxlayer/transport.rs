use url::Url;

use super::VerifyError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The one HTTP capability the client needs: issue a GET, hand back status
/// and body. Non-2xx statuses are responses, not errors.
pub trait HttpGet {
    fn get(&self, url: &Url) -> Result<HttpResponse, VerifyError>;
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse, VerifyError> {
        (**self).get(url)
    }
}

/// Blocking `reqwest` transport. Uses reqwest's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl HttpGet for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, VerifyError> {
        // without_url(): the URL carries the access key
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| VerifyError::Http(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| VerifyError::Http(e.without_url().to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
