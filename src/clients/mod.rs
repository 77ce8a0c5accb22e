//! HTTP clients for the services the quote console depends on: the catalog
//! backend (customers and products) and the image CDN.

pub mod catalog;
pub mod images;

pub use catalog::CatalogClient;
pub use images::ImageClient;

/// Errors from an upstream HTTP service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("upstream API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but without the expected payload.
    #[error("unexpected upstream response: {0}")]
    Unexpected(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Return the response unchanged on success, or a [`ClientError::Api`]
/// carrying the status and body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}
