//! Request plumbing shared by the API and storage clients

use crate::error::{BunnyError, Result};
use reqwest::Url;

pub(crate) const USER_AGENT: &str = concat!("bunnyflow/", env!("CARGO_PKG_VERSION"));

/// Parse a base URL, making sure relative joins stay below its path
pub(crate) fn parse_base(url: &str) -> Result<Url> {
    let url = if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    };
    Url::parse(&url).map_err(|e| BunnyError::InvalidConfig(format!("invalid URL '{}': {}", url, e)))
}

/// Send `request` and return the body text of a successful response.
///
/// Any non-success status becomes [`BunnyError::Api`] carrying the raw body.
pub(crate) async fn send(request: reqwest::RequestBuilder, method: &str, path: &str) -> Result<String> {
    tracing::debug!("{} {}", method, path);

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::debug!("{} {} -> {}: {}", method, path, status, body);
        return Err(BunnyError::Api {
            method: method.to_string(),
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
