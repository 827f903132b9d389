//! Connect URL construction.

use url::Url;

use super::error::NetworkError;

/// Builds the URL the channel connects to.
///
/// `user_id` and `phone_number` are appended as encoded query parameters;
/// query parameters already on the endpoint are kept. Only `ws` and `wss`
/// endpoints are accepted.
pub fn build_connect_url(
    endpoint: &str,
    user_id: &str,
    phone_number: &str,
) -> Result<String, NetworkError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| NetworkError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(NetworkError::InvalidEndpoint(format!(
                "unsupported scheme '{}' (expected ws:// or wss://)",
                other
            )))
        }
    }

    url.query_pairs_mut()
        .append_pair("user_id", user_id)
        .append_pair("phone_number", phone_number);

    Ok(url.into())
}

/// Strips the query string for logging. The query carries the phone number.
pub(crate) fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
