//! Bucket listing fetch: one blocking GET of the bucket root.

use crate::error::TransportError;
use crate::http::{curl_error, get_handle, ResponseHead};

/// Fetch the raw listing document from `url`.
///
/// Only a final status of exactly 200 yields the body; anything else is a
/// `TransportError::Status`. No retries.
pub fn fetch_listing(url: &str) -> Result<Vec<u8>, TransportError> {
    let mut head = ResponseHead::default();
    let mut body = Vec::new();

    let mut easy = get_handle(url)?;
    tracing::debug!(url, "fetching bucket listing");
    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                head.feed(line);
                true
            })
            .map_err(|source| curl_error(url, source))?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|source| curl_error(url, source))?;
        transfer.perform().map_err(|source| curl_error(url, source))?;
    }

    let status = match head.status {
        Some(code) => code,
        None => easy
            .response_code()
            .map_err(|source| curl_error(url, source))?,
    };
    if status != 200 {
        return Err(TransportError::Status {
            url: url.to_string(),
            status,
        });
    }
    tracing::debug!(url, bytes = body.len(), "bucket listing received");
    Ok(body)
}
