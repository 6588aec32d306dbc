//! libcurl handle setup and response header tracking.

use crate::error::TransportError;

/// Status and length of the response currently being received.
///
/// libcurl hands every header line of every response in a redirect chain to
/// the header callback; a status line starts a new response, so the state is
/// reset there and the last response wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub status: Option<u32>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Feed one raw header line.
    pub fn feed(&mut self, raw: &[u8]) {
        let Ok(line) = std::str::from_utf8(raw) else {
            return;
        };
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }

    /// Declared body length; a zero length counts as unknown.
    pub fn expected_len(&self) -> Option<u64> {
        self.content_length.filter(|n| *n > 0)
    }
}

/// New easy handle for a plain GET. Redirects are followed; libcurl's default
/// timeouts apply.
pub(crate) fn get_handle(url: &str) -> Result<curl::easy::Easy, TransportError> {
    let curl_err = |source| curl_error(url, source);
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(10).map_err(curl_err)?;
    easy.useragent(concat!("shopfetch/", env!("CARGO_PKG_VERSION")))
        .map_err(curl_err)?;
    Ok(easy)
}

pub(crate) fn curl_error(url: &str, source: curl::Error) -> TransportError {
    TransportError::Curl {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(lines: &[&str]) -> ResponseHead {
        let mut head = ResponseHead::default();
        for line in lines {
            head.feed(format!("{line}\r\n").as_bytes());
        }
        head
    }

    #[test]
    fn status_and_length() {
        let head = feed_all(&["HTTP/1.1 200 OK", "Content-Length: 12345", ""]);
        assert_eq!(head.status, Some(200));
        assert_eq!(head.content_length, Some(12345));
        assert!(head.is_success());
        assert_eq!(head.expected_len(), Some(12345));
    }

    #[test]
    fn redirect_chain_keeps_last_response() {
        let head = feed_all(&[
            "HTTP/1.1 302 Found",
            "Location: /elsewhere",
            "Content-Length: 5",
            "",
            "HTTP/1.1 200 OK",
            "Transfer-Encoding: chunked",
            "",
        ]);
        assert_eq!(head.status, Some(200));
        assert_eq!(head.content_length, None);
    }

    #[test]
    fn non_success_and_zero_length() {
        let head = feed_all(&["HTTP/2 404", "content-length: 0"]);
        assert_eq!(head.status, Some(404));
        assert!(!head.is_success());
        assert_eq!(head.content_length, Some(0));
        assert_eq!(head.expected_len(), None);
    }

    #[test]
    fn garbage_length_is_ignored() {
        let head = feed_all(&["HTTP/1.1 200 OK", "Content-Length: lots"]);
        assert_eq!(head.content_length, None);
    }
}
