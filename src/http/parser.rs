use crate::http::request::Request;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The header block (or the declared body) has not fully arrived yet.
    Incomplete,
    /// The request is bigger than the connection is willing to buffer.
    TooLarge,
}

/// Checks whether `buf` holds a whole request.
///
/// Returns the number of bytes the request occupies (header block plus any
/// body announced by `Content-Length`). A request that has grown, or declares
/// that it will grow, past `max_len` bytes is rejected with `TooLarge`.
pub fn check_complete(buf: &[u8], max_len: usize) -> Result<usize, ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        if buf.len() > max_len {
            return Err(ParseError::TooLarge);
        }
        return Err(ParseError::Incomplete);
    };

    let head = parse_head(&buf[..headers_end]);
    let total = headers_end
        .checked_add(HEADER_TERMINATOR.len())
        .and_then(|n| n.checked_add(head.content_length()))
        .ok_or(ParseError::TooLarge)?;

    if total > max_len {
        return Err(ParseError::TooLarge);
    }
    if buf.len() < total {
        return Err(ParseError::Incomplete);
    }
    Ok(total)
}

/// Turns raw request bytes into a [`Request`].
///
/// This never fails. The first line is split on whitespace into method,
/// target and version; anything missing is left empty. Header lines without
/// a colon are skipped. Bytes after the blank line are kept as the body, up
/// to the declared `Content-Length`.
pub fn parse_http_request(buf: &[u8]) -> Request {
    let (head_bytes, body_bytes) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + HEADER_TERMINATOR.len()..]),
        None => (buf, &[][..]),
    };

    let mut request = parse_head(head_bytes);
    let body_len = request.content_length().min(body_bytes.len());
    request.body = body_bytes[..body_len].to_vec();
    request
}

fn parse_head(head_bytes: &[u8]) -> Request {
    let head = String::from_utf8_lossy(head_bytes);
    let mut lines = head.lines();

    let mut parts = lines.next().unwrap_or_default().split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let version = parts.next().unwrap_or_default().to_string();

    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    Request {
        method,
        target,
        version,
        headers,
        body: Vec::new(),
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
