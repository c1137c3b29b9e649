use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Used when the request line carried no version token.
pub const DEFAULT_HTTP_VERSION: &str = "HTTP/1.1";

/// Encodes a response into the bytes sent on the wire.
///
/// The status line echoes the request's version. `Content-Type` and
/// `Content-Length` are written only for responses that carry an entity, so
/// a bodiless 200 or 404 is just the status line and a blank line.
pub fn serialize_response(resp: &Response, version: &str) -> Vec<u8> {
    let version = if version.is_empty() {
        DEFAULT_HTTP_VERSION
    } else {
        version
    };

    let mut buf = Vec::with_capacity(64 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    if let Some(content_type) = resp.content_type {
        buf.extend_from_slice(b"Content-Type: ");
        buf.extend_from_slice(content_type.as_bytes());
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(format!("Content-Length: {}\r\n", resp.content_length()).as_bytes());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response, version: &str) -> Self {
        Self {
            buffer: serialize_response(response, version),
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
