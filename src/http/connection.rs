use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handler::Router;
use crate::http::parser::{ParseError, check_complete, parse_http_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Per-connection limits, copied out of [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub max_request_bytes: usize,
    pub read_timeout: Option<Duration>,
}

impl ConnectionLimits {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            max_request_bytes: cfg.max_request_bytes,
            read_timeout: cfg.read_timeout(),
        }
    }
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Serves exactly one request on one connection, then closes it.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<Router>,
    limits: ConnectionLimits,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>, limits: ConnectionLimits) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            router,
            limits,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (route, response) = self.router.handle(&req).await;

                    info!(
                        method = %req.method,
                        target = %req.target,
                        route = route.name(),
                        status = response.status.as_u16(),
                        bytes = response.content_length(),
                        "Request handled"
                    );

                    let writer = ResponseWriter::new(&response, &req.version);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown after response failed");
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until a whole request is buffered or the peer stops sending.
    ///
    /// Whatever arrived before end-of-stream is parsed as-is, so an empty or
    /// truncated request is still answered (normally with a 404). Returns
    /// `None` when the request outgrows the size limit; the connection is
    /// then closed without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            match check_complete(&self.buffer, self.limits.max_request_bytes) {
                Ok(len) => {
                    let request = parse_http_request(&self.buffer[..len]);
                    self.buffer.advance(len);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {}

                Err(ParseError::TooLarge) => {
                    warn!(
                        buffered = self.buffer.len(),
                        limit = self.limits.max_request_bytes,
                        "Request too large, closing connection"
                    );
                    return Ok(None);
                }
            }

            let n = match self.limits.read_timeout {
                Some(limit) => timeout(limit, self.stream.read_buf(&mut self.buffer))
                    .await
                    .context("timed out waiting for request")??,
                None => self.stream.read_buf(&mut self.buffer).await?,
            };

            if n == 0 {
                let request = parse_http_request(&self.buffer);
                self.buffer.clear();
                return Ok(Some(request));
            }
        }
    }
}
