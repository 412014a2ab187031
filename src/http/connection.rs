use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{parse_request_head, RequestHead};
use crate::http::request::{Request, RequestBuilder};
use crate::http::response::Response;
use crate::http::scanner::find;
use crate::http::writer::{ResponseSink, ResponseWriter};
use crate::server::ServerState;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

/// One client connection: exactly one request, one response, then close.
pub struct Connection<S> {
    stream: S,
    buffer: Vec<u8>,
    shared: Arc<ServerState>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

enum ReadOutcome {
    Request(Request),
    Reject(Response),
    PeerClosed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, shared: Arc<ServerState>) -> Self {
        let capacity = shared.read_buffer_size;
        Self {
            stream,
            buffer: Vec::with_capacity(capacity),
            shared,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await? {
                    ReadOutcome::Request(req) => ConnectionState::Dispatching(req),
                    ReadOutcome::Reject(resp) => {
                        ConnectionState::Writing(ResponseWriter::new(&resp))
                    }
                    ReadOutcome::PeerClosed => ConnectionState::Closed,
                },

                ConnectionState::Dispatching(req) => {
                    ConnectionState::Writing(self.dispatch(req).await?)
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }
        Ok(())
    }

    /// Fills the head buffer until it holds the blank line or ends on a line
    /// boundary, the buffer is full, or the peer stops sending.
    async fn read_head(&mut self) -> anyhow::Result<()> {
        let cap = self.shared.read_buffer_size;
        let mut chunk = vec![0u8; cap];

        while self.buffer.len() < cap && !head_received(&self.buffer) {
            let room = cap - self.buffer.len();
            let n = self.stream.read(&mut chunk[..room]).await?;

            if n == 0 {
                break;
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        self.read_head().await?;

        if self.buffer.is_empty() {
            // Client closed connection
            return Ok(ReadOutcome::PeerClosed);
        }

        let head = match parse_request_head(&self.buffer, &self.shared.allowed_methods) {
            Ok(head) => head,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting request");
                return Ok(ReadOutcome::Reject(Response::not_found()));
            }
        };

        if head.content_length > self.shared.max_body_size {
            tracing::warn!(
                content_length = head.content_length,
                limit = self.shared.max_body_size,
                "Request body over limit"
            );
            return Ok(ReadOutcome::Reject(Response::payload_too_large()));
        }

        let body = self.read_body(&head).await?;

        let mut builder = RequestBuilder::new()
            .method(head.method)
            .path(head.path)
            .version(head.version)
            .headers(head.headers)
            .body(body);
        if let Some(query) = head.query {
            builder = builder.query(query);
        }

        let request = builder.build().map_err(|e| anyhow::anyhow!(e))?;
        Ok(ReadOutcome::Request(request))
    }

    /// Takes the body bytes already buffered and reads the rest of
    /// Content-Length from the socket.
    async fn read_body(&mut self, head: &RequestHead) -> anyhow::Result<Vec<u8>> {
        let (len, offset) = match head.body_offset {
            Some(offset) if head.content_length > 0 => (head.content_length, offset),
            _ => return Ok(Vec::new()),
        };

        let buffered = &self.buffer[offset.min(self.buffer.len())..];
        let mut body = buffered[..buffered.len().min(len)].to_vec();

        let have = body.len();
        if have < len {
            body.resize(len, 0);
            self.stream
                .read_exact(&mut body[have..])
                .await
                .with_context(|| {
                    format!("reading request body ({} of {} bytes received)", have, len)
                })?;
        }

        Ok(body)
    }

    async fn dispatch(&mut self, request: Request) -> anyhow::Result<ResponseWriter> {
        let method = request.method;
        let path = request.path.clone();

        if let Some(handler) = self.shared.router.resolve(method, &path) {
            tracing::debug!(method = %method, path = %path, "Dispatching to handler");

            let (result, sink) = tokio::task::spawn_blocking(move || {
                let mut sink = ResponseSink::new();
                let result = handler.handle(&request, &mut sink);
                (result, sink)
            })
            .await
            .context("handler panicked")?;

            return Ok(match result {
                Ok(()) => {
                    if sink.is_empty() {
                        tracing::warn!(method = %method, path = %path, "Handler wrote no response");
                    }
                    ResponseWriter::from_bytes(sink.into_bytes())
                }
                Err(e) if sink.is_empty() => {
                    tracing::error!(method = %method, path = %path, error = %e, "Handler failed");
                    ResponseWriter::new(&Response::internal_error())
                }
                Err(e) => {
                    tracing::error!(
                        method = %method,
                        path = %path,
                        error = %e,
                        written = sink.len(),
                        "Handler failed after writing"
                    );
                    ResponseWriter::from_bytes(sink.into_bytes())
                }
            });
        }

        let response = match self.shared.static_files.load(&path).await? {
            Some(file) => {
                tracing::debug!(path = %path, bytes = file.bytes.len(), "Serving static file");
                Response::content(file.content_type, file.bytes)
            }
            None => {
                tracing::debug!(method = %method, path = %path, "No route or file");
                Response::not_found()
            }
        };

        Ok(ResponseWriter::new(&response))
    }
}

/// A head is usable once the blank line is buffered, or once the last read
/// stopped right after a complete line.
fn head_received(buf: &[u8]) -> bool {
    buf.ends_with(CRLF) || find(buf, HEADER_END, 0, buf.len()).is_some()
}
