//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.1 server side: one request per
//! connection, answered and then closed.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`scanner`**: Delimiter search and a bounded read cursor over byte buffers
//! - **`headers`**: Header-line, media-type and content-disposition grammars
//! - **`parser`**: Parses the request line and header block from the initial read
//! - **`form`**: URL-encoded bodies and query strings
//! - **`multipart`**: `multipart/form-data` body decoding
//! - **`request`**: HTTP request representation and decoded bodies
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: The per-connection state machine
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read head (≤ buffer size), then Content-Length body
//!        └──────┬──────┘
//!               │ Request parsed          Malformed / disallowed method
//!               ▼                         ──────────────┐
//!        ┌──────────────────┐                           │
//!        │   Dispatching    │ ← Handler, else static    │
//!        └──────┬───────────┘   file, else 404          │
//!               │ Response ready                        │
//!               ▼                                       ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hearth::config::Config;
//! use hearth::http::request::{Method, Request};
//! use hearth::http::response::Response;
//! use hearth::http::writer::ResponseSink;
//! use hearth::server::Server;
//!
//! fn hello(_req: &Request, sink: &mut ResponseSink) -> anyhow::Result<()> {
//!     sink.send(&Response::ok("hi"));
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = Server::new(Config::default());
//!     server.add_handler(Method::GET, "/hello", hello);
//!     server.listen().await
//! }
//! ```

pub mod connection;
pub mod form;
pub mod headers;
pub mod mime;
pub mod multipart;
pub mod parser;
pub mod request;
pub mod response;
pub mod scanner;
pub mod writer;
