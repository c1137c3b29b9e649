//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server: one request per connection, no
//! keep-alive, no chunked encoding.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine
//! - **`parser`**: turns buffered bytes into a [`request::Request`]
//! - **`request`**: request representation and header lookup
//! - **`response`**: status codes and the response record handlers return
//! - **`writer`**: encodes a response and writes it to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until the request is complete or EOF
//!        └──────┬──────┘
//!               │ Request received (too large → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and run the handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use courier::handler::Router;
//! use courier::http::connection::{Connection, ConnectionLimits};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:4221").await?;
//!     let router = Arc::new(Router::new(None));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router, ConnectionLimits::default());
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
