//! Courier - minimal concurrent HTTP/1.1 server
//!
//! Serves one request per connection from a small fixed route set: a root
//! probe, `/echo/<text>`, User-Agent reflection and `/files/<name>`.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
