//! Request handlers
//!
//! Classifies a parsed request into a [`router::Route`] and produces the
//! [`Response`](crate::http::response::Response) for it. Handlers never fail:
//! anything that cannot be served degrades to a 404.

pub mod router;
pub mod static_files;

pub use router::{Route, Router};
