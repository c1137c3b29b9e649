//! Connection acceptor

pub mod listener;
