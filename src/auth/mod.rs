//! HTTP authentication for REST sessions.

pub mod basic;

pub use basic::{basic_auth, BasicAuth};
