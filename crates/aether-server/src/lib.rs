//! Aether Identity authorization server.
//!
//! Library surface for the `aether-server` binary; exposed so
//! integration tests can build the service graph and router in-process.

pub mod app;
pub mod config;
pub mod observability;
