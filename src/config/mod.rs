//! Configuration management
//!
//! Connection parameters come from the environment; there is no config file.

pub mod connections;

pub use connections::{ConnectionConfig, SslMode};
