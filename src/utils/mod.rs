//! Utility functions shared across layers.
//!
//! - [`key_generator`] - Short key generation
//! - [`request_origin`] - Base URL derivation from HTTP headers

pub mod key_generator;
pub mod request_origin;
