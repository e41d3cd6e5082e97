//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers
//! and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::short_link_service::ShortLinkService`] - Short link creation, resolution and listing

pub mod services;
