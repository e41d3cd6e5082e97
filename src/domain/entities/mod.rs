//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A stored short key to URL mapping
//! - [`NewShortLink`] - Input for creating a [`ShortLink`]

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink};
