//! HTTP request handlers for API endpoints.

pub mod health;
pub mod keys;
pub mod redirect;
pub mod shorten;

pub use health::health_handler;
pub use keys::keys_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
