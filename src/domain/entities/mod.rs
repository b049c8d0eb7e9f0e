//! Core domain entities.
//!
//! - [`Link`] - A persisted short code to URL mapping
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{DEFAULT_CODE_LENGTH, Link, MAX_CODE_LENGTH, MAX_URL_LENGTH, NewLink};
