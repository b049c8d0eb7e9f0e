//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs are validated with `validator` before reaching the service.

pub mod health;
pub mod link;
pub mod shorten;
