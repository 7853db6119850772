//! CLI command implementations

pub mod auth;
pub mod doctors;
pub mod init;
pub mod patient;
pub mod validate;
