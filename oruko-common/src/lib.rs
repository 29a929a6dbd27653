//! # Oruko Common Library
//!
//! Shared code for the Oruko review backend:
//! - Database models, initialization and migrations
//! - Configuration loading and root folder resolution
//! - API authentication (shared secret + reviewer sessions)
//! - Error types and timestamp utilities

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
