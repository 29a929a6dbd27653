//! Shared API types and authentication helpers

pub mod auth;
