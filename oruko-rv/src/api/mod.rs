//! HTTP API handlers for oruko-rv

pub mod auth;
pub mod batches;
pub mod health;
pub mod jobs;
pub mod review;

pub use auth::{job_auth_middleware, session_auth_middleware};
pub use batches::{claim_batch, list_batches};
pub use health::health_routes;
pub use jobs::{create_session, sweep_locks};
pub use review::{
    approve_submission, edit_submission, ignore_submission, release_locks, undo_submission,
};
