//! Database layer: initialization, migrations and shared models

pub mod init;
pub mod migrations;
pub mod models;

pub use init::init_database;
pub use models::{Name, Reviewer, ReviewerRole, Submission, SubmissionStatus};
