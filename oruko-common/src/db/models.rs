//! Shared database models
//!
//! Rows are strongly typed with explicit optional fields; status and role are
//! stored as lowercase strings and converted through the enums below.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{Error, Result};

/// Lifecycle status of a review submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    Edited,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Edited => "edited",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            "edited" => Ok(SubmissionStatus::Edited),
            other => Err(Error::InvalidInput(format!(
                "Unknown submission status: {}",
                other
            ))),
        }
    }
}

/// Role of an authenticated reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewerRole {
    Contributor,
    Admin,
}

impl ReviewerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewerRole::Contributor => "contributor",
            ReviewerRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "contributor" => Ok(ReviewerRole::Contributor),
            "admin" => Ok(ReviewerRole::Admin),
            other => Err(Error::InvalidInput(format!(
                "Unknown reviewer role: {}",
                other
            ))),
        }
    }
}

/// A candidate name entry in the pronunciation catalog
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Name {
    pub id: i64,
    pub name: String,
    pub origin: Option<String>,
    pub meaning: Option<String>,
    pub phonetic_hint: Option<String>,
    pub audio_url: Option<String>,
    /// 0 = unverified, 1 = verified
    pub verification_status: i64,
    pub created_at: i64,
}

impl Name {
    pub fn is_verified(&self) -> bool {
        self.verification_status != 0
    }
}

/// One human-audio review task referencing a Name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: i64,
    pub name_id: i64,
    pub audio_url: Option<String>,
    pub status: String,
    pub phonetic_hint: Option<String>,
    /// Hint as it was at seed time, cached so undo can restore it
    pub original_phonetic_hint: Option<String>,
    pub verification_count: i64,
    pub locked_by: Option<String>,
    pub locked_at: Option<i64>,
    pub created_at: i64,
}

impl Submission {
    pub fn status(&self) -> Result<SubmissionStatus> {
        SubmissionStatus::parse(&self.status)
    }
}

/// An authenticated contributor or admin identity
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reviewer {
    pub id: i64,
    pub handle: String,
    pub role: String,
    /// Comma-separated category tags from the approved skill profile
    pub skills: Option<String>,
    pub created_at: i64,
}

impl Reviewer {
    pub fn role(&self) -> Result<ReviewerRole> {
        ReviewerRole::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Skill tags, trimmed, empty entries dropped
    pub fn skill_tags(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Approved,
            SubmissionStatus::Rejected,
            SubmissionStatus::Edited,
        ] {
            assert_eq!(SubmissionStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!(SubmissionStatus::parse("verified").is_err());
        assert!(SubmissionStatus::parse("").is_err());
    }

    #[test]
    fn test_skill_tags_parsing() {
        let reviewer = Reviewer {
            id: 1,
            handle: "ada".to_string(),
            role: "contributor".to_string(),
            skills: Some("Igbo, Yoruba,, hausa ".to_string()),
            created_at: 0,
        };
        assert_eq!(reviewer.skill_tags(), vec!["Igbo", "Yoruba", "hausa"]);

        let no_skills = Reviewer {
            skills: None,
            ..reviewer
        };
        assert!(no_skills.skill_tags().is_empty());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(ReviewerRole::parse("admin").unwrap(), ReviewerRole::Admin);
        assert!(ReviewerRole::parse("superuser").is_err());
    }
}
