// src/domain/status.rs

use crate::errors::ServerError;
use std::fmt;

/// The lifecycle stages a complaint moves through.
///
/// Any status may follow any other. Inspectors reopen resolved cases
/// and reviewers reject reports straight from intake, so the history
/// ledger records movement without restricting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    InReview,
    InProgress,
    Resolved,
    Rejected,
}

/// Every status, in the order forms and filters present them.
pub const ALL_STATUSES: [Status; 5] = [
    Status::Pending,
    Status::InReview,
    Status::InProgress,
    Status::Resolved,
    Status::Rejected,
];

impl Status {
    /// Parses the stored (and form-submitted) representation.
    /// Values are matched exactly; anything else is rejected so a typo
    /// can never reach the ledger.
    pub fn parse(value: &str) -> Result<Status, ServerError> {
        match value {
            "pending" => Ok(Status::Pending),
            "in_review" => Ok(Status::InReview),
            "in_progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "rejected" => Ok(Status::Rejected),
            other => Err(ServerError::InvalidStatus(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InReview => "in_review",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Rejected => "rejected",
        }
    }

    /// Human label used in tables and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InReview => "In review",
            Status::InProgress => "In progress",
            Status::Resolved => "Resolved",
            Status::Rejected => "Rejected",
        }
    }

    /// Badge background for this status.
    pub fn badge_color(&self) -> &'static str {
        match self {
            Status::Pending => "#b45309",
            Status::InReview => "#1d4ed8",
            Status::InProgress => "#6d28d9",
            Status::Resolved => "#15803d",
            Status::Rejected => "#b91c1c",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
