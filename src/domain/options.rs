// src/domain/options.rs
//
// Small closed vocabularies shared by forms, filters, and the db layer.
// Unlike complaint statuses these carry no history; they are plain
// column values with a fixed set of options.

use crate::errors::ServerError;

/// Triage band assigned to a complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

pub const ALL_PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

impl Priority {
    pub fn parse(value: &str) -> Result<Priority, ServerError> {
        match value {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ServerError::BadRequest(format!("unknown priority: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Account roles, lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Moderator,
    Admin,
}

pub const ALL_ROLES: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

impl Role {
    pub fn parse(value: &str) -> Result<Role, ServerError> {
        match value {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(ServerError::BadRequest(format!("unknown role: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Moderator => "Moderator",
            Role::Admin => "Administrator",
        }
    }
}

/// Whether a complaint is visible to the public or only to staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privacy {
    Public,
    Private,
}

pub const ALL_PRIVACIES: [Privacy; 2] = [Privacy::Public, Privacy::Private];

impl Privacy {
    pub fn parse(value: &str) -> Result<Privacy, ServerError> {
        match value {
            "public" => Ok(Privacy::Public),
            "private" => Ok(Privacy::Private),
            other => Err(ServerError::BadRequest(format!("unknown privacy: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Privacy::Public => "Public",
            Privacy::Private => "Private",
        }
    }
}
