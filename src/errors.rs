// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, validation, authorization) or downstream layers (DB).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    Unauthorized(String),
    /// A status value outside the known complaint lifecycle.
    InvalidStatus(String),
    /// Ledger rows can only be removed newest-first.
    NotLatest,
    DbError(String),
    /// The upstream address service failed or answered garbage.
    Geocode(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::InvalidStatus(value) => write!(f, "Unknown status: {value}"),
            ServerError::NotLatest => write!(f, "Only the most recent status entry can be removed"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::Geocode(msg) => write!(f, "Geocoding failed: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => ServerError::NotFound,
            other => ServerError::DbError(other.to_string()),
        }
    }
}

impl From<crate::geocode::GeocodeError> for ServerError {
    fn from(e: crate::geocode::GeocodeError) -> Self {
        match e {
            crate::geocode::GeocodeError::NoResults => ServerError::NotFound,
            other => ServerError::Geocode(other.to_string()),
        }
    }
}
