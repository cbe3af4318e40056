use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    JsonParse(String),
    NoResults,
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Network(msg) => write!(f, "Network error: {msg}"),
            GeocodeError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
            GeocodeError::NoResults => write!(f, "No matching place found"),
        }
    }
}

impl Error for GeocodeError {}
