use serde::{Deserialize, Serialize};

// place
//  ├── lat
//  ├── lon
//  └── display_name
//
// Nominatim serves lat/lon as JSON strings, so they stay strings here
// and callers parse when they need numbers.

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}
