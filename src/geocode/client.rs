// src/geocode/client.rs
use crate::geocode::GeocodeError;
use crate::geocode::Place;
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = "ambitrack/0.1 (environmental complaint tracker; ops@ambitrack.gob)";

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

pub struct GeocodeClient {
    client: Client,
}

impl GeocodeClient {
    pub fn new() -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Forward lookup: free-form address text to candidate places.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let mut params = HashMap::new();
        params.insert("format", "json".to_string());
        params.insert("q", query.to_string());
        params.insert("limit", limit.to_string());

        let text = self.fetch(&format!("{NOMINATIM_BASE}/search"), &params)?;
        Self::parse_search_results(&text)
    }

    /// Reverse lookup: coordinates to the nearest addressable place.
    pub fn reverse(&self, lat: f64, lon: f64) -> Result<Place, GeocodeError> {
        let mut params = HashMap::new();
        params.insert("format", "json".to_string());
        params.insert("lat", lat.to_string());
        params.insert("lon", lon.to_string());
        params.insert("zoom", "18".to_string());
        params.insert("addressdetails", "1".to_string());

        let text = self.fetch(&format!("{NOMINATIM_BASE}/reverse"), &params)?;
        Self::parse_reverse_result(&text)
    }

    fn fetch(&self, url: &str, params: &HashMap<&str, String>) -> Result<String, GeocodeError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = resp.status();

        let text = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::Network(format!(
                "Nominatim HTTP {status}: {text}"
            )));
        }

        Ok(text)
    }

    fn parse_search_results(text: &str) -> Result<Vec<Place>, GeocodeError> {
        serde_json::from_str(text).map_err(|e| GeocodeError::JsonParse(e.to_string()))
    }

    fn parse_reverse_result(text: &str) -> Result<Place, GeocodeError> {
        let json: Value =
            serde_json::from_str(text).map_err(|e| GeocodeError::JsonParse(e.to_string()))?;

        // A miss comes back as HTTP 200 with an error object.
        if json.get("error").is_some() {
            return Err(GeocodeError::NoResults);
        }

        serde_json::from_value(json).map_err(|e| GeocodeError::JsonParse(e.to_string()))
    }
}
