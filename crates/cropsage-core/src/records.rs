//! Records exchanged with the diagnosis backend.
//!
//! Field names on the wire follow the backend's serializers (`lat`/`lng` for
//! store positions); the Rust names spell them out.

use serde::{Deserialize, Serialize};

/// Search radius, in kilometres, for the nearby-store lookup.
pub const NEARBY_RADIUS: f64 = 5.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Used when the user's position cannot be determined (centre of India).
    pub const FALLBACK: Coordinates = Coordinates {
        latitude: 20.5937,
        longitude: 78.9629,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// An agricultural supply store as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl StoreRecord {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

fn default_severity() -> String {
    "medium".to_string()
}

/// A crop problem known to the classifier, managed through the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub remedies: Vec<String>,
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub causes: Option<String>,
}

impl Problem {
    /// A new problem with only a name; every list empty, severity `medium`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            aliases: Vec::new(),
            symptoms: Vec::new(),
            remedies: Vec::new(),
            severity: default_severity(),
            description: None,
            causes: None,
        }
    }
}

/// Outcome of classifying one query: the detected issue and its remedies,
/// in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub issue: String,
    pub remedies: Vec<String>,
}
