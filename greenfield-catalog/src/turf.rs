use greenfield_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RATING: f64 = 4.5;

/// A bookable ground.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Turf {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Hourly price in major currency units.
    pub price: f64,
    pub rating: f64,
    pub amenities: Vec<String>,
}

/// Admin input for creating or editing a turf. Every field is optional so the
/// same shape serves partial updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurfDraft {
    pub name: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub amenities: Option<Vec<String>>,
}

impl TurfDraft {
    /// Name, location and a positive price are required for a new turf.
    pub fn into_turf(self, id: String) -> CoreResult<Turf> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let location = self.location.filter(|l| !l.trim().is_empty());
        let price = self.price.filter(|p| p.is_finite() && *p > 0.0);

        match (name, location, price) {
            (Some(name), Some(location), Some(price)) => Ok(Turf {
                id,
                name,
                location,
                price,
                rating: DEFAULT_RATING,
                amenities: self.amenities.unwrap_or_default(),
            }),
            _ => Err(CoreError::ValidationError("Missing required fields".to_string())),
        }
    }
}

impl Turf {
    /// Overwrites only the fields present (and non-empty) in the draft.
    pub fn apply(&mut self, draft: TurfDraft) {
        if let Some(name) = draft.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        if let Some(location) = draft.location.filter(|l| !l.trim().is_empty()) {
            self.location = location;
        }
        if let Some(price) = draft.price.filter(|p| p.is_finite() && *p > 0.0) {
            self.price = price;
        }
        if let Some(amenities) = draft.amenities {
            self.amenities = amenities;
        }
    }
}

fn seed(id: &str, name: &str, location: &str, price: f64, rating: f64, amenities: &[&str]) -> Turf {
    Turf {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        price,
        rating,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
    }
}

/// The five grounds every fresh process starts with.
pub fn seed_turfs() -> Vec<Turf> {
    vec![
        seed("turf1", "Green Valley Turf", "Downtown, City Center", 500.0, 4.5,
            &["Lights", "Parking", "Changing Room"]),
        seed("turf2", "Premier Sports Ground", "Suburbs, North Area", 600.0, 4.8,
            &["Lights", "Parking", "Changing Room", "Canteen"]),
        seed("turf3", "Urban Turf Arena", "Business District", 700.0, 4.2,
            &["Lights", "Parking", "Changing Room", "Gym Access"]),
        seed("turf4", "Community Sports Park", "Residential Area", 400.0, 4.0,
            &["Parking", "Changing Room"]),
        seed("turf5", "Elite Sports Complex", "Premium Zone", 800.0, 4.9,
            &["Lights", "Parking", "Changing Room", "Canteen", "Gym Access"]),
    ]
}
