use serde::{Deserialize, Serialize};

use super::enums::ConservationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub sp_id: i32,
    pub common_name: String,
    pub scientific_name: String,
    pub conservation_status: ConservationStatus,
    pub avg_lifespan: i32,
}

/// Create/update payload. `alt_names` is only read on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesInput {
    pub common_name: String,
    pub scientific_name: String,
    pub conservation_status: ConservationStatus,
    pub avg_lifespan: i32,
    #[serde(default)]
    pub alt_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltName {
    pub sp_id: i32,
    pub alt_name: String,
}

/// Alternative name joined with its species' common name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesAltName {
    pub sp_id: i32,
    pub common_name: String,
    pub alt_name: String,
}
