use serde::{Deserialize, Serialize};

use super::enums::Climate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habitat {
    pub habitat_id: i32,
    pub habitat_type: String,
    pub climate: Climate,
    pub region: String,
    pub area_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitatInput {
    pub habitat_type: String,
    pub climate: Climate,
    pub region: String,
    pub area_size: f64,
}

/// One `inhabits` link with both sides named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitatSpecies {
    pub habitat_id: i32,
    pub habitat_type: String,
    pub region: String,
    pub sp_id: i32,
    pub common_name: String,
}
