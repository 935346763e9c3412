use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{Gender, HealthStatus};

/// Identified by `(animal_id, sp_id)`; `animal_id` alone is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub animal_id: i32,
    pub sp_id: i32,
    pub tracking_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnimal {
    pub animal_id: i32,
    pub sp_id: i32,
    pub tracking_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub health_status: HealthStatus,
}

/// The key `(animal_id, sp_id)` is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalUpdate {
    pub tracking_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub health_status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalListing {
    pub animal_id: i32,
    pub sp_id: i32,
    pub common_name: String,
    pub tracking_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub health_status: HealthStatus,
}
