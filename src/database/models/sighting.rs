use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sighting {
    pub sighting_id: i32,
    pub ranger_id: i32,
    pub sighting_date: NaiveDate,
    pub sighting_time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingInput {
    pub ranger_id: i32,
    pub sighting_date: NaiveDate,
    pub sighting_time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingListing {
    pub sighting_id: i32,
    pub ranger_id: i32,
    pub ranger_name: String,
    pub sighting_date: NaiveDate,
    pub sighting_time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingDetail {
    pub sighting_id: i32,
    pub animal_id: i32,
    pub sp_id: i32,
    pub ranger_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingDetailInput {
    pub animal_id: i32,
    pub sp_id: i32,
    pub ranger_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingDetailListing {
    pub sighting_id: i32,
    pub location: String,
    pub animal_id: i32,
    pub sp_id: i32,
    pub common_name: String,
    pub tracking_id: String,
    pub ranger_id: i32,
    pub ranger_name: String,
}
