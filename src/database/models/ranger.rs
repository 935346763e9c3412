use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Rank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranger {
    pub ranger_id: i32,
    pub full_name: String,
    pub rank: Rank,
    pub date_joined: NaiveDate,
    pub phone: String,
    pub email: String,
    pub supervisor_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangerInput {
    pub full_name: String,
    pub rank: Rank,
    pub date_joined: NaiveDate,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub supervisor_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub ranger_id: i32,
    pub full_name: String,
    pub habitat_id: i32,
    pub habitat_type: String,
    pub region: String,
    pub assigned_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentInput {
    pub habitat_id: i32,
    /// Defaults to today.
    #[serde(default)]
    pub assigned_date: Option<NaiveDate>,
}
