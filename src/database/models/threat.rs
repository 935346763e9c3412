use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::ThreatLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub report_id: i32,
    pub habitat_id: i32,
    pub ranger_id: i32,
    pub report_date: NaiveDate,
    pub threat_level: ThreatLevel,
    pub description: String,
}

/// Report date is always the server's current date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatReportInput {
    pub habitat_id: i32,
    pub ranger_id: i32,
    pub threat_level: ThreatLevel,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReportListing {
    pub report_id: i32,
    pub habitat_id: i32,
    pub habitat_type: String,
    pub region: String,
    pub ranger_id: i32,
    pub ranger_name: String,
    pub report_date: NaiveDate,
    pub threat_level: ThreatLevel,
    pub description: String,
}
