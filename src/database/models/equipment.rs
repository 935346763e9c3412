use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::EquipmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: i32,
    pub equip_type: String,
    pub status: EquipmentStatus,
    pub purchase_date: NaiveDate,
    pub org_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentInput {
    pub equip_type: String,
    pub status: EquipmentStatus,
    pub purchase_date: NaiveDate,
    pub org_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentListing {
    pub equipment_id: i32,
    pub equip_type: String,
    pub status: EquipmentStatus,
    pub purchase_date: NaiveDate,
    pub org_id: i32,
    pub organization: String,
}

/// A `uses` row: equipment currently issued to a ranger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentUsage {
    pub ranger_id: i32,
    pub ranger_name: String,
    pub equipment_id: i32,
    pub equip_type: String,
    pub date_issued: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueInput {
    pub ranger_id: i32,
    /// Defaults to today.
    #[serde(default)]
    pub date_issued: Option<NaiveDate>,
}
