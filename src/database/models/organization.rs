use serde::{Deserialize, Serialize};

use super::enums::OrgType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub org_id: i32,
    pub name: String,
    pub org_type: OrgType,
    pub phone: String,
    pub email: String,
    pub contact_person: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationInput {
    pub name: String,
    pub org_type: OrgType,
    pub phone: String,
    pub email: String,
    pub contact_person: String,
}
