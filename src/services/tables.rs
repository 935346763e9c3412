//! Raw row browser over a fixed set of tables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::database::{Gateway, Row, Statement};
use crate::services::{ServiceError, ServiceResult};

/// The only identifiers ever spliced into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Species,
    AltNames,
    Habitat,
    Inhabits,
    Ranger,
    AssignedTo,
    Animal,
    ThreatReport,
    Organization,
    Equipment,
    Uses,
    Sighting,
    SightingDetails,
}

impl Table {
    pub const ALL: [Table; 13] = [
        Table::Species,
        Table::AltNames,
        Table::Habitat,
        Table::Inhabits,
        Table::Ranger,
        Table::AssignedTo,
        Table::Animal,
        Table::ThreatReport,
        Table::Organization,
        Table::Equipment,
        Table::Uses,
        Table::Sighting,
        Table::SightingDetails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Species => "species",
            Table::AltNames => "alt_names",
            Table::Habitat => "habitat",
            Table::Inhabits => "inhabits",
            Table::Ranger => "ranger",
            Table::AssignedTo => "assigned_to",
            Table::Animal => "animal",
            Table::ThreatReport => "threat_report",
            Table::Organization => "organization",
            Table::Equipment => "equipment",
            Table::Uses => "uses",
            Table::Sighting => "sighting",
            Table::SightingDetails => "sighting_details",
        }
    }
}

impl FromStr for Table {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Table::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ServiceError::not_found(format!("unknown table: {}", s)))
    }
}

/// Read-only; open to every role.
pub struct TableBrowser<'a, G: Gateway> {
    gateway: &'a G,
}

impl<'a, G: Gateway> TableBrowser<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Rows in key order, at most `limit` of them.
    pub async fn rows(&self, table: Table, limit: i64) -> ServiceResult<Vec<Row>> {
        let stmt = Statement::new(format!("SELECT * FROM {} ORDER BY 1 LIMIT $1", table.as_str()))
            .bind(limit.max(0));
        Ok(self.gateway.query(&stmt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Param;
    use crate::services::fake::FakeGateway;

    #[test]
    fn parses_path_segments() {
        assert_eq!("species".parse::<Table>().unwrap(), Table::Species);
        assert_eq!("threat-report".parse::<Table>().unwrap(), Table::ThreatReport);
        assert_eq!("Sighting_Details".parse::<Table>().unwrap(), Table::SightingDetails);
    }

    #[test]
    fn rejects_anything_else() {
        assert!("pg_authid".parse::<Table>().is_err());
        assert!("species; DROP TABLE ranger".parse::<Table>().is_err());
    }

    #[tokio::test]
    async fn browsing_splices_only_the_table_name() {
        let gw = FakeGateway::new();
        TableBrowser::new(&gw).rows(Table::Uses, 50).await.unwrap();

        let sent = gw.sent();
        assert_eq!(sent[0].sql(), "SELECT * FROM uses ORDER BY 1 LIMIT $1");
        assert_eq!(sent[0].params(), &[Param::BigInt(50)]);
    }
}
