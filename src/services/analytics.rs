//! Aggregate reads backing the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::{Rank, ThreatReportListing};
use crate::database::{Gateway, Statement};
use crate::services::ServiceResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub species: i64,
    pub habitats: i64,
    pub rangers: i64,
    pub animals: i64,
    pub threat_reports: i64,
    pub organizations: i64,
    pub equipment: i64,
    pub sightings: i64,
}

/// One bar of a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitatSpeciesCount {
    pub habitat_id: i32,
    pub habitat_type: String,
    pub region: String,
    pub species_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangerSummary {
    pub ranger_id: i32,
    pub full_name: String,
    pub rank: Rank,
    pub experience_years: Option<i32>,
    pub habitats_assigned: i64,
    pub threat_reports: i64,
    pub sightings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySightings {
    pub sighting_date: NaiveDate,
    pub sightings: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub totals: Totals,
    pub recent_threats: Vec<ThreatReportListing>,
    pub conservation_status: Vec<LabelCount>,
    pub health_status: Vec<LabelCount>,
    pub threat_levels: Vec<LabelCount>,
    pub equipment_status: Vec<LabelCount>,
}

/// Read-only; open to every role.
pub struct AnalyticsService<'a, G: Gateway> {
    gateway: &'a G,
}

impl<'a, G: Gateway> AnalyticsService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub async fn totals(&self) -> ServiceResult<Totals> {
        let stmt = Statement::new(
            "SELECT \
               (SELECT COUNT(*) FROM species) AS species, \
               (SELECT COUNT(*) FROM habitat) AS habitats, \
               (SELECT COUNT(*) FROM ranger) AS rangers, \
               (SELECT COUNT(*) FROM animal) AS animals, \
               (SELECT COUNT(*) FROM threat_report) AS threat_reports, \
               (SELECT COUNT(*) FROM organization) AS organizations, \
               (SELECT COUNT(*) FROM equipment) AS equipment, \
               (SELECT COUNT(*) FROM sighting) AS sightings",
        );
        Ok(self.gateway.query_one_as(&stmt, "totals").await?)
    }

    pub async fn recent_threats(&self, limit: i64) -> ServiceResult<Vec<ThreatReportListing>> {
        let stmt = Statement::new(
            "SELECT t.report_id, h.habitat_id, h.habitat_type, h.region, \
               r.ranger_id, r.full_name AS ranger_name, t.report_date, t.threat_level, t.description \
             FROM threat_report t \
             JOIN habitat h ON h.habitat_id = t.habitat_id \
             JOIN ranger r ON r.ranger_id = t.ranger_id \
             ORDER BY t.report_date DESC, t.report_id DESC \
             LIMIT $1",
        )
        .bind(limit.max(0));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    async fn distribution(&self, sql: &'static str) -> ServiceResult<Vec<LabelCount>> {
        Ok(self.gateway.query_as(&Statement::new(sql)).await?)
    }

    pub async fn conservation_status(&self) -> ServiceResult<Vec<LabelCount>> {
        self.distribution(
            "SELECT conservation_status AS label, COUNT(*) AS count \
             FROM species GROUP BY conservation_status ORDER BY count DESC, label",
        )
        .await
    }

    pub async fn health_status(&self) -> ServiceResult<Vec<LabelCount>> {
        self.distribution(
            "SELECT health_status AS label, COUNT(*) AS count \
             FROM animal GROUP BY health_status ORDER BY count DESC, label",
        )
        .await
    }

    pub async fn threat_levels(&self) -> ServiceResult<Vec<LabelCount>> {
        self.distribution(
            "SELECT threat_level AS label, COUNT(*) AS count \
             FROM threat_report GROUP BY threat_level ORDER BY count DESC, label",
        )
        .await
    }

    pub async fn equipment_status(&self) -> ServiceResult<Vec<LabelCount>> {
        self.distribution(
            "SELECT status AS label, COUNT(*) AS count \
             FROM equipment GROUP BY status ORDER BY count DESC, label",
        )
        .await
    }

    /// Every habitat, including those with no species linked.
    pub async fn species_per_habitat(&self) -> ServiceResult<Vec<HabitatSpeciesCount>> {
        let stmt = Statement::new(
            "SELECT h.habitat_id, h.habitat_type, h.region, COUNT(i.sp_id) AS species_count \
             FROM habitat h LEFT JOIN inhabits i ON i.habitat_id = h.habitat_id \
             GROUP BY h.habitat_id, h.habitat_type, h.region \
             ORDER BY species_count DESC, h.habitat_id",
        );
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn ranger_summary(&self) -> ServiceResult<Vec<RangerSummary>> {
        let stmt = Statement::new(
            "SELECT r.ranger_id, r.full_name, r.rank, ranger_experience(r.ranger_id) AS experience_years, \
               (SELECT COUNT(*) FROM assigned_to a WHERE a.ranger_id = r.ranger_id) AS habitats_assigned, \
               (SELECT COUNT(*) FROM threat_report t WHERE t.ranger_id = r.ranger_id) AS threat_reports, \
               (SELECT COUNT(*) FROM sighting g WHERE g.ranger_id = r.ranger_id) AS sightings \
             FROM ranger r \
             ORDER BY r.full_name",
        );
        Ok(self.gateway.query_as(&stmt).await?)
    }

    /// Sightings per day over the last `days` days, oldest first.
    pub async fn recent_sightings(&self, days: i64) -> ServiceResult<Vec<DailySightings>> {
        let stmt = Statement::new(
            "SELECT sighting_date, COUNT(*) AS sightings \
             FROM sighting \
             WHERE sighting_date >= CURRENT_DATE - $1::integer \
             GROUP BY sighting_date \
             ORDER BY sighting_date",
        )
        .bind(days.max(0));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    /// Headline figures, fetched concurrently on the session pool.
    pub async fn dashboard(&self, recent_limit: i64) -> ServiceResult<Dashboard> {
        let (totals, recent_threats, conservation_status, health_status, threat_levels, equipment_status) =
            futures::try_join!(
                self.totals(),
                self.recent_threats(recent_limit),
                self.conservation_status(),
                self.health_status(),
                self.threat_levels(),
                self.equipment_status(),
            )?;

        Ok(Dashboard {
            totals,
            recent_threats,
            conservation_status,
            health_status,
            threat_levels,
            equipment_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::FakeGateway;
    use serde_json::json;

    #[tokio::test]
    async fn totals_decode_counts() {
        let gw = FakeGateway::new().reply(vec![json!({
            "species": 5, "habitats": 3, "rangers": 4, "animals": 12,
            "threat_reports": 2, "organizations": 1, "equipment": 6, "sightings": 9
        })]);
        let totals = AnalyticsService::new(&gw).totals().await.unwrap();
        assert_eq!(totals.animals, 12);
        assert_eq!(totals.sightings, 9);
    }

    #[tokio::test]
    async fn distributions_decode_label_counts() {
        let gw = FakeGateway::new().reply(vec![
            json!({ "label": "Healthy", "count": 8 }),
            json!({ "label": "Sick", "count": 1 }),
        ]);
        let health = AnalyticsService::new(&gw).health_status().await.unwrap();
        assert_eq!(
            health,
            vec![
                LabelCount { label: "Healthy".into(), count: 8 },
                LabelCount { label: "Sick".into(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn ranger_summary_allows_missing_experience() {
        let gw = FakeGateway::new().reply(vec![json!({
            "ranger_id": 1, "full_name": "Asha Verma", "rank": "Senior Ranger",
            "experience_years": null, "habitats_assigned": 2, "threat_reports": 0, "sightings": 4
        })]);
        let rows = AnalyticsService::new(&gw).ranger_summary().await.unwrap();
        assert_eq!(rows[0].rank, Rank::SeniorRanger);
        assert_eq!(rows[0].experience_years, None);
    }
}
