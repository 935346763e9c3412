use tracing::info;

use crate::access::SessionContext;
use crate::database::models::{ThreatReport, ThreatReportInput, ThreatReportListing};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, validate, ServiceResult};

const LISTING_SELECT: &str = "SELECT t.report_id, h.habitat_id, h.habitat_type, h.region, \
     r.ranger_id, r.full_name AS ranger_name, t.report_date, t.threat_level, t.description \
     FROM threat_report t \
     JOIN habitat h ON h.habitat_id = t.habitat_id \
     JOIN ranger r ON r.ranger_id = t.ranger_id";

/// Threat reports are written only through the `LogThreatReport` procedure.
pub struct ThreatService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> ThreatService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    /// Newest first; `limit` of `None` returns every report.
    pub async fn list(&self, limit: Option<i64>) -> ServiceResult<Vec<ThreatReportListing>> {
        let stmt = Statement::new(format!(
            "{} ORDER BY t.report_date DESC, t.report_id DESC LIMIT $1::bigint",
            LISTING_SELECT
        ))
        .bind(limit);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn for_habitat(&self, habitat_id: i32) -> ServiceResult<Vec<ThreatReportListing>> {
        let stmt = Statement::new(format!(
            "{} WHERE t.habitat_id = $1 ORDER BY t.report_date DESC, t.report_id DESC",
            LISTING_SELECT
        ))
        .bind(habitat_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, report_id: i32) -> ServiceResult<ThreatReport> {
        let stmt = Statement::new(
            "SELECT report_id, habitat_id, ranger_id, report_date, threat_level, description \
             FROM threat_report WHERE report_id = $1",
        )
        .bind(report_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("threat report {}", report_id))
            .await?)
    }

    /// Dated by the server; the procedure rejects unknown levels.
    pub async fn log(&self, input: &ThreatReportInput) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;

        let stmt = Statement::new("CALL LogThreatReport($1, $2, $3, $4)")
            .bind(input.habitat_id)
            .bind(input.ranger_id)
            .bind(input.threat_level)
            .bind(input.description.trim());
        self.gateway.execute(&stmt).await?;

        info!(
            "{} logged a {} threat for habitat {}",
            self.ctx.identity, input.threat_level, input.habitat_id
        );
        Ok(())
    }

    pub async fn update_description(&self, report_id: i32, description: &str) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        validate::required("description", description)?;
        let stmt = Statement::new("UPDATE threat_report SET description = $1 WHERE report_id = $2")
            .bind(description.trim())
            .bind(report_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("threat report {}", report_id))
    }

    pub async fn delete(&self, report_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM threat_report WHERE report_id = $1").bind(report_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("threat report {}", report_id))?;
        info!("{} deleted threat report {}", self.ctx.identity, report_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::models::ThreatLevel;
    use crate::database::{Param, SqlType};
    use crate::services::fake::FakeGateway;
    use crate::services::ServiceError;

    #[tokio::test]
    async fn log_calls_the_procedure_with_bound_values() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("app_supervisor", Role::Supervisor);
        let input = ThreatReportInput {
            habitat_id: 2,
            ranger_id: 7,
            threat_level: ThreatLevel::High,
            description: "snare line near the river bend".into(),
        };
        ThreatService::new(&gw, &ctx).log(&input).await.unwrap();

        let sent = gw.sent();
        assert_eq!(sent[0].sql(), "CALL LogThreatReport($1, $2, $3, $4)");
        assert_eq!(
            sent[0].params(),
            &[
                Param::Int(2),
                Param::Int(7),
                Param::Text("High".into()),
                Param::Text("snare line near the river bend".into()),
            ]
        );
    }

    #[tokio::test]
    async fn viewers_cannot_log() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("tanisha", Role::Viewer);
        let input = ThreatReportInput {
            habitat_id: 2,
            ranger_id: 7,
            threat_level: ThreatLevel::Low,
            description: String::new(),
        };
        let err = ThreatService::new(&gw, &ctx).log(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn unlimited_listing_binds_null_limit() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("tanisha", Role::Viewer);
        let reports = ThreatService::new(&gw, &ctx).list(None).await.unwrap();

        assert!(reports.is_empty());
        assert_eq!(gw.sent()[0].params(), &[Param::Null(SqlType::BigInt)]);
    }
}
