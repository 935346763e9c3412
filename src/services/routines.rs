//! Calls into the stored functions and procedures.

use serde::Deserialize;
use tracing::info;

use crate::access::SessionContext;
use crate::database::models::HealthStatus;
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, validate, ServiceResult};

#[derive(Deserialize)]
struct Scalar {
    value: Option<i32>,
}

pub struct RoutineService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> RoutineService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    async fn scalar(&self, stmt: Statement) -> ServiceResult<Option<i32>> {
        let rows: Vec<Scalar> = self.gateway.query_as(&stmt).await?;
        Ok(rows.into_iter().next().and_then(|s| s.value))
    }

    /// Whole years since birth; `None` when no such animal exists.
    pub async fn age_of_animal(&self, animal_id: i32, sp_id: i32) -> ServiceResult<Option<i32>> {
        self.scalar(
            Statement::new("SELECT age_of_animal($1, $2) AS value")
                .bind(animal_id)
                .bind(sp_id),
        )
        .await
    }

    /// Whole years of service; `None` when no such ranger exists.
    pub async fn ranger_experience(&self, ranger_id: i32) -> ServiceResult<Option<i32>> {
        self.scalar(Statement::new("SELECT ranger_experience($1) AS value").bind(ranger_id))
            .await
    }

    /// Low 1, Medium 2, High 3; 0 for anything else, including a missing report.
    pub async fn threat_severity_score(&self, report_id: i32) -> ServiceResult<i32> {
        let score = self
            .scalar(Statement::new("SELECT threat_severity_score($1) AS value").bind(report_id))
            .await?;
        Ok(score.unwrap_or(0))
    }

    pub async fn update_animal_health(&self, tracking_id: &str, status: HealthStatus) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        validate::required("tracking id", tracking_id)?;

        let stmt = Statement::new("CALL UpdateAnimalHealth($1, $2)")
            .bind(tracking_id.trim())
            .bind(status);
        self.gateway.execute(&stmt).await?;

        info!("{} set health of {} to {}", self.ctx.identity, tracking_id, status);
        Ok(())
    }
}
