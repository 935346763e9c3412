use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{Assignment, AssignmentInput, Ranger, RangerInput};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceError, ServiceResult};

const RANGER_COLUMNS: &str = "ranger_id, full_name, rank, date_joined, phone, email, supervisor_id";

const ASSIGNMENT_SELECT: &str = "SELECT r.ranger_id, r.full_name, h.habitat_id, h.habitat_type, h.region, a.assigned_date \
     FROM assigned_to a \
     JOIN ranger r ON r.ranger_id = a.ranger_id \
     JOIN habitat h ON h.habitat_id = a.habitat_id";

pub struct RangerService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> RangerService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Ranger>> {
        let stmt = Statement::new(format!("SELECT {} FROM ranger ORDER BY ranger_id", RANGER_COLUMNS));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, ranger_id: i32) -> ServiceResult<Ranger> {
        let stmt = Statement::new(format!("SELECT {} FROM ranger WHERE ranger_id = $1", RANGER_COLUMNS))
            .bind(ranger_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("ranger {}", ranger_id))
            .await?)
    }

    pub async fn create(&self, input: &RangerInput) -> ServiceResult<Ranger> {
        ensure_can_mutate(self.ctx)?;
        validate::ranger(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO ranger (full_name, rank, date_joined, phone, email, supervisor_id) \
             VALUES ($1, $2, $3, $4, $5, $6::integer) RETURNING {}",
            RANGER_COLUMNS
        ))
        .bind(input.full_name.trim())
        .bind(input.rank)
        .bind(input.date_joined)
        .bind(input.phone.trim())
        .bind(input.email.trim())
        .bind(input.supervisor_id);

        let ranger: Ranger = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} created ranger {}", self.ctx.identity, ranger.ranger_id);
        Ok(ranger)
    }

    pub async fn update(&self, ranger_id: i32, input: &RangerInput) -> ServiceResult<Ranger> {
        ensure_can_mutate(self.ctx)?;
        validate::ranger(input)?;
        if input.supervisor_id == Some(ranger_id) {
            return Err(ServiceError::validation("a ranger cannot supervise themselves"));
        }

        let stmt = Statement::new(format!(
            "UPDATE ranger SET full_name = $1, rank = $2, date_joined = $3, phone = $4, email = $5, \
             supervisor_id = $6::integer WHERE ranger_id = $7 RETURNING {}",
            RANGER_COLUMNS
        ))
        .bind(input.full_name.trim())
        .bind(input.rank)
        .bind(input.date_joined)
        .bind(input.phone.trim())
        .bind(input.email.trim())
        .bind(input.supervisor_id)
        .bind(ranger_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("ranger {}", ranger_id)))?;
        info!("{} updated ranger {}", self.ctx.identity, ranger_id);
        Ok(decode_row(row)?)
    }

    /// Assignments, threat reports, sightings and issued equipment of the
    /// ranger are removed with them; supervised rangers lose their supervisor.
    pub async fn delete(&self, ranger_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM ranger WHERE ranger_id = $1").bind(ranger_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("ranger {}", ranger_id))?;
        info!("{} deleted ranger {}", self.ctx.identity, ranger_id);
        Ok(())
    }

    pub async fn assignments(&self, ranger_id: i32) -> ServiceResult<Vec<Assignment>> {
        let stmt = Statement::new(format!("{} WHERE a.ranger_id = $1 ORDER BY a.assigned_date DESC", ASSIGNMENT_SELECT))
            .bind(ranger_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn all_assignments(&self) -> ServiceResult<Vec<Assignment>> {
        let stmt = Statement::new(format!("{} ORDER BY r.full_name, h.habitat_id", ASSIGNMENT_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn assign(&self, ranger_id: i32, input: &AssignmentInput) -> ServiceResult<Assignment> {
        ensure_can_mutate(self.ctx)?;

        let stmt = Statement::new(
            "INSERT INTO assigned_to (ranger_id, habitat_id, assigned_date) \
             VALUES ($1, $2, COALESCE($3::date, CURRENT_DATE))",
        )
        .bind(ranger_id)
        .bind(input.habitat_id)
        .bind(input.assigned_date);
        self.gateway.execute(&stmt).await?;
        info!("{} assigned ranger {} to habitat {}", self.ctx.identity, ranger_id, input.habitat_id);

        let lookup = Statement::new(format!("{} WHERE a.ranger_id = $1 AND a.habitat_id = $2", ASSIGNMENT_SELECT))
            .bind(ranger_id)
            .bind(input.habitat_id);
        Ok(self
            .gateway
            .query_one_as(&lookup, &format!("assignment of ranger {}", ranger_id))
            .await?)
    }

    pub async fn unassign(&self, ranger_id: i32, habitat_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM assigned_to WHERE ranger_id = $1 AND habitat_id = $2")
            .bind(ranger_id)
            .bind(habitat_id);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("assignment of ranger {} to habitat {}", ranger_id, habitat_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::models::Rank;
    use crate::database::{GatewayError, Param, SqlType};
    use crate::services::fake::FakeGateway;
    use chrono::NaiveDate;

    fn input(supervisor_id: Option<i32>) -> RangerInput {
        RangerInput {
            full_name: "Asha Verma".into(),
            rank: Rank::FieldRanger,
            date_joined: NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
            phone: "9800000001".into(),
            email: "asha@sanctuary.org".into(),
            supervisor_id,
        }
    }

    #[tokio::test]
    async fn self_supervision_is_rejected() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("root", Role::Supervisor);
        let err = RangerService::new(&gw, &ctx).update(5, &input(Some(5))).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::Validation(_))));
        assert!(gw.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_supervisor_binds_null() {
        let gw = FakeGateway::new().reply(vec![serde_json::json!({
            "ranger_id": 1,
            "full_name": "Asha Verma",
            "rank": "Field Ranger",
            "date_joined": "2018-06-01",
            "phone": "9800000001",
            "email": "asha@sanctuary.org",
            "supervisor_id": null
        })]);
        let ctx = SessionContext::new("root", Role::Supervisor);
        let ranger = RangerService::new(&gw, &ctx).create(&input(None)).await.unwrap();

        assert_eq!(ranger.supervisor_id, None);
        assert_eq!(gw.sent()[0].params()[5], Param::Null(SqlType::Int));
    }

    #[tokio::test]
    async fn unassign_of_unknown_pair_is_not_found() {
        let gw = FakeGateway::new().reply(vec![]);
        let ctx = SessionContext::new("root", Role::Supervisor);
        let err = RangerService::new(&gw, &ctx).unassign(1, 2).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::NotFound(_))));
    }
}
