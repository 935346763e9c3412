use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{Equipment, EquipmentInput, EquipmentListing, EquipmentUsage, IssueInput};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const EQUIPMENT_COLUMNS: &str = "equipment_id, equip_type, status, purchase_date, org_id";

const LISTING_SELECT: &str = "SELECT e.equipment_id, e.equip_type, e.status, e.purchase_date, e.org_id, \
     o.name AS organization \
     FROM equipment e JOIN organization o ON o.org_id = e.org_id";

const USAGE_SELECT: &str = "SELECT u.ranger_id, r.full_name AS ranger_name, u.equipment_id, e.equip_type, u.date_issued \
     FROM uses u \
     JOIN ranger r ON r.ranger_id = u.ranger_id \
     JOIN equipment e ON e.equipment_id = u.equipment_id";

/// Issuing and returning go through `uses`; its triggers keep the
/// equipment status in step.
pub struct EquipmentService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> EquipmentService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<EquipmentListing>> {
        let stmt = Statement::new(format!("{} ORDER BY e.equipment_id", LISTING_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, equipment_id: i32) -> ServiceResult<Equipment> {
        let stmt = Statement::new(format!(
            "SELECT {} FROM equipment WHERE equipment_id = $1",
            EQUIPMENT_COLUMNS
        ))
        .bind(equipment_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("equipment {}", equipment_id))
            .await?)
    }

    pub async fn create(&self, input: &EquipmentInput) -> ServiceResult<Equipment> {
        ensure_can_mutate(self.ctx)?;
        validate::equipment(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO equipment (equip_type, status, purchase_date, org_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            EQUIPMENT_COLUMNS
        ))
        .bind(input.equip_type.trim())
        .bind(input.status)
        .bind(input.purchase_date)
        .bind(input.org_id);

        let equipment: Equipment = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} created equipment {}", self.ctx.identity, equipment.equipment_id);
        Ok(equipment)
    }

    /// Issued equipment cannot leave `In Use` here; return it first.
    pub async fn update(&self, equipment_id: i32, input: &EquipmentInput) -> ServiceResult<Equipment> {
        ensure_can_mutate(self.ctx)?;
        validate::equipment(input)?;

        let stmt = Statement::new(format!(
            "UPDATE equipment SET equip_type = $1, status = $2, purchase_date = $3, org_id = $4 \
             WHERE equipment_id = $5 RETURNING {}",
            EQUIPMENT_COLUMNS
        ))
        .bind(input.equip_type.trim())
        .bind(input.status)
        .bind(input.purchase_date)
        .bind(input.org_id)
        .bind(equipment_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("equipment {}", equipment_id)))?;
        info!("{} updated equipment {}", self.ctx.identity, equipment_id);
        Ok(decode_row(row)?)
    }

    /// Refused while the equipment is issued to a ranger.
    pub async fn delete(&self, equipment_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM equipment WHERE equipment_id = $1").bind(equipment_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("equipment {}", equipment_id))?;
        info!("{} deleted equipment {}", self.ctx.identity, equipment_id);
        Ok(())
    }

    pub async fn usages(&self) -> ServiceResult<Vec<EquipmentUsage>> {
        let stmt = Statement::new(format!("{} ORDER BY u.date_issued DESC, u.equipment_id", USAGE_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn usage_of(&self, equipment_id: i32) -> ServiceResult<Vec<EquipmentUsage>> {
        let stmt = Statement::new(format!("{} WHERE u.equipment_id = $1", USAGE_SELECT)).bind(equipment_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    /// Fails unless the equipment is `Available`; on success it is `In Use`.
    pub async fn issue(&self, equipment_id: i32, input: &IssueInput) -> ServiceResult<EquipmentUsage> {
        ensure_can_mutate(self.ctx)?;

        let stmt = Statement::new(
            "INSERT INTO uses (ranger_id, equipment_id, date_issued) \
             VALUES ($1, $2, COALESCE($3::date, CURRENT_DATE))",
        )
        .bind(input.ranger_id)
        .bind(equipment_id)
        .bind(input.date_issued);
        self.gateway.execute(&stmt).await?;
        info!("{} issued equipment {} to ranger {}", self.ctx.identity, equipment_id, input.ranger_id);

        let lookup = Statement::new(format!("{} WHERE u.equipment_id = $1 AND u.ranger_id = $2", USAGE_SELECT))
            .bind(equipment_id)
            .bind(input.ranger_id);
        Ok(self
            .gateway
            .query_one_as(&lookup, &format!("issue of equipment {}", equipment_id))
            .await?)
    }

    /// Removing the last issue makes the equipment `Available` again.
    pub async fn return_from(&self, equipment_id: i32, ranger_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM uses WHERE equipment_id = $1 AND ranger_id = $2")
            .bind(equipment_id)
            .bind(ranger_id);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("issue of equipment {} to ranger {}", equipment_id, ranger_id),
        )?;
        info!("{} returned equipment {} from ranger {}", self.ctx.identity, equipment_id, ranger_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::{GatewayError, Param, SqlType};
    use crate::services::fake::FakeGateway;
    use crate::services::ServiceError;
    use serde_json::json;

    #[tokio::test]
    async fn issue_defaults_the_date_in_sql() {
        let gw = FakeGateway::new().reply(vec![]).reply(vec![json!({
            "ranger_id": 4,
            "ranger_name": "Asha Verma",
            "equipment_id": 9,
            "equip_type": "Radio",
            "date_issued": "2026-10-19"
        })]);
        let ctx = SessionContext::new("root", Role::Supervisor);
        let input = IssueInput {
            ranger_id: 4,
            date_issued: None,
        };
        let usage = EquipmentService::new(&gw, &ctx).issue(9, &input).await.unwrap();

        assert_eq!(usage.equip_type, "Radio");
        let sent = gw.sent();
        assert!(sent[0].sql().contains("COALESCE($3::date, CURRENT_DATE)"));
        assert_eq!(sent[0].params(), &[Param::Int(4), Param::Int(9), Param::Null(SqlType::Date)]);
    }

    #[tokio::test]
    async fn unavailable_equipment_is_a_constraint_error() {
        let gw = FakeGateway::new().fail(GatewayError::Constraint(
            "equipment 9 is not available (status: In Use)".into(),
        ));
        let ctx = SessionContext::new("root", Role::Supervisor);
        let input = IssueInput {
            ranger_id: 4,
            date_issued: None,
        };
        let err = EquipmentService::new(&gw, &ctx).issue(9, &input).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::Constraint(_))));
        assert_eq!(gw.sent().len(), 1);
    }
}
