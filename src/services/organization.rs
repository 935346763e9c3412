use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{Organization, OrganizationInput};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const ORGANIZATION_COLUMNS: &str = "org_id, name, org_type, phone, email, contact_person";

pub struct OrganizationService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> OrganizationService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Organization>> {
        let stmt = Statement::new(format!("SELECT {} FROM organization ORDER BY org_id", ORGANIZATION_COLUMNS));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, org_id: i32) -> ServiceResult<Organization> {
        let stmt = Statement::new(format!("SELECT {} FROM organization WHERE org_id = $1", ORGANIZATION_COLUMNS))
            .bind(org_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("organization {}", org_id))
            .await?)
    }

    pub async fn create(&self, input: &OrganizationInput) -> ServiceResult<Organization> {
        ensure_can_mutate(self.ctx)?;
        validate::organization(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO organization (name, org_type, phone, email, contact_person) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ORGANIZATION_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.org_type)
        .bind(input.phone.trim())
        .bind(input.email.trim())
        .bind(input.contact_person.trim());

        let org: Organization = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} created organization {} ({})", self.ctx.identity, org.org_id, org.name);
        Ok(org)
    }

    pub async fn update(&self, org_id: i32, input: &OrganizationInput) -> ServiceResult<Organization> {
        ensure_can_mutate(self.ctx)?;
        validate::organization(input)?;

        let stmt = Statement::new(format!(
            "UPDATE organization SET name = $1, org_type = $2, phone = $3, email = $4, contact_person = $5 \
             WHERE org_id = $6 RETURNING {}",
            ORGANIZATION_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.org_type)
        .bind(input.phone.trim())
        .bind(input.email.trim())
        .bind(input.contact_person.trim())
        .bind(org_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("organization {}", org_id)))?;
        info!("{} updated organization {}", self.ctx.identity, org_id);
        Ok(decode_row(row)?)
    }

    /// Refused while the organization still supplies equipment.
    pub async fn delete(&self, org_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM organization WHERE org_id = $1").bind(org_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("organization {}", org_id))?;
        info!("{} deleted organization {}", self.ctx.identity, org_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::GatewayError;
    use crate::services::fake::FakeGateway;
    use crate::services::ServiceError;

    #[tokio::test]
    async fn restrict_violation_surfaces_as_constraint() {
        let gw = FakeGateway::new().fail(GatewayError::Constraint(
            "the organization still supplies equipment; remove that equipment first".into(),
        ));
        let ctx = SessionContext::new("root", Role::Supervisor);
        let err = OrganizationService::new(&gw, &ctx).delete(1).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::Constraint(ref m)) if m.contains("equipment")));
    }

    #[tokio::test]
    async fn blank_contact_is_rejected() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("root", Role::Supervisor);
        let input = OrganizationInput {
            name: "GreenGuard".into(),
            org_type: crate::database::models::OrgType::Ngo,
            phone: "555-0100".into(),
            email: "info@greenguard.org".into(),
            contact_person: " ".into(),
        };
        let err = OrganizationService::new(&gw, &ctx).create(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(GatewayError::Validation(_))));
    }
}
