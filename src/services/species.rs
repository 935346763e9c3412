use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{AltName, Species, SpeciesAltName, SpeciesInput};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const SPECIES_COLUMNS: &str = "sp_id, common_name, scientific_name, conservation_status, avg_lifespan";

pub struct SpeciesService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> SpeciesService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Species>> {
        let stmt = Statement::new(format!("SELECT {} FROM species ORDER BY sp_id", SPECIES_COLUMNS));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, sp_id: i32) -> ServiceResult<Species> {
        let stmt = Statement::new(format!("SELECT {} FROM species WHERE sp_id = $1", SPECIES_COLUMNS))
            .bind(sp_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("species {}", sp_id))
            .await?)
    }

    /// Creates the species together with any alternative names given with
    /// it, in one statement. A rejected name leaves no species behind.
    pub async fn create(&self, input: &SpeciesInput) -> ServiceResult<Species> {
        ensure_can_mutate(self.ctx)?;
        validate::species(input)?;

        let names: Vec<String> = input.alt_names.iter().map(|n| n.trim().to_string()).collect();
        let stmt = Statement::new(format!(
            "WITH s AS ( \
               INSERT INTO species (common_name, scientific_name, conservation_status, avg_lifespan) \
               VALUES ($1, $2, $3, $4) RETURNING {} \
             ), a AS ( \
               INSERT INTO alt_names (sp_id, alt_name) SELECT s.sp_id, n FROM s, unnest($5::text[]) AS n \
             ) \
             SELECT row_to_json(s) AS row FROM s",
            SPECIES_COLUMNS
        ))
        .bind(input.common_name.trim())
        .bind(input.scientific_name.trim())
        .bind(input.conservation_status)
        .bind(input.avg_lifespan)
        .bind(names)
        .projected();

        let species: Species = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} created species {} ({})", self.ctx.identity, species.sp_id, species.common_name);
        Ok(species)
    }

    pub async fn update(&self, sp_id: i32, input: &SpeciesInput) -> ServiceResult<Species> {
        ensure_can_mutate(self.ctx)?;
        validate::species(input)?;

        let stmt = Statement::new(format!(
            "UPDATE species SET common_name = $1, scientific_name = $2, conservation_status = $3, \
             avg_lifespan = $4 WHERE sp_id = $5 RETURNING {}",
            SPECIES_COLUMNS
        ))
        .bind(input.common_name.trim())
        .bind(input.scientific_name.trim())
        .bind(input.conservation_status)
        .bind(input.avg_lifespan)
        .bind(sp_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("species {}", sp_id)))?;
        info!("{} updated species {}", self.ctx.identity, sp_id);
        Ok(decode_row(row)?)
    }

    /// Alternative names, habitat links and animals of the species go with it.
    pub async fn delete(&self, sp_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM species WHERE sp_id = $1").bind(sp_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("species {}", sp_id))?;
        info!("{} deleted species {}", self.ctx.identity, sp_id);
        Ok(())
    }

    pub async fn alt_names(&self, sp_id: i32) -> ServiceResult<Vec<AltName>> {
        let stmt = Statement::new("SELECT sp_id, alt_name FROM alt_names WHERE sp_id = $1 ORDER BY alt_name")
            .bind(sp_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn all_alt_names(&self) -> ServiceResult<Vec<SpeciesAltName>> {
        let stmt = Statement::new(
            "SELECT s.sp_id, s.common_name, a.alt_name \
             FROM species s JOIN alt_names a ON s.sp_id = a.sp_id \
             ORDER BY s.common_name, a.alt_name",
        );
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn add_alt_name(&self, sp_id: i32, alt_name: &str) -> ServiceResult<AltName> {
        ensure_can_mutate(self.ctx)?;
        validate::required("alternative name", alt_name)?;

        let stmt = Statement::new("INSERT INTO alt_names (sp_id, alt_name) VALUES ($1, $2) RETURNING sp_id, alt_name")
            .bind(sp_id)
            .bind(alt_name.trim());
        Ok(decode_row(self.gateway.execute_returning(&stmt).await?)?)
    }

    pub async fn remove_alt_name(&self, sp_id: i32, alt_name: &str) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM alt_names WHERE sp_id = $1 AND alt_name = $2")
            .bind(sp_id)
            .bind(alt_name);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("alternative name '{}' of species {}", alt_name, sp_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::models::ConservationStatus;
    use crate::database::{GatewayError, Param};
    use crate::services::fake::FakeGateway;
    use crate::services::ServiceError;
    use serde_json::json;

    fn tiger() -> SpeciesInput {
        SpeciesInput {
            common_name: " Bengal Tiger ".into(),
            scientific_name: "Panthera tigris tigris".into(),
            conservation_status: ConservationStatus::Endangered,
            avg_lifespan: 15,
            alt_names: vec![" Royal Bengal Tiger".into(), "Indian Tiger".into()],
        }
    }

    fn tiger_row() -> serde_json::Value {
        json!({
            "sp_id": 3,
            "common_name": "Bengal Tiger",
            "scientific_name": "Panthera tigris tigris",
            "conservation_status": "Endangered",
            "avg_lifespan": 15
        })
    }

    #[tokio::test]
    async fn viewer_cannot_create() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("app_user", Role::Viewer);
        let err = SpeciesService::new(&gw, &ctx).create(&tiger()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Forbidden { role: Role::Viewer }));
        assert!(gw.sent().is_empty());
    }

    #[tokio::test]
    async fn create_sends_species_and_alt_names_as_one_statement() {
        let gw = FakeGateway::new().reply(vec![tiger_row()]);
        let ctx = SessionContext::new("app_supervisor", Role::Supervisor);
        let species = SpeciesService::new(&gw, &ctx).create(&tiger()).await.unwrap();

        assert_eq!(species.sp_id, 3);
        let sent = gw.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_projected());
        assert!(sent[0].sql().starts_with("WITH s AS ("));
        assert_eq!(sent[0].params()[0], Param::Text("Bengal Tiger".into()));
        assert_eq!(sent[0].params()[2], Param::Text("Endangered".into()));
        assert_eq!(
            sent[0].params()[4],
            Param::TextArray(vec!["Royal Bengal Tiger".into(), "Indian Tiger".into()])
        );
    }

    #[tokio::test]
    async fn rejected_alt_names_fail_the_whole_create() {
        let gw = FakeGateway::new()
            .fail(GatewayError::Constraint("the species already has this alternative name".into()));
        let ctx = SessionContext::new("app_supervisor", Role::Supervisor);
        let mut input = tiger();
        input.alt_names = vec!["Tiger".into(), "Tiger".into()];
        let err = SpeciesService::new(&gw, &ctx).create(&input).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::Constraint(_))));
        // Nothing left over to undo
        assert_eq!(gw.sent().len(), 1);
        assert_eq!(gw.sent()[0].params()[4], Param::TextArray(vec!["Tiger".into(), "Tiger".into()]));
    }

    #[tokio::test]
    async fn invalid_lifespan_never_reaches_the_database() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("root", Role::Supervisor);
        let mut input = tiger();
        input.avg_lifespan = 0;

        let err = SpeciesService::new(&gw, &ctx).create(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(GatewayError::Validation(_))));
        assert!(gw.sent().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_species_names_it() {
        let gw = FakeGateway::new().reply(vec![]);
        let ctx = SessionContext::new("root", Role::Supervisor);
        let err = SpeciesService::new(&gw, &ctx).update(42, &tiger()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::NotFound(ref m)) if m == "species 42 not found"));
    }

    #[tokio::test]
    async fn get_decodes_the_row() {
        let gw = FakeGateway::new().reply(vec![tiger_row()]);
        let ctx = SessionContext::new("app_user", Role::Viewer);
        let species = SpeciesService::new(&gw, &ctx).get(3).await.unwrap();

        assert_eq!(species.conservation_status, ConservationStatus::Endangered);
    }
}
