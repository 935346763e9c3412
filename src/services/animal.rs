use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{Animal, AnimalListing, AnimalUpdate, NewAnimal};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const ANIMAL_COLUMNS: &str = "animal_id, sp_id, tracking_id, date_of_birth, gender, health_status";

const LISTING_SELECT: &str = "SELECT a.animal_id, a.sp_id, s.common_name, a.tracking_id, a.date_of_birth, \
     a.gender, a.health_status \
     FROM animal a JOIN species s ON s.sp_id = a.sp_id";

/// Animals are always addressed by `(animal_id, sp_id)`.
pub struct AnimalService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> AnimalService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<AnimalListing>> {
        let stmt = Statement::new(format!("{} ORDER BY a.sp_id, a.animal_id", LISTING_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn list_for_species(&self, sp_id: i32) -> ServiceResult<Vec<AnimalListing>> {
        let stmt = Statement::new(format!("{} WHERE a.sp_id = $1 ORDER BY a.animal_id", LISTING_SELECT))
            .bind(sp_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, animal_id: i32, sp_id: i32) -> ServiceResult<Animal> {
        let stmt = Statement::new(format!(
            "SELECT {} FROM animal WHERE animal_id = $1 AND sp_id = $2",
            ANIMAL_COLUMNS
        ))
        .bind(animal_id)
        .bind(sp_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("animal {} of species {}", animal_id, sp_id))
            .await?)
    }

    pub async fn create(&self, input: &NewAnimal) -> ServiceResult<Animal> {
        ensure_can_mutate(self.ctx)?;
        validate::new_animal(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO animal (animal_id, sp_id, tracking_id, date_of_birth, gender, health_status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ANIMAL_COLUMNS
        ))
        .bind(input.animal_id)
        .bind(input.sp_id)
        .bind(input.tracking_id.trim())
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(input.health_status);

        let animal: Animal = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!(
            "{} created animal {} of species {} ({})",
            self.ctx.identity, animal.animal_id, animal.sp_id, animal.tracking_id
        );
        Ok(animal)
    }

    pub async fn update(&self, animal_id: i32, sp_id: i32, input: &AnimalUpdate) -> ServiceResult<Animal> {
        ensure_can_mutate(self.ctx)?;
        validate::animal_update(input)?;

        let stmt = Statement::new(format!(
            "UPDATE animal SET tracking_id = $1, date_of_birth = $2, gender = $3, health_status = $4 \
             WHERE animal_id = $5 AND sp_id = $6 RETURNING {}",
            ANIMAL_COLUMNS
        ))
        .bind(input.tracking_id.trim())
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(input.health_status)
        .bind(animal_id)
        .bind(sp_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("animal {} of species {}", animal_id, sp_id)))?;
        info!("{} updated animal {} of species {}", self.ctx.identity, animal_id, sp_id);
        Ok(decode_row(row)?)
    }

    /// Sighting links of the animal are removed with it.
    pub async fn delete(&self, animal_id: i32, sp_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM animal WHERE animal_id = $1 AND sp_id = $2")
            .bind(animal_id)
            .bind(sp_id);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("animal {} of species {}", animal_id, sp_id),
        )?;
        info!("{} deleted animal {} of species {}", self.ctx.identity, animal_id, sp_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::database::models::{Gender, HealthStatus};
    use crate::database::{GatewayError, Param};
    use crate::services::fake::FakeGateway;
    use crate::services::ServiceError;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn lookups_use_the_full_key() {
        let gw = FakeGateway::new().reply(vec![json!({
            "animal_id": 1,
            "sp_id": 2,
            "tracking_id": "TRK-002-001",
            "date_of_birth": "2019-03-14",
            "gender": "Female",
            "health_status": "Healthy"
        })]);
        let ctx = SessionContext::new("app_user", Role::Viewer);
        let animal = AnimalService::new(&gw, &ctx).get(1, 2).await.unwrap();

        assert_eq!(animal.health_status, HealthStatus::Healthy);
        assert_eq!(gw.sent()[0].params(), &[Param::Int(1), Param::Int(2)]);
    }

    #[tokio::test]
    async fn non_positive_animal_id_is_rejected() {
        let gw = FakeGateway::new();
        let ctx = SessionContext::new("root", Role::Supervisor);
        let input = NewAnimal {
            animal_id: 0,
            sp_id: 2,
            tracking_id: "TRK-1".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            gender: Gender::Male,
            health_status: HealthStatus::Healthy,
        };
        let err = AnimalService::new(&gw, &ctx).create(&input).await.unwrap_err();

        assert!(matches!(err, ServiceError::Gateway(GatewayError::Validation(_))));
        assert!(gw.sent().is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_animal_names_both_keys() {
        let gw = FakeGateway::new().reply(vec![]);
        let ctx = SessionContext::new("root", Role::Supervisor);
        let err = AnimalService::new(&gw, &ctx).delete(9, 4).await.unwrap_err();

        assert!(
            matches!(err, ServiceError::Gateway(GatewayError::NotFound(ref m)) if m == "animal 9 of species 4 not found")
        );
    }
}
