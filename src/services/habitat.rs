use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{Habitat, HabitatInput, HabitatSpecies};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const HABITAT_COLUMNS: &str = "habitat_id, habitat_type, climate, region, area_size";

const LINK_SELECT: &str = "SELECT h.habitat_id, h.habitat_type, h.region, s.sp_id, s.common_name \
     FROM inhabits i \
     JOIN habitat h ON h.habitat_id = i.habitat_id \
     JOIN species s ON s.sp_id = i.sp_id";

pub struct HabitatService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> HabitatService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Habitat>> {
        let stmt = Statement::new(format!("SELECT {} FROM habitat ORDER BY habitat_id", HABITAT_COLUMNS));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, habitat_id: i32) -> ServiceResult<Habitat> {
        let stmt = Statement::new(format!("SELECT {} FROM habitat WHERE habitat_id = $1", HABITAT_COLUMNS))
            .bind(habitat_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("habitat {}", habitat_id))
            .await?)
    }

    pub async fn create(&self, input: &HabitatInput) -> ServiceResult<Habitat> {
        ensure_can_mutate(self.ctx)?;
        validate::habitat(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO habitat (habitat_type, climate, region, area_size) VALUES ($1, $2, $3, $4) RETURNING {}",
            HABITAT_COLUMNS
        ))
        .bind(input.habitat_type.trim())
        .bind(input.climate)
        .bind(input.region.trim())
        .bind(input.area_size);

        let habitat: Habitat = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} created habitat {}", self.ctx.identity, habitat.habitat_id);
        Ok(habitat)
    }

    pub async fn update(&self, habitat_id: i32, input: &HabitatInput) -> ServiceResult<Habitat> {
        ensure_can_mutate(self.ctx)?;
        validate::habitat(input)?;

        let stmt = Statement::new(format!(
            "UPDATE habitat SET habitat_type = $1, climate = $2, region = $3, area_size = $4 \
             WHERE habitat_id = $5 RETURNING {}",
            HABITAT_COLUMNS
        ))
        .bind(input.habitat_type.trim())
        .bind(input.climate)
        .bind(input.region.trim())
        .bind(input.area_size)
        .bind(habitat_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("habitat {}", habitat_id)))?;
        info!("{} updated habitat {}", self.ctx.identity, habitat_id);
        Ok(decode_row(row)?)
    }

    /// Species links, ranger assignments and threat reports of the habitat
    /// are removed with it.
    pub async fn delete(&self, habitat_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM habitat WHERE habitat_id = $1").bind(habitat_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("habitat {}", habitat_id))?;
        info!("{} deleted habitat {}", self.ctx.identity, habitat_id);
        Ok(())
    }

    pub async fn species(&self, habitat_id: i32) -> ServiceResult<Vec<HabitatSpecies>> {
        let stmt = Statement::new(format!("{} WHERE i.habitat_id = $1 ORDER BY s.common_name", LINK_SELECT))
            .bind(habitat_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn all_links(&self) -> ServiceResult<Vec<HabitatSpecies>> {
        let stmt = Statement::new(format!("{} ORDER BY h.habitat_id, s.common_name", LINK_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn link_species(&self, habitat_id: i32, sp_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("INSERT INTO inhabits (habitat_id, sp_id) VALUES ($1, $2)")
            .bind(habitat_id)
            .bind(sp_id);
        self.gateway.execute(&stmt).await?;
        info!("{} linked species {} to habitat {}", self.ctx.identity, sp_id, habitat_id);
        Ok(())
    }

    pub async fn unlink_species(&self, habitat_id: i32, sp_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM inhabits WHERE habitat_id = $1 AND sp_id = $2")
            .bind(habitat_id)
            .bind(sp_id);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("species {} in habitat {}", sp_id, habitat_id),
        )
    }
}
