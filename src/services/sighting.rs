use tracing::info;

use crate::access::SessionContext;
use crate::database::gateway::decode_row;
use crate::database::models::{
    Sighting, SightingDetail, SightingDetailInput, SightingDetailListing, SightingInput, SightingListing,
};
use crate::database::{Gateway, Statement};
use crate::services::{ensure_can_mutate, expect_changed, named, validate, ServiceResult};

const SIGHTING_COLUMNS: &str = "sighting_id, ranger_id, sighting_date, sighting_time, location";

const LISTING_SELECT: &str = "SELECT g.sighting_id, g.ranger_id, r.full_name AS ranger_name, g.sighting_date, \
     g.sighting_time, g.location \
     FROM sighting g JOIN ranger r ON r.ranger_id = g.ranger_id";

const DETAIL_SELECT: &str = "SELECT d.sighting_id, g.location, d.animal_id, d.sp_id, s.common_name, a.tracking_id, \
     d.ranger_id, r.full_name AS ranger_name \
     FROM sighting_details d \
     JOIN sighting g ON g.sighting_id = d.sighting_id \
     JOIN animal a ON a.animal_id = d.animal_id AND a.sp_id = d.sp_id \
     JOIN species s ON s.sp_id = d.sp_id \
     JOIN ranger r ON r.ranger_id = d.ranger_id";

pub struct SightingService<'a, G: Gateway> {
    gateway: &'a G,
    ctx: &'a SessionContext,
}

impl<'a, G: Gateway> SightingService<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a SessionContext) -> Self {
        Self { gateway, ctx }
    }

    pub async fn list(&self) -> ServiceResult<Vec<SightingListing>> {
        let stmt = Statement::new(format!(
            "{} ORDER BY g.sighting_date DESC, g.sighting_time DESC",
            LISTING_SELECT
        ));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn get(&self, sighting_id: i32) -> ServiceResult<Sighting> {
        let stmt = Statement::new(format!("SELECT {} FROM sighting WHERE sighting_id = $1", SIGHTING_COLUMNS))
            .bind(sighting_id);
        Ok(self
            .gateway
            .query_one_as(&stmt, &format!("sighting {}", sighting_id))
            .await?)
    }

    pub async fn create(&self, input: &SightingInput) -> ServiceResult<Sighting> {
        ensure_can_mutate(self.ctx)?;
        validate::sighting(input)?;

        let stmt = Statement::new(format!(
            "INSERT INTO sighting (ranger_id, sighting_date, sighting_time, location) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            SIGHTING_COLUMNS
        ))
        .bind(input.ranger_id)
        .bind(input.sighting_date)
        .bind(input.sighting_time)
        .bind(input.location.trim());

        let sighting: Sighting = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!("{} recorded sighting {}", self.ctx.identity, sighting.sighting_id);
        Ok(sighting)
    }

    pub async fn update(&self, sighting_id: i32, input: &SightingInput) -> ServiceResult<Sighting> {
        ensure_can_mutate(self.ctx)?;
        validate::sighting(input)?;

        let stmt = Statement::new(format!(
            "UPDATE sighting SET ranger_id = $1, sighting_date = $2, sighting_time = $3, location = $4 \
             WHERE sighting_id = $5 RETURNING {}",
            SIGHTING_COLUMNS
        ))
        .bind(input.ranger_id)
        .bind(input.sighting_date)
        .bind(input.sighting_time)
        .bind(input.location.trim())
        .bind(sighting_id);

        let row = self
            .gateway
            .execute_returning(&stmt)
            .await
            .map_err(named(format!("sighting {}", sighting_id)))?;
        Ok(decode_row(row)?)
    }

    pub async fn delete(&self, sighting_id: i32) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new("DELETE FROM sighting WHERE sighting_id = $1").bind(sighting_id);
        expect_changed(self.gateway.execute(&stmt).await?, format!("sighting {}", sighting_id))?;
        info!("{} deleted sighting {}", self.ctx.identity, sighting_id);
        Ok(())
    }

    pub async fn details(&self, sighting_id: i32) -> ServiceResult<Vec<SightingDetailListing>> {
        let stmt = Statement::new(format!("{} WHERE d.sighting_id = $1 ORDER BY d.sp_id, d.animal_id", DETAIL_SELECT))
            .bind(sighting_id);
        Ok(self.gateway.query_as(&stmt).await?)
    }

    pub async fn all_details(&self) -> ServiceResult<Vec<SightingDetailListing>> {
        let stmt = Statement::new(format!("{} ORDER BY d.sighting_id, d.sp_id, d.animal_id", DETAIL_SELECT));
        Ok(self.gateway.query_as(&stmt).await?)
    }

    /// Rejected when the animal is currently `Sick`.
    pub async fn add_detail(&self, sighting_id: i32, input: &SightingDetailInput) -> ServiceResult<SightingDetail> {
        ensure_can_mutate(self.ctx)?;
        validate::animal_id(input.animal_id)?;

        let stmt = Statement::new(
            "INSERT INTO sighting_details (sighting_id, animal_id, sp_id, ranger_id) VALUES ($1, $2, $3, $4) \
             RETURNING sighting_id, animal_id, sp_id, ranger_id",
        )
        .bind(sighting_id)
        .bind(input.animal_id)
        .bind(input.sp_id)
        .bind(input.ranger_id);

        let detail: SightingDetail = decode_row(self.gateway.execute_returning(&stmt).await?)?;
        info!(
            "{} linked animal {} of species {} to sighting {}",
            self.ctx.identity, detail.animal_id, detail.sp_id, sighting_id
        );
        Ok(detail)
    }

    pub async fn remove_detail(&self, sighting_id: i32, input: &SightingDetailInput) -> ServiceResult<()> {
        ensure_can_mutate(self.ctx)?;
        let stmt = Statement::new(
            "DELETE FROM sighting_details \
             WHERE sighting_id = $1 AND animal_id = $2 AND sp_id = $3 AND ranger_id = $4",
        )
        .bind(sighting_id)
        .bind(input.animal_id)
        .bind(input.sp_id)
        .bind(input.ranger_id);
        expect_changed(
            self.gateway.execute(&stmt).await?,
            format!("animal {} of species {} in sighting {}", input.animal_id, input.sp_id, sighting_id),
        )
    }
}
