//! Input checks applied before any statement is sent.

use crate::database::models::{
    AnimalUpdate, EquipmentInput, HabitatInput, NewAnimal, OrganizationInput, RangerInput,
    SightingInput, SpeciesInput,
};
use crate::services::{ServiceError, ServiceResult};

pub const MAX_LIFESPAN_YEARS: i32 = 200;

pub fn required(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn lifespan(years: i32) -> ServiceResult<()> {
    if !(1..=MAX_LIFESPAN_YEARS).contains(&years) {
        return Err(ServiceError::validation(format!(
            "average lifespan must be between 1 and {} years",
            MAX_LIFESPAN_YEARS
        )));
    }
    Ok(())
}

pub fn area(size: f64) -> ServiceResult<()> {
    if !size.is_finite() || size < 0.0 {
        return Err(ServiceError::validation("area size must be a non-negative number"));
    }
    Ok(())
}

pub fn animal_id(id: i32) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::validation("animal id must be positive"));
    }
    Ok(())
}

pub fn species(input: &SpeciesInput) -> ServiceResult<()> {
    required("common name", &input.common_name)?;
    required("scientific name", &input.scientific_name)?;
    lifespan(input.avg_lifespan)?;
    for name in &input.alt_names {
        required("alternative name", name)?;
    }
    Ok(())
}

pub fn habitat(input: &HabitatInput) -> ServiceResult<()> {
    required("habitat type", &input.habitat_type)?;
    required("region", &input.region)?;
    area(input.area_size)
}

pub fn ranger(input: &RangerInput) -> ServiceResult<()> {
    required("full name", &input.full_name)?;
    required("phone", &input.phone)?;
    required("email", &input.email)
}

pub fn new_animal(input: &NewAnimal) -> ServiceResult<()> {
    animal_id(input.animal_id)?;
    required("tracking id", &input.tracking_id)
}

pub fn animal_update(input: &AnimalUpdate) -> ServiceResult<()> {
    required("tracking id", &input.tracking_id)
}

pub fn organization(input: &OrganizationInput) -> ServiceResult<()> {
    required("name", &input.name)?;
    required("phone", &input.phone)?;
    required("email", &input.email)?;
    required("contact person", &input.contact_person)
}

pub fn equipment(input: &EquipmentInput) -> ServiceResult<()> {
    required("equipment type", &input.equip_type)
}

pub fn sighting(input: &SightingInput) -> ServiceResult<()> {
    required("location", &input.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Climate, ConservationStatus};
    use crate::database::GatewayError;

    fn is_validation(result: ServiceResult<()>) -> bool {
        matches!(result, Err(ServiceError::Gateway(GatewayError::Validation(_))))
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(is_validation(required("name", "")));
        assert!(is_validation(required("name", "   ")));
        assert!(required("name", "GreenGuard").is_ok());
    }

    #[test]
    fn lifespan_bounds() {
        assert!(is_validation(lifespan(0)));
        assert!(is_validation(lifespan(-3)));
        assert!(is_validation(lifespan(201)));
        assert!(lifespan(1).is_ok());
        assert!(lifespan(200).is_ok());
    }

    #[test]
    fn area_must_be_finite_and_non_negative() {
        assert!(area(0.0).is_ok());
        assert!(area(1250.5).is_ok());
        assert!(is_validation(area(-0.1)));
        assert!(is_validation(area(f64::NAN)));
        assert!(is_validation(area(f64::INFINITY)));
    }

    #[test]
    fn species_input_checks_every_field() {
        let mut input = SpeciesInput {
            common_name: "Bengal Tiger".into(),
            scientific_name: "Panthera tigris tigris".into(),
            conservation_status: ConservationStatus::Endangered,
            avg_lifespan: 15,
            alt_names: vec!["Royal Bengal Tiger".into()],
        };
        assert!(species(&input).is_ok());

        input.alt_names.push(String::new());
        assert!(is_validation(species(&input)));
    }

    #[test]
    fn habitat_rejects_negative_area() {
        let input = HabitatInput {
            habitat_type: "Wetland".into(),
            climate: Climate::Humid,
            region: "Sundarbans".into(),
            area_size: -5.0,
        };
        assert!(is_validation(habitat(&input)));
    }

    #[test]
    fn animal_ids_are_positive() {
        assert!(is_validation(animal_id(0)));
        assert!(animal_id(1).is_ok());
    }
}
