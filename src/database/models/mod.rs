pub mod animal;
pub mod enums;
pub mod equipment;
pub mod habitat;
pub mod organization;
pub mod ranger;
pub mod sighting;
pub mod species;
pub mod threat;

pub use animal::{Animal, AnimalListing, AnimalUpdate, NewAnimal};
pub use enums::{
    Climate, ConservationStatus, EquipmentStatus, Gender, HealthStatus, OrgType, Rank, ThreatLevel,
    UnknownVariant,
};
pub use equipment::{Equipment, EquipmentInput, EquipmentListing, EquipmentUsage, IssueInput};
pub use habitat::{Habitat, HabitatInput, HabitatSpecies};
pub use organization::{Organization, OrganizationInput};
pub use ranger::{Assignment, AssignmentInput, Ranger, RangerInput};
pub use sighting::{Sighting, SightingDetail, SightingDetailInput, SightingDetailListing, SightingInput, SightingListing};
pub use species::{AltName, Species, SpeciesAltName, SpeciesInput};
pub use threat::{ThreatReport, ThreatReportInput, ThreatReportListing};
