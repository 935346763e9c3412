//! Closed value sets stored as TEXT columns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::gateway::{Param, SqlType, SqlTyped};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl SqlTyped for $name {
            const SQL_TYPE: SqlType = SqlType::Text;
        }

        impl From<$name> for Param {
            fn from(v: $name) -> Self {
                Param::Text(v.as_str().to_string())
            }
        }
    };
}

text_enum!(ConservationStatus, "conservation status" {
    LeastConcern => "Least Concern",
    NearThreatened => "Near Threatened",
    Vulnerable => "Vulnerable",
    Endangered => "Endangered",
    CriticallyEndangered => "Critically Endangered",
});

text_enum!(Climate, "climate" {
    Tropical => "Tropical",
    Humid => "Humid",
    Cool => "Cool",
    Arid => "Arid",
});

text_enum!(Rank, "rank" {
    JuniorRanger => "Junior Ranger",
    FieldRanger => "Field Ranger",
    SeniorRanger => "Senior Ranger",
    WildlifeOfficer => "Wildlife Officer",
});

text_enum!(Gender, "gender" {
    Male => "Male",
    Female => "Female",
});

text_enum!(HealthStatus, "health status" {
    Healthy => "Healthy",
    Sick => "Sick",
    Injured => "Injured",
    UnderTreatment => "Under Treatment",
});

text_enum!(
    /// Ordered by severity.
    ThreatLevel, "threat level" {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

text_enum!(OrgType, "organization type" {
    Ngo => "NGO",
    Government => "Government",
    Private => "Private",
});

text_enum!(EquipmentStatus, "equipment status" {
    Available => "Available",
    InUse => "In Use",
    Maintenance => "Maintenance",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_multi_word_values() {
        assert_eq!(HealthStatus::from_str("Under Treatment").unwrap(), HealthStatus::UnderTreatment);
        assert_eq!(EquipmentStatus::from_str("In Use").unwrap(), EquipmentStatus::InUse);
        assert_eq!(
            ConservationStatus::from_str("Critically Endangered").unwrap(),
            ConservationStatus::CriticallyEndangered
        );
    }

    #[test]
    fn rejects_values_outside_the_set() {
        let err = HealthStatus::from_str("healthy").unwrap_err();
        assert_eq!(err.kind, "health status");
        assert_eq!(err.to_string(), "unknown health status: healthy");
        assert!(Climate::from_str("Polar").is_err());
    }

    #[test]
    fn serde_uses_stored_text() {
        assert_eq!(serde_json::to_string(&OrgType::Ngo).unwrap(), "\"NGO\"");
        let rank: Rank = serde_json::from_str("\"Wildlife Officer\"").unwrap();
        assert_eq!(rank, Rank::WildlifeOfficer);
        assert!(serde_json::from_str::<ThreatLevel>("\"Severe\"").is_err());
    }

    #[test]
    fn every_variant_round_trips_through_text() {
        for status in HealthStatus::ALL {
            assert_eq!(HealthStatus::from_str(status.as_str()).unwrap(), *status);
        }
        for level in ThreatLevel::ALL {
            assert_eq!(ThreatLevel::from_str(&level.to_string()).unwrap(), *level);
        }
        assert_eq!(Gender::ALL.len(), 2);
        assert_eq!(ConservationStatus::ALL.len(), 5);
    }

    #[test]
    fn binds_as_text() {
        assert_eq!(Param::from(HealthStatus::Sick), Param::Text("Sick".into()));
    }
}
