use serde::Serialize;
use thiserror::Error;

/// Outcome classes callers react to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No usable session; retry on the next user action
    Connectivity,
    /// The acting account lacks a database privilege
    Permission,
    /// Rejected by a key, restrict rule or trigger; state unchanged
    Constraint,
    /// Out-of-domain input
    Validation,
    NotFound,
    Internal,
}

/// Classified gateway failure. Driver errors never cross this boundary raw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("database unavailable: {0}")]
    Connectivity(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("rejected: {0}")]
    Constraint(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal database error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Connectivity(_) => ErrorKind::Connectivity,
            GatewayError::Permission(_) => ErrorKind::Permission,
            GatewayError::Constraint(_) => ErrorKind::Constraint,
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::NotFound(_) => ErrorKind::NotFound,
            GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Client-safe description of the failure.
    pub fn reason(&self) -> &str {
        match self {
            GatewayError::Connectivity(msg)
            | GatewayError::Permission(msg)
            | GatewayError::Constraint(msg)
            | GatewayError::Validation(msg)
            | GatewayError::NotFound(msg)
            | GatewayError::Internal(msg) => msg,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        GatewayError::NotFound(what.into())
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        classify(&err)
    }
}

impl From<sqlx::migrate::MigrateError> for GatewayError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        match err {
            sqlx::migrate::MigrateError::Execute(inner) => classify(&inner),
            other => {
                tracing::error!("migration error: {}", other);
                GatewayError::Internal(format!("migration failed: {}", other))
            }
        }
    }
}

pub fn classify(err: &sqlx::Error) -> GatewayError {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code();
            classify_database_error(code.as_deref(), db.message(), db.constraint())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            tracing::warn!("database connectivity failure: {}", err);
            GatewayError::Connectivity("database is unreachable".to_string())
        }
        sqlx::Error::Configuration(_) => {
            tracing::error!("database configuration error: {}", err);
            GatewayError::Connectivity("database connection is misconfigured".to_string())
        }
        sqlx::Error::RowNotFound => GatewayError::NotFound("record not found".to_string()),
        other => {
            tracing::error!("unclassified database error: {}", other);
            GatewayError::Internal("an error occurred while processing the request".to_string())
        }
    }
}

/// Maps a server error (SQLSTATE, message, constraint name) onto a class.
pub fn classify_database_error(
    code: Option<&str>,
    message: &str,
    constraint: Option<&str>,
) -> GatewayError {
    let code = code.unwrap_or("");

    match code {
        "42501" => {
            tracing::warn!("privilege check failed: {}", message);
            GatewayError::Permission("you don't have permission to perform this action".to_string())
        }
        c if c.starts_with("28") => {
            tracing::warn!("authentication rejected: {}", message);
            GatewayError::Permission("invalid credentials for this account".to_string())
        }
        c if c.starts_with("08") || c.starts_with("57P") || c == "53300" || c == "3D000" => {
            tracing::warn!("database session failure ({}): {}", c, message);
            GatewayError::Connectivity("database is unreachable".to_string())
        }
        "23000" => GatewayError::Constraint(message.to_string()),
        c if c.starts_with("23") => GatewayError::Constraint(constraint_reason(c, constraint)),
        "40001" | "40P01" => {
            GatewayError::Constraint("a concurrent change conflicted with this operation; try again".to_string())
        }
        "P0002" => GatewayError::NotFound(message.to_string()),
        "22023" => GatewayError::Validation(message.to_string()),
        c if c.starts_with("22") => {
            tracing::debug!("data exception ({}): {}", c, message);
            GatewayError::Validation("a value is malformed or out of range".to_string())
        }
        _ => {
            tracing::error!("database error ({}): {}", code, message);
            GatewayError::Internal("an error occurred while processing the request".to_string())
        }
    }
}

/// Human-readable reason for a class 23 violation.
fn constraint_reason(code: &str, constraint: Option<&str>) -> String {
    let known = constraint.and_then(|name| match name {
        "equipment_org_fk" => Some(match code {
            "23503" => "the organization still supplies equipment; remove that equipment first",
            _ => "the organization does not exist",
        }),
        "uses_equipment_fk" => Some(match code {
            "23503" => "the equipment is still issued to a ranger; return it first",
            _ => "the equipment does not exist",
        }),
        "animal_tracking_id_key" => Some("another animal already uses this tracking id"),
        "animal_pkey" => Some("an animal with this id already exists for the species"),
        "alt_names_pkey" => Some("the species already has this alternative name"),
        "inhabits_pkey" => Some("the species is already linked to this habitat"),
        "assigned_to_pkey" => Some("the ranger is already assigned to this habitat"),
        "uses_pkey" => Some("the equipment is already issued to this ranger"),
        "sighting_details_pkey" => Some("the animal is already linked to this sighting"),
        "sighting_details_animal_fk" => Some("the referenced animal does not exist"),
        "species_lifespan_check" => Some("average lifespan must be positive"),
        "habitat_area_check" => Some("area size must not be negative"),
        "animal_id_check" => Some("animal id must be positive"),
        _ => None,
    });

    if let Some(reason) = known {
        return reason.to_string();
    }

    match code {
        "23505" => "a record with the same key already exists",
        "23503" => "a referenced record is missing or the record is still referenced",
        "23502" => "a required field is missing",
        "23514" => "a value is outside the allowed set",
        _ => "the operation violates a data integrity rule",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_privilege_is_permission() {
        let err = classify_database_error(Some("42501"), "permission denied for table species", None);
        assert_eq!(err.kind(), ErrorKind::Permission);
        // schema internals stay out of the reason
        assert!(!err.reason().contains("species"));
    }

    #[test]
    fn bad_password_is_permission() {
        let err = classify_database_error(Some("28P01"), "password authentication failed", None);
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn restrict_on_organization_names_the_cause() {
        let err = classify_database_error(
            Some("23503"),
            "update or delete on table \"organization\" violates foreign key constraint",
            Some("equipment_org_fk"),
        );
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert!(err.reason().contains("remove that equipment first"));
    }

    #[test]
    fn trigger_rejection_keeps_trigger_message() {
        let err = classify_database_error(
            Some("23000"),
            "animal 7 is sick and cannot be recorded in a sighting",
            None,
        );
        assert_eq!(err, GatewayError::Constraint("animal 7 is sick and cannot be recorded in a sighting".into()));
    }

    #[test]
    fn unknown_constraint_falls_back_to_generic_reason() {
        let err = classify_database_error(Some("23505"), "duplicate key", Some("something_else"));
        assert_eq!(err.reason(), "a record with the same key already exists");
    }

    #[test]
    fn invalid_parameter_is_validation() {
        let err = classify_database_error(Some("22023"), "unknown health status: Zombie", None);
        assert_eq!(err, GatewayError::Validation("unknown health status: Zombie".into()));
    }

    #[test]
    fn no_data_found_is_not_found() {
        let err = classify_database_error(Some("P0002"), "no animal with tracking id X", None);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn connection_classes_are_connectivity() {
        for code in ["08006", "57P01", "53300", "3D000"] {
            let err = classify_database_error(Some(code), "boom", None);
            assert_eq!(err.kind(), ErrorKind::Connectivity, "code {}", code);
        }
    }

    #[test]
    fn syntax_errors_are_internal() {
        let err = classify_database_error(Some("42601"), "syntax error at or near", None);
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn driver_level_failures_are_connectivity() {
        assert_eq!(classify(&sqlx::Error::PoolTimedOut).kind(), ErrorKind::Connectivity);
        assert_eq!(classify(&sqlx::Error::PoolClosed).kind(), ErrorKind::Connectivity);
        assert_eq!(classify(&sqlx::Error::RowNotFound).kind(), ErrorKind::NotFound);
    }
}
