use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

pub async fn migrate(manager: &DatabaseManager, output_format: &OutputFormat) -> anyhow::Result<()> {
    manager.migrate().await?;
    output_success(output_format, "Schema and routines are up to date", None)
}

pub async fn grants(manager: &DatabaseManager, output_format: &OutputFormat) -> anyhow::Result<()> {
    manager.apply_grants().await?;
    output_success(
        output_format,
        "Account groups created and privileges granted",
        Some(json!({ "groups": ["sanctuary_viewer", "sanctuary_employee", "sanctuary_supervisor"] })),
    )
}

pub async fn check(manager: &DatabaseManager, output_format: &OutputFormat) -> anyhow::Result<()> {
    let settings = config();

    if let Err(e) = manager.admin_health_check().await {
        let kind = format!("{:?}", e.kind());
        output_error(output_format, &e.to_string(), Some(&kind))?;
        return Err(e.into());
    }

    output_success(
        output_format,
        "Database reachable",
        Some(json!({
            "environment": format!("{:?}", settings.environment),
            "session_max_connections": settings.database.session_max_connections,
            "jwt_secret_configured": !settings.security.jwt_secret.is_empty(),
            "roles_file": settings.security.roles_file,
        })),
    )
}
