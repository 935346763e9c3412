use serde_json::json;

use crate::cli::utils::{output_counts, output_success};
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::services::AnalyticsService;

/// Dashboard figures read over the operator pool.
pub async fn handle(manager: &DatabaseManager, limit: i64, output_format: &OutputFormat) -> anyhow::Result<()> {
    let gateway = manager.admin_gateway().await?;
    let dashboard = AnalyticsService::new(&gateway).dashboard(limit).await?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Sanctuary summary",
            Some(json!({ "summary": serde_json::to_value(&dashboard)? })),
        ),
        OutputFormat::Text => {
            let totals = &dashboard.totals;
            output_counts(
                "Totals",
                [
                    ("species", totals.species),
                    ("habitats", totals.habitats),
                    ("rangers", totals.rangers),
                    ("animals", totals.animals),
                    ("threat reports", totals.threat_reports),
                    ("organizations", totals.organizations),
                    ("equipment", totals.equipment),
                    ("sightings", totals.sightings),
                ]
                .iter()
                .map(|(label, count)| (label.to_string(), *count)),
            );
            for (title, rows) in [
                ("Conservation status", &dashboard.conservation_status),
                ("Animal health", &dashboard.health_status),
                ("Threat levels", &dashboard.threat_levels),
                ("Equipment status", &dashboard.equipment_status),
            ] {
                output_counts(title, rows.iter().map(|row| (row.label.clone(), row.count)));
            }

            println!("Recent threat reports:");
            if dashboard.recent_threats.is_empty() {
                println!("  (none)");
            }
            for report in &dashboard.recent_threats {
                println!(
                    "  #{} {} {} ({}, {}) by {}",
                    report.report_id,
                    report.report_date,
                    report.threat_level,
                    report.habitat_type,
                    report.region,
                    report.ranger_name
                );
            }
            Ok(())
        }
    }
}
