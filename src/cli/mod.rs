pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "sanctuary")]
#[command(about = "Sanctuary CLI - operator tasks against the sanctuary database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply schema and routine migrations")]
    Migrate,

    #[command(about = "Create the account groups and grant their privileges")]
    Grants,

    #[command(about = "Check database connectivity and configuration")]
    Check,

    #[command(about = "Print record totals and status distributions")]
    Summary {
        #[arg(long, help = "Number of recent threat reports to include")]
        limit: Option<i64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let manager = DatabaseManager::from_env(config().database.clone())?;

    let result = match cli.command {
        Commands::Migrate => commands::database::migrate(&manager, &output_format).await,
        Commands::Grants => commands::database::grants(&manager, &output_format).await,
        Commands::Check => commands::database::check(&manager, &output_format).await,
        Commands::Summary { limit } => {
            let limit = limit.unwrap_or(config().api.recent_threat_limit);
            commands::summary::handle(&manager, limit, &output_format).await
        }
    };

    manager.close_all().await;
    result
}
