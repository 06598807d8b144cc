pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

#[derive(Parser)]
#[command(name = "innexar")]
#[command(about = "Innexar CLI - Command-line client for the Innexar back-office API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (defaults to NEXT_PUBLIC_API_URL)")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Team login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Resolve a translation key locally")]
    Translate(commands::translate::TranslateArgs),

    #[command(about = "Check API, CRM backend and database health")]
    Health,

    #[command(about = "SaaS product catalogue")]
    Products {
        #[command(subcommand)]
        cmd: commands::products::ProductCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    let base_url = cli.url.clone().unwrap_or_else(ApiClient::base_url_from_env);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &base_url, output_format).await,
        Commands::Translate(args) => commands::translate::handle(args, output_format),
        Commands::Health => commands::health::handle(&base_url, output_format).await,
        Commands::Products { cmd } => commands::products::handle(cmd, &base_url, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["innexar", "products", "list", "--json", "--url", "http://api"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert_eq!(cli.url.as_deref(), Some("http://api"));
    }

    #[test]
    fn text_is_the_default_format() {
        let cli = Cli::try_parse_from(["innexar", "health"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }
}
