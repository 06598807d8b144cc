use serde_json::Value;

use crate::cli::utils::{field, output_value};
use crate::cli::OutputFormat;
use crate::client::ApiClient;

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(base_url)?;
    let health: Value = client.get("/api/health").await?;

    output_value(output_format, &health, |health| {
        println!("API:      {} ({})", field(health, "status"), base_url);
        println!("Proxy:    {}", field(health, "proxy"));
        println!("Backend:  {}", field(health, "backend"));
        println!("Database: {}", field(health, "database"));
    })
}
