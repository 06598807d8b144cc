use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{field, output_value};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, AuthStore};

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List active products")]
    List,

    #[command(about = "Show one product")]
    Show {
        #[arg(help = "Product ID")]
        id: String,
    },
}

pub async fn handle(cmd: ProductCommands, base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = AuthStore::open_default()?;
    let client = ApiClient::new(base_url)?.with_store(&store);

    match cmd {
        ProductCommands::List => {
            let products: Value = client.get("/products").await?;
            output_value(output_format, &products, |products| {
                let items = products.as_array().map(Vec::as_slice).unwrap_or_default();
                if items.is_empty() {
                    println!("No products");
                }
                for product in items {
                    println!(
                        "{:<10} {:<30} {}%",
                        field(product, "code"),
                        field(product, "name"),
                        field(product, "commissionRate")
                    );
                }
            })
        }
        ProductCommands::Show { id } => {
            let product: Value = client.get(&format!("/products/{}", id)).await?;
            output_value(output_format, &product, |product| {
                println!("{} ({})", field(product, "name"), field(product, "code"));
                println!("URL:        {}", field(product, "baseUrl"));
                println!("Commission: {}%", field(product, "commissionRate"));
            })
        }
    }
}
