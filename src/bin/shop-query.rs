use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use storefront_guard::config;
use storefront_guard::observability::logging;
use storefront_guard::shopify::{ShopifyClient, ShopifyConfig};
use storefront_guard::sync;

#[derive(Parser)]
#[command(name = "shop-query")]
#[command(about = "Run queries against the configured Shopify store", long_about = None)]
struct Cli {
    /// Override the Admin API version from the config file.
    #[arg(long)]
    api_version: Option<String>,

    /// Log level for client diagnostics.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the shop summary
    Shop,
    /// Fetch every product in the catalogue
    Products {
        #[arg(long, default_value_t = sync::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Execute an arbitrary GraphQL document
    Query {
        /// GraphQL document, or @path to read it from a file
        document: String,

        /// Variables as a JSON object
        #[arg(long, default_value = "{}")]
        variables: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let mut settings = config::load_from_env()?.shopify;
    if let Some(version) = cli.api_version {
        settings.api_version = version;
    }
    let client = ShopifyClient::new(ShopifyConfig::from_env(&settings))?;

    let output = match cli.command {
        Commands::Shop => serde_json::to_value(sync::fetch_shop(&client).await?)?,
        Commands::Products { page_size } => {
            serde_json::to_value(sync::fetch_all_products(&client, page_size).await?)?
        }
        Commands::Query { document, variables } => {
            let query = match document.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(PathBuf::from(path))?,
                None => document,
            };
            let variables: Value = serde_json::from_str(&variables)?;
            client.execute::<Value>(&query, variables).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
