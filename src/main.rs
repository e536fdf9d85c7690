//! mkt-pricer - Fast, stateless marketplace pricing calculator CLI
//!
//! Computes cost breakdowns and price suggestions across Mercado Livre,
//! Shopee, and SHEIN from local JSON rule files.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use mkt_pricer::commands::{CalculateCommand, RulesCommand};
use mkt_pricer::config::{Config, OutputFormat};
use mkt_pricer::models::{ListingType, LogisticsType, PricingRequest};
use mkt_pricer::rules::Marketplace;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mkt-pricer",
    version,
    about = "Fast, stateless marketplace pricing calculator CLI",
    long_about = "Computes seller cost breakdowns and margin-based price suggestions \
                  for Mercado Livre, Shopee, and SHEIN."
)]
struct Cli {
    /// Directory holding the marketplace rule files
    #[arg(long, global = true, env = "MKT_RULES_DIR")]
    rules_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate pricing across all marketplaces
    #[command(alias = "c")]
    Calculate {
        /// Read the pricing request from a JSON file instead of flags
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Product acquisition cost
        #[arg(long)]
        product_cost: Option<f64>,

        /// Packaging cost per unit
        #[arg(long, default_value = "0")]
        packaging_cost: f64,

        /// Current sale price to analyze
        #[arg(long)]
        sale_price: Option<f64>,

        /// Desired profit margin in percentage points
        #[arg(long)]
        margin: Option<f64>,

        /// Tax burden in percentage points
        #[arg(long, default_value = "0")]
        tax: f64,

        /// Ads investment in percentage points
        #[arg(long, default_value = "0")]
        ads: f64,

        /// Mercado Livre listing type (premium, classic)
        #[arg(long, default_value = "premium")]
        listing_type: ListingType,

        /// Mercado Livre logistics mode (standard, fulfillment)
        #[arg(long, default_value = "standard")]
        logistics_type: LogisticsType,

        /// Shipping weight in kilograms
        #[arg(long, default_value = "0.5")]
        weight: f64,

        /// Seller is registered as an individual (CPF)
        #[arg(long)]
        cpf: bool,

        /// Orders sold in the last 90 days
        #[arg(long, default_value = "0")]
        orders_90d: i64,

        /// Opt out of the Shopee free-shipping program
        #[arg(long)]
        no_free_shipping: bool,

        /// Days since SHEIN seller registration
        #[arg(long, default_value = "999")]
        days_registered: i64,
    },

    /// Show the effective rule set for a marketplace
    #[command(alias = "r")]
    Rules {
        /// Marketplace to inspect (mercadolivre, shopee, shein)
        marketplace: Marketplace,
    },

    /// List supported marketplaces
    Marketplaces,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;
    if let Some(rules_dir) = cli.rules_dir {
        config.rules_dir = Some(rules_dir);
    }

    match cli.command {
        Commands::Calculate {
            input,
            product_cost,
            packaging_cost,
            sale_price,
            margin,
            tax,
            ads,
            listing_type,
            logistics_type,
            weight,
            cpf,
            orders_90d,
            no_free_shipping,
            days_registered,
        } => {
            let request = if let Some(path) = input {
                CalculateCommand::read_request(&path)?
            } else {
                let Some(product_cost) = product_cost else {
                    bail!("Either --input or --product-cost is required");
                };
                PricingRequest {
                    product_cost,
                    packaging_cost,
                    current_sale_price: sale_price,
                    desired_margin: margin,
                    tax_percent: tax,
                    ads_investment_percent: ads,
                    listing_type,
                    logistics_type,
                    weight_kg: weight,
                    is_cpf: cpf,
                    orders_last_90_days: orders_90d,
                    use_free_shipping: !no_free_shipping,
                    shein_days_since_registration: days_registered,
                }
            };

            let cmd = CalculateCommand::new(config);
            let output = cmd.execute(&request)?;
            println!("{}", output);
        }

        Commands::Rules { marketplace } => {
            let cmd = RulesCommand::new(config);
            let output = cmd.execute(marketplace)?;
            println!("{}", output);
        }

        Commands::Marketplaces => {
            println!("Supported marketplaces:\n");
            println!("{:<14} {:<16} {:<26}", "Code", "Label", "Rules file");
            println!("{:-<14} {:-<16} {:-<26}", "", "", "");

            for marketplace in Marketplace::all() {
                println!(
                    "{:<14} {:<16} {:<26}",
                    marketplace.to_string(),
                    marketplace.label(),
                    marketplace.rules_file()
                );
            }
        }
    }

    Ok(())
}
