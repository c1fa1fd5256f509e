pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{PriceLookup, RateResolver, STABLE_COIN_ID};
use crate::providers::StaticPriceLookup;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Rates {
        currencies: Vec<String>,
    },
}

/// Wires the configured quote table behind a resolver sized from the config.
pub fn build_resolver(config: &AppConfig) -> (Arc<StaticPriceLookup>, RateResolver) {
    let lookup = Arc::new(StaticPriceLookup::from_config(config));
    let resolver = RateResolver::with_capacity(
        Arc::clone(&lookup) as Arc<dyn PriceLookup>,
        config.cache.capacity,
    );
    (lookup, resolver)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().context("No configuration found, run `coinfx setup` first")?,
    };
    debug!("Loaded config: {config:#?}");

    let (lookup, resolver) = build_resolver(&config);

    match command {
        AppCommand::Convert { amount, from, to } => {
            let to = to.as_deref().or(Some(config.currency.as_str()));
            cli::convert::run(&resolver, &amount, from.as_deref(), to).await
        }
        AppCommand::Rates { currencies } => {
            let currencies = if currencies.is_empty() {
                lookup.quoted_currencies(STABLE_COIN_ID)
            } else {
                currencies
            };
            cli::rates::run(&resolver, &currencies).await
        }
    }
}
