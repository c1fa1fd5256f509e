//! Price lookup served from a fixed quote table, typically the one in the config file.

use crate::core::config::AppConfig;
use crate::core::price::PriceLookup;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

pub struct StaticPriceLookup {
    table: Value,
}

impl StaticPriceLookup {
    /// `table` is expected to look like `{"usd-coin": {"eur": 0.91}}`.
    pub fn new(table: Value) -> Self {
        StaticPriceLookup { table }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.prices.clone())
    }

    /// Upper-cased currency codes quoted for `coin_id`, sorted.
    pub fn quoted_currencies(&self, coin_id: &str) -> Vec<String> {
        let mut codes: Vec<String> = self
            .table
            .get(coin_id)
            .and_then(Value::as_object)
            .map(|quotes| quotes.keys().map(|k| k.trim().to_uppercase()).collect())
            .unwrap_or_default();
        codes.sort();
        codes.dedup();
        codes
    }
}

#[async_trait]
impl PriceLookup for StaticPriceLookup {
    /// Answers with only the requested coins and currency, leaving out
    /// coins the table does not know.
    #[instrument(name = "StaticPriceLookup", skip(self))]
    async fn get_current_prices(&self, coin_ids: &[&str], vs_currency: &str) -> Result<Value> {
        let mut response = Map::new();
        for coin_id in coin_ids {
            let Some(quotes) = self.table.get(*coin_id) else {
                debug!("No quotes for coin {}", coin_id);
                continue;
            };
            let mut prices = Map::new();
            if let Some(price) = quotes.get(vs_currency) {
                prices.insert(vs_currency.to_string(), price.clone());
            }
            response.insert(coin_id.to_string(), Value::Object(prices));
        }
        Ok(Value::Object(response))
    }
}
