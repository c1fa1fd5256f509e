//! Price lookup abstraction

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Source of current coin prices.
///
/// Implementations answer with a two-level mapping shaped like
/// `{"usd-coin": {"eur": 0.91}}`: coin id, then lower-case currency code,
/// then a number or numeric string. Any level may be missing. Callers treat
/// a response of any other shape as "no data".
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn get_current_prices(&self, coin_ids: &[&str], vs_currency: &str) -> Result<Value>;
}
