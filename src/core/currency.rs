//! Currency codes and stablecoin-pivot conversion

use crate::core::amount::ToAmount;
use crate::core::cache::{Cache, DEFAULT_CAPACITY};
use crate::core::error::ConversionError;
use crate::core::price::PriceLookup;
use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Coin whose price, in any currency, is that currency's rate against USD.
pub const STABLE_COIN_ID: &str = "usd-coin";

/// Fractional digits kept in a converted amount.
pub const CONVERSION_SCALE: u32 = 10;

/// Canonical currency code: trimmed and upper-case, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used as the `vs_currency` of a price lookup.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_CURRENCY
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode(DEFAULT_CURRENCY.to_string())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(normalize(Some(s)))
    }
}

/// Canonicalises a currency code, falling back to [`DEFAULT_CURRENCY`].
pub fn normalize(code: Option<&str>) -> CurrencyCode {
    match code.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => CurrencyCode(trimmed.to_uppercase()),
        _ => CurrencyCode::default(),
    }
}

/// Pulls `data[usd-coin][currency]` out of a lookup response.
///
/// Missing levels, unexpected shapes, unparsable prices and prices that
/// are not strictly positive all yield `None`.
fn extract_rate(data: &Value, currency: &str) -> Option<Decimal> {
    let price = data.get(STABLE_COIN_ID)?.get(currency)?;
    let rate = price.to_amount().ok()?;
    (rate > Decimal::ZERO).then_some(rate)
}

/// Rounds half away from zero and pads to exactly [`CONVERSION_SCALE`] digits.
fn quantize(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CONVERSION_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CONVERSION_SCALE);
    rounded
}

/// Converts `amount` through the stablecoin using already resolved rates.
///
/// Returns `amount` untouched when either rate is missing or not strictly
/// positive, or when the arithmetic overflows.
pub fn convert_with_rates(
    amount: Decimal,
    src_rate: Option<Decimal>,
    dst_rate: Option<Decimal>,
) -> Decimal {
    let (Some(src_rate), Some(dst_rate)) = (src_rate, dst_rate) else {
        debug!("Rate unavailable, returning amount unconverted");
        return amount;
    };
    if src_rate <= Decimal::ZERO || dst_rate <= Decimal::ZERO {
        debug!(%src_rate, %dst_rate, "Non-positive rate, returning amount unconverted");
        return amount;
    }

    match amount
        .checked_div(src_rate)
        .and_then(|in_stable| in_stable.checked_mul(dst_rate))
    {
        Some(converted) => quantize(converted),
        None => {
            warn!(
                %amount, %src_rate, %dst_rate,
                "Conversion overflowed, returning amount unconverted"
            );
            amount
        }
    }
}

/// Resolves stablecoin rates through a [`PriceLookup`] and memoizes them.
///
/// Build one per process and share it; the cache lives as long as the
/// resolver does.
pub struct RateResolver {
    lookup: Arc<dyn PriceLookup>,
    cache: Cache<String, Option<Decimal>>,
}

impl RateResolver {
    pub fn new(lookup: Arc<dyn PriceLookup>) -> Self {
        Self::with_capacity(lookup, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(lookup: Arc<dyn PriceLookup>, capacity: usize) -> Self {
        RateResolver {
            lookup,
            cache: Cache::with_capacity(capacity),
        }
    }

    /// Price of one stablecoin in `currency`, or `None` when unavailable.
    ///
    /// Results are cached under the exact `currency` string given, so
    /// `"eur"` and `"EUR"` occupy separate entries. Lookup errors are
    /// reported as `None` and are not cached.
    pub async fn resolve_rate(&self, currency: &str) -> Option<Decimal> {
        let key = currency.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let code = normalize(Some(currency));
        if code.is_default() {
            let rate = Some(Decimal::ONE);
            self.cache.put(key, rate).await;
            return rate;
        }

        match self.fetch_rate(&code).await {
            Ok(rate) => {
                self.cache.put(key, rate).await;
                rate
            }
            Err(e) => {
                warn!(currency = %code, error = %e, "Price lookup failed, rate unavailable");
                None
            }
        }
    }

    #[instrument(name = "StableCoinRate", skip(self, code), fields(currency = %code))]
    async fn fetch_rate(&self, code: &CurrencyCode) -> Result<Option<Decimal>> {
        let vs_currency = code.to_lowercase();
        let data = self
            .lookup
            .get_current_prices(&[STABLE_COIN_ID], &vs_currency)
            .await?;
        let rate = extract_rate(&data, &vs_currency);
        debug!(?rate, "Resolved stablecoin rate");
        Ok(rate)
    }

    /// Converts `amount` from `src_currency` to `dst_currency`.
    ///
    /// The only error is an amount that does not parse. Missing rates fall
    /// back to the unconverted amount.
    pub async fn convert_amount(
        &self,
        amount: impl ToAmount,
        src_currency: Option<&str>,
        dst_currency: Option<&str>,
    ) -> Result<Decimal, ConversionError> {
        let dst = normalize(dst_currency);
        let src = normalize(src_currency);
        let numeric = amount.to_amount()?;

        if src == dst {
            return Ok(numeric);
        }

        let src_rate = self.resolve_rate(src.as_str()).await;
        let dst_rate = self.resolve_rate(dst.as_str()).await;

        Ok(convert_with_rates(numeric, src_rate, dst_rate))
    }

    /// Drops every memoized rate; the next lookups go to the source again.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Number of memoized entries, including cached absences.
    pub async fn cached_rates(&self) -> usize {
        self.cache.len().await
    }
}
