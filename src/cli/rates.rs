use super::ui;
use crate::core::{CurrencyCode, DEFAULT_CURRENCY, RateResolver, STABLE_COIN_ID, normalize};
use anyhow::Result;
use futures::future::join_all;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RateRow {
    pub currency: CurrencyCode,
    /// Price of one stablecoin in `currency`
    pub rate: Option<Decimal>,
}

impl RateRow {
    /// Value of one unit of `currency` in the default currency.
    pub fn inverse(&self) -> Option<Decimal> {
        self.rate
            .and_then(|rate| Decimal::ONE.checked_div(rate))
            .map(|v| v.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Resolves every currency concurrently, keeping the input order.
pub async fn fetch_rates(resolver: &RateResolver, currencies: &[String]) -> Vec<RateRow> {
    let futures = currencies.iter().map(|code| async move {
        let currency = normalize(Some(code.as_str()));
        let rate = resolver.resolve_rate(currency.as_str()).await;
        RateRow { currency, rate }
    });
    join_all(futures).await
}

pub fn display_as_table(rows: &[RateRow]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {STABLE_COIN_ID})")),
        ui::header_cell(&format!("Value ({DEFAULT_CURRENCY})")),
    ]);

    for row in rows {
        table.add_row(vec![
            comfy_table::Cell::new(row.currency.as_str()),
            ui::format_optional_cell(row.rate, |r| r.to_string()),
            ui::format_optional_cell(row.inverse(), |v| v.to_string()),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Stablecoin rates", ui::StyleType::Title),
        table
    )
}

pub async fn run(resolver: &RateResolver, currencies: &[String]) -> Result<()> {
    if currencies.is_empty() {
        println!(
            "{}",
            ui::style_text("No currencies to show", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let rows = fetch_rates(resolver, currencies).await;
    debug!("Rate cache holds {} entries", resolver.cached_rates().await);
    println!("{}", display_as_table(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriceLookup;
    use crate::providers::StaticPriceLookup;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_rates_keeps_order() {
        let lookup = StaticPriceLookup::new(json!({"usd-coin": {"eur": "0.8", "gbp": 0.5}}));
        let resolver = RateResolver::new(Arc::new(lookup) as Arc<dyn PriceLookup>);
        let currencies: Vec<String> = ["gbp", "usd", "xyz", "EUR"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let rows = fetch_rates(&resolver, &currencies).await;
        let codes: Vec<&str> = rows.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(codes, vec!["GBP", "USD", "XYZ", "EUR"]);

        assert_eq!(rows[0].rate, Some(dec!(0.5)));
        assert_eq!(rows[0].inverse(), Some(dec!(2)));
        assert_eq!(rows[1].rate, Some(Decimal::ONE));
        assert_eq!(rows[2].rate, None);
        assert_eq!(rows[2].inverse(), None);
        assert_eq!(rows[3].inverse(), Some(dec!(1.25)));
    }

    #[test]
    fn test_display_as_table_marks_missing_rates() {
        let rows = vec![
            RateRow {
                currency: normalize(Some("eur")),
                rate: Some(dec!(0.91)),
            },
            RateRow {
                currency: normalize(Some("jpy")),
                rate: None,
            },
        ];
        let output = display_as_table(&rows);
        assert!(output.contains("EUR"));
        assert!(output.contains("0.91"));
        assert!(output.contains("1.098901"));
        assert!(output.contains("JPY"));
        assert!(output.contains("N/A"));
    }
}
