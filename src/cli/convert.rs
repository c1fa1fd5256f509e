use super::ui;
use crate::core::currency::convert_with_rates;
use crate::core::{CurrencyCode, RateResolver, ToAmount, normalize};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Conversion {
    pub amount: Decimal,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub converted: Decimal,
    /// False when a rate was missing and `converted` is the input amount
    pub rates_available: bool,
}

impl Conversion {
    pub fn display(&self) -> String {
        let mut output = format!(
            "{} {} = {} {}",
            self.amount,
            self.from,
            ui::style_text(&self.converted.to_string(), ui::StyleType::Value),
            self.to
        );
        if !self.rates_available {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    "Exchange rate unavailable, amount shown unconverted",
                    ui::StyleType::Error
                )
            ));
        }
        output
    }
}

pub async fn convert(
    resolver: &RateResolver,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Conversion> {
    let from = normalize(from);
    let to = normalize(to);

    let parsed = amount
        .to_amount()
        .with_context(|| format!("Cannot convert '{amount}' from {from} to {to}"))?;

    let (converted, rates_available) = if from == to {
        (parsed, true)
    } else {
        let src_rate = resolver.resolve_rate(from.as_str()).await;
        let dst_rate = resolver.resolve_rate(to.as_str()).await;
        (
            convert_with_rates(parsed, src_rate, dst_rate),
            src_rate.is_some() && dst_rate.is_some(),
        )
    };

    Ok(Conversion {
        amount: parsed,
        from,
        to,
        converted,
        rates_available,
    })
}

pub async fn run(
    resolver: &RateResolver,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let conversion = convert(resolver, amount, from, to).await?;
    println!("{}", conversion.display());
    Ok(())
}
