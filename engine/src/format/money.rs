use bigdecimal::BigDecimal;
use serde::Deserialize;

use super::computed::{parse_decimal, Amount, RoundingMode};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoneyFormat {
    pub separation: bool,
    pub trim: bool,
    pub decimal_separation: bool,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        MoneyFormat {
            separation: true,
            trim: true,
            decimal_separation: false,
        }
    }
}

pub fn to_fixed_number(num: impl Into<Amount>, decimals: i32) -> f64 {
    let value = match num.into() {
        Amount::Number(n) => n,
        Amount::Text(s) if s.trim().is_empty() => 0.0,
        Amount::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Amount::Decimal(d) => d.to_string().parse::<f64>().unwrap_or(f64::NAN),
    };
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

// Rounds to exactly `places` fraction digits, with ties going toward positive
// infinity. With `trim`, trailing zeros and a dangling point are removed.
pub fn round_number(num: impl Into<Amount>, places: u32, trim: bool) -> Result<String> {
    let value = num.into().to_decimal()?;
    let mut fixed = round_half_ceil(&value, places).to_plain_string();
    // A negative input keeps its sign even when it rounds to zero.
    if value < BigDecimal::from(0) && !fixed.starts_with('-') {
        fixed.insert(0, '-');
    }
    Ok(if trim { trim_fraction(&fixed) } else { fixed })
}

fn round_half_ceil(value: &BigDecimal, places: u32) -> BigDecimal {
    let mode = if *value < BigDecimal::from(0) {
        RoundingMode::HalfDown
    } else {
        RoundingMode::HalfUp
    };
    value.with_scale_round(i64::from(places), mode)
}

fn trim_fraction(fixed: &str) -> String {
    let mut trimmed = fixed.to_string();
    while trimmed.contains('.') && (trimmed.ends_with('0') || trimmed.ends_with('.')) {
        trimmed.pop();
    }
    trimmed
}

// Empty amounts (empty text, zero, NaN) print as `"0"`. A `precision` above
// zero rounds the amount first (see `round_number`); zero or a negative
// precision leaves the digits as given. With `separation` on, thousands are
// grouped with commas.
pub fn parse_money(money: impl Into<Amount>, precision: i32, config: &MoneyFormat) -> Result<String> {
    let money = money.into();
    if money.is_empty() {
        return Ok("0".to_string());
    }
    let text = money.as_text();

    let fixed = if precision > 0 {
        // Validate before rounding so the error names the original text.
        parse_decimal(&text)?;
        round_number(text.as_str(), precision.unsigned_abs(), config.trim)?
    } else {
        text
    };

    if !config.separation {
        return Ok(fixed);
    }
    Ok(group_thousands(&fixed, config.decimal_separation))
}

fn group_thousands(fixed: &str, decimal_separation: bool) -> String {
    let (before, after) = if decimal_separation {
        (fixed, String::new())
    } else {
        match fixed.split_once('.') {
            Some((int, frac)) if !frac.is_empty() => (int, format!(".{}", frac)),
            Some((int, _)) => (int, String::new()),
            None => (fixed, String::new()),
        }
    };
    match before.strip_prefix('-') {
        Some(rest) => format!("-{}{}", insert_commas(rest), after),
        None => format!("{}{}", insert_commas(before), after),
    }
}

// A comma goes at every non-boundary position followed by a run of digits
// whose length is a multiple of three.
fn insert_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_word(chars[i - 1]) && c.is_ascii_digit() {
            let run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
            if run % 3 == 0 {
                out.push(',');
            }
        }
        out.push(c);
    }
    out
}
