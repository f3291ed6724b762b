// Decimal arithmetic on amounts that arrive as text, floats or decimals.
// Results are plain decimal strings, so 0.1 + 0.2 is "0.3".
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{Result, ShapeError};

pub use bigdecimal::RoundingMode;

pub const DIV_PRECISION: u64 = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Text(String),
    Number(f64),
    Decimal(BigDecimal),
}

impl Amount {
    // Empty text, zero and NaN count as no amount.
    pub fn is_empty(&self) -> bool {
        match self {
            Amount::Text(s) => s.is_empty(),
            Amount::Number(n) => *n == 0.0 || n.is_nan(),
            Amount::Decimal(_) => false,
        }
    }

    pub fn to_decimal(&self) -> Result<BigDecimal> {
        match self {
            Amount::Decimal(d) => Ok(d.clone()),
            Amount::Text(s) => parse_decimal(s),
            Amount::Number(n) if n.is_finite() => parse_decimal(&n.to_string()),
            Amount::Number(n) => Err(ShapeError::InvalidNumber(n.to_string())),
        }
    }

    pub fn to_decimal_or_zero(&self) -> Result<BigDecimal> {
        if self.is_empty() {
            Ok(BigDecimal::from(0))
        } else {
            self.to_decimal()
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Amount::Text(s) => s.clone(),
            Amount::Number(n) => n.to_string(),
            Amount::Decimal(d) => d.to_plain_string(),
        }
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Amount::Text(s)
    }
}

impl From<f64> for Amount {
    fn from(n: f64) -> Self {
        Amount::Number(n)
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        Amount::Decimal(BigDecimal::from(n))
    }
}

impl From<i32> for Amount {
    fn from(n: i32) -> Self {
        Amount::Decimal(BigDecimal::from(n))
    }
}

impl From<BigDecimal> for Amount {
    fn from(d: BigDecimal) -> Self {
        Amount::Decimal(d)
    }
}

pub(crate) fn parse_decimal(s: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(s.trim()).map_err(|e| ShapeError::InvalidNumber(format!("'{}': {}", s, e)))
}

pub fn to_plain(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}

pub fn number_add(a: impl Into<Amount>, b: impl Into<Amount>) -> Result<String> {
    let (a, b) = operands(a.into(), b.into())?;
    Ok(to_plain(&(a + b)))
}

pub fn number_sub(a: impl Into<Amount>, b: impl Into<Amount>) -> Result<String> {
    let (a, b) = operands(a.into(), b.into())?;
    Ok(to_plain(&(a - b)))
}

pub fn number_mul(a: impl Into<Amount>, b: impl Into<Amount>) -> Result<String> {
    let (a, b) = operands(a.into(), b.into())?;
    Ok(to_plain(&(a * b)))
}

pub fn number_div(a: impl Into<Amount>, b: impl Into<Amount>) -> Result<String> {
    let (a, b) = operands(a.into(), b.into())?;
    if b == BigDecimal::from(0) {
        return Err(ShapeError::DivisionByZero(format!("{} / 0", to_plain(&a))));
    }
    Ok(to_plain(&(a / b).with_prec(DIV_PRECISION)))
}

fn operands(a: Amount, b: Amount) -> Result<(BigDecimal, BigDecimal)> {
    Ok((a.to_decimal_or_zero()?, b.to_decimal_or_zero()?))
}
