use crate::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateProvider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Raised when amounts in different currencies are combined directly.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot combine amounts in {left} and {right}")]
pub struct CurrencyMismatch {
    pub left: CurrencyCode,
    pub right: CurrencyCode,
}

/// A signed amount of money in a single currency.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::basics::amount::CurrencyAmount;
/// use risk_sensitivities::basics::currency::CurrencyCode;
///
/// let pv = CurrencyAmount::new(CurrencyCode::new("USD"), 100.0);
/// assert_eq!(pv.negated().amount(), -100.0);
/// assert_eq!(pv.to_string(), "USD 100");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    currency: CurrencyCode,
    amount: f64,
}

impl CurrencyAmount {
    pub fn new(currency: CurrencyCode, amount: f64) -> Self {
        Self { currency, amount }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(currency, 0.0)
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn negated(&self) -> Self {
        Self::new(self.currency.clone(), -self.amount)
    }

    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.map_amount(|a| a * factor)
    }

    pub fn map_amount(&self, op: impl Fn(f64) -> f64) -> Self {
        Self::new(self.currency.clone(), op(self.amount))
    }

    /// Add another amount in the same currency.
    pub fn plus(&self, other: &CurrencyAmount) -> Result<Self, CurrencyMismatch> {
        if self.currency != other.currency {
            return Err(CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(Self::new(self.currency.clone(), self.amount + other.amount))
    }
}

impl FxConvertible for CurrencyAmount {
    fn converted_to<P>(self, currency: &CurrencyCode, rates: &P) -> Result<Self, FxError>
    where
        P: FxRateProvider + ?Sized,
    {
        if &self.currency == currency {
            return Ok(self);
        }
        let rate = rates.fx_rate(&self.currency, currency)?;
        Ok(Self::new(currency.clone(), self.amount * rate))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

/// Amounts in several currencies, at most one entry per currency.
///
/// Iteration is ordered by currency code. Serializes as a JSON object keyed
/// by currency, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiCurrencyAmount {
    amounts: BTreeMap<CurrencyCode, f64>,
}

impl MultiCurrencyAmount {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add an amount, summing with any existing entry in the same currency.
    pub fn plus(mut self, amount: &CurrencyAmount) -> Self {
        self.add(amount);
        self
    }

    fn add(&mut self, amount: &CurrencyAmount) {
        *self.amounts.entry(amount.currency().clone()).or_insert(0.0) += amount.amount();
    }

    /// Amount held in `currency`; zero when absent.
    pub fn amount(&self, currency: &CurrencyCode) -> f64 {
        self.amounts.get(currency).copied().unwrap_or(0.0)
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<CurrencyAmount> {
        self.amounts
            .get(currency)
            .map(|a| CurrencyAmount::new(currency.clone(), *a))
    }

    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.amounts.keys().cloned().collect()
    }

    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(c, a)| (c.clone(), a * factor))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = CurrencyAmount> + '_ {
        self.amounts
            .iter()
            .map(|(c, a)| CurrencyAmount::new(c.clone(), *a))
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Sum of every entry expressed in `currency`.
    pub fn total_in<P>(&self, currency: &CurrencyCode, rates: &P) -> Result<CurrencyAmount, FxError>
    where
        P: FxRateProvider + ?Sized,
    {
        let mut total = 0.0;
        for amount in self.iter() {
            total += amount.converted_to(currency, rates)?.amount();
        }
        Ok(CurrencyAmount::new(currency.clone(), total))
    }
}

impl FxConvertible for MultiCurrencyAmount {
    fn converted_to<P>(self, currency: &CurrencyCode, rates: &P) -> Result<Self, FxError>
    where
        P: FxRateProvider + ?Sized,
    {
        if self.is_empty() {
            return Ok(self);
        }
        let total = self.total_in(currency, rates)?;
        Ok(Self::empty().plus(&total))
    }
}

impl FromIterator<CurrencyAmount> for MultiCurrencyAmount {
    fn from_iter<T: IntoIterator<Item = CurrencyAmount>>(iter: T) -> Self {
        let mut result = Self::empty();
        for amount in iter {
            result.add(&amount);
        }
        result
    }
}

impl fmt::Display for MultiCurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|a| a.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
