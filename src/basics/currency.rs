use log::trace;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Codes are compared lexically, which gives sensitivities and multi-currency
/// amounts a stable ordering.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::basics::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let gbp = CurrencyCode::new("GBP");
/// assert_ne!(usd, gbp);
/// assert!(gbp < usd);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from FX rate operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    #[error("no FX rate available for {from} -> {to}")]
    RateNotFound {
        from: CurrencyCode,
        to: CurrencyCode,
    },
    #[error("FX rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
}

/// A pair of currencies representing an exchange rate direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// The same pair quoted the other way round.
    pub fn inverse(&self) -> Self {
        Self::new(self.quote.clone(), self.base.clone())
    }

    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// A source of FX rates.
///
/// `fx_rate(from, to)` is the number of units of `to` worth one unit of
/// `from`. Implementations report a missing rate as an error; callers
/// propagate it rather than substituting a default.
///
/// Any closure with the right shape is a provider, which keeps tests and
/// one-off conversions short:
///
/// ```
/// use risk_sensitivities::basics::currency::{CurrencyCode, FxError, FxRateProvider};
///
/// let flat = |_: &CurrencyCode, _: &CurrencyCode| -> Result<f64, FxError> { Ok(2.0) };
/// let rate = flat.fx_rate(&CurrencyCode::new("GBP"), &CurrencyCode::new("USD")).unwrap();
/// assert_eq!(rate, 2.0);
/// ```
pub trait FxRateProvider {
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError>;
}

impl<F> FxRateProvider for F
where
    F: Fn(&CurrencyCode, &CurrencyCode) -> Result<f64, FxError>,
{
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError> {
        self(from, to)
    }
}

/// A value that can be re-expressed in another currency.
///
/// Implementations return `self` unchanged when it is already expressed in
/// the target currency, without consulting the provider.
pub trait FxConvertible: Sized {
    fn converted_to<P>(self, currency: &CurrencyCode, rates: &P) -> Result<Self, FxError>
    where
        P: FxRateProvider + ?Sized;
}

/// FX rate table for converting between currencies.
///
/// Stores direct quotes as exact decimals together with their inverses.
/// When neither a direct nor an inverse quote exists, a cross rate is
/// triangulated through the base currency.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::basics::currency::{CurrencyCode, FxRateTable};
/// use rust_decimal_macros::dec;
///
/// let mut rates = FxRateTable::new(CurrencyCode::new("USD"));
/// rates.set_rate(
///     CurrencyCode::new("GBP"),
///     CurrencyCode::new("USD"),
///     dec!(1.5),
/// ).unwrap();
///
/// let converted = rates.convert(
///     dec!(1000),
///     &CurrencyCode::new("GBP"),
///     &CurrencyCode::new("USD"),
/// ).unwrap();
/// assert_eq!(converted, dec!(1500));
/// ```
#[derive(Debug, Clone)]
pub struct FxRateTable {
    /// The currency used to triangulate cross rates.
    pub base_currency: CurrencyCode,
    /// Direct rates: (from, to) -> rate.
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl FxRateTable {
    /// Create a new FX rate table with the given base currency.
    pub fn new(base_currency: CurrencyCode) -> Self {
        Self {
            base_currency,
            rates: HashMap::new(),
        }
    }

    /// Set a direct exchange rate: 1 unit of `from` = `rate` units of `to`.
    pub fn set_rate(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { from, to, rate });
        }
        self.rates.insert((from.clone(), to.clone()), rate);
        self.rates.insert((to, from), Decimal::ONE / rate);
        Ok(())
    }

    /// Number of quotes held, counting each inverse separately.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Get the exchange rate from one currency to another.
    pub fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&(from.clone(), to.clone())) {
            return Ok(*rate);
        }
        self.cross_rate(from, to).ok_or_else(|| FxError::RateNotFound {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn cross_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        let base = &self.base_currency;
        if from == base || to == base {
            return None;
        }
        let from_base = self.rates.get(&(from.clone(), base.clone()))?;
        let base_to = self.rates.get(&(base.clone(), to.clone()))?;
        trace!("triangulating {}/{} through {}", from, to, base);
        from_base.checked_mul(*base_to)
    }

    /// Convert an amount from one currency to another.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, FxError> {
        let rate = self.get_rate(from, to)?;
        Ok(amount * rate)
    }
}

impl FxRateProvider for FxRateTable {
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError> {
        let rate = self.get_rate(from, to)?;
        rate.to_f64().ok_or_else(|| FxError::InvalidRate {
            from: from.clone(),
            to: to.clone(),
            rate,
        })
    }
}
