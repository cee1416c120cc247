use crate::basics::amount::MultiCurrencyAmount;
use crate::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateProvider};
use crate::market::name::MarketDataName;
use crate::market::sensitivity::{CurrencyParameterSensitivity, SensitivityError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Deserialize)]
struct RawSensitivities {
    sensitivities: Vec<CurrencyParameterSensitivity>,
}

impl TryFrom<RawSensitivities> for CurrencyParameterSensitivities {
    type Error = SensitivityError;

    fn try_from(raw: RawSensitivities) -> Result<Self, Self::Error> {
        Self::of(raw.sensitivities)
    }
}

/// A set of currency sensitivities, at most one per (market data name, currency).
///
/// Entries are kept sorted by [`CurrencyParameterSensitivity::compare_key`].
/// Adding a sensitivity whose key is already present sums the two
/// elementwise. All entries for the same market data name share one
/// parameter count, whatever their currency.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::basics::currency::CurrencyCode;
/// use risk_sensitivities::market::name::MarketDataName;
/// use risk_sensitivities::market::sensitivities::CurrencyParameterSensitivities;
/// use risk_sensitivities::market::sensitivity::CurrencyParameterSensitivity;
///
/// let usd = CurrencyCode::new("USD");
/// let curve = MarketDataName::curve("USD-Discount");
/// let set = CurrencyParameterSensitivities::of(vec![
///     CurrencyParameterSensitivity::of_empty_metadata(curve.clone(), usd.clone(), vec![1.0, 2.0]),
///     CurrencyParameterSensitivity::of_empty_metadata(curve, usd.clone(), vec![3.0, 4.0]),
/// ]).unwrap();
///
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.total().amount(&usd), 10.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSensitivities")]
pub struct CurrencyParameterSensitivities {
    sensitivities: Vec<CurrencyParameterSensitivity>,
}

impl CurrencyParameterSensitivities {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of<I>(sensitivities: I) -> Result<Self, SensitivityError>
    where
        I: IntoIterator<Item = CurrencyParameterSensitivity>,
    {
        let mut result = Self::empty();
        for sensitivity in sensitivities {
            result.insert(sensitivity)?;
        }
        Ok(result)
    }

    fn insert(&mut self, sensitivity: CurrencyParameterSensitivity) -> Result<(), SensitivityError> {
        let same_name = self
            .sensitivities
            .iter()
            .find(|e| e.market_data_name() == sensitivity.market_data_name());
        if let Some(existing) = same_name {
            if existing.parameter_count() != sensitivity.parameter_count() {
                return Err(SensitivityError::ParameterCountMismatch {
                    name: existing.market_data_name().clone(),
                    expected: existing.parameter_count(),
                    actual: sensitivity.parameter_count(),
                });
            }
        }
        self.insert_checked(sensitivity);
        Ok(())
    }

    /// Insert a sensitivity whose parameter count is known to agree with the set.
    fn insert_checked(&mut self, sensitivity: CurrencyParameterSensitivity) {
        match self
            .sensitivities
            .binary_search_by(|e| e.compare_key(&sensitivity))
        {
            Ok(index) => self.sensitivities[index].accumulate(&sensitivity),
            Err(index) => self.sensitivities.insert(index, sensitivity),
        }
    }

    /// Adds one sensitivity, summing with an existing entry for the same key.
    pub fn combined_with(
        &self,
        sensitivity: CurrencyParameterSensitivity,
    ) -> Result<Self, SensitivityError> {
        let mut result = self.clone();
        result.insert(sensitivity)?;
        Ok(result)
    }

    /// Adds every sensitivity of `other`.
    pub fn merged_with(&self, other: &Self) -> Result<Self, SensitivityError> {
        let mut result = self.clone();
        for sensitivity in &other.sensitivities {
            result.insert(sensitivity.clone())?;
        }
        Ok(result)
    }

    pub fn find_sensitivity(
        &self,
        name: &MarketDataName,
        currency: &CurrencyCode,
    ) -> Option<&CurrencyParameterSensitivity> {
        self.sensitivities
            .iter()
            .find(|s| s.market_data_name() == name && s.currency() == currency)
    }

    pub fn get_sensitivity(
        &self,
        name: &MarketDataName,
        currency: &CurrencyCode,
    ) -> Result<&CurrencyParameterSensitivity, SensitivityError> {
        self.find_sensitivity(name, currency)
            .ok_or_else(|| SensitivityError::NotFound {
                name: name.clone(),
                currency: currency.clone(),
            })
    }

    pub fn sensitivities(&self) -> &[CurrencyParameterSensitivity] {
        &self.sensitivities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurrencyParameterSensitivity> {
        self.sensitivities.iter()
    }

    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.map_sensitivities(|v| v * factor)
    }

    /// Applies `op` to every value of every entry. Keys are unchanged.
    pub fn map_sensitivities(&self, op: impl Fn(f64) -> f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|s| s.map_sensitivity(&op))
                .collect(),
        }
    }

    /// Sum of every entry, by currency.
    pub fn total(&self) -> MultiCurrencyAmount {
        self.sensitivities.iter().map(|s| s.total()).collect()
    }
}

impl FxConvertible for CurrencyParameterSensitivities {
    /// Converts every entry; entries that end up sharing a key are summed.
    fn converted_to<P>(self, currency: &CurrencyCode, rates: &P) -> Result<Self, FxError>
    where
        P: FxRateProvider + ?Sized,
    {
        let count = self.sensitivities.len();
        let mut result = Self::empty();
        for sensitivity in self.sensitivities {
            result.insert_checked(sensitivity.converted_to(currency, rates)?);
        }
        debug!(
            "converted {} sensitivities to {} ({} after merging)",
            count,
            currency,
            result.len()
        );
        Ok(result)
    }
}

impl IntoIterator for CurrencyParameterSensitivities {
    type Item = CurrencyParameterSensitivity;
    type IntoIter = std::vec::IntoIter<CurrencyParameterSensitivity>;

    fn into_iter(self) -> Self::IntoIter {
        self.sensitivities.into_iter()
    }
}

impl<'a> IntoIterator for &'a CurrencyParameterSensitivities {
    type Item = &'a CurrencyParameterSensitivity;
    type IntoIter = std::slice::Iter<'a, CurrencyParameterSensitivity>;

    fn into_iter(self) -> Self::IntoIter {
        self.sensitivities.iter()
    }
}

impl fmt::Display for CurrencyParameterSensitivities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Parameter Sensitivities ({}) ===", self.len())?;
        for s in &self.sensitivities {
            writeln!(f, "  {}", s)?;
        }
        Ok(())
    }
}
