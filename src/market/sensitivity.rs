//! Parameter sensitivities with and without a currency.
//!
//! Both types hold one sensitivity value per parameter of the named market
//! data, index-aligned with the parameter metadata. The length invariant is
//! checked on every construction path, deserialization included.

use crate::basics::amount::CurrencyAmount;
use crate::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateProvider};
use crate::market::metadata::ParameterMetadata;
use crate::market::name::MarketDataName;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors arising from constructing or combining sensitivities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensitivityError {
    #[error("length of sensitivity ({values}) and parameter metadata ({metadata}) must match")]
    LengthMismatch { values: usize, metadata: usize },
    #[error("cannot combine sensitivities for {name}: {expected} parameters vs {actual}")]
    ParameterCountMismatch {
        name: MarketDataName,
        expected: usize,
        actual: usize,
    },
    #[error("no sensitivity found for {name} in {currency}")]
    NotFound {
        name: MarketDataName,
        currency: CurrencyCode,
    },
}

fn validate_lengths(values: &[f64], metadata: &[ParameterMetadata]) -> Result<(), SensitivityError> {
    if values.len() != metadata.len() {
        return Err(SensitivityError::LengthMismatch {
            values: values.len(),
            metadata: metadata.len(),
        });
    }
    Ok(())
}

fn hash_values<H: Hasher>(values: &[f64], state: &mut H) {
    values.len().hash(state);
    for v in values {
        // -0.0 == 0.0, so both must hash alike
        let v = if *v == 0.0 { 0.0 } else { *v };
        v.to_bits().hash(state);
    }
}

fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Serialized form, validated on the way in.
#[derive(Deserialize)]
struct RawUnitSensitivity {
    market_data_name: MarketDataName,
    #[serde(default)]
    parameter_metadata: Option<Vec<ParameterMetadata>>,
    sensitivity: Vec<f64>,
}

impl TryFrom<RawUnitSensitivity> for UnitParameterSensitivity {
    type Error = SensitivityError;

    fn try_from(raw: RawUnitSensitivity) -> Result<Self, Self::Error> {
        let metadata = raw
            .parameter_metadata
            .unwrap_or_else(|| ParameterMetadata::list_of_empty(raw.sensitivity.len()));
        Self::of(raw.market_data_name, metadata, raw.sensitivity)
    }
}

/// Sensitivity to each parameter of some market data, without a currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitSensitivity")]
pub struct UnitParameterSensitivity {
    market_data_name: MarketDataName,
    parameter_metadata: Vec<ParameterMetadata>,
    sensitivity: Vec<f64>,
}

impl UnitParameterSensitivity {
    /// Fails unless `parameter_metadata` and `sensitivity` have the same length.
    pub fn of(
        market_data_name: MarketDataName,
        parameter_metadata: Vec<ParameterMetadata>,
        sensitivity: Vec<f64>,
    ) -> Result<Self, SensitivityError> {
        validate_lengths(&sensitivity, &parameter_metadata)?;
        Ok(Self {
            market_data_name,
            parameter_metadata,
            sensitivity,
        })
    }

    /// Uses an empty metadata placeholder for every parameter.
    pub fn of_empty_metadata(market_data_name: MarketDataName, sensitivity: Vec<f64>) -> Self {
        Self {
            market_data_name,
            parameter_metadata: ParameterMetadata::list_of_empty(sensitivity.len()),
            sensitivity,
        }
    }

    pub fn market_data_name(&self) -> &MarketDataName {
        &self.market_data_name
    }

    pub fn parameter_metadata(&self) -> &[ParameterMetadata] {
        &self.parameter_metadata
    }

    pub fn parameter_metadata_at(&self, index: usize) -> Option<&ParameterMetadata> {
        self.parameter_metadata.get(index)
    }

    pub fn sensitivity(&self) -> &[f64] {
        &self.sensitivity
    }

    pub fn parameter_count(&self) -> usize {
        self.sensitivity.len()
    }

    /// Orders by market data name, ignoring the values.
    pub fn compare_key(&self, other: &Self) -> Ordering {
        self.market_data_name.cmp(&other.market_data_name)
    }

    pub fn map_sensitivity(&self, op: impl Fn(f64) -> f64) -> Self {
        Self {
            market_data_name: self.market_data_name.clone(),
            parameter_metadata: self.parameter_metadata.clone(),
            sensitivity: self.sensitivity.iter().map(|&v| op(v)).collect(),
        }
    }

    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.map_sensitivity(|v| v * factor)
    }

    pub fn with_sensitivity(&self, sensitivity: Vec<f64>) -> Result<Self, SensitivityError> {
        Self::of(
            self.market_data_name.clone(),
            self.parameter_metadata.clone(),
            sensitivity,
        )
    }

    pub fn total(&self) -> f64 {
        self.sensitivity.iter().sum()
    }

    /// Scale by a monetary amount, producing a sensitivity in its currency.
    pub fn multiplied_by_currency(
        &self,
        currency: CurrencyCode,
        amount: f64,
    ) -> CurrencyParameterSensitivity {
        CurrencyParameterSensitivity {
            market_data_name: self.market_data_name.clone(),
            parameter_metadata: self.parameter_metadata.clone(),
            currency,
            sensitivity: self.sensitivity.iter().map(|v| v * amount).collect(),
        }
    }
}

impl Hash for UnitParameterSensitivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.market_data_name.hash(state);
        self.parameter_metadata.hash(state);
        hash_values(&self.sensitivity, state);
    }
}

impl fmt::Display for UnitParameterSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.market_data_name, format_values(&self.sensitivity))
    }
}

#[derive(Deserialize)]
struct RawCurrencySensitivity {
    market_data_name: MarketDataName,
    #[serde(default)]
    parameter_metadata: Option<Vec<ParameterMetadata>>,
    currency: CurrencyCode,
    sensitivity: Vec<f64>,
}

impl TryFrom<RawCurrencySensitivity> for CurrencyParameterSensitivity {
    type Error = SensitivityError;

    fn try_from(raw: RawCurrencySensitivity) -> Result<Self, Self::Error> {
        let metadata = raw
            .parameter_metadata
            .unwrap_or_else(|| ParameterMetadata::list_of_empty(raw.sensitivity.len()));
        Self::of(raw.market_data_name, metadata, raw.currency, raw.sensitivity)
    }
}

/// Sensitivity to each parameter of some market data, in a specific currency.
///
/// Immutable: every transformation returns a new value.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::basics::currency::{CurrencyCode, FxConvertible, FxRateTable};
/// use risk_sensitivities::market::name::MarketDataName;
/// use risk_sensitivities::market::sensitivity::CurrencyParameterSensitivity;
/// use rust_decimal_macros::dec;
///
/// let gbp = CurrencyCode::new("GBP");
/// let usd = CurrencyCode::new("USD");
/// let mut rates = FxRateTable::new(usd.clone());
/// rates.set_rate(gbp.clone(), usd.clone(), dec!(1.5)).unwrap();
///
/// let sens = CurrencyParameterSensitivity::of_empty_metadata(
///     MarketDataName::curve("GBP-Discount"),
///     gbp,
///     vec![1.0, 2.0],
/// );
/// let converted = sens.converted_to(&usd, &rates).unwrap();
/// assert_eq!(converted.currency(), &usd);
/// assert_eq!(converted.sensitivity(), &[1.5, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurrencySensitivity")]
pub struct CurrencyParameterSensitivity {
    market_data_name: MarketDataName,
    parameter_metadata: Vec<ParameterMetadata>,
    currency: CurrencyCode,
    sensitivity: Vec<f64>,
}

impl CurrencyParameterSensitivity {
    /// Fails unless `parameter_metadata` and `sensitivity` have the same length.
    pub fn of(
        market_data_name: MarketDataName,
        parameter_metadata: Vec<ParameterMetadata>,
        currency: CurrencyCode,
        sensitivity: Vec<f64>,
    ) -> Result<Self, SensitivityError> {
        validate_lengths(&sensitivity, &parameter_metadata)?;
        Ok(Self {
            market_data_name,
            parameter_metadata,
            currency,
            sensitivity,
        })
    }

    /// Uses an empty metadata placeholder for every parameter.
    pub fn of_empty_metadata(
        market_data_name: MarketDataName,
        currency: CurrencyCode,
        sensitivity: Vec<f64>,
    ) -> Self {
        Self {
            market_data_name,
            parameter_metadata: ParameterMetadata::list_of_empty(sensitivity.len()),
            currency,
            sensitivity,
        }
    }

    // --- Accessors ---

    pub fn market_data_name(&self) -> &MarketDataName {
        &self.market_data_name
    }

    pub fn parameter_metadata(&self) -> &[ParameterMetadata] {
        &self.parameter_metadata
    }

    pub fn parameter_metadata_at(&self, index: usize) -> Option<&ParameterMetadata> {
        self.parameter_metadata.get(index)
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn sensitivity(&self) -> &[f64] {
        &self.sensitivity
    }

    pub fn parameter_count(&self) -> usize {
        self.sensitivity.len()
    }

    /// Orders by market data name and then currency, ignoring the values.
    ///
    /// Two sensitivities comparing equal here describe the same risk and can
    /// be summed.
    pub fn compare_key(&self, other: &Self) -> Ordering {
        self.market_data_name
            .cmp(&other.market_data_name)
            .then_with(|| self.currency.cmp(&other.currency))
    }

    pub fn map_sensitivity(&self, op: impl Fn(f64) -> f64) -> Self {
        self.map_sensitivity_to(op, self.currency.clone())
    }

    /// Applies `op` to every value and tags the result with `currency`.
    ///
    /// The values are not otherwise reinterpreted; `op` has to account for
    /// any change of currency itself.
    pub fn map_sensitivity_to(&self, op: impl Fn(f64) -> f64, currency: CurrencyCode) -> Self {
        Self {
            market_data_name: self.market_data_name.clone(),
            parameter_metadata: self.parameter_metadata.clone(),
            currency,
            sensitivity: self.sensitivity.iter().map(|&v| op(v)).collect(),
        }
    }

    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.map_sensitivity(|v| v * factor)
    }

    /// Replaces the values, re-checking the length against the metadata.
    pub fn with_sensitivity(&self, sensitivity: Vec<f64>) -> Result<Self, SensitivityError> {
        Self::of(
            self.market_data_name.clone(),
            self.parameter_metadata.clone(),
            self.currency.clone(),
            sensitivity,
        )
    }

    /// Elementwise sum with another sensitivity of the same parameter count.
    ///
    /// Keeps this sensitivity's name, metadata and currency.
    pub fn plus(&self, other: &Self) -> Result<Self, SensitivityError> {
        if other.parameter_count() != self.parameter_count() {
            return Err(SensitivityError::ParameterCountMismatch {
                name: self.market_data_name.clone(),
                expected: self.parameter_count(),
                actual: other.parameter_count(),
            });
        }
        let mut result = self.clone();
        result.accumulate(other);
        Ok(result)
    }

    /// Adds `other`'s values in place. Parameter counts must already agree.
    pub(crate) fn accumulate(&mut self, other: &Self) {
        debug_assert_eq!(self.sensitivity.len(), other.sensitivity.len());
        for (v, o) in self.sensitivity.iter_mut().zip(&other.sensitivity) {
            *v += o;
        }
    }

    /// Sum of all values, in this sensitivity's currency.
    pub fn total(&self) -> CurrencyAmount {
        CurrencyAmount::new(self.currency.clone(), self.sensitivity.iter().sum())
    }

    /// Drops the currency. The currency cannot be recovered afterwards.
    pub fn to_unit_parameter_sensitivity(&self) -> UnitParameterSensitivity {
        UnitParameterSensitivity {
            market_data_name: self.market_data_name.clone(),
            parameter_metadata: self.parameter_metadata.clone(),
            sensitivity: self.sensitivity.clone(),
        }
    }
}

impl FxConvertible for CurrencyParameterSensitivity {
    /// Returns `self` as-is when already in `currency`; the provider is not
    /// consulted in that case. Otherwise a single rate lookup scales every value.
    fn converted_to<P>(mut self, currency: &CurrencyCode, rates: &P) -> Result<Self, FxError>
    where
        P: FxRateProvider + ?Sized,
    {
        if &self.currency == currency {
            return Ok(self);
        }
        let fx_rate = rates.fx_rate(&self.currency, currency)?;
        for v in self.sensitivity.iter_mut() {
            *v *= fx_rate;
        }
        self.currency = currency.clone();
        Ok(self)
    }
}

impl Hash for CurrencyParameterSensitivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.market_data_name.hash(state);
        self.parameter_metadata.hash(state);
        self.currency.hash(state);
        hash_values(&self.sensitivity, state);
    }
}

impl fmt::Display for CurrencyParameterSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.market_data_name,
            self.currency,
            format_values(&self.sensitivity)
        )
    }
}
