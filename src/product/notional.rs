use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Future value of `notional` compounded at `fixed_rate` over `year_fraction`.
///
/// `notional × (1 + fixed_rate)^year_fraction`
pub fn future_value(notional: f64, fixed_rate: f64, year_fraction: f64) -> f64 {
    notional * (1.0 + fixed_rate).powf(year_fraction)
}

/// Inputs for the future value notional of a swap leg.
///
/// `Auto` means every input is derived from the rest of the trade.
/// `Explicit` overrides any subset of them; fields left as `None` are still
/// derived. The two are distinct values: `Explicit` with every field absent
/// is not `Auto`.
///
/// # Examples
///
/// ```
/// use risk_sensitivities::product::notional::FutureValueNotional;
///
/// let auto = FutureValueNotional::auto();
/// assert!(auto.is_auto());
/// assert_eq!(auto.value(), None);
///
/// let explicit = FutureValueNotional::of(Some(1_000.0), None, Some(252));
/// assert_eq!(explicit.value(), Some(1_000.0));
/// assert_eq!(explicit.calculation_period_number_of_days(), Some(252));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FutureValueNotional {
    Auto,
    Explicit {
        value: Option<f64>,
        value_date: Option<NaiveDate>,
        calculation_period_number_of_days: Option<u32>,
    },
}

impl FutureValueNotional {
    pub fn auto() -> Self {
        Self::Auto
    }

    pub fn of(
        value: Option<f64>,
        value_date: Option<NaiveDate>,
        calculation_period_number_of_days: Option<u32>,
    ) -> Self {
        Self::Explicit {
            value,
            value_date,
            calculation_period_number_of_days,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Explicit { value, .. } => *value,
        }
    }

    pub fn value_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Auto => None,
            Self::Explicit { value_date, .. } => *value_date,
        }
    }

    pub fn calculation_period_number_of_days(&self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Explicit {
                calculation_period_number_of_days,
                ..
            } => *calculation_period_number_of_days,
        }
    }

    pub fn with_value(self, value: f64) -> Self {
        Self::of(
            Some(value),
            self.value_date(),
            self.calculation_period_number_of_days(),
        )
    }

    pub fn with_value_date(self, value_date: NaiveDate) -> Self {
        Self::of(
            self.value(),
            Some(value_date),
            self.calculation_period_number_of_days(),
        )
    }

    pub fn with_calculation_period_number_of_days(self, days: u32) -> Self {
        Self::of(self.value(), self.value_date(), Some(days))
    }

    /// The explicit value when present, otherwise the compounded notional.
    pub fn resolve_value(&self, notional: f64, fixed_rate: f64, year_fraction: f64) -> f64 {
        self.value()
            .unwrap_or_else(|| future_value(notional, fixed_rate, year_fraction))
    }
}

impl Default for FutureValueNotional {
    fn default() -> Self {
        Self::Auto
    }
}
