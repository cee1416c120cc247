//! Random sensitivity generation.
//!
//! Produces sensitivity sets of configurable shape to exercise conversion
//! and aggregation under load.

use crate::basics::currency::CurrencyCode;
use crate::market::metadata::ParameterMetadata;
use crate::market::name::MarketDataName;
use crate::market::sensitivities::CurrencyParameterSensitivities;
use crate::market::sensitivity::{CurrencyParameterSensitivity, SensitivityError};
use rand::Rng;

/// Configuration for generating a random sensitivity set.
#[derive(Debug, Clone)]
pub struct SensitivityConfig {
    /// Number of distinct curves.
    pub curve_count: usize,
    /// Parameters per curve.
    pub parameter_count: usize,
    /// Currencies to use; each curve gets one entry per currency.
    pub currencies: Vec<CurrencyCode>,
    /// Smallest generated value.
    pub min_value: f64,
    /// Largest generated value.
    pub max_value: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            curve_count: 5,
            parameter_count: 10,
            currencies: vec![CurrencyCode::new("USD")],
            min_value: -10_000.0,
            max_value: 10_000.0,
        }
    }
}

fn tenor_labels(n: usize) -> Vec<ParameterMetadata> {
    (1..=n)
        .map(|i| ParameterMetadata::label(format!("{}Y", i)))
        .collect()
}

/// Generate a random sensitivity set for testing.
pub fn generate_random_sensitivities(
    config: &SensitivityConfig,
) -> Result<CurrencyParameterSensitivities, SensitivityError> {
    let mut rng = rand::thread_rng();
    let (low, high) = if config.min_value <= config.max_value {
        (config.min_value, config.max_value)
    } else {
        (config.max_value, config.min_value)
    };

    let mut entries = Vec::with_capacity(config.curve_count * config.currencies.len());
    for curve in 0..config.curve_count {
        let name = MarketDataName::curve(format!("CURVE-{:03}", curve));
        for currency in &config.currencies {
            let values: Vec<f64> = (0..config.parameter_count)
                .map(|_| if low < high { rng.gen_range(low..high) } else { low })
                .collect();
            entries.push(CurrencyParameterSensitivity::of(
                name.clone(),
                tenor_labels(config.parameter_count),
                currency.clone(),
                values,
            )?);
        }
    }

    CurrencyParameterSensitivities::of(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sensitivity_generation() {
        let config = SensitivityConfig {
            curve_count: 3,
            parameter_count: 4,
            currencies: vec![CurrencyCode::new("USD"), CurrencyCode::new("GBP")],
            ..Default::default()
        };

        let set = generate_random_sensitivities(&config).unwrap();
        assert_eq!(set.len(), 6);
        for s in &set {
            assert_eq!(s.parameter_count(), 4);
            assert_eq!(s.parameter_metadata_at(0).map(|m| m.label_str()), Some("1Y"));
            assert!(s
                .sensitivity()
                .iter()
                .all(|v| *v >= config.min_value && *v < config.max_value));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let config = SensitivityConfig {
            min_value: 5.0,
            max_value: 5.0,
            ..Default::default()
        };
        let set = generate_random_sensitivities(&config).unwrap();
        assert_eq!(set.len(), config.curve_count);
        assert!(set.iter().all(|s| s.sensitivity().iter().all(|v| *v == 5.0)));
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        let config = SensitivityConfig {
            min_value: 10.0,
            max_value: -10.0,
            ..Default::default()
        };
        let set = generate_random_sensitivities(&config).unwrap();
        assert!(set
            .iter()
            .flat_map(|s| s.sensitivity().iter())
            .all(|v| *v >= -10.0 && *v < 10.0));
    }
}
