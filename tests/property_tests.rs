use proptest::prelude::*;
use risk_sensitivities::basics::currency::{CurrencyCode, FxConvertible, FxError};
use risk_sensitivities::market::metadata::ParameterMetadata;
use risk_sensitivities::market::name::MarketDataName;
use risk_sensitivities::market::sensitivities::CurrencyParameterSensitivities;
use risk_sensitivities::market::sensitivity::{CurrencyParameterSensitivity, SensitivityError};
use std::cmp::Ordering;

/// Generate a currency from a small pool.
fn arb_currency() -> impl Strategy<Value = CurrencyCode> {
    prop::sample::select(vec![
        CurrencyCode::new("USD"),
        CurrencyCode::new("GBP"),
        CurrencyCode::new("EUR"),
    ])
}

/// Generate a curve name from a small pool (to increase key collisions).
fn arb_name() -> impl Strategy<Value = MarketDataName> {
    prop::sample::select(vec![
        MarketDataName::curve("GBP-SONIA"),
        MarketDataName::curve("USD-SOFR"),
        MarketDataName::surface("EUR-Vol"),
    ])
}

fn arb_values(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000_000.0f64..1_000_000.0, len)
}

/// Generate a sensitivity with a fixed number of parameters per name.
fn arb_sensitivity() -> impl Strategy<Value = CurrencyParameterSensitivity> {
    (arb_name(), arb_currency(), arb_values(4)).prop_map(|(name, currency, values)| {
        CurrencyParameterSensitivity::of_empty_metadata(name, currency, values)
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn construction_accepts_matching_lengths(values in prop::collection::vec(-1e6f64..1e6, 0..20)) {
        let metadata = ParameterMetadata::list_of_empty(values.len());
        let sens = CurrencyParameterSensitivity::of(
            MarketDataName::curve("C"),
            metadata,
            CurrencyCode::new("USD"),
            values.clone(),
        )
        .unwrap();
        prop_assert_eq!(sens.parameter_count(), values.len());
        prop_assert_eq!(sens.parameter_metadata().len(), sens.sensitivity().len());
    }

    #[test]
    fn construction_rejects_mismatched_lengths(
        values in prop::collection::vec(-1e6f64..1e6, 0..20),
        metadata_len in 0usize..20,
    ) {
        prop_assume!(metadata_len != values.len());
        let result = CurrencyParameterSensitivity::of(
            MarketDataName::curve("C"),
            ParameterMetadata::list_of_empty(metadata_len),
            CurrencyCode::new("USD"),
            values.clone(),
        );
        prop_assert_eq!(
            result.unwrap_err(),
            SensitivityError::LengthMismatch { values: values.len(), metadata: metadata_len }
        );
    }

    #[test]
    fn same_currency_conversion_is_identity(sens in arb_sensitivity()) {
        let never = |from: &CurrencyCode, to: &CurrencyCode| -> Result<f64, FxError> {
            Err(FxError::RateNotFound { from: from.clone(), to: to.clone() })
        };
        let currency = sens.currency().clone();
        let converted = sens.clone().converted_to(&currency, &never).unwrap();
        prop_assert_eq!(converted, sens);
    }

    #[test]
    fn conversion_scales_every_value(sens in arb_sensitivity(), rate in 0.01f64..100.0) {
        let target = CurrencyCode::new("JPY");
        let provider = move |_: &CurrencyCode, _: &CurrencyCode| -> Result<f64, FxError> { Ok(rate) };
        let converted = sens.clone().converted_to(&target, &provider).unwrap();
        prop_assert_eq!(converted.currency(), &target);
        prop_assert_eq!(converted.market_data_name(), sens.market_data_name());
        prop_assert_eq!(converted.parameter_metadata(), sens.parameter_metadata());
        for (c, o) in converted.sensitivity().iter().zip(sens.sensitivity()) {
            prop_assert!(close(*c, o * rate));
        }
    }

    #[test]
    fn multiplied_by_inverse_round_trips(sens in arb_sensitivity(), factor in 0.1f64..10.0) {
        let back = sens.multiplied_by(factor).multiplied_by(1.0 / factor);
        for (b, o) in back.sensitivity().iter().zip(sens.sensitivity()) {
            prop_assert!(close(*b, *o));
        }
    }

    #[test]
    fn total_is_sum_of_values(sens in arb_sensitivity()) {
        let total = sens.total();
        prop_assert_eq!(total.currency(), sens.currency());
        prop_assert!(close(total.amount(), sens.sensitivity().iter().sum()));
    }

    #[test]
    fn compare_key_is_antisymmetric(a in arb_sensitivity(), b in arb_sensitivity()) {
        prop_assert_eq!(a.compare_key(&b), b.compare_key(&a).reverse());
        let same_key = a.market_data_name() == b.market_data_name() && a.currency() == b.currency();
        prop_assert_eq!(a.compare_key(&b) == Ordering::Equal, same_key);
    }

    #[test]
    fn unit_projection_keeps_values(sens in arb_sensitivity()) {
        let unit = sens.to_unit_parameter_sensitivity();
        prop_assert_eq!(unit.market_data_name(), sens.market_data_name());
        prop_assert_eq!(unit.sensitivity(), sens.sensitivity());
        prop_assert_eq!(unit.multiplied_by_currency(sens.currency().clone(), 1.0), sens);
    }

    #[test]
    fn collection_total_matches_entry_totals(entries in prop::collection::vec(arb_sensitivity(), 0..30)) {
        let expected: Vec<(CurrencyCode, f64)> = ["USD", "GBP", "EUR"]
            .iter()
            .map(|c| {
                let code = CurrencyCode::new(*c);
                let sum: f64 = entries
                    .iter()
                    .filter(|s| s.currency() == &code)
                    .map(|s| s.total().amount())
                    .sum();
                (code, sum)
            })
            .collect();

        let set = CurrencyParameterSensitivities::of(entries).unwrap();
        let total = set.total();
        for (code, sum) in expected {
            prop_assert!(close(total.amount(&code), sum));
        }

        // one entry per key, kept sorted
        for pair in set.sensitivities().windows(2) {
            prop_assert_eq!(pair[0].compare_key(&pair[1]), Ordering::Less);
        }
    }
}
