use approx::assert_relative_eq;
use chrono::NaiveDate;
use risk_sensitivities::basics::amount::CurrencyAmount;
use risk_sensitivities::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateTable};
use risk_sensitivities::basics::date::{
    AdjustableDate, BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar,
};
use risk_sensitivities::market::metadata::ParameterMetadata;
use risk_sensitivities::market::name::MarketDataName;
use risk_sensitivities::market::sensitivities::CurrencyParameterSensitivities;
use risk_sensitivities::market::sensitivity::{CurrencyParameterSensitivity, SensitivityError};
use risk_sensitivities::measure::pv01::{bucketed_pv01, pv01, pv01_in};
use risk_sensitivities::product::notional::FutureValueNotional;
use risk_sensitivities::product::payment::{BulletPayment, PayReceive};
use rust_decimal_macros::dec;

fn gbp() -> CurrencyCode {
    CurrencyCode::new("GBP")
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn eur() -> CurrencyCode {
    CurrencyCode::new("EUR")
}

fn rates() -> FxRateTable {
    let mut table = FxRateTable::new(usd());
    table.set_rate(gbp(), usd(), dec!(1.5)).unwrap();
    table.set_rate(eur(), usd(), dec!(1.25)).unwrap();
    table
}

fn tenors(labels: &[&str]) -> Vec<ParameterMetadata> {
    labels.iter().map(|l| ParameterMetadata::label(*l)).collect()
}

/// Full pipeline: raw sensitivities → collection → conversion → totals → PV01.
#[test]
fn full_pipeline_multi_currency_book() {
    let gbp_curve = MarketDataName::curve("GBP-SONIA");
    let usd_curve = MarketDataName::curve("USD-SOFR");
    let eur_curve = MarketDataName::curve("EUR-ESTR");

    let set = CurrencyParameterSensitivities::of(vec![
        CurrencyParameterSensitivity::of(
            gbp_curve.clone(),
            tenors(&["1Y", "2Y", "5Y"]),
            gbp(),
            vec![100.0, 200.0, 300.0],
        )
        .unwrap(),
        CurrencyParameterSensitivity::of(usd_curve.clone(), tenors(&["1Y", "5Y"]), usd(), vec![-50.0, 25.0])
            .unwrap(),
        CurrencyParameterSensitivity::of_empty_metadata(eur_curve.clone(), eur(), vec![40.0]),
        // second trade on the same GBP curve
        CurrencyParameterSensitivity::of(
            gbp_curve.clone(),
            tenors(&["1Y", "2Y", "5Y"]),
            gbp(),
            vec![1.0, 1.0, 1.0],
        )
        .unwrap(),
    ])
    .unwrap();

    assert_eq!(set.len(), 3);
    let gbp_entry = set.get_sensitivity(&gbp_curve, &gbp()).unwrap();
    assert_eq!(gbp_entry.sensitivity(), &[101.0, 201.0, 301.0]);

    let total = set.total();
    assert_eq!(total.amount(&gbp()), 603.0);
    assert_eq!(total.amount(&usd()), -25.0);
    assert_eq!(total.amount(&eur()), 40.0);

    let in_usd = set.clone().converted_to(&usd(), &rates()).unwrap();
    assert!(in_usd.iter().all(|s| s.currency() == &usd()));
    let converted_gbp = in_usd.get_sensitivity(&gbp_curve, &usd()).unwrap();
    assert_relative_eq!(converted_gbp.sensitivity()[2], 451.5, epsilon = 1e-9);
    assert_eq!(converted_gbp.parameter_metadata(), tenors(&["1Y", "2Y", "5Y"]).as_slice());

    let expected_usd = 603.0 * 1.5 - 25.0 + 40.0 * 1.25;
    assert_relative_eq!(in_usd.total().amount(&usd()), expected_usd, epsilon = 1e-9);

    let pv01_total = pv01_in(&set, &usd(), &rates()).unwrap();
    assert_relative_eq!(pv01_total.amount(), expected_usd * 1e-4, epsilon = 1e-12);

    let per_ccy = pv01(&set);
    assert_relative_eq!(per_ccy.amount(&gbp()), 0.0603, epsilon = 1e-12);

    let bucketed = bucketed_pv01(&set);
    assert_eq!(bucketed.len(), set.len());
}

#[test]
fn conversion_same_currency_never_consults_provider() {
    let failing = |from: &CurrencyCode, to: &CurrencyCode| -> Result<f64, FxError> {
        Err(FxError::RateNotFound {
            from: from.clone(),
            to: to.clone(),
        })
    };
    let sens = CurrencyParameterSensitivity::of_empty_metadata(
        MarketDataName::curve("GBP-SONIA"),
        gbp(),
        vec![1.0, 2.0],
    );
    let buffer = sens.sensitivity().as_ptr();
    let same = sens.converted_to(&gbp(), &failing).unwrap();
    assert_eq!(same.sensitivity().as_ptr(), buffer);
}

#[test]
fn conversion_propagates_missing_rate() {
    let table = FxRateTable::new(usd());
    let sens = CurrencyParameterSensitivity::of_empty_metadata(
        MarketDataName::curve("JPY-TONA"),
        CurrencyCode::new("JPY"),
        vec![1.0],
    );
    let err = sens.converted_to(&usd(), &table).unwrap_err();
    assert_eq!(
        err,
        FxError::RateNotFound {
            from: CurrencyCode::new("JPY"),
            to: usd()
        }
    );
}

#[test]
fn cross_currency_conversion_through_base() {
    let sens = CurrencyParameterSensitivity::of_empty_metadata(
        MarketDataName::curve("GBP-SONIA"),
        gbp(),
        vec![1.0, 2.0],
    );
    let in_eur = sens.converted_to(&eur(), &rates()).unwrap();
    assert_relative_eq!(in_eur.sensitivity()[0], 1.2, epsilon = 1e-12);
    assert_relative_eq!(in_eur.sensitivity()[1], 2.4, epsilon = 1e-12);
}

#[test]
fn length_mismatch_fails_fast() {
    let err = CurrencyParameterSensitivity::of(
        MarketDataName::curve("GBP-SONIA"),
        tenors(&["1Y", "2Y"]),
        gbp(),
        vec![1.0, 2.0, 3.0],
    )
    .unwrap_err();
    assert_eq!(
        err,
        SensitivityError::LengthMismatch {
            values: 3,
            metadata: 2
        }
    );
}

#[test]
fn unit_projection_loses_currency() {
    let sens = CurrencyParameterSensitivity::of(
        MarketDataName::surface("GBP-Swaption-Vol"),
        tenors(&["1Yx5Y", "2Yx5Y"]),
        gbp(),
        vec![3.0, 4.0],
    )
    .unwrap();
    let unit = sens.to_unit_parameter_sensitivity();
    assert_eq!(unit.sensitivity(), sens.sensitivity());
    assert_eq!(unit.parameter_metadata(), sens.parameter_metadata());

    let in_usd = unit.multiplied_by_currency(usd(), 1.0);
    assert_eq!(in_usd.to_unit_parameter_sensitivity(), unit);
    assert_ne!(in_usd, sens);
}

#[test]
fn bullet_payment_pay_and_receive() {
    // 2024-01-06 is a Saturday.
    let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    let date = AdjustableDate::new(
        saturday,
        BusinessDayAdjustment::new(BusinessDayConvention::Following, HolidayCalendar::weekends()),
    );
    let amount = CurrencyAmount::new(usd(), 100.0);

    let pay = BulletPayment::new(PayReceive::Pay, amount.clone(), date.clone()).unwrap();
    let paid = pay.expand_to_payment().unwrap();
    assert_eq!(paid.amount(), -100.0);
    assert_eq!(paid.date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());

    let receive = BulletPayment::new(PayReceive::Receive, amount, date).unwrap();
    let received = receive.expand_to_payment().unwrap();
    assert_eq!(received.amount(), 100.0);
    assert_eq!(received.date(), paid.date());

    assert!(BulletPayment::new(
        PayReceive::Receive,
        CurrencyAmount::new(usd(), -0.01),
        AdjustableDate::of(saturday)
    )
    .is_err());
}

#[test]
fn future_value_notional_auto_and_explicit() {
    let auto = FutureValueNotional::auto();
    assert_eq!(auto.value(), None);
    assert_eq!(auto.value_date(), None);
    assert_eq!(auto.calculation_period_number_of_days(), None);

    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let explicit = FutureValueNotional::of(Some(1_000_000.0), Some(date), Some(252));
    assert_eq!(explicit.value(), Some(1_000_000.0));
    assert_eq!(explicit.value_date(), Some(date));
    assert_eq!(explicit.calculation_period_number_of_days(), Some(252));
    assert_relative_eq!(auto.resolve_value(1_000.0, 0.1, 2.0), 1_210.0, epsilon = 1e-9);
}

#[test]
fn sensitivities_json_round_trip() {
    let set = CurrencyParameterSensitivities::of(vec![
        CurrencyParameterSensitivity::of(MarketDataName::curve("A"), tenors(&["1Y"]), usd(), vec![1.0])
            .unwrap(),
    ])
    .unwrap();
    let json = serde_json::to_string(&set).unwrap();
    let back: CurrencyParameterSensitivities = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}
