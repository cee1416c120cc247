//! # risk-sensitivities
//!
//! Currency-aware parameter sensitivities, FX conversion and the payment
//! value objects a pricer produces and consumes.
//!
//! A pricer computes the sensitivity of a value to each parameter of its
//! curves and surfaces. This crate holds those sensitivities, re-expresses
//! them in another currency through an FX rate provider and aggregates them
//! into monetary totals and PV01.
//!
//! ## Architecture
//!
//! - **basics**: Currencies, FX rates, monetary amounts, adjustable dates
//! - **market**: Parameter sensitivities with and without a currency
//! - **product**: Bullet payments and future value notionals
//! - **measure**: PV01 and bucketed PV01
//! - **simulation**: Random sensitivity sets for benchmarks and tests

pub mod basics;
pub mod market;
pub mod measure;
pub mod product;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::basics::amount::{CurrencyAmount, MultiCurrencyAmount};
    pub use crate::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateProvider, FxRateTable};
    pub use crate::basics::date::{AdjustableDate, BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar};
    pub use crate::market::metadata::ParameterMetadata;
    pub use crate::market::name::MarketDataName;
    pub use crate::market::sensitivities::CurrencyParameterSensitivities;
    pub use crate::market::sensitivity::{
        CurrencyParameterSensitivity, SensitivityError, UnitParameterSensitivity,
    };
    pub use crate::product::notional::FutureValueNotional;
    pub use crate::product::payment::{BulletPayment, PayReceive, Payment, PaymentError};
}
