use crate::basics::amount::{CurrencyAmount, MultiCurrencyAmount};
use crate::basics::currency::{CurrencyCode, FxConvertible, FxError, FxRateProvider};
use crate::market::sensitivities::CurrencyParameterSensitivities;

/// One basis point, the shift PV01 is quoted against.
pub const ONE_BASIS_POINT: f64 = 1e-4;

/// Total PV01: the summed sensitivity in each currency, scaled to one basis point.
pub fn pv01(sensitivities: &CurrencyParameterSensitivities) -> MultiCurrencyAmount {
    sensitivities.total().multiplied_by(ONE_BASIS_POINT)
}

/// Bucketed PV01: every parameter sensitivity scaled to one basis point.
pub fn bucketed_pv01(sensitivities: &CurrencyParameterSensitivities) -> CurrencyParameterSensitivities {
    sensitivities.multiplied_by(ONE_BASIS_POINT)
}

/// Total PV01 reported in a single currency.
pub fn pv01_in<P>(
    sensitivities: &CurrencyParameterSensitivities,
    currency: &CurrencyCode,
    rates: &P,
) -> Result<CurrencyAmount, FxError>
where
    P: FxRateProvider + ?Sized,
{
    pv01(sensitivities).total_in(currency, rates)
}

/// Bucketed PV01 with every entry re-expressed in a single currency.
pub fn bucketed_pv01_in<P>(
    sensitivities: &CurrencyParameterSensitivities,
    currency: &CurrencyCode,
    rates: &P,
) -> Result<CurrencyParameterSensitivities, FxError>
where
    P: FxRateProvider + ?Sized,
{
    bucketed_pv01(sensitivities).converted_to(currency, rates)
}
