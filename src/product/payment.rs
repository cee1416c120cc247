use crate::basics::amount::CurrencyAmount;
use crate::basics::currency::CurrencyCode;
use crate::basics::date::{AdjustableDate, DateError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from payment construction and expansion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    #[error("amount must be unsigned, got {0}")]
    NegativeAmount(CurrencyAmount),
    #[error("unknown pay/receive flag '{0}'")]
    UnknownDirection(String),
    #[error(transparent)]
    Date(#[from] DateError),
}

/// Whether a payment is paid or received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayReceive {
    Pay,
    Receive,
}

impl PayReceive {
    pub fn is_pay(self) -> bool {
        self == Self::Pay
    }

    pub fn is_receive(self) -> bool {
        self == Self::Receive
    }

    /// Applies the sign convention: paid amounts are negative.
    pub fn normalize(self, amount: &CurrencyAmount) -> CurrencyAmount {
        match self {
            Self::Pay => amount.negated(),
            Self::Receive => amount.clone(),
        }
    }
}

impl FromStr for PayReceive {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pay" => Ok(Self::Pay),
            "receive" => Ok(Self::Receive),
            _ => Err(PaymentError::UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for PayReceive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pay => f.write_str("PAY"),
            Self::Receive => f.write_str("RECEIVE"),
        }
    }
}

/// A signed amount paid on a known date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    value: CurrencyAmount,
    date: NaiveDate,
}

impl Payment {
    pub fn new(value: CurrencyAmount, date: NaiveDate) -> Self {
        Self { value, date }
    }

    pub fn value(&self) -> &CurrencyAmount {
        &self.value
    }

    pub fn currency(&self) -> &CurrencyCode {
        self.value.currency()
    }

    pub fn amount(&self) -> f64 {
        self.value.amount()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.value, self.date)
    }
}

#[derive(Deserialize)]
struct RawBulletPayment {
    pay_receive: PayReceive,
    value: CurrencyAmount,
    date: AdjustableDate,
}

impl TryFrom<RawBulletPayment> for BulletPayment {
    type Error = PaymentError;

    fn try_from(raw: RawBulletPayment) -> Result<Self, Self::Error> {
        Self::new(raw.pay_receive, raw.value, raw.date)
    }
}

/// A single payment of a known amount on a business-day adjusted date.
///
/// The amount is held unsigned; the direction carries the sign.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use risk_sensitivities::basics::amount::CurrencyAmount;
/// use risk_sensitivities::basics::currency::CurrencyCode;
/// use risk_sensitivities::basics::date::AdjustableDate;
/// use risk_sensitivities::product::payment::{BulletPayment, PayReceive};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let bullet = BulletPayment::new(
///     PayReceive::Pay,
///     CurrencyAmount::new(CurrencyCode::new("USD"), 100.0),
///     AdjustableDate::of(date),
/// ).unwrap();
///
/// let payment = bullet.expand_to_payment().unwrap();
/// assert_eq!(payment.amount(), -100.0);
/// assert_eq!(payment.date(), date);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBulletPayment")]
pub struct BulletPayment {
    pay_receive: PayReceive,
    value: CurrencyAmount,
    date: AdjustableDate,
}

impl BulletPayment {
    /// Fails if the amount is negative.
    pub fn new(
        pay_receive: PayReceive,
        value: CurrencyAmount,
        date: AdjustableDate,
    ) -> Result<Self, PaymentError> {
        if value.amount() < 0.0 {
            return Err(PaymentError::NegativeAmount(value));
        }
        Ok(Self {
            pay_receive,
            value,
            date,
        })
    }

    // --- Accessors ---

    pub fn pay_receive(&self) -> PayReceive {
        self.pay_receive
    }

    pub fn value(&self) -> &CurrencyAmount {
        &self.value
    }

    pub fn currency(&self) -> &CurrencyCode {
        self.value.currency()
    }

    pub fn date(&self) -> &AdjustableDate {
        &self.date
    }

    /// The signed payment on the adjusted date.
    pub fn expand_to_payment(&self) -> Result<Payment, PaymentError> {
        let signed = self.pay_receive.normalize(&self.value);
        Ok(Payment::new(signed, self.date.adjusted()?))
    }
}

impl fmt::Display for BulletPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.pay_receive, self.value, self.date)
    }
}
