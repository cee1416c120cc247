//! Foundational value types: currencies and FX rates, monetary amounts,
//! business-day adjusted dates.

pub mod amount;
pub mod currency;
pub mod date;
