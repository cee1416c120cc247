//! Product value objects: bullet payments and swap-leg notional inputs.

pub mod notional;
pub mod payment;
