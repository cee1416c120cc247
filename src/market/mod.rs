//! Market-data sensitivities.
//!
//! A sensitivity records the derivative of a value with respect to each
//! parameter of some parameterized market data (a curve or a surface).

pub mod metadata;
pub mod name;
pub mod sensitivities;
pub mod sensitivity;
