//! Risk measures derived from parameter sensitivities.

pub mod pv01;
