//! Synthetic data for benchmarks and tests.

pub mod generator;
