//! Dataset generation and startup inputs.

pub mod dataset;
pub mod generator;
pub mod knowledge;
