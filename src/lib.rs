//! Call snippet tagging: synthetic dataset generation plus an analysis service
//! combining keyword lookup, named entities, multi-label classification and a
//! short extractive summary.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
