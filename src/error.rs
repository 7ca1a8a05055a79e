//! Error types for shield construction and simulation runs.
//!
//! Every variant indicates a caller programming error: local, synchronous,
//! non-retryable. Degenerate statistical outcomes (zero analytical
//! transmission, zero transmitted photons) are reported as `None` sentinels
//! on the result record, never as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("invalid layer '{material}': {reason}")]
    InvalidLayer { material: String, reason: String },

    #[error("simulation requires at least one shield layer")]
    EmptyStack,

    #[error("invalid parameter {name}: {value} (must be {constraint})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

impl ShieldError {
    pub(crate) fn invalid_layer(material: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLayer {
            material: material.to_string(),
            reason: reason.into(),
        }
    }
}
