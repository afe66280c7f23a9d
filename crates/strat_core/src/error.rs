//! Error types for the planning engine.

use thiserror::Error;

/// Errors surfaced by the engine's public operations.
///
/// Both variants are permanent: retrying with the same inputs yields the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Circuit code not present in the catalog.
    #[error("unknown circuit: {0}")]
    UnknownCircuit(String),

    /// A lap count, point value or strategy shape the models cannot work with.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
