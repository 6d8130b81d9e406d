//! Crate-wide error type.

use crate::parser::ParsingError;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while generating, mutating, recording or scoring a dataset.
#[derive(Debug, Error)]
pub enum SimError {
    /// A run parameter violates its constraint (e.g. `p >= 0.5`).
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Blocks of the requested region would hold at most two loci.
    #[error("Block size {size_b} too small (region of {size} loci split into {block_count} blocks)")]
    DegenerateBlockSize {
        size_b: usize,
        size: usize,
        block_count: usize,
    },

    /// The locus range cannot accommodate the requested region.
    #[error("Not enough loci: need {needed}, have {available}")]
    InsufficientLoci { needed: usize, available: usize },

    /// No vertex of a tree carries the label.
    #[error("Label '{label}' not found in tree")]
    LabelNotFound { label: String },

    /// NNI was requested around a vertex that does not support one.
    #[error("Vertex {index} is not eligible for a nearest-neighbor interchange")]
    IneligibleVertex { index: usize },

    /// Tree has no vertex eligible for a nearest-neighbor interchange.
    #[error("Tree has no vertex eligible for a nearest-neighbor interchange")]
    NoEligibleVertex,

    /// An `info.txt` line could not be read (`line` 0: the record as a
    /// whole is inconsistent).
    #[error("Malformed info line {line}: {reason}")]
    MalformedInfo { line: usize, reason: String },

    /// An `info.txt` lacks a required key.
    #[error("Info file lacks required key '{key}'")]
    MissingInfoKey { key: &'static str },

    /// Output of an outlier detector could not be read.
    #[error("Malformed detector output: {reason}")]
    MalformedDetectorOutput { reason: String },

    /// A locus index lies outside the locus sequence.
    #[error("Locus {index} out of range for {count} loci")]
    LocusOutOfRange { index: usize, count: usize },

    /// An external program is missing or failed.
    #[error("External tool '{tool}' failed: {reason}")]
    ExternalTool { tool: String, reason: String },

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid_parameter<V: ToString>(
        name: &'static str,
        value: V,
        reason: impl Into<String>,
    ) -> Self {
        SimError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
