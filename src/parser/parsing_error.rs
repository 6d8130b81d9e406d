//! Error types for the Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing gene trees and species trees.

use crate::parser::byte_parser::ByteParser;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during Newick parsing.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum ParsingErrorType {
    /// Input ended before the tree was complete
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// A `[` comment was opened but never closed
    #[error("Unclosed comment")]
    UnclosedComment,
    /// A `'` quoted label was opened but never closed
    #[error("Unclosed quoted label")]
    UnclosedQuote,
    /// Structural problem in the Newick string
    #[error("Invalid newick string: {0}")]
    InvalidNewickString(String),
    /// Branch length that is not a non-negative finite number
    #[error("Invalid branch length: {0}")]
    InvalidBranchLength(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and surrounding bytes).
#[derive(Debug, Error)]
#[error("{kind} at position {position}{}", context_suffix(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser(kind: ParsingErrorType, parser: &ByteParser<'_>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.context(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEof
    pub fn unexpected_eof(parser: &ByteParser<'_>) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEof, parser)
    }

    /// Convenience constructor for UnclosedComment
    pub fn unclosed_comment(parser: &ByteParser<'_>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    /// Convenience constructor for UnclosedQuote
    pub fn unclosed_quote(parser: &ByteParser<'_>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedQuote, parser)
    }

    /// Convenience constructor for InvalidNewickString
    pub fn invalid_newick_string(parser: &ByteParser<'_>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNewickString(msg), parser)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(parser: &ByteParser<'_>, value: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidBranchLength(value), parser)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }
}
