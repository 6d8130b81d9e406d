//! Low-level parsing infrastructure for Newick gene-tree lines.
//!
//! This module provides a byte-level cursor ([byte_parser::ByteParser]) over
//! in-memory ASCII input, error reporting with position and context
//! ([ParsingError]), and label escaping helpers ([utils]).

pub mod byte_parser;
pub mod parsing_error;
pub mod utils;

pub use parsing_error::{ParsingError, ParsingErrorType};
