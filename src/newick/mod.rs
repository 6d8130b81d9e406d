//! Newick format parser and writer for phylogenetic trees.
//!
//! Gene-tree files hold one Newick string per line, species trees a single
//! one. This module turns such strings into [`Tree`]s and back.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string into a [`Tree`]
//! * [`to_newick`] - writes a [`Tree`] as a Newick string
//!
//! # Full API
//! For more control, configure a [`NewickParser`] and provide a [`ByteParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//!
//! # Format
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Vertices may have any number of children (`(A,B,C);` is fine)
//! * Labels after `)` name internal vertices; numeric ones are read as
//!   support values by the simulators
//! * Whitespace and `[...]` comments can occur between elements
//! * A tree may consist of a single leaf (`A;`)

mod defs;
mod parser;
mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{to_newick, write_trees};

use crate::model::tree::Tree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;

/// Parses a single Newick string to obtain a [`Tree`].
///
/// # Example
/// ```
/// use phylodisc::newick::parse_str;
///
/// let tree = parse_str("((Fratercula_cirrhata,Fratercula_arctica)0.9,Fratercula_corniculata);").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut newick_parser = NewickParser::new();
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    newick_parser.parse_str(&mut byte_parser)
}
