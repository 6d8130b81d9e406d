//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses single
//! strings or all trees of a text into arena [Tree]s.

use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for single/multiple Newick format phylogenetic
/// trees with arbitrary vertex degrees.
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with number of leaves in trees to parse,
///       otherwise it is inferred from the first parsed tree and then
///       used to pre-allocate the arena of subsequent trees.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
///
/// # Example
/// ```
/// use phylodisc::newick::NewickParser;
/// use phylodisc::parser::byte_parser::ByteParser;
///
/// let input = "((A_meleagrides:1.0,A_vulturinum:1.0)0.87:0.5,N_meleagris:1.0,G_plumifera:1.0);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::new();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.root().num_children(), 3);
/// ```
#[derive(Debug)]
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser]; the number of leaves is counted
    /// while parsing the first tree.
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of the tree arena.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses all Newick trees from the byte parser until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser over text containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&mut self, mut byte_parser: ByteParser<'_>) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// The parser is left right after the terminating `;`.
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str(&mut self, parser: &mut ByteParser<'_>) -> Result<Tree, ParsingError> {
        // Leaves plus at most as many internal vertices
        let mut tree = Tree::with_capacity(2 * self.num_leaves);

        self.parse_root(parser, &mut tree)?;

        if !self.know_num_leaves {
            self.num_leaves = tree.num_leaves();
            self.know_num_leaves = true;
        }

        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(children)[label][:branch_length];` or `label[:branch_length];`
    /// - Skips leading comments and whitespace
    fn parse_root(&mut self, parser: &mut ByteParser<'_>, tree: &mut Tree) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        if parser.peek_is(b'(') {
            let children = self.parse_children(parser, tree)?;
            let label = self.parse_internal_label(parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            tree.add_root(children, label, branch_length);
        } else {
            let leaf = self.parse_leaf(parser, tree)?;
            tree.set_root(leaf);
        }

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            }
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index:
    /// - Skips leading comments and whitespace
    /// - Dispatches to `parse_internal_vertex` if starts with `(`, otherwise `parse_leaf`
    fn parse_vertex(&mut self, parser: &mut ByteParser<'_>, tree: &mut Tree) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser, tree)
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses internal vertex, adds it to tree, and returns its index:
    /// - `(children)[label][:branch_length]`
    fn parse_internal_vertex(
        &mut self,
        parser: &mut ByteParser<'_>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let label = self.parse_internal_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;
        Ok(tree.add_internal_vertex(children, label, branch_length))
    }

    /// Parses a comma separated list of children `(a, b, ...)` and returns
    /// their indices in order:
    /// - Expects parser at opening `(`
    ///   (caller should skip leading comments/whitespace)
    fn parse_children(
        &mut self,
        parser: &mut ByteParser<'_>,
        tree: &mut Tree,
    ) -> Result<Vec<VertexIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => children.push(self.parse_vertex(parser, tree)?),
                Some(b')') => return Ok(children),
                None => return Err(ParsingError::unexpected_eof(parser)),
                Some(other) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!("Expected ',' or ')' after child but found {:?}", char::from(other)),
                    ));
                }
            }
        }
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `[label][:branch_length]`
    /// - Expects parser at start of label
    ///   (caller should skip leading comments/whitespace)
    fn parse_leaf(&mut self, parser: &mut ByteParser<'_>, tree: &mut Tree) -> Result<VertexIndex, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let branch_length = self.parse_branch_length(parser)?;

        let index = if label.is_empty() {
            tree.add_unlabeled_leaf(branch_length)
        } else {
            tree.add_leaf(label, branch_length)
        };
        Ok(index)
    }

    /// Parses the optional label following the `)` of an internal vertex.
    fn parse_internal_label(&mut self, parser: &mut ByteParser<'_>) -> Result<Option<String>, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if the value is not a non-negative number
    fn parse_branch_length(&mut self, parser: &mut ByteParser<'_>) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let token = parser.parse_number_token();
        token
            .parse::<f64>()
            .ok()
            .and_then(BranchLength::try_new)
            .map(Some)
            .ok_or_else(|| ParsingError::invalid_branch_length(parser, token))
    }
}
