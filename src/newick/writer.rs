//! Newick string writing.

use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use crate::newick::defs::BUFFER_CHARS;
use crate::parser::utils::escape_label;
use std::io::{self, Write};

/// Writes the given trees, one Newick string per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_trees<'a, W, I>(writer: &mut W, trees: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Tree>,
{
    for tree in trees {
        writer.write_all(tree.to_newick().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Every vertex label (leaf names, clade names, support values) is written,
/// escaped if necessary, followed by the branch length if set. The root's
/// branch length is written as well when present.
///
/// # Example
/// ```
/// use phylodisc::model::tree::Tree;
/// use phylodisc::model::vertex::BranchLength;
/// use phylodisc::newick::to_newick;
///
/// let mut tree = Tree::new();
/// let a = tree.add_leaf("A", Some(BranchLength::new(1.0)));
/// let b = tree.add_leaf("Great Spotted Kiwi", Some(BranchLength::new(2.5)));
/// tree.add_root(vec![a, b], Some("I0".to_string()), None);
///
/// assert_eq!(to_newick(&tree), "(A:1,'Great Spotted Kiwi':2.5)I0;");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    fn build_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
        if let Some(branch_length) = branch_length {
            newick.push(':');
            newick.push_str(&branch_length.to_string());
        }
    }

    // Recursive helper for building the Newick string
    fn build_newick(tree: &Tree, newick: &mut String, index: VertexIndex) {
        let vertex = &tree[index];

        if !vertex.is_leaf() {
            newick.push('(');
            for (i, &child) in vertex.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child);
            }
            newick.push(')');
        }

        if let Some(label) = vertex.label() {
            newick.push_str(&escape_label(label));
        }
        build_branch_length(newick, vertex.branch_length());
    }

    if !tree.is_root_set() {
        return String::from(";");
    }

    let mut newick = String::with_capacity(estimate_newick_len(tree));
    build_newick(tree, &mut newick, tree.root_index());
    newick.push(';');
    newick
}

/// Estimates the length of a Newick string for a given tree, used to
/// pre-allocate string capacity.
fn estimate_newick_len(tree: &Tree) -> usize {
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;
    // Per vertex: a comma or parenthesis
    const STRUCTURE_CHARS: usize = 2;

    tree.pre_order_iter()
        .map(|v| {
            let label_len = v.label().map_or(0, str::len);
            let branch_len = if v.has_branch_length() { BRANCH_LENGTH_CHARS } else { 0 };
            label_len + branch_len + STRUCTURE_CHARS
        })
        .sum::<usize>()
        + BUFFER_CHARS
}
