//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;
use crate::parser::utils::parse_support;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex plays one of three roles, derived from its links:
/// - **Root**: no parent
/// - **Internal**: has a parent and at least one child
/// - **Leaf**: has no children
///
/// (A tree consisting of a single leaf has a vertex that is both root and leaf.)
///
/// # Invariants
/// - `index` is the position of this vertex in the tree arena
/// - `branch_length` is non-negative (enforced by [BranchLength]); might not be set
/// - `children` lists indices of vertices whose `parent` is this vertex,
///   in Newick order
/// - `label` holds the taxon name for leaves; for internal vertices it holds
///   either a clade name or a support value
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    index: VertexIndex,
    parent: Option<VertexIndex>,
    children: Vec<VertexIndex>,
    label: Option<String>,
    branch_length: Option<BranchLength>,
}

impl Vertex {
    /// Creates a new, not yet attached, vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Child indices (empty for a leaf)
    /// * `label` - Optional label
    /// * `branch_length` - Distance to parent vertex (non-negative)
    pub fn new(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children,
            label,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the children of this vertex (empty for leaves).
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Interprets the label as a support value.
    ///
    /// Returns `None` if there is no label or it is not numeric.
    pub fn support(&self) -> Option<f64> {
        self.label.as_deref().and_then(parse_support)
    }

    /// Returns the branch length, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Returns `true` if this vertex is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex is an internal, non-root vertex.
    pub fn is_internal(&self) -> bool {
        !self.is_root() && !self.is_leaf()
    }

    /// Sets or clears the label.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Sets or clears the branch length.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<VertexIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<VertexIndex> {
        &mut self.children
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// A zero length branch.
    pub const ZERO: BranchLength = BranchLength(0.0);

    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::fmt::Display for BranchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
