//! Tree module for phylogenetic tree representation.
//!
//! Provides [Tree], an arena of [Vertex] values linked by [VertexIndex],
//! together with the lookup, traversal and mutation operations the event
//! simulators build on.

use crate::error::{Result, SimError};
use crate::model::vertex::{BranchLength, Vertex};
use crate::newick;
use crate::parser::utils::is_numeric_label;
use std::collections::HashSet;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

/// Prefix of synthetic labels assigned to internal vertices.
pub const INTERNAL_LABEL_PREFIX: &str = "I";

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex], so parent and child links are plain indices and rewiring
/// the tree (e.g. for a nearest-neighbor interchange) is a matter of
/// updating a few entries.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - Vertices may have any positive number of children; trifurcating roots
///   as written by gene-tree estimators are common.
/// - Branch lengths are optional, but if provided must be non-negative.
///
/// # Construction
/// Add vertices bottom-up, children before their parent, and finish with
/// [`Tree::add_root()`] (or [`Tree::set_root()`] for a single leaf).
/// Test validity with [`Tree::is_valid()`].
///
/// # Example
/// ```
/// use phylodisc::model::tree::Tree;
/// use phylodisc::model::vertex::BranchLength;
///
/// // ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new();
/// let a = tree.add_leaf("A", Some(BranchLength::new(0.2)));
/// let b = tree.add_leaf("B", Some(BranchLength::new(0.2)));
/// let c = tree.add_leaf("C", Some(BranchLength::new(0.4)));
/// let ab = tree.add_internal_vertex(vec![a, b], None, Some(BranchLength::new(0.2)));
/// tree.add_root(vec![ab, c], None, None);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.mrca("A", "C").unwrap(), tree.root_index());
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with room for `num_vertices` vertices.
    pub fn with_capacity(num_vertices: usize) -> Self {
        Tree {
            vertices: Vec::with_capacity(num_vertices),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    pub fn add_leaf<S: Into<String>>(
        &mut self,
        label: S,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        self.push_vertex(Vec::new(), Some(label.into()), branch_length)
    }

    /// Adds a leaf that may lack a label (e.g. `(,A);`).
    pub fn add_unlabeled_leaf(&mut self, branch_length: Option<BranchLength>) -> VertexIndex {
        self.push_vertex(Vec::new(), None, branch_length)
    }

    /// Adds an internal vertex to the tree and sets it as parent of its `children`.
    ///
    /// # Panics
    /// Panics if `children` is empty or contains an out of bounds index.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        assert!(!children.is_empty(), "Internal vertex needs at least one child");
        self.push_vertex(children, label, branch_length)
    }

    /// Adds the root vertex with the given children and marks it as root.
    ///
    /// # Panics
    /// Panics if `children` is empty or contains an out of bounds index.
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.add_internal_vertex(children, label, branch_length);
        self.root_index = index;
        index
    }

    /// Marks an existing vertex as the root (used for single-leaf trees).
    pub fn set_root(&mut self, index: VertexIndex) {
        self.root_index = index;
    }

    fn push_vertex(
        &mut self,
        children: Vec<VertexIndex>,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(Some(index));
        }
        self.vertices
            .push(Vertex::new(index, children, label, branch_length));
        index
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns the parent of the vertex at `index`, `None` for the root.
    pub fn parent(&self, index: VertexIndex) -> Option<VertexIndex> {
        self[index].parent()
    }

    /// Returns the children of the vertex at `index`.
    pub fn children(&self, index: VertexIndex) -> &[VertexIndex] {
        self[index].children()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal (non-root, non-leaf) vertices in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the labels of all leaves in post-order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.post_order_iter()
            .filter(|v| v.is_leaf())
            .filter_map(|v| v.label())
            .collect()
    }

    /// Returns the indices of all internal non-root vertices in post-order.
    pub fn internal_non_root(&self) -> Vec<VertexIndex> {
        self.post_order_iter()
            .filter(|v| v.is_internal())
            .map(|v| v.index())
            .collect()
    }

    /// Returns the index of the first vertex (leaf or internal) carrying `label`.
    ///
    /// # Errors
    /// [SimError::LabelNotFound] naming `label` if no vertex carries it.
    pub fn find_by_label(&self, label: &str) -> Result<VertexIndex> {
        self.vertices
            .iter()
            .find(|v| v.label() == Some(label))
            .map(|v| v.index())
            .ok_or_else(|| SimError::LabelNotFound {
                label: label.to_string(),
            })
    }

    /// Returns the most recent common ancestor of the vertices labeled `a` and `b`.
    ///
    /// # Errors
    /// [SimError::LabelNotFound] if either label is absent.
    pub fn mrca(&self, a: &str, b: &str) -> Result<VertexIndex> {
        let a = self.find_by_label(a)?;
        let b = self.find_by_label(b)?;
        Ok(self.mrca_of(a, b))
    }

    /// Returns the most recent common ancestor of two vertices.
    pub fn mrca_of(&self, a: VertexIndex, b: VertexIndex) -> VertexIndex {
        let ancestors_a: HashSet<VertexIndex> = self.ancestors(a).collect();
        self.ancestors(b)
            .find(|v| ancestors_a.contains(v))
            .unwrap_or(self.root_index)
    }

    /// Iterates over `index` and all its ancestors up to the root.
    pub fn ancestors(&self, index: VertexIndex) -> impl Iterator<Item = VertexIndex> + '_ {
        std::iter::successors(Some(index), |&v| self.parent(v))
    }

    /// Returns every leaf below `index` with its distance from `index`.
    ///
    /// Missing branch lengths count as zero; the branch above `index` itself
    /// is not included.
    pub fn leaf_distances_from(&self, index: VertexIndex) -> Vec<(VertexIndex, f64)> {
        let mut distances = Vec::new();
        let mut stack = vec![(index, 0.0)];
        while let Some((v, dist)) = stack.pop() {
            let vertex = &self[v];
            if vertex.is_leaf() {
                distances.push((v, dist));
            }
            for &child in vertex.children().iter().rev() {
                let length = self[child].branch_length().map_or(0.0, |bl| *bl);
                stack.push((child, dist + length));
            }
        }
        distances
    }

    /// Converts this tree to a Newick string (terminated by `;`).
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Mutation primitives (pub)
// ============================================================================
impl Tree {
    /// Removes `child` from the children of `parent` and clears its parent link.
    ///
    /// # Returns
    /// `false` if `child` was not a child of `parent` (nothing changed).
    pub fn remove_child(&mut self, parent: VertexIndex, child: VertexIndex) -> bool {
        let children = self.vertices[parent].children_mut();
        match children.iter().position(|&c| c == child) {
            Some(pos) => {
                children.remove(pos);
                self.vertices[child].set_parent(None);
                true
            }
            None => false,
        }
    }

    /// Appends `child` to the children of `parent` and sets its parent link.
    ///
    /// The caller must have detached `child` from any previous parent.
    pub fn add_child(&mut self, parent: VertexIndex, child: VertexIndex) {
        self.vertices[parent].children_mut().push(child);
        self.vertices[child].set_parent(Some(parent));
    }

    /// Puts `new_child` into the child slot of `parent` held by `old_child`.
    ///
    /// Only the child list of `parent` is touched; parent links are updated
    /// separately with [`Tree::set_parent()`].
    ///
    /// # Returns
    /// `false` if `old_child` was not a child of `parent` (nothing changed).
    pub fn replace_child(
        &mut self,
        parent: VertexIndex,
        old_child: VertexIndex,
        new_child: VertexIndex,
    ) -> bool {
        match self.vertices[parent]
            .children_mut()
            .iter_mut()
            .find(|c| **c == old_child)
        {
            Some(slot) => {
                *slot = new_child;
                true
            }
            None => false,
        }
    }

    /// Reassigns the recorded parent of `child`.
    pub fn set_parent(&mut self, child: VertexIndex, parent: Option<VertexIndex>) {
        self.vertices[child].set_parent(parent);
    }

    /// Sets the label of the vertex at `index`.
    pub fn set_label(&mut self, index: VertexIndex, label: Option<String>) {
        self.vertices[index].set_label(label);
    }
}

// ============================================================================
// Labeling (pub)
// ============================================================================
impl Tree {
    /// Makes every internal vertex (root included) carry a unique,
    /// non-numeric label.
    ///
    /// Vertices are visited in post-order. The first occurrence of a
    /// non-empty, non-numeric label is kept. Missing, repeated or numeric
    /// labels are replaced with `I0`, `I1`, ... (the counter increases over
    /// the whole pass and skips names already kept anywhere in the tree).
    /// With `zero_leaf_edges`, leaf branch lengths are set to zero as well.
    ///
    /// # Returns
    /// `true` if no internal label had to be replaced.
    pub fn label_internal_vertices(&mut self, zero_leaf_edges: bool) -> bool {
        let order: Vec<VertexIndex> = self.post_order_iter().map(|v| v.index()).collect();

        // Labels that survive the pass, and the vertices needing a new one
        let mut kept: HashSet<String> = HashSet::new();
        let mut relabel: Vec<VertexIndex> = Vec::new();
        for &index in &order {
            let vertex = &self.vertices[index];
            if vertex.is_leaf() {
                continue;
            }
            match vertex.label() {
                Some(l) if !l.is_empty() && !is_numeric_label(l) && !kept.contains(l) => {
                    kept.insert(l.to_string());
                }
                _ => relabel.push(index),
            }
        }

        let mut counter = 0usize;
        for &index in &relabel {
            let label = loop {
                let candidate = format!("{INTERNAL_LABEL_PREFIX}{counter}");
                counter += 1;
                if !kept.contains(&candidate) {
                    break candidate;
                }
            };
            self.vertices[index].set_label(Some(label));
        }

        if zero_leaf_edges {
            for &index in &order {
                let vertex = &mut self.vertices[index];
                if vertex.is_leaf() {
                    vertex.set_branch_length(Some(BranchLength::ZERO));
                }
            }
        }

        relabel.is_empty()
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl Tree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, in bounds, and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Every vertex is reachable from the root exactly once (no cycles,
    ///   no detached vertices)
    pub fn is_valid(&self) -> bool {
        if !self.is_root_set() || self.root_index >= self.vertices.len() {
            return false;
        }
        if self.vertices[self.root_index].has_parent() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            match vertex.parent() {
                None if index != self.root_index => return false,
                None => {}
                Some(parent) => {
                    if parent >= self.vertices.len() {
                        return false;
                    }
                    let count = self.vertices[parent]
                        .children()
                        .iter()
                        .filter(|&&c| c == index)
                        .count();
                    if count != 1 {
                        return false;
                    }
                }
            }
        }

        // Reachability without trusting the links to be acyclic
        let mut seen = vec![false; self.vertices.len()];
        let mut stack = vec![self.root_index];
        let mut num_seen = 0;
        while let Some(v) = stack.pop() {
            if seen[v] {
                return false;
            }
            seen[v] = true;
            num_seen += 1;
            stack.extend_from_slice(self.vertices[v].children());
        }

        num_seen == self.vertices.len()
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// # Example
    /// ```
    /// use phylodisc::parse_newick_str;
    ///
    /// let tree = parse_newick_str("((A,B),C);").unwrap();
    /// let order: Vec<_> = tree.post_order_iter().map(|v| v.label().unwrap_or("-")).collect();
    /// assert_eq!(order, vec!["A", "B", "-", "C", "-"]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Reversed, so the first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];
        self.stack.extend(vertex.children().iter().rev());
        Some(vertex)
    }
}
