//! Nearest-neighbor interchange (NNI) on arena trees.
//!
//! An NNI around a vertex `nd` exchanges one child `c` of `nd` with a
//! sibling `s` of `nd`: `s` moves into `c`'s child slot below `nd` and `c`
//! moves into `s`'s child slot below the parent of `nd`. Slots are
//! exchanged in place, so applying the same interchange with the roles of
//! `c` and `s` reversed restores the tree exactly.

use crate::error::{Result, SimError};
use crate::model::tree::{Tree, VertexIndex};
use log::trace;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Returns whether an NNI can be performed around `index`: the vertex is
/// internal, not the root, and its parent has more than one child.
pub fn is_eligible(tree: &Tree, index: VertexIndex) -> bool {
    let vertex = &tree[index];
    match vertex.parent() {
        Some(parent) => !vertex.is_leaf() && tree[parent].num_children() > 1,
        None => false,
    }
}

/// Picks a vertex eligible for an NNI uniformly at random.
///
/// The internal non-root vertices are shuffled and the first eligible one
/// is taken.
///
/// # Returns
/// `None` if the tree has no eligible vertex (e.g. a star tree).
pub fn random_eligible_vertex<R: Rng + ?Sized>(tree: &Tree, rng: &mut R) -> Option<VertexIndex> {
    let mut candidates = tree.internal_non_root();
    candidates.shuffle(rng);
    candidates.into_iter().find(|&v| is_eligible(tree, v))
}

/// Performs one NNI around `nd` with a random child and a random sibling.
///
/// The child is chosen uniformly among the children of `nd`; the sibling
/// is the other child of the parent when it is bifurcating and is chosen
/// uniformly among all other children when it is multifurcating.
///
/// # Returns
/// `nd`, which now holds the former sibling.
///
/// # Errors
/// [SimError::IneligibleVertex] if `nd` is not [eligible](is_eligible).
///
/// # Example
/// ```
/// use phylodisc::nni::nni;
/// use phylodisc::parse_newick_str;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
/// let x = tree.find_by_label("X").unwrap();
/// nni(&mut tree, x, &mut StdRng::seed_from_u64(1)).unwrap();
/// assert!(tree.is_valid());
/// assert_eq!(tree.vertex(x).children().len(), 2);
/// ```
pub fn nni<R: Rng + ?Sized>(tree: &mut Tree, nd: VertexIndex, rng: &mut R) -> Result<VertexIndex> {
    if !is_eligible(tree, nd) {
        return Err(SimError::IneligibleVertex { index: nd });
    }
    let parent = tree.parent(nd).ok_or(SimError::IneligibleVertex { index: nd })?;

    let child = *tree
        .children(nd)
        .choose(rng)
        .ok_or(SimError::IneligibleVertex { index: nd })?;
    let siblings: Vec<VertexIndex> = tree
        .children(parent)
        .iter()
        .copied()
        .filter(|&v| v != nd)
        .collect();
    let sibling = *siblings
        .choose(rng)
        .ok_or(SimError::IneligibleVertex { index: nd })?;

    nni_with(tree, nd, child, sibling)
}

/// Performs the NNI around `nd` exchanging its child `child` with its
/// sibling `sibling`.
///
/// Vertex count, leaf set and everything outside the subtree of the parent
/// of `nd` stay unchanged. `nni_with(t, nd, c, s)` followed by
/// `nni_with(t, nd, s, c)` restores the original tree.
///
/// # Errors
/// [SimError::IneligibleVertex] if `nd` is not [eligible](is_eligible),
/// `child` is not a child of `nd`, or `sibling` is not a sibling of `nd`.
pub fn nni_with(tree: &mut Tree, nd: VertexIndex, child: VertexIndex, sibling: VertexIndex) -> Result<VertexIndex> {
    if !is_eligible(tree, nd) || sibling == nd {
        return Err(SimError::IneligibleVertex { index: nd });
    }
    let parent = tree.parent(nd).ok_or(SimError::IneligibleVertex { index: nd })?;
    if tree.parent(child) != Some(nd) || tree.parent(sibling) != Some(parent) {
        return Err(SimError::IneligibleVertex { index: nd });
    }

    tree.replace_child(nd, child, sibling);
    tree.replace_child(parent, sibling, child);
    tree.set_parent(sibling, Some(nd));
    tree.set_parent(child, Some(parent));

    trace!("NNI around {}: child {} <-> sibling {}", nd, child, sibling);
    Ok(nd)
}
