//! Recombination suppression: loci of a region collapse toward the tree of
//! the region's first locus.

use crate::error::{Result, SimError};
use crate::event::SuppressionOption;
use crate::interval::Interval;
use crate::locus::LocusSequence;
use crate::model::tree::Tree;
use crate::newick;
use crate::nni::{is_eligible, nni, random_eligible_vertex};
use log::debug;
use rand::Rng;

/// Suppresses recombination within `interval`.
///
/// The tree at `interval.start` is the reference; loci `i` with
/// `start < i < end` are rewritten according to `option`:
/// * [Fixed](SuppressionOption::Fixed): with probability `r` the locus
///   becomes the reference, otherwise `i` is recorded as retained
/// * [Random](SuppressionOption::Random): with probability `r` the locus
///   becomes the reference after one NNI around a random eligible vertex,
///   otherwise `i` is recorded as retained
/// * [Support](SuppressionOption::Support): the locus becomes the reference
///   after an NNI around each eligible vertex with numeric support `s`,
///   applied with probability `1 - r * s`; positive edit counts are recorded
///
/// # Returns
/// The recorded list `v` (retained indices or edit counts).
///
/// # Errors
/// * [SimError::LocusOutOfRange] if `interval` exceeds the loci
/// * [SimError::NoEligibleVertex] if the random option finds no vertex to edit
/// * Parsing errors of the reference tree
pub fn simulate_suppression<R: Rng + ?Sized>(
    loci: &mut LocusSequence,
    interval: Interval,
    option: SuppressionOption,
    r: f64,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if interval.end > loci.len() {
        return Err(SimError::LocusOutOfRange {
            index: interval.end.saturating_sub(1),
            count: loci.len(),
        });
    }
    if interval.is_empty() {
        return Ok(Vec::new());
    }

    let reference = loci.get(interval.start)?.to_string();
    let mut recorded = Vec::new();

    for index in interval.start + 1..interval.end {
        match option {
            SuppressionOption::Fixed => {
                if rng.random::<f64>() < r {
                    loci.set(index, reference.clone())?;
                } else {
                    recorded.push(index);
                }
            }
            SuppressionOption::Random => {
                if rng.random::<f64>() < r {
                    let mut tree = newick::parse_str(&reference)?;
                    let nd = random_eligible_vertex(&tree, rng).ok_or(SimError::NoEligibleVertex)?;
                    nni(&mut tree, nd, rng)?;
                    loci.set_tree(index, &tree)?;
                } else {
                    recorded.push(index);
                }
            }
            SuppressionOption::Support => {
                let mut tree = newick::parse_str(&reference)?;
                let edits = support_weighted_nni(&mut tree, r, rng)?;
                loci.set_tree(index, &tree)?;
                if edits > 0 {
                    recorded.push(edits);
                }
            }
        }
    }

    debug!(
        "Suppressed loci ({}, {}) with option {}: recorded {:?}",
        interval.start, interval.end, option, recorded
    );
    Ok(recorded)
}

/// Visits the internal non-root vertices of `tree` in post-order (as listed
/// before any edit) and applies an NNI around each eligible one carrying a
/// numeric support `s` with probability `1 - r * s`.
///
/// # Returns
/// The number of NNIs performed.
pub fn support_weighted_nni<R: Rng + ?Sized>(tree: &mut Tree, r: f64, rng: &mut R) -> Result<usize> {
    let mut edits = 0;
    for index in tree.internal_non_root() {
        if !is_eligible(tree, index) {
            continue;
        }
        let Some(support) = tree[index].support() else {
            continue;
        };
        if rng.random::<f64>() < 1.0 - r * support {
            nni(tree, index, rng)?;
            edits += 1;
        }
    }
    Ok(edits)
}
