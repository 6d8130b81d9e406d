//! Phylodisc generates synthetic phylogenetic datasets with known
//! discordance, for benchmarking gene-tree outlier and introgression
//! detectors.
//!
//! Given gene trees in locus order (one Newick string per line), a run
//! carves out a contiguous or block-structured range of loci, mutates the
//! trees in that range to simulate an event, and writes the mutated trees
//! (`emission.gtrees`) together with the ground truth (`info.txt`).
//! Core functionality provided:
//! - Regions: contiguous or Poisson-many disjoint blocks ([crate::interval]).
//! - Tree edits: nearest-neighbor interchange on arena trees
//!   ([crate::nni]), parsed from and written to Newick ([crate::newick]).
//! - Events ([crate::event]):
//!   - introgression: exchange the labels of a donor and a recipient taxon
//!   - recombination suppression: pull loci toward a reference tree,
//!     wholesale (fixed), by one random NNI (random), or by NNIs weighted
//!     with branch support (support)
//!   - mixture: splice a discordant gene-tree set into a default one
//! - Ground truth: typed `info.txt` records with a strict reader
//!   ([crate::metadata]), and scoring of detector output against them
//!   ([crate::score]).
//! - Species trees: target clade of an introgression, ranking of taxon
//!   pairs by ultrametricity, coalescent-unit preparation ([crate::species]).
//!
//! Randomness is always passed in explicitly as a [rand::Rng], so runs are
//! reproducible from a seed.
//!
//! # Usage patterns
//! 1. End-to-end runs reading and writing files, configured with the
//!    parameter builders in [crate::run].
//! 2. The building blocks on in-memory data: [interval::blocks],
//!    [event::simulate_suppression], [nni::nni], ...
//!
//! ## Example
//! ```
//! use phylodisc::{interval, nni, parse_newick_str};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let region = interval::blocks(1000, 0.2, 2.0, &mut rng).unwrap();
//! assert!(region.intervals().iter().all(|i| i.end <= 999));
//!
//! let mut tree = parse_newick_str("(((A,B)0.9,C)0.4,D);").unwrap();
//! let nd = nni::random_eligible_vertex(&tree, &mut rng).unwrap();
//! nni::nni(&mut tree, nd, &mut rng).unwrap();
//! assert!(tree.is_valid());
//! ```

pub mod error;
pub mod event;
pub mod interval;
pub mod locus;
pub mod metadata;
pub mod model;
pub mod newick;
pub mod nni;
pub mod parser;
pub mod run;
pub mod score;
pub mod species;

pub use crate::error::{Result, SimError};
pub use crate::model::{Tree, Vertex};

use crate::parser::parsing_error::ParsingError;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string into a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> std::result::Result<Tree, ParsingError> {
    newick::parse_str(newick)
}
