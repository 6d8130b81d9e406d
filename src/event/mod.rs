//! Event simulators mutating a [LocusSequence](crate::locus::LocusSequence)
//! inside a discordant region.
//!
//! * [introgression] - exchange the labels of a donor and a recipient taxon
//! * [suppression] - pull loci toward a reference tree, with a
//!   [SuppressionOption] choosing how
//! * [mixture] - splice loci of a discordant gene-tree set into a default one
//!
//! Loci outside the region are never touched.

pub mod introgression;
pub mod mixture;
pub mod suppression;

pub use introgression::{simulate_introgression, swap_taxa};
pub use mixture::{MixtureRegion, mix_loci, mixture_region};
pub use suppression::{simulate_suppression, support_weighted_nni};

use crate::error::SimError;
use std::fmt;
use std::str::FromStr;

/// How loci inside a suppressed region are derived from the reference tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionOption {
    /// Replace with the reference tree with probability `r`.
    #[default]
    Fixed,
    /// Replace with the reference tree after one random NNI, with probability `r`.
    Random,
    /// Apply an NNI around each supported vertex of the reference tree with
    /// probability `1 - r * support`.
    Support,
}

impl SuppressionOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressionOption::Fixed => "fixed",
            SuppressionOption::Random => "random",
            SuppressionOption::Support => "support",
        }
    }
}

impl fmt::Display for SuppressionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuppressionOption {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fixed" => Ok(SuppressionOption::Fixed),
            "random" => Ok(SuppressionOption::Random),
            "support" => Ok(SuppressionOption::Support),
            other => Err(SimError::invalid_parameter(
                "option",
                other,
                "expected one of fixed, random, support",
            )),
        }
    }
}
