//! Mixture of a default and a discordant gene-tree set.
//!
//! A contiguous region of `floor(gc * p / rate)` loci is taken from the
//! discordant set, except for a random `1 - rate` share of it that keeps the
//! default trees.

use crate::error::{Result, SimError};
use crate::interval::{Interval, check_portion, contiguous_of_size};
use crate::locus::LocusSequence;
use log::debug;
use rand::Rng;
use rand::seq::index;

/// Placement of a mixture region.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureRegion {
    pub interval: Interval,
    /// Loci inside the interval that keep the default tree, ascending.
    pub retained: Vec<usize>,
}

impl MixtureRegion {
    /// Realized discordant portion `size / gc`.
    pub fn realized_portion(&self, gc: usize) -> f64 {
        if gc == 0 {
            0.0
        } else {
            self.interval.len() as f64 / gc as f64
        }
    }

    /// Realized rate `1 - |retained| / size` (1.0 for an empty interval).
    pub fn realized_rate(&self) -> f64 {
        let size = self.interval.len();
        if size == 0 {
            1.0
        } else {
            1.0 - self.retained.len() as f64 / size as f64
        }
    }
}

/// Checks `0 <= p < 0.5`, `0 < rate <= 1` and `p / rate < 1`.
pub fn check_rate(p: f64, rate: f64) -> Result<()> {
    check_portion(p)?;
    if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
        return Err(SimError::invalid_parameter("r", rate, "rate must lie in (0, 1]"));
    }
    if p / rate >= 1.0 {
        return Err(SimError::invalid_parameter(
            "r",
            rate,
            format!("p / r = {} must be below 1", p / rate),
        ));
    }
    Ok(())
}

/// Places the mixture region over `gc` loci.
///
/// # Errors
/// * [SimError::InvalidParameter] if [check_rate] fails
/// * [SimError::InsufficientLoci] if the region does not fit
pub fn mixture_region<R: Rng + ?Sized>(gc: usize, p: f64, rate: f64, rng: &mut R) -> Result<MixtureRegion> {
    check_rate(p, rate)?;

    let size = (gc as f64 * p / rate).floor() as usize;
    let interval = contiguous_of_size(gc, size, rng)?;

    let amount = ((1.0 - rate) * size as f64).floor() as usize;
    let mut retained: Vec<usize> = index::sample(rng, size, amount.min(size))
        .into_iter()
        .map(|offset| interval.start + offset)
        .collect();
    retained.sort_unstable();

    debug!(
        "Mixture region [{}, {}) with {} retained loci",
        interval.start,
        interval.end,
        retained.len()
    );
    Ok(MixtureRegion { interval, retained })
}

/// Builds the mixed locus sequence: locus `i` is taken from `discordant`
/// when it lies in the region interval and is not retained, and from
/// `default` otherwise.
///
/// # Errors
/// [SimError::InvalidParameter] if the two sets differ in length.
pub fn mix_loci(
    default: &LocusSequence,
    discordant: &LocusSequence,
    region: &MixtureRegion,
) -> Result<LocusSequence> {
    if default.len() != discordant.len() {
        return Err(SimError::invalid_parameter(
            "discordant_gtrees",
            discordant.len(),
            format!("expected as many gene trees as the default set ({})", default.len()),
        ));
    }

    let loci = default
        .iter()
        .zip(discordant.iter())
        .enumerate()
        .map(|(i, (default_tree, discordant_tree))| {
            let take_discordant =
                region.interval.contains(i) && region.retained.binary_search(&i).is_err();
            if take_discordant {
                discordant_tree.to_string()
            } else {
                default_tree.to_string()
            }
        })
        .collect();
    Ok(LocusSequence::new(loci))
}
