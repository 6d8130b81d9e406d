//! Placement of discordant regions over an ordered locus index space.
//!
//! A [DiscordantRegion] is either a single contiguous [Interval]
//! ([contiguous]) or several disjoint blocks ([blocks]) whose sizes add up
//! to the requested share of the loci.

use crate::error::{Result, SimError};
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use std::ops::Range;

/// Upper bound (exclusive) of the discordant portion `p`.
pub const MAX_PORTION: f64 = 0.5;

// =#========================================================================#=
// INTERVAL
// =#========================================================================#=
/// Half-open range `[start, end)` of locus indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Panics
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "Interval end {end} before start {start}");
        Interval { start, end }
    }

    /// Number of loci covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns whether locus `index` lies in `[start, end)`.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// The covered loci as a [Range].
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// =#========================================================================#=
// DISCORDANT REGION
// =#========================================================================#=
/// One or more disjoint intervals, ordered by start, over `[0, gc)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordantRegion {
    intervals: Vec<Interval>,
}

impl DiscordantRegion {
    /// Creates a region from intervals that are ordered and pairwise disjoint.
    ///
    /// # Panics
    /// Panics if an interval starts before the previous one ends.
    pub fn new(intervals: Vec<Interval>) -> Self {
        for pair in intervals.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "Intervals {:?} and {:?} overlap or are out of order",
                pair[0],
                pair[1]
            );
        }
        DiscordantRegion { intervals }
    }

    /// Creates a region consisting of a single interval.
    pub fn single(interval: Interval) -> Self {
        DiscordantRegion {
            intervals: vec![interval],
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn starts(&self) -> Vec<usize> {
        self.intervals.iter().map(|i| i.start).collect()
    }

    pub fn ends(&self) -> Vec<usize> {
        self.intervals.iter().map(|i| i.end).collect()
    }

    /// Total number of loci covered by all intervals.
    pub fn total_size(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Returns whether any interval covers locus `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.intervals.iter().any(|i| i.contains(index))
    }

    /// Returns whether the region is a single interval.
    pub fn is_contiguous(&self) -> bool {
        self.intervals.len() == 1
    }

    /// All covered locus indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals.iter().flat_map(Interval::range)
    }
}

// ============================================================================
// Generators (pub)
// ============================================================================
/// Checks `0 <= p < 0.5`.
pub fn check_portion(p: f64) -> Result<()> {
    if p.is_finite() && (0.0..MAX_PORTION).contains(&p) {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(
            "p",
            p,
            format!("discordant portion must lie in [0, {MAX_PORTION})"),
        ))
    }
}

/// Places a single interval of `floor(gc * p)` loci, starting uniformly at
/// random in `[1, gc - size]`.
///
/// # Errors
/// * [SimError::InvalidParameter] if `p` is not in `[0, 0.5)`
/// * [SimError::InsufficientLoci] if no valid start exists
///
/// # Example
/// ```
/// use phylodisc::interval::contiguous;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let interval = contiguous(100, 0.2, &mut rng).unwrap();
/// assert_eq!(interval.len(), 20);
/// assert!(interval.start >= 1 && interval.end <= 100);
/// ```
pub fn contiguous<R: Rng + ?Sized>(gc: usize, p: f64, rng: &mut R) -> Result<Interval> {
    check_portion(p)?;
    contiguous_of_size(gc, (gc as f64 * p).floor() as usize, rng)
}

/// Places a single interval of exactly `size` loci, starting uniformly at
/// random in `[1, gc - size]`.
pub(crate) fn contiguous_of_size<R: Rng + ?Sized>(
    gc: usize,
    size: usize,
    rng: &mut R,
) -> Result<Interval> {
    let last_start = gc
        .checked_sub(size)
        .filter(|&s| s >= 1)
        .ok_or(SimError::InsufficientLoci {
            needed: size + 1,
            available: gc,
        })?;

    let start = rng.random_range(1..=last_start);
    debug!("Placed interval [{}, {}) among {} loci", start, start + size, gc);
    Ok(Interval::new(start, start + size))
}

/// Places `Poisson(b) + 1` disjoint blocks of equal size over `[0, gc - 1]`.
///
/// With `size = floor(gc * p)` and `block_count` blocks, each block holds
/// `size_b = floor(size / block_count) + 1` loci. The `slack` left over in
/// the range of length `gc - 1` is split into `block_count` random gaps,
/// and each block is placed uniformly inside its gap-plus-block slot, so
/// blocks never overlap and no rejection step is needed.
///
/// # Errors
/// * [SimError::InvalidParameter] if `p` is not in `[0, 0.5)` or `b < 1`
/// * [SimError::DegenerateBlockSize] if `size_b <= 2`
/// * [SimError::InsufficientLoci] if the blocks do not fit
pub fn blocks<R: Rng + ?Sized>(gc: usize, p: f64, b: f64, rng: &mut R) -> Result<DiscordantRegion> {
    check_portion(p)?;
    if !(b.is_finite() && b >= 1.0) {
        return Err(SimError::invalid_parameter("b", b, "block count must be at least 1"));
    }

    let poisson = Poisson::new(b).map_err(|e| SimError::invalid_parameter("b", b, e.to_string()))?;
    let block_count = poisson.sample(rng) as usize + 1;
    let size = (gc as f64 * p).floor() as usize;
    blocks_of_size(gc, size, block_count, rng)
}

/// Places `block_count` blocks for a region of `size` loci; see [blocks].
pub fn blocks_of_size<R: Rng + ?Sized>(
    gc: usize,
    size: usize,
    block_count: usize,
    rng: &mut R,
) -> Result<DiscordantRegion> {
    if block_count == 0 {
        return Err(SimError::invalid_parameter(
            "block_count",
            block_count,
            "at least one block is required",
        ));
    }

    let size_b = size / block_count + 1;
    if size_b <= 2 {
        return Err(SimError::DegenerateBlockSize {
            size_b,
            size,
            block_count,
        });
    }

    let range_len = gc.saturating_sub(1);
    let needed = block_count * size_b;
    let slack = range_len.checked_sub(needed).ok_or(SimError::InsufficientLoci {
        needed,
        available: range_len,
    })?;

    let mut intervals = Vec::with_capacity(block_count);
    let mut cursor = 0;
    for gap in random_gaps(block_count, slack, rng) {
        let start = rng.random_range(cursor..=cursor + gap);
        intervals.push(Interval::new(start, start + size_b));
        cursor += gap + size_b;
    }

    debug!(
        "Placed {} blocks of {} loci among {} loci: {:?}",
        block_count, size_b, gc, intervals
    );
    Ok(DiscordantRegion::new(intervals))
}

/// Splits `total` into `n` non-negative gaps via `n - 1` sorted uniform cut
/// points in `[0, total]`.
fn random_gaps<R: Rng + ?Sized>(n: usize, total: usize, rng: &mut R) -> Vec<usize> {
    let mut cuts: Vec<usize> = (1..n).map(|_| rng.random_range(0..=total)).collect();
    cuts.sort_unstable();

    let mut gaps = Vec::with_capacity(n);
    let mut previous = 0;
    for cut in cuts.into_iter().chain(std::iter::once(total)) {
        gaps.push(cut - previous);
        previous = cut;
    }
    gaps
}
