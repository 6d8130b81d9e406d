//! End-to-end runs: validate parameters, place the region, mutate the loci,
//! then write `emission.gtrees` and `info.txt` to the output directory.
//!
//! Every check that can fail (parameters, region placement, label lookups,
//! parsing of selected loci) happens before the output directory is
//! created, so a failed run leaves no output behind.

use crate::error::{Result, SimError};
use crate::event::mixture::check_rate;
use crate::event::{SuppressionOption, mix_loci, mixture_region, simulate_introgression, simulate_suppression};
use crate::interval::{self, DiscordantRegion, check_portion};
use crate::locus::{EMISSION_FILE, INFO_FILE, LocusSequence};
use crate::metadata::{Bounds, EventKind, SimulationInfo};
use crate::species::{read_species_tree, target_clade};
use log::info;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the loci and the record into `out_dir`, creating it if needed.
fn save_event(out_dir: &Path, loci: &LocusSequence, info: &SimulationInfo) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    loci.write_to(out_dir.join(EMISSION_FILE))?;
    info.write_to(out_dir.join(INFO_FILE))?;
    info!("Wrote {} loci and ground truth to {}", loci.len(), out_dir.display());
    Ok(())
}

fn realized_portion(region: &DiscordantRegion, gc: usize) -> f64 {
    if gc == 0 {
        0.0
    } else {
        region.total_size() as f64 / gc as f64
    }
}

// =#========================================================================#=
// INTROGRESSION
// =#========================================================================#=
/// Parameters of an introgression run.
#[derive(Debug, Clone)]
pub struct IntrogressionParams {
    gene_trees: PathBuf,
    species_tree: String,
    out_dir: PathBuf,
    recipient: String,
    donor: String,
    p: f64,
    b: u32,
}

impl IntrogressionParams {
    /// Creates parameters with `p = 0.1` and `b = 1`.
    ///
    /// `species_tree` is a file path or a Newick string.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(
        gene_trees: P,
        species_tree: S,
        out_dir: P,
        recipient: S,
        donor: S,
    ) -> Self {
        IntrogressionParams {
            gene_trees: gene_trees.into(),
            species_tree: species_tree.into(),
            out_dir: out_dir.into(),
            recipient: recipient.into(),
            donor: donor.into(),
            p: 0.1,
            b: 1,
        }
    }

    pub fn with_portion(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    pub fn with_blocks(mut self, b: u32) -> Self {
        self.b = b;
        self
    }

    /// Checks `0 <= p < 0.5` and `b >= 1`.
    pub fn validate(&self) -> Result<()> {
        check_portion(self.p)?;
        if self.b < 1 {
            return Err(SimError::invalid_parameter("b", self.b, "block count must be at least 1"));
        }
        Ok(())
    }
}

/// Simulates an introgression event spread over `Poisson(b) + 1` blocks.
pub fn run_introgression<R: Rng + ?Sized>(params: &IntrogressionParams, rng: &mut R) -> Result<SimulationInfo> {
    params.validate()?;

    let mut loci = LocusSequence::from_file(&params.gene_trees)?;
    let gc = loci.len();
    let region = interval::blocks(gc, params.p, f64::from(params.b), rng)?;

    let mut species_tree = read_species_tree(&params.species_tree)?;
    let clade = target_clade(&mut species_tree, &params.donor, &params.recipient)?;

    simulate_introgression(&mut loci, &region, &params.recipient, &params.donor)?;
    info!(
        "Introgression {} -> {} in {} blocks ({} loci), target clade {}",
        params.donor,
        params.recipient,
        region.intervals().len(),
        region.total_size(),
        clade
    );

    let info = SimulationInfo::new(EventKind::SeparateBlocks, Bounds::from_region(&region, true))
        .with_gc(gc)
        .with_gene_trees(params.gene_trees.display().to_string())
        .with_p(realized_portion(&region, gc))
        .with_b(params.b)
        .with_taxa(params.donor.as_str(), params.recipient.as_str())
        .with_clade(clade);
    save_event(&params.out_dir, &loci, &info)?;
    Ok(info)
}

// =#========================================================================#=
// SUPPRESSION
// =#========================================================================#=
/// Parameters of a recombination-suppression run.
#[derive(Debug, Clone)]
pub struct SuppressionParams {
    gene_trees: PathBuf,
    out_dir: PathBuf,
    p: f64,
    r: f64,
    option: SuppressionOption,
}

impl SuppressionParams {
    /// Creates parameters with `p = 0.1`, `r = 1.0` and the fixed option.
    pub fn new<P: Into<PathBuf>>(gene_trees: P, out_dir: P) -> Self {
        SuppressionParams {
            gene_trees: gene_trees.into(),
            out_dir: out_dir.into(),
            p: 0.1,
            r: 1.0,
            option: SuppressionOption::Fixed,
        }
    }

    pub fn with_portion(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    pub fn with_rate(mut self, r: f64) -> Self {
        self.r = r;
        self
    }

    pub fn with_option(mut self, option: SuppressionOption) -> Self {
        self.option = option;
        self
    }

    /// Checks `0 <= p < 0.5`, `0 < r <= 1` and `p / r < 1`.
    pub fn validate(&self) -> Result<()> {
        check_rate(self.p, self.r)
    }
}

/// Simulates recombination suppression over a contiguous region.
pub fn run_suppression<R: Rng + ?Sized>(params: &SuppressionParams, rng: &mut R) -> Result<SimulationInfo> {
    params.validate()?;

    let mut loci = LocusSequence::from_file(&params.gene_trees)?;
    let gc = loci.len();
    let interval = interval::contiguous(gc, params.p, rng)?;
    let v = simulate_suppression(&mut loci, interval, params.option, params.r, rng)?;

    // Share of interior loci that follow the reference
    let interior = interval.len().saturating_sub(1);
    let r = match params.option {
        SuppressionOption::Fixed | SuppressionOption::Random if interior > 0 => {
            1.0 - v.len() as f64 / interior as f64
        }
        _ => params.r,
    };
    info!(
        "Suppression ({}) over [{}, {}), {} entries recorded",
        params.option,
        interval.start,
        interval.end,
        v.len()
    );

    let region = DiscordantRegion::single(interval);
    let info = SimulationInfo::new(
        EventKind::RecombinationSuppression,
        Bounds::from_region(&region, false),
    )
    .with_gc(gc)
    .with_gene_trees(params.gene_trees.display().to_string())
    .with_p(realized_portion(&region, gc))
    .with_r(r)
    .with_v(v)
    .with_option(params.option);
    save_event(&params.out_dir, &loci, &info)?;
    Ok(info)
}

// =#========================================================================#=
// MIXTURE
// =#========================================================================#=
/// Parameters of a mixture run.
#[derive(Debug, Clone)]
pub struct MixtureParams {
    default_gtrees: PathBuf,
    discordant_gtrees: PathBuf,
    out_dir: PathBuf,
    p: f64,
    rate: f64,
}

impl MixtureParams {
    /// Creates parameters with `p = 0.1` and `rate = 1.0`.
    pub fn new<P: Into<PathBuf>>(default_gtrees: P, discordant_gtrees: P, out_dir: P) -> Self {
        MixtureParams {
            default_gtrees: default_gtrees.into(),
            discordant_gtrees: discordant_gtrees.into(),
            out_dir: out_dir.into(),
            p: 0.1,
            rate: 1.0,
        }
    }

    pub fn with_portion(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Checks `0 <= p < 0.5`, `0 < rate <= 1` and `p / rate < 1`.
    pub fn validate(&self) -> Result<()> {
        check_rate(self.p, self.rate)
    }
}

/// Splices discordant gene trees into the default ones over a contiguous region.
pub fn run_mixture<R: Rng + ?Sized>(params: &MixtureParams, rng: &mut R) -> Result<SimulationInfo> {
    params.validate()?;

    let default = LocusSequence::from_file(&params.default_gtrees)?;
    let discordant = LocusSequence::from_file(&params.discordant_gtrees)?;
    let gc = default.len();

    let region = mixture_region(gc, params.p, params.rate, rng)?;
    let loci = mix_loci(&default, &discordant, &region)?;
    info!(
        "Mixture over [{}, {}), {} loci retained",
        region.interval.start,
        region.interval.end,
        region.retained.len()
    );

    let info = SimulationInfo::new(
        EventKind::SingleIndependent,
        Bounds::Single {
            start: region.interval.start,
            end: region.interval.end,
        },
    )
    .with_gc(gc)
    .with_default_gtrees(params.default_gtrees.display().to_string())
    .with_discordant_gtrees(params.discordant_gtrees.display().to_string())
    .with_p(region.realized_portion(gc))
    .with_r(region.realized_rate())
    .with_v(region.retained.clone());
    save_event(&params.out_dir, &loci, &info)?;
    Ok(info)
}
