use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info};
use phylodisc::event::SuppressionOption;
use phylodisc::metadata::SimulationInfo;
use phylodisc::run::{
    IntrogressionParams, MixtureParams, SuppressionParams, run_introgression, run_mixture, run_suppression,
};
use phylodisc::score::{DetectorMethod, SCORE_HEADER, score};
use phylodisc::species::{CoalescentUnitConfig, DEFAULT_CU_BINARY, rank_pairs, read_pairs, read_species_tree};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

/// Synthetic discordance datasets for benchmarking gene-tree outlier detectors.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seed for the random number generator (drawn from the OS if absent)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Swap donor and recipient taxa over randomly placed blocks of loci
    Introgression {
        /// Gene trees to modify, one Newick string per line
        #[arg(short = 'g', long)]
        gene_trees: PathBuf,

        /// Species tree (file or Newick string) to select the target clade
        #[arg(short = 's', long)]
        species_tree: String,

        /// Portion of the loci affected by the event
        #[arg(short = 'p', long = "discordant-portion")]
        portion: f64,

        /// Number of blocks to distribute the event over (Poisson mean)
        #[arg(short = 'b', long = "num-blocks", default_value_t = 1)]
        blocks: u32,

        /// Label of the recipient taxon
        #[arg(short = 'r', long)]
        recipient: String,

        /// Label of the donor taxon
        #[arg(short = 'd', long)]
        donor: String,

        /// Output directory
        #[arg(short = 'o', long)]
        output_dir: PathBuf,
    },

    /// Collapse a contiguous region of loci toward its first gene tree
    Suppression {
        /// Gene trees to modify, one Newick string per line
        #[arg(short = 'g', long)]
        gene_trees: PathBuf,

        /// Portion of the loci with suppressed recombination
        #[arg(short = 'p', long = "discordant-portion")]
        portion: f64,

        /// Rate at which loci follow the reference tree
        #[arg(short = 'r', long, default_value_t = 1.0)]
        rate: f64,

        /// How suppressed loci are derived: fixed, random or support
        #[arg(long, default_value = "fixed")]
        option: SuppressionOption,

        /// Output directory
        #[arg(short = 'o', long)]
        output_dir: PathBuf,
    },

    /// Splice a discordant gene-tree set into a default one
    Mixture {
        /// Default gene trees, in locus order
        #[arg(short = 'x', long = "default-gene-trees")]
        default_gene_trees: PathBuf,

        /// Discordant gene trees, in locus order
        #[arg(short = 'y', long = "discordant-gene-trees")]
        discordant_gene_trees: PathBuf,

        /// Portion of the discordant segment
        #[arg(short = 'p', long = "discordant-portion")]
        portion: f64,

        /// Share of the segment taken from the discordant trees
        #[arg(short = 'r', long, default_value_t = 1.0)]
        rate: f64,

        /// Output directory
        #[arg(short = 'o', long)]
        output_dir: PathBuf,
    },

    /// Score detector output against an info.txt
    Score {
        /// Detector output file
        #[arg(short = 'x', long = "input-file")]
        input_file: PathBuf,

        /// Ground-truth info.txt
        #[arg(short = 'y', long = "info-file")]
        info_file: PathBuf,

        /// Detector output format: phlag or phylter
        #[arg(long)]
        method: DetectorMethod,
    },

    /// Estimate a species tree in coalescent units and label its clades
    CoalescentUnits {
        /// Input species tree file
        #[arg(short = 'i', long = "input-tree")]
        input_tree: PathBuf,

        /// Gene tree file
        #[arg(short = 'g', long)]
        gene_trees: PathBuf,

        /// Number of threads of the estimation binary
        #[arg(short = 't', long = "num-threads", default_value_t = 8)]
        threads: usize,

        /// Estimation binary
        #[arg(long, default_value = DEFAULT_CU_BINARY)]
        binary: String,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Rank taxon pairs by the ultrametricity of their MRCA's subtree
    RankPairs {
        /// Species tree (file or Newick string)
        species_tree: String,

        /// Pairs file with a header line (stdin if absent)
        pairs: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("Random seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    match cli.command {
        Command::Introgression {
            gene_trees,
            species_tree,
            portion,
            blocks,
            recipient,
            donor,
            output_dir,
        } => {
            let params = IntrogressionParams::new(gene_trees, species_tree, output_dir, recipient, donor)
                .with_portion(portion)
                .with_blocks(blocks);
            let info = run_introgression(&params, &mut rng).context("Introgression run failed")?;
            debug!("Recorded:\n{info}");
        }
        Command::Suppression {
            gene_trees,
            portion,
            rate,
            option,
            output_dir,
        } => {
            let params = SuppressionParams::new(gene_trees, output_dir)
                .with_portion(portion)
                .with_rate(rate)
                .with_option(option);
            let info = run_suppression(&params, &mut rng).context("Suppression run failed")?;
            debug!("Recorded:\n{info}");
        }
        Command::Mixture {
            default_gene_trees,
            discordant_gene_trees,
            portion,
            rate,
            output_dir,
        } => {
            let params = MixtureParams::new(default_gene_trees, discordant_gene_trees, output_dir)
                .with_portion(portion)
                .with_rate(rate);
            let info = run_mixture(&params, &mut rng).context("Mixture run failed")?;
            debug!("Recorded:\n{info}");
        }
        Command::Score {
            input_file,
            info_file,
            method,
        } => {
            let info = SimulationInfo::from_file(&info_file)
                .with_context(|| format!("Failed to read {}", info_file.display()))?;
            let output = fs::read_to_string(&input_file)
                .with_context(|| format!("Failed to read {}", input_file.display()))?;
            let result = score(&output, &info, method)?;
            eprintln!("{SCORE_HEADER}");
            print!("{result}");
            io::stdout().flush()?;
        }
        Command::CoalescentUnits {
            input_tree,
            gene_trees,
            threads,
            binary,
            output_dir,
        } => {
            let cu_tree = CoalescentUnitConfig::new(input_tree, gene_trees, output_dir)
                .with_binary(binary)
                .with_threads(threads)
                .run()?;
            info!("Internal clades: {}", cu_tree.internal_labels.join(", "));
            if let Some(path) = &cu_tree.labelled_path {
                info!("Relabeled tree written to {}", path.display());
            }
            println!("{}", cu_tree.tree.to_newick());
        }
        Command::RankPairs { species_tree, pairs } => {
            let tree = read_species_tree(&species_tree)
                .with_context(|| format!("Failed to read species tree {species_tree}"))?;
            let pairs = match pairs {
                Some(path) => {
                    let file = fs::File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    read_pairs(BufReader::new(file))?
                }
                None => read_pairs(io::stdin().lock())?,
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for ranking in rank_pairs(&tree, &pairs)? {
                writeln!(out, "{ranking}")?;
            }
        }
    }

    Ok(())
}
