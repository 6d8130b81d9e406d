//! Species-tree helpers: target clade of an introgression, ranking taxon
//! pairs by ultrametricity, and preparation of a species tree in
//! coalescent units.

use crate::error::{Result, SimError};
use crate::locus::read_first_line;
use crate::model::tree::{Tree, VertexIndex};
use crate::newick;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io::{BufRead, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default coalescent-unit estimation binary.
pub const DEFAULT_CU_BINARY: &str = "astral4_coalescent_unit";

/// File name of the coalescent-unit tree in the output directory.
pub const CU_TREE_FILE: &str = "cu_tree.tree";

/// File name of the relabeled coalescent-unit tree.
pub const LABELLED_CU_TREE_FILE: &str = "labelled_cu_tree.tree";

/// Reads a species tree given either directly as a Newick string (starting
/// with `(` or ending with `;`) or as a file (first non-empty line).
///
/// # Errors
/// [SimError::Io] if `source` is not a Newick string and cannot be read as
/// a file; parsing errors of the tree.
pub fn read_species_tree(source: &str) -> Result<Tree> {
    let trimmed = source.trim();
    let newick = if trimmed.starts_with('(') || trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        read_first_line(Path::new(source))?
    };
    Ok(newick::parse_str(newick)?)
}

/// Orders a taxon pair so that the first one hangs directly below their
/// MRCA. Returns `(first, second, mrca)`.
fn order_pair(tree: &Tree, a: &str, b: &str) -> Result<(VertexIndex, VertexIndex, VertexIndex)> {
    let a = tree.find_by_label(a)?;
    let b = tree.find_by_label(b)?;
    let mrca = tree.mrca_of(a, b);
    if tree.parent(a) == Some(mrca) {
        Ok((a, b, mrca))
    } else {
        Ok((b, a, mrca))
    }
}

// =#========================================================================#=
// TARGET CLADE
// =#========================================================================#=
/// Label of the clade receiving the introgressed lineage.
///
/// The species tree is labeled first (see [`Tree::label_internal_vertices`]).
/// If the donor hangs directly below the MRCA of donor and recipient, the
/// answer is the label of the recipient's parent; otherwise it is the label
/// of the donor's parent.
///
/// # Errors
/// [SimError::LabelNotFound] if either taxon is missing.
///
/// # Example
/// ```
/// use phylodisc::species::target_clade;
/// use phylodisc::parse_newick_str;
///
/// let mut tree = parse_newick_str("((A,(B,C)),D);").unwrap();
/// assert_eq!(target_clade(&mut tree, "A", "B").unwrap(), "I0");
/// ```
pub fn target_clade(species_tree: &mut Tree, donor: &str, recipient: &str) -> Result<String> {
    species_tree.label_internal_vertices(false);
    let (_, second, _) = order_pair(species_tree, donor, recipient)?;
    // Only a single-leaf tree has a taxon without parent
    let parent = species_tree.parent(second).unwrap_or(second);
    Ok(species_tree[parent].label().unwrap_or_default().to_string())
}

// =#========================================================================#=
// PAIR RANKING
// =#========================================================================#=
/// Ultrametricity summary of a taxon pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRanking {
    /// Taxon hanging directly below the MRCA (if any does)
    pub first: String,
    pub second: String,
    /// Population variance of leaf distances from the MRCA within its subtree
    pub variance: f64,
    /// Branch length above the parent of `second`
    pub parent_edge: Option<f64>,
}

impl fmt::Display for PairRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t", self.first, self.second, self.variance)?;
        match self.parent_edge {
            Some(length) => write!(f, "{length}"),
            None => f.write_str("NA"),
        }
    }
}

/// Reads taxon pairs: the first line is a header, every further non-empty
/// line holds two whitespace-separated taxa.
pub fn read_pairs<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        let taxa: Vec<&str> = line.split_whitespace().collect();
        match taxa.as_slice() {
            [] => continue,
            [a, b] => pairs.push((a.to_string(), b.to_string())),
            _ => {
                return Err(SimError::invalid_parameter(
                    "pairs",
                    line.trim(),
                    "expected two taxa per line",
                ));
            }
        }
    }
    Ok(pairs)
}

/// Ranks taxon pairs by how ultrametric the subtree of their MRCA is,
/// most ultrametric (lowest variance) first.
///
/// # Errors
/// [SimError::LabelNotFound] if a taxon is missing from the tree.
pub fn rank_pairs(tree: &Tree, pairs: &[(String, String)]) -> Result<Vec<PairRanking>> {
    let mut rankings = Vec::with_capacity(pairs.len());
    for (a, b) in pairs {
        let (first, second, mrca) = order_pair(tree, a, b)?;

        let distances: Vec<f64> = tree
            .leaf_distances_from(mrca)
            .into_iter()
            .map(|(_, d)| d)
            .collect();
        let parent_edge = tree
            .parent(second)
            .and_then(|p| tree[p].branch_length())
            .map(|bl| *bl);

        rankings.push(PairRanking {
            first: tree[first].label().unwrap_or_default().to_string(),
            second: tree[second].label().unwrap_or_default().to_string(),
            variance: population_variance(&distances),
            parent_edge,
        });
    }
    rankings.sort_by(|x, y| x.variance.total_cmp(&y.variance));
    Ok(rankings)
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

// =#========================================================================#=
// COALESCENT UNITS
// =#========================================================================#=
/// Configuration of a coalescent-unit estimation run.
#[derive(Debug, Clone)]
pub struct CoalescentUnitConfig {
    binary: String,
    species_tree: PathBuf,
    gene_trees: PathBuf,
    out_dir: PathBuf,
    threads: usize,
}

/// Species tree in coalescent units, with labeled internal vertices.
#[derive(Debug, Clone)]
pub struct CoalescentUnitTree {
    pub tree: Tree,
    /// Labels of the internal non-root vertices, in post-order
    pub internal_labels: Vec<String>,
    /// Path of the relabeled tree, if labeling changed anything
    pub labelled_path: Option<PathBuf>,
}

impl CoalescentUnitConfig {
    pub fn new<P: Into<PathBuf>>(species_tree: P, gene_trees: P, out_dir: P) -> Self {
        CoalescentUnitConfig {
            binary: DEFAULT_CU_BINARY.to_string(),
            species_tree: species_tree.into(),
            gene_trees: gene_trees.into(),
            out_dir: out_dir.into(),
            threads: 8,
        }
    }

    pub fn with_binary<S: Into<String>>(mut self, binary: S) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Runs the estimation binary and labels the resulting tree.
    ///
    /// # Errors
    /// [SimError::ExternalTool] if the binary cannot be started or exits
    /// unsuccessfully; I/O and parsing errors of the produced tree.
    pub fn run(&self) -> Result<CoalescentUnitTree> {
        fs::create_dir_all(&self.out_dir)?;
        let cu_path = self.out_dir.join(CU_TREE_FILE);

        info!("Estimating coalescent-unit species tree with {}", self.binary);
        let status = Command::new(&self.binary)
            .arg("-C")
            .arg("-c")
            .arg(&self.species_tree)
            .arg("-i")
            .arg(&self.gene_trees)
            .arg("-o")
            .arg(&cu_path)
            .arg("-t")
            .arg(self.threads.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SimError::ExternalTool {
                tool: self.binary.clone(),
                reason: match e.kind() {
                    ErrorKind::NotFound => "not found in PATH".to_string(),
                    _ => e.to_string(),
                },
            })?;
        if !status.success() {
            return Err(SimError::ExternalTool {
                tool: self.binary.clone(),
                reason: format!("exited with {status}"),
            });
        }

        let mut tree = newick::parse_str(read_first_line(&cu_path)?)?;
        let labelled_path = if tree.label_internal_vertices(false) {
            None
        } else {
            let path = self.out_dir.join(LABELLED_CU_TREE_FILE);
            fs::write(&path, format!("{}\n", tree.to_newick()))?;
            debug!("Wrote relabeled tree to {}", path.display());
            Some(path)
        };

        let internal_labels = tree
            .internal_non_root()
            .into_iter()
            .filter_map(|v| tree[v].label().map(str::to_string))
            .collect();

        Ok(CoalescentUnitTree {
            tree,
            internal_labels,
            labelled_path,
        })
    }
}
