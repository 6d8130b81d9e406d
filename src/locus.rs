//! Ordered gene-tree files: one Newick string per line, line = locus.

use crate::error::{Result, SimError};
use crate::model::tree::Tree;
use crate::newick;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// File name of the emitted gene trees in an output directory.
pub const EMISSION_FILE: &str = "emission.gtrees";

/// File name of the ground-truth record in an output directory.
pub const INFO_FILE: &str = "info.txt";

/// Gene trees in locus order, stored as Newick strings without line breaks.
///
/// Only loci selected by an event are ever parsed; all other lines are
/// written back exactly as read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocusSequence {
    loci: Vec<String>,
}

impl LocusSequence {
    pub fn new(loci: Vec<String>) -> Self {
        LocusSequence { loci }
    }

    /// Reads a gene-tree file, one locus per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let loci = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        debug!("Read {} loci from {}", loci.len(), path.display());
        Ok(LocusSequence { loci })
    }

    /// Writes all loci, one per line, creating (or truncating) the file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for locus in &self.loci {
            writer.write_all(locus.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Number of loci (`gc`).
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Returns the Newick string of locus `index`.
    pub fn get(&self, index: usize) -> Result<&str> {
        self.loci
            .get(index)
            .map(String::as_str)
            .ok_or(SimError::LocusOutOfRange {
                index,
                count: self.loci.len(),
            })
    }

    /// Replaces the Newick string of locus `index`.
    pub fn set(&mut self, index: usize, newick: String) -> Result<()> {
        let count = self.loci.len();
        let slot = self
            .loci
            .get_mut(index)
            .ok_or(SimError::LocusOutOfRange { index, count })?;
        *slot = newick;
        Ok(())
    }

    /// Parses the tree of locus `index`.
    pub fn parse_tree(&self, index: usize) -> Result<Tree> {
        Ok(newick::parse_str(self.get(index)?)?)
    }

    /// Replaces locus `index` with the Newick string of `tree`.
    pub fn set_tree(&mut self, index: usize, tree: &Tree) -> Result<()> {
        self.set(index, tree.to_newick())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.loci.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for LocusSequence {
    fn from(loci: Vec<String>) -> Self {
        LocusSequence::new(loci)
    }
}

/// Reads the first non-empty line of a file.
pub fn read_first_line<P: AsRef<Path>>(path: P) -> Result<String> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line.trim().to_string());
        }
    }
    Ok(String::new())
}
