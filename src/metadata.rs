//! Ground-truth record of a simulated event (`info.txt`).
//!
//! The record is a flat block of `key: value` lines. Numbers are written
//! plainly, lists as `[a, b, c]` and strings verbatim:
//!
//! ```text
//! type: separate_blocks
//! start: [12, 57]
//! end: [20, 65]
//! gc: 100
//! gene_trees: data/gene.trees
//! p: 0.16
//! b: 1
//! donor: B
//! recipient: A
//! clade: I2
//! ```
//!
//! [SimulationInfo::from_str] reads such a block back strictly: every key
//! must be known and appear at most once, and every value must parse into
//! its field type.

use crate::error::{Result, SimError};
use crate::event::SuppressionOption;
use crate::interval::{DiscordantRegion, Interval};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// =#========================================================================#=
// EVENT KIND & BOUNDS
// =#========================================================================#=
/// Type tag of a simulated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Introgression spread over one or more blocks
    SeparateBlocks,
    /// Recombination suppression over a contiguous region
    RecombinationSuppression,
    /// Mixture of default and discordant gene trees over a contiguous region
    SingleIndependent,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SeparateBlocks => "separate_blocks",
            EventKind::RecombinationSuppression => "recombination_suppression",
            EventKind::SingleIndependent => "single_independent",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "separate_blocks" => Some(EventKind::SeparateBlocks),
            "recombination_suppression" => Some(EventKind::RecombinationSuppression),
            "single_independent" => Some(EventKind::SingleIndependent),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval bounds as recorded: a single pair or zipped start/end lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bounds {
    Single { start: usize, end: usize },
    Blocks { starts: Vec<usize>, ends: Vec<usize> },
}

impl Bounds {
    /// Bounds of a region, as lists whenever `as_blocks` is set.
    pub fn from_region(region: &DiscordantRegion, as_blocks: bool) -> Self {
        match region.intervals() {
            [interval] if !as_blocks => Bounds::Single {
                start: interval.start,
                end: interval.end,
            },
            _ => Bounds::Blocks {
                starts: region.starts(),
                ends: region.ends(),
            },
        }
    }

    /// The recorded intervals.
    pub fn intervals(&self) -> Vec<Interval> {
        match self {
            Bounds::Single { start, end } => vec![Interval::new(*start, *end)],
            Bounds::Blocks { starts, ends } => starts
                .iter()
                .zip(ends)
                .map(|(&s, &e)| Interval::new(s, e))
                .collect(),
        }
    }
}

// =#========================================================================#=
// SIMULATION INFO
// =#========================================================================#=
/// Typed ground truth of one run.
///
/// # Construction
/// Start from [`SimulationInfo::new`] and add the keys of the event with
/// the `with_*` methods.
///
/// # Example
/// ```
/// use phylodisc::metadata::{Bounds, EventKind, SimulationInfo};
///
/// let info = SimulationInfo::new(EventKind::RecombinationSuppression, Bounds::Single { start: 5, end: 25 })
///     .with_gc(100)
///     .with_p(0.2)
///     .with_r(1.0)
///     .with_v(vec![]);
/// let text = info.to_string();
/// assert!(text.contains("start: 5\nend: 25\n"));
/// assert_eq!(text.parse::<SimulationInfo>().unwrap(), info);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInfo {
    pub kind: EventKind,
    pub bounds: Bounds,
    pub gc: Option<usize>,
    pub gene_trees: Option<String>,
    pub default_gtrees: Option<String>,
    pub discordant_gtrees: Option<String>,
    pub p: Option<f64>,
    pub r: Option<f64>,
    pub b: Option<u32>,
    pub v: Option<Vec<usize>>,
    pub donor: Option<String>,
    pub recipient: Option<String>,
    pub clade: Option<String>,
    pub option: Option<SuppressionOption>,
}

// ============================================================================
// Construction (pub)
// ============================================================================
impl SimulationInfo {
    pub fn new(kind: EventKind, bounds: Bounds) -> Self {
        SimulationInfo {
            kind,
            bounds,
            gc: None,
            gene_trees: None,
            default_gtrees: None,
            discordant_gtrees: None,
            p: None,
            r: None,
            b: None,
            v: None,
            donor: None,
            recipient: None,
            clade: None,
            option: None,
        }
    }

    pub fn with_gc(mut self, gc: usize) -> Self {
        self.gc = Some(gc);
        self
    }

    pub fn with_gene_trees<S: Into<String>>(mut self, path: S) -> Self {
        self.gene_trees = Some(path.into());
        self
    }

    pub fn with_default_gtrees<S: Into<String>>(mut self, path: S) -> Self {
        self.default_gtrees = Some(path.into());
        self
    }

    pub fn with_discordant_gtrees<S: Into<String>>(mut self, path: S) -> Self {
        self.discordant_gtrees = Some(path.into());
        self
    }

    pub fn with_p(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    pub fn with_r(mut self, r: f64) -> Self {
        self.r = Some(r);
        self
    }

    pub fn with_b(mut self, b: u32) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_v(mut self, v: Vec<usize>) -> Self {
        self.v = Some(v);
        self
    }

    pub fn with_taxa<S: Into<String>>(mut self, donor: S, recipient: S) -> Self {
        self.donor = Some(donor.into());
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_clade<S: Into<String>>(mut self, clade: S) -> Self {
        self.clade = Some(clade.into());
        self
    }

    pub fn with_option(mut self, option: SuppressionOption) -> Self {
        self.option = Some(option);
        self
    }
}

// ============================================================================
// Reading & Writing (pub)
// ============================================================================
impl SimulationInfo {
    /// Reads and strictly parses an `info.txt`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Writes the record, creating (or truncating) the file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// The recorded intervals.
    pub fn intervals(&self) -> Vec<Interval> {
        self.bounds.intervals()
    }
}

impl fmt::Display for SimulationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type: {}", self.kind)?;
        match &self.bounds {
            Bounds::Single { start, end } => {
                writeln!(f, "start: {start}")?;
                writeln!(f, "end: {end}")?;
            }
            Bounds::Blocks { starts, ends } => {
                writeln!(f, "start: {}", format_list(starts))?;
                writeln!(f, "end: {}", format_list(ends))?;
            }
        }
        if let Some(gc) = self.gc {
            writeln!(f, "gc: {gc}")?;
        }
        for (key, value) in [
            ("gene_trees", &self.gene_trees),
            ("default_gtrees", &self.default_gtrees),
            ("discordant_gtrees", &self.discordant_gtrees),
        ] {
            if let Some(value) = value {
                writeln!(f, "{key}: {value}")?;
            }
        }
        if let Some(p) = self.p {
            writeln!(f, "p: {p:?}")?;
        }
        if let Some(r) = self.r {
            writeln!(f, "r: {r:?}")?;
        }
        if let Some(b) = self.b {
            writeln!(f, "b: {b}")?;
        }
        if let Some(v) = &self.v {
            writeln!(f, "v: {}", format_list(v))?;
        }
        for (key, value) in [
            ("donor", &self.donor),
            ("recipient", &self.recipient),
            ("clade", &self.clade),
        ] {
            if let Some(value) = value {
                writeln!(f, "{key}: {value}")?;
            }
        }
        if let Some(option) = self.option {
            writeln!(f, "option: {option}")?;
        }
        Ok(())
    }
}

fn format_list(values: &[usize]) -> String {
    let items: Vec<String> = values.iter().map(usize::to_string).collect();
    format!("[{}]", items.join(", "))
}

// ============================================================================
// Strict parsing
// ============================================================================
/// Integer or list of integers, as `start`/`end` may be either.
enum IndexValue {
    One(usize),
    Many(Vec<usize>),
}

impl FromStr for SimulationInfo {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let mut kind = None;
        let mut start: Option<(usize, IndexValue)> = None;
        let mut end: Option<(usize, IndexValue)> = None;
        let mut info = SimulationInfo::new(EventKind::SeparateBlocks, Bounds::Single { start: 0, end: 0 });
        let mut seen: Vec<String> = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = i + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let malformed = |reason: String| SimError::MalformedInfo { line, reason };

            let (key, value) = raw
                .split_once(':')
                .ok_or_else(|| malformed(format!("expected 'key: value', got '{}'", raw.trim())))?;
            let key = key.trim();
            let value = value.trim();

            if seen.iter().any(|k| k == key) {
                return Err(malformed(format!("duplicate key '{key}'")));
            }
            seen.push(key.to_string());

            match key {
                "type" => {
                    kind = Some(
                        EventKind::parse(value)
                            .ok_or_else(|| malformed(format!("unknown event type '{value}'")))?,
                    );
                }
                "start" => start = Some((line, parse_index_value(value).map_err(malformed)?)),
                "end" => end = Some((line, parse_index_value(value).map_err(malformed)?)),
                "gc" => info.gc = Some(parse_number(value).map_err(malformed)?),
                "gene_trees" => info.gene_trees = Some(value.to_string()),
                "default_gtrees" => info.default_gtrees = Some(value.to_string()),
                "discordant_gtrees" => info.discordant_gtrees = Some(value.to_string()),
                "p" => info.p = Some(parse_number(value).map_err(malformed)?),
                "r" => info.r = Some(parse_number(value).map_err(malformed)?),
                "b" => info.b = Some(parse_number(value).map_err(malformed)?),
                "v" => info.v = Some(parse_list(value).map_err(malformed)?),
                "donor" => info.donor = Some(value.to_string()),
                "recipient" => info.recipient = Some(value.to_string()),
                "clade" => info.clade = Some(value.to_string()),
                "option" => {
                    info.option = Some(value.parse().map_err(|_| malformed(format!("unknown option '{value}'")))?)
                }
                _ => return Err(malformed(format!("unknown key '{key}'"))),
            }
        }

        info.kind = kind.ok_or(SimError::MissingInfoKey { key: "type" })?;
        let (_, start) = start.ok_or(SimError::MissingInfoKey { key: "start" })?;
        let (end_line, end) = end.ok_or(SimError::MissingInfoKey { key: "end" })?;
        let mismatch = |reason: &str| SimError::MalformedInfo {
            line: end_line,
            reason: reason.to_string(),
        };

        info.bounds = match (start, end) {
            (IndexValue::One(start), IndexValue::One(end)) if start <= end => Bounds::Single { start, end },
            (IndexValue::Many(starts), IndexValue::Many(ends)) if starts.len() == ends.len() => {
                if starts.iter().zip(&ends).any(|(s, e)| s > e) {
                    return Err(mismatch("an interval ends before it starts"));
                }
                Bounds::Blocks { starts, ends }
            }
            (IndexValue::One(_), IndexValue::One(_)) => return Err(mismatch("end before start")),
            _ => return Err(mismatch("start and end do not match in shape")),
        };

        Ok(info)
    }
}

fn parse_number<T: FromStr>(value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid {}", std::any::type_name::<T>()))
}

/// Parses `[a, b]` or `(a, b)`; a trailing comma is accepted.
fn parse_list(value: &str) -> std::result::Result<Vec<usize>, String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .or_else(|| value.strip_prefix('(').and_then(|v| v.strip_suffix(')')))
        .ok_or_else(|| format!("'{value}' is not a list"))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_number)
        .collect()
}

fn parse_index_value(value: &str) -> std::result::Result<IndexValue, String> {
    if value.starts_with('[') || value.starts_with('(') {
        parse_list(value).map(IndexValue::Many)
    } else {
        parse_number(value).map(IndexValue::One)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_accept_brackets_and_parentheses() {
        assert_eq!(parse_list("[1, 2, 3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_list("(4, 5)").unwrap(), vec![4, 5]);
        assert_eq!(parse_list("(7,)").unwrap(), vec![7]);
        assert_eq!(parse_list("[]").unwrap(), Vec::<usize>::new());
        assert!(parse_list("1, 2").is_err());
        assert!(parse_list("[1, x]").is_err());
    }

    #[test]
    fn index_value_distinguishes_single_and_list() {
        assert!(matches!(parse_index_value("12"), Ok(IndexValue::One(12))));
        assert!(matches!(parse_index_value("[12]"), Ok(IndexValue::Many(ref v)) if v == &[12]));
    }
}
