//! Scoring outlier-detector output against the recorded ground truth.
//!
//! The truth vector marks every locus inside the recorded region; the
//! prediction vector is read from the detector's output file in the
//! format of the chosen [DetectorMethod].

use crate::error::{Result, SimError};
use crate::metadata::SimulationInfo;
use std::fmt;
use std::str::FromStr;

/// Number of loci assumed when the record lacks `gc`.
pub const DEFAULT_GC: usize = 2000;

/// Header of the score line.
pub const SCORE_HEADER: &str = "TN\tFP\tFN\tTP\tMp\tMr";

/// Comment line listing the loci a `phylter` run flagged (1-based).
const OUTLIER_PREFIX: &str = "# Outlier gene(s) detected:";

/// Output format of an outlier detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorMethod {
    /// First non-comment line holds comma separated per-locus 0/1 flags
    Phlag,
    /// A `# Outlier gene(s) detected: i;j;k` comment line
    Phylter,
}

impl FromStr for DetectorMethod {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "phlag" => Ok(DetectorMethod::Phlag),
            "phylter" => Ok(DetectorMethod::Phylter),
            other => Err(SimError::invalid_parameter(
                "method",
                other,
                "expected phlag or phylter",
            )),
        }
    }
}

impl fmt::Display for DetectorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetectorMethod::Phlag => "phlag",
            DetectorMethod::Phylter => "phylter",
        })
    }
}

// =#========================================================================#=
// CONFUSION MATRIX
// =#========================================================================#=
/// Binary confusion matrix, positives being discordant loci.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Confusion {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl Confusion {
    /// Compares predictions to the truth, locus by locus.
    ///
    /// # Errors
    /// [SimError::MalformedDetectorOutput] if the vectors differ in length.
    pub fn compute(truth: &[bool], predicted: &[bool]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(SimError::MalformedDetectorOutput {
                reason: format!(
                    "{} predictions for {} loci",
                    predicted.len(),
                    truth.len()
                ),
            });
        }
        let mut confusion = Confusion::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t, p) {
                (false, false) => confusion.tn += 1,
                (false, true) => confusion.fp += 1,
                (true, false) => confusion.fn_ += 1,
                (true, true) => confusion.tp += 1,
            }
        }
        Ok(confusion)
    }
}

/// Confusion matrix together with the recorded `p` and `r`.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub confusion: Confusion,
    pub p: Option<f64>,
    pub r: Option<f64>,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.confusion;
        write!(f, "{}\t{}\t{}\t{}\t", c.tn, c.fp, c.fn_, c.tp)?;
        write_optional(f, self.p)?;
        f.write_str("\t")?;
        write_optional(f, self.r)
    }
}

fn write_optional(f: &mut fmt::Formatter<'_>, value: Option<f64>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v:?}"),
        None => f.write_str("NA"),
    }
}

// ============================================================================
// Truth & predictions (pub)
// ============================================================================
/// Per-locus truth: `true` inside any recorded interval.
///
/// # Errors
/// [SimError::MalformedInfo] if an interval ends beyond `gc`.
pub fn truth_vector(info: &SimulationInfo) -> Result<Vec<bool>> {
    let gc = info.gc.unwrap_or(DEFAULT_GC);
    let mut truth = vec![false; gc];
    for interval in info.intervals() {
        if interval.end > gc {
            return Err(SimError::MalformedInfo {
                line: 0,
                reason: format!(
                    "interval [{}, {}) exceeds the {gc} recorded loci",
                    interval.start, interval.end
                ),
            });
        }
        for flag in &mut truth[interval.range()] {
            *flag = true;
        }
    }
    Ok(truth)
}

/// Reads per-locus predictions from detector output.
///
/// # Errors
/// [SimError::MalformedDetectorOutput] on unparseable flags or locus
/// indices outside `1..=gc`.
pub fn read_predictions(text: &str, method: DetectorMethod, gc: usize) -> Result<Vec<bool>> {
    match method {
        DetectorMethod::Phlag => read_flags(text, gc),
        DetectorMethod::Phylter => read_outliers(text, gc),
    }
}

/// First non-comment line: comma separated integers, non-zero = flagged.
fn read_flags(text: &str, gc: usize) -> Result<Vec<bool>> {
    let Some(line) = text.lines().find(|l| !l.starts_with('#')) else {
        return Ok(vec![false; gc]);
    };

    line.trim()
        .split(',')
        .map(|flag| {
            flag.trim()
                .parse::<i64>()
                .map(|v| v != 0)
                .map_err(|_| SimError::MalformedDetectorOutput {
                    reason: format!("'{}' is not a 0/1 flag", flag.trim()),
                })
        })
        .collect()
}

/// Outlier comment line among the leading comments, 1-based and `;` separated.
fn read_outliers(text: &str, gc: usize) -> Result<Vec<bool>> {
    let mut predicted = vec![false; gc];

    for line in text.lines().take_while(|l| l.starts_with('#')) {
        let Some(list) = line.strip_prefix(OUTLIER_PREFIX) else {
            continue;
        };
        for item in list.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let locus: usize = item.parse().map_err(|_| SimError::MalformedDetectorOutput {
                reason: format!("'{item}' is not a locus number"),
            })?;
            if locus == 0 || locus > gc {
                return Err(SimError::MalformedDetectorOutput {
                    reason: format!("locus {locus} outside 1..={gc}"),
                });
            }
            predicted[locus - 1] = true;
        }
    }

    Ok(predicted)
}

/// Scores detector output against a ground-truth record.
///
/// # Example
/// ```
/// use phylodisc::metadata::SimulationInfo;
/// use phylodisc::score::{score, DetectorMethod};
///
/// let info: SimulationInfo = "type: recombination_suppression\nstart: 1\nend: 3\ngc: 5\np: 0.4\n".parse().unwrap();
/// let result = score("# Outlier gene(s) detected: 2;5\n", &info, DetectorMethod::Phylter).unwrap();
/// assert_eq!(result.to_string(), "2\t1\t1\t1\t0.4\tNA");
/// ```
pub fn score(detector_output: &str, info: &SimulationInfo, method: DetectorMethod) -> Result<Score> {
    let truth = truth_vector(info)?;
    let predicted = read_predictions(detector_output, method, truth.len())?;
    Ok(Score {
        confusion: Confusion::compute(&truth, &predicted)?,
        p: info.p,
        r: info.r,
    })
}
