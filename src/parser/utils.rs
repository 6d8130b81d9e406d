//! Label helpers shared by the Newick reader and writer.

/// Characters that force a label to be written in single quotes.
const SPECIAL_CHARS: &[char] = &[' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Returns whether a label can be written to a Newick string as is.
///
/// # Examples
/// ```
/// # use phylodisc::parser::utils::needs_quoting;
/// assert!(!needs_quoting("Pukeko"));
/// assert!(needs_quoting("Australasian Swamphen"));
/// assert!(needs_quoting("Baillon's_Crake"));
/// ```
pub fn needs_quoting(label: &str) -> bool {
    label.contains(SPECIAL_CHARS)
}

/// Escapes a label for Newick output.
///
/// Labels containing whitespace or Newick punctuation are wrapped in single
/// quotes, with internal single quotes doubled, so that parsing the written
/// string yields the original label again.
///
/// # Examples
/// ```
/// # use phylodisc::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if needs_quoting(label) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

/// Returns whether a label reads as a floating point number, which is how
/// support values are stored on internal vertices. `NaN` does not count.
///
/// # Examples
/// ```
/// # use phylodisc::parser::utils::is_numeric_label;
/// assert!(is_numeric_label("0.95"));
/// assert!(is_numeric_label("100"));
/// assert!(is_numeric_label("1e-3"));
/// assert!(!is_numeric_label("I4"));
/// assert!(!is_numeric_label("nan"));
/// ```
pub fn is_numeric_label(label: &str) -> bool {
    parse_support(label).is_some()
}

/// Parses a label as a support value, ignoring surrounding whitespace.
pub fn parse_support(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
