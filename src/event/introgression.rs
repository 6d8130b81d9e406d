//! Introgression as a label exchange between two taxa.

use crate::error::Result;
use crate::interval::DiscordantRegion;
use crate::locus::LocusSequence;
use crate::model::tree::Tree;
use log::debug;

/// Exchanges the labels of the vertices labeled `recipient` and `donor`.
///
/// Both vertices are looked up before any label changes, the recipient
/// first, so a failed lookup leaves the tree untouched. Swapping twice
/// restores the original labels.
///
/// # Errors
/// [SimError::LabelNotFound](crate::error::SimError::LabelNotFound) naming
/// the first missing label.
///
/// # Example
/// ```
/// use phylodisc::event::swap_taxa;
/// use phylodisc::parse_newick_str;
///
/// let mut tree = parse_newick_str("((A,B),C);").unwrap();
/// swap_taxa(&mut tree, "A", "C").unwrap();
/// assert_eq!(tree.to_newick(), "((C,B),A);");
/// ```
pub fn swap_taxa(tree: &mut Tree, recipient: &str, donor: &str) -> Result<()> {
    let recipient_index = tree.find_by_label(recipient)?;
    let donor_index = tree.find_by_label(donor)?;
    tree.set_label(recipient_index, Some(donor.to_string()));
    tree.set_label(donor_index, Some(recipient.to_string()));
    Ok(())
}

/// Swaps `recipient` and `donor` in every locus of every interval of `region`.
///
/// # Errors
/// Parsing errors of a selected locus, or a missing label in one of them.
pub fn simulate_introgression(
    loci: &mut LocusSequence,
    region: &DiscordantRegion,
    recipient: &str,
    donor: &str,
) -> Result<()> {
    for index in region.indices() {
        let mut tree = loci.parse_tree(index)?;
        swap_taxa(&mut tree, recipient, donor)?;
        loci.set_tree(index, &tree)?;
    }
    debug!(
        "Swapped {} and {} in {} loci",
        recipient,
        donor,
        region.total_size()
    );
    Ok(())
}
