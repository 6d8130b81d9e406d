use phylodisc::species::{CoalescentUnitConfig, read_pairs, rank_pairs, read_species_tree, target_clade};
use phylodisc::{SimError, parse_newick_str};
use std::io::Cursor;

const SPECIES: &str = "((A:1,B:1):1,(C:1,D:3):1);";

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
}

#[test]
fn test_target_clade_recipient_parent() {
    // Labels: (B,C) -> I0, (A,(B,C)) -> I1, root -> I2
    let mut tree = parse_newick_str("((A,(B,C)),D);").unwrap();
    assert_eq!(target_clade(&mut tree, "A", "B").unwrap(), "I0");
}

#[test]
fn test_target_clade_donor_parent() {
    let mut tree = parse_newick_str("((A,(B,C)),D);").unwrap();
    // B is not directly below MRCA(B, A), so A must be
    assert_eq!(target_clade(&mut tree, "B", "A").unwrap(), "I0");
    assert_eq!(target_clade(&mut tree, "D", "C").unwrap(), "I0");
    assert_eq!(target_clade(&mut tree, "A", "D").unwrap(), "I1");
}

#[test]
fn test_target_clade_keeps_existing_labels() {
    let mut tree = parse_newick_str("((A,B)AB,(C,D)CD)root;").unwrap();
    assert_eq!(target_clade(&mut tree, "A", "C").unwrap(), "AB");
}

#[test]
fn test_target_clade_missing_taxon() {
    let mut tree = parse_newick_str("((A,B),C);").unwrap();
    match target_clade(&mut tree, "A", "Z") {
        Err(SimError::LabelNotFound { label }) => assert_eq!(label, "Z"),
        other => panic!("expected LabelNotFound, got {other:?}"),
    }
}

#[test]
fn test_rank_pairs_by_variance() {
    let tree = parse_newick_str(SPECIES).unwrap();
    let rankings = rank_pairs(&tree, &pairs(&[("C", "D"), ("A", "C"), ("A", "B")])).unwrap();

    let order: Vec<(&str, &str)> = rankings
        .iter()
        .map(|r| (r.first.as_str(), r.second.as_str()))
        .collect();
    assert_eq!(order, vec![("A", "B"), ("C", "A"), ("C", "D")]);

    assert_eq!(rankings[0].variance, 0.0);
    assert!((rankings[1].variance - 0.75).abs() < 1e-12);
    assert!((rankings[2].variance - 1.0).abs() < 1e-12);
    assert_eq!(rankings[0].parent_edge, Some(1.0));
    assert_eq!(rankings[0].to_string(), "A\tB\t0\t1");
}

#[test]
fn test_rank_pairs_without_parent_edge() {
    let tree = parse_newick_str("(A:1,B:2);").unwrap();
    let rankings = rank_pairs(&tree, &pairs(&[("A", "B")])).unwrap();
    assert_eq!(rankings[0].parent_edge, None);
    assert_eq!(rankings[0].to_string(), "A\tB\t0.25\tNA");
}

#[test]
fn test_rank_pairs_missing_taxon() {
    let tree = parse_newick_str(SPECIES).unwrap();
    assert!(matches!(
        rank_pairs(&tree, &pairs(&[("A", "X")])),
        Err(SimError::LabelNotFound { .. })
    ));
}

#[test]
fn test_read_pairs_skips_header() {
    let input = "taxon1\ttaxon2\nA\tB\n\nC D\n";
    assert_eq!(
        read_pairs(Cursor::new(input)).unwrap(),
        pairs(&[("A", "B"), ("C", "D")])
    );
    assert!(read_pairs(Cursor::new("header\nA B C\n")).is_err());
}

#[test]
fn test_read_species_tree_from_file_or_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("species.tree");
    std::fs::write(&path, format!("\n{SPECIES}\n")).unwrap();

    let from_file = read_species_tree(path.to_str().unwrap()).unwrap();
    let from_string = read_species_tree(SPECIES).unwrap();
    assert_eq!(from_file.num_leaves(), 4);
    assert_eq!(from_file.to_newick(), from_string.to_newick());
}

#[test]
fn test_coalescent_units_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoalescentUnitConfig::new(
        dir.path().join("species.tree"),
        dir.path().join("genes.trees"),
        dir.path().join("out"),
    )
    .with_binary("phylodisc-no-such-estimator")
    .with_threads(1);

    match config.run() {
        Err(SimError::ExternalTool { tool, .. }) => assert_eq!(tool, "phylodisc-no-such-estimator"),
        other => panic!("expected ExternalTool, got {other:?}"),
    }
}

#[test]
fn test_read_species_tree_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("species.tree");
    match read_species_tree(path.to_str().unwrap()) {
        Err(SimError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io error, got {other:?}"),
    }

    assert!(matches!(
        read_species_tree("((A,B),C"),
        Err(SimError::Parsing(_))
    ));
    assert_eq!(read_species_tree(" A; ").unwrap().num_leaves(), 1);
}
