use phylodisc::SimError;
use phylodisc::event::SuppressionOption;
use phylodisc::interval::{DiscordantRegion, Interval};
use phylodisc::metadata::{Bounds, EventKind, SimulationInfo};

#[test]
fn test_write_separate_blocks() {
    let region = DiscordantRegion::new(vec![Interval::new(12, 20), Interval::new(57, 65)]);
    let info = SimulationInfo::new(EventKind::SeparateBlocks, Bounds::from_region(&region, true))
        .with_gc(100)
        .with_gene_trees("data/gene.trees")
        .with_p(0.16)
        .with_b(1)
        .with_taxa("B", "A")
        .with_clade("I2");

    assert_eq!(
        info.to_string(),
        "type: separate_blocks\n\
         start: [12, 57]\n\
         end: [20, 65]\n\
         gc: 100\n\
         gene_trees: data/gene.trees\n\
         p: 0.16\n\
         b: 1\n\
         donor: B\n\
         recipient: A\n\
         clade: I2\n"
    );
    assert_eq!(info.to_string().parse::<SimulationInfo>().unwrap(), info);
}

#[test]
fn test_single_block_stays_a_list() {
    let region = DiscordantRegion::single(Interval::new(3, 9));
    assert_eq!(
        Bounds::from_region(&region, true),
        Bounds::Blocks {
            starts: vec![3],
            ends: vec![9]
        }
    );
    assert_eq!(Bounds::from_region(&region, false), Bounds::Single { start: 3, end: 9 });
}

#[test]
fn test_write_suppression() {
    let info = SimulationInfo::new(EventKind::RecombinationSuppression, Bounds::Single { start: 31, end: 51 })
        .with_gc(100)
        .with_gene_trees("g.trees")
        .with_p(0.2)
        .with_r(1.0)
        .with_v(vec![33, 40])
        .with_option(SuppressionOption::Random);
    let text = info.to_string();
    assert!(text.contains("start: 31\nend: 51\n"));
    assert!(text.contains("r: 1.0\nv: [33, 40]\noption: random\n"));
    assert_eq!(text.parse::<SimulationInfo>().unwrap(), info);
}

#[test]
fn test_read_python_style_tuples() {
    let text = "type: separate_blocks\nstart: (4, 30)\nend: (10, 36)\ngc: 50\np: 0.2\nb: 2\nclade: I3";
    let info: SimulationInfo = text.parse().unwrap();
    assert_eq!(
        info.intervals(),
        vec![Interval::new(4, 10), Interval::new(30, 36)]
    );
    assert_eq!(info.b, Some(2));
    assert_eq!(info.clade.as_deref(), Some("I3"));
    assert_eq!(info.r, None);
}

#[test]
fn test_path_with_colon() {
    let text = "type: single_independent\nstart: 1\nend: 5\ndefault_gtrees: C:/data/d.trees\n";
    let info: SimulationInfo = text.parse().unwrap();
    assert_eq!(info.default_gtrees.as_deref(), Some("C:/data/d.trees"));
}

#[test]
fn test_unknown_key_is_rejected() {
    let text = "type: separate_blocks\nstart: 1\nend: 5\ncolour: blue\n";
    match text.parse::<SimulationInfo>() {
        Err(SimError::MalformedInfo { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected MalformedInfo, got {other:?}"),
    }
}

#[test]
fn test_duplicate_key_is_rejected() {
    let text = "type: separate_blocks\nstart: 1\nstart: 2\nend: 5\n";
    assert!(matches!(
        text.parse::<SimulationInfo>(),
        Err(SimError::MalformedInfo { line: 3, .. })
    ));
}

#[test]
fn test_malformed_values_are_rejected() {
    for text in [
        "type: separate_blocks\nstart: one\nend: 5\n",
        "type: separate_blocks\nstart: 1\nend: 5\np: high\n",
        "type: separate_blocks\nstart: 1\nend: 5\nv: 1, 2\n",
        "type: introgression\nstart: 1\nend: 5\n",
        "type: separate_blocks\nstart: 1\nend: 5\noption: sometimes\n",
        "type: separate_blocks\nno separator here\n",
        "type: separate_blocks\nstart: [1, 2]\nend: 5\n",
        "type: separate_blocks\nstart: [1, 2]\nend: [5]\n",
        "type: separate_blocks\nstart: 6\nend: 5\n",
    ] {
        assert!(
            matches!(text.parse::<SimulationInfo>(), Err(SimError::MalformedInfo { .. })),
            "accepted {text:?}"
        );
    }
}

#[test]
fn test_missing_required_keys() {
    assert!(matches!(
        "start: 1\nend: 5\n".parse::<SimulationInfo>(),
        Err(SimError::MissingInfoKey { key: "type" })
    ));
    assert!(matches!(
        "type: separate_blocks\nstart: 1\n".parse::<SimulationInfo>(),
        Err(SimError::MissingInfoKey { key: "end" })
    ));
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("info.txt");
    let info = SimulationInfo::new(EventKind::SingleIndependent, Bounds::Single { start: 2, end: 8 })
        .with_default_gtrees("d.trees")
        .with_discordant_gtrees("x.trees")
        .with_p(0.3)
        .with_r(0.5)
        .with_v(vec![3, 4, 6]);
    info.write_to(&path).unwrap();
    assert_eq!(SimulationInfo::from_file(&path).unwrap(), info);
}
