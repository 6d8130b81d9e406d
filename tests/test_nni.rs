use phylodisc::SimError;
use phylodisc::model::tree::Tree;
use phylodisc::nni::{is_eligible, nni, nni_with, random_eligible_vertex};
use phylodisc::parse_newick_str;
use rand::SeedableRng;
use rand::rngs::StdRng;

const CATERPILLAR: &str = "((((A:1,B:1)X:1,C:2)Y:1,D:3)Z:1,E:4)R;";

fn sorted_leaves(tree: &Tree) -> Vec<String> {
    let mut leaves: Vec<String> = tree.leaf_labels().into_iter().map(String::from).collect();
    leaves.sort();
    leaves
}

#[test]
fn test_nni_with_swaps_child_and_sibling() {
    let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let a = tree.find_by_label("A").unwrap();
    let c = tree.find_by_label("C").unwrap();

    assert_eq!(nni_with(&mut tree, x, a, c).unwrap(), x);
    assert!(tree.is_valid());
    assert_eq!(tree.to_newick(), "((C,B)X,A)R;");
    assert_eq!(tree.parent(c), Some(x));
    assert_eq!(tree.parent(a), Some(tree.root_index()));
}

#[test]
fn test_nni_is_self_inverse() {
    let original = parse_newick_str(CATERPILLAR).unwrap();
    for label in ["X", "Y", "Z"] {
        let mut tree = original.clone();
        let nd = tree.find_by_label(label).unwrap();
        let parent = tree.parent(nd).unwrap();
        let sibling = *tree.children(parent).iter().find(|&&v| v != nd).unwrap();
        for &child in original.children(nd) {
            nni_with(&mut tree, nd, child, sibling).unwrap();
            assert_ne!(tree.to_newick(), original.to_newick());
            nni_with(&mut tree, nd, sibling, child).unwrap();
            assert_eq!(tree.to_newick(), original.to_newick());
        }
    }
}

#[test]
fn test_nni_preserves_leaves_and_vertex_count() {
    let original = parse_newick_str(CATERPILLAR).unwrap();
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = original.clone();
        for _ in 0..10 {
            let nd = random_eligible_vertex(&tree, &mut rng).unwrap();
            nni(&mut tree, nd, &mut rng).unwrap();
            assert!(tree.is_valid());
            assert_eq!(tree.num_vertices(), original.num_vertices());
            assert_eq!(sorted_leaves(&tree), sorted_leaves(&original));
        }
    }
}

#[test]
fn test_nni_only_changes_subtree_of_parent() {
    let mut tree = parse_newick_str("(((A,B)X,C)Y,(D,E)Z)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    nni(&mut tree, x, &mut rng).unwrap();
    let newick = tree.to_newick();
    assert!(newick.ends_with(",(D,E)Z)R;"), "{newick}");
}

#[test]
fn test_nni_with_multifurcating_parent() {
    let original = parse_newick_str("((A,B)X,C,D)R;").unwrap();
    let mut moved = std::collections::HashSet::new();
    for seed in 0..100 {
        let mut tree = original.clone();
        let x = tree.find_by_label("X").unwrap();
        nni(&mut tree, x, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert!(tree.is_valid());
        for label in ["C", "D"] {
            let v = tree.find_by_label(label).unwrap();
            if tree.parent(v) == Some(x) {
                moved.insert(label);
            }
        }
    }
    // Both siblings get picked eventually
    assert_eq!(moved.len(), 2);
}

#[test]
fn test_ineligible_vertices() {
    let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let r = tree.root_index();
    let a = tree.find_by_label("A").unwrap();
    let x = tree.find_by_label("X").unwrap();

    assert!(!is_eligible(&tree, r));
    assert!(!is_eligible(&tree, a));
    assert!(is_eligible(&tree, x));
    assert!(matches!(nni(&mut tree, r, &mut rng), Err(SimError::IneligibleVertex { .. })));
    assert!(matches!(nni(&mut tree, a, &mut rng), Err(SimError::IneligibleVertex { .. })));
    // B is not a sibling of X
    let b = tree.find_by_label("B").unwrap();
    assert!(nni_with(&mut tree, x, a, b).is_err());
}

#[test]
fn test_single_child_parent_is_ineligible() {
    let tree = parse_newick_str("(((A,B)X)Y,C)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let y = tree.find_by_label("Y").unwrap();
    assert!(!is_eligible(&tree, x));
    assert!(is_eligible(&tree, y));
}

#[test]
fn test_random_eligible_vertex() {
    let star = parse_newick_str("(A,B,C,D);").unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(random_eligible_vertex(&star, &mut rng), None);

    let tree = parse_newick_str(CATERPILLAR).unwrap();
    let mut picked = std::collections::HashSet::new();
    for _ in 0..200 {
        let nd = random_eligible_vertex(&tree, &mut rng).unwrap();
        assert!(is_eligible(&tree, nd));
        picked.insert(nd);
    }
    assert_eq!(picked.len(), 3);
}
