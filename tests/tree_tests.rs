use phylodisc::model::tree::Tree;
use phylodisc::model::vertex::BranchLength;
use phylodisc::parse_newick_str;
use phylodisc::parser::utils::is_numeric_label;
use phylodisc::SimError;
use std::collections::HashSet;

#[test]
fn test_building_tree() {
    let mut tree = Tree::with_capacity(5);
    let index_l1 = tree.add_leaf("A", Some(BranchLength::new(1.0)));
    let index_l2 = tree.add_leaf("B", Some(BranchLength::new(1.0)));
    let index_l3 = tree.add_leaf("C", Some(BranchLength::new(0.5)));
    let index_i1 = tree.add_internal_vertex(vec![index_l1, index_l2], None, Some(BranchLength::new(1.5)));
    let index_root = tree.add_root(vec![index_l3, index_i1], None, None);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Root
    let root = tree.root();
    assert_eq!(root.index(), index_root);
    assert!(root.is_root());
    assert!(!root.is_internal());

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.label(), Some("B"));
    assert_eq!(l2.parent(), Some(index_i1));

    // Internal
    let inti = &tree[index_i1];
    assert!(inti.is_internal());
    assert_eq!(inti.branch_length().unwrap(), BranchLength::new(1.5));
    assert_eq!(inti.children(), &[index_l1, index_l2]);
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new();
    tree.root(); // Should panic
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new();
    let _ = &tree[55];
}

#[test]
#[should_panic]
fn test_negative_branch_length() {
    let _ = BranchLength::new(-1.0);
}

#[test]
fn test_try_new_branch_length() {
    assert!(BranchLength::try_new(0.0).is_some());
    assert!(BranchLength::try_new(-0.1).is_none());
    assert!(BranchLength::try_new(f64::INFINITY).is_none());
}

// ============= Lookup Tests =============

#[test]
fn test_find_by_label() {
    let tree = parse_newick_str("((A,B)X,C);").unwrap();
    let x = tree.find_by_label("X").unwrap();
    assert!(tree[x].is_internal());

    match tree.find_by_label("Kakapo") {
        Err(SimError::LabelNotFound { label }) => assert_eq!(label, "Kakapo"),
        other => panic!("expected LabelNotFound, got {other:?}"),
    }
}

#[test]
fn test_mrca() {
    let tree = parse_newick_str("(((A,B)X,C)Y,(D,E)Z)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let y = tree.find_by_label("Y").unwrap();
    assert_eq!(tree.mrca("A", "B").unwrap(), x);
    assert_eq!(tree.mrca("A", "C").unwrap(), y);
    assert_eq!(tree.mrca("B", "E").unwrap(), tree.root_index());
    assert_eq!(tree.mrca("A", "A").unwrap(), tree.find_by_label("A").unwrap());
    assert!(tree.mrca("A", "Q").is_err());
}

#[test]
fn test_leaf_distances_from() {
    let tree = parse_newick_str("((A:1,B:2)X:5,C:4);").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let distances: Vec<f64> = tree.leaf_distances_from(x).into_iter().map(|(_, d)| d).collect();
    assert_eq!(distances, vec![1.0, 2.0]);

    let from_root: Vec<f64> = tree
        .leaf_distances_from(tree.root_index())
        .into_iter()
        .map(|(_, d)| d)
        .collect();
    assert_eq!(from_root, vec![6.0, 7.0, 4.0]);
}

// ============= Traversal Tests =============

#[test]
fn test_post_and_pre_order() {
    let tree = parse_newick_str("((A,B)X,(C,D,E)Y)R;").unwrap();
    let post: Vec<&str> = tree.post_order_iter().filter_map(|v| v.label()).collect();
    assert_eq!(post, vec!["A", "B", "X", "C", "D", "E", "Y", "R"]);

    let pre: Vec<&str> = tree.pre_order_iter().filter_map(|v| v.label()).collect();
    assert_eq!(pre, vec!["R", "X", "A", "B", "Y", "C", "D", "E"]);

    assert_eq!(tree.leaf_labels(), vec!["A", "B", "C", "D", "E"]);
    let internal: Vec<&str> = tree
        .internal_non_root()
        .into_iter()
        .filter_map(|v| tree[v].label())
        .collect();
    assert_eq!(internal, vec!["X", "Y"]);
}

// ============= Mutation & Validity Tests =============

#[test]
fn test_detached_vertex_is_invalid() {
    let mut tree = parse_newick_str("((A,B)X,C);").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let a = tree.find_by_label("A").unwrap();
    assert!(tree.remove_child(x, a));
    assert!(!tree.is_valid());

    tree.add_child(x, a);
    assert!(tree.is_valid());
    assert!(!tree.remove_child(tree.root_index(), a));
}

#[test]
fn test_cycle_is_invalid() {
    let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let r = tree.root_index();
    // Hang the root below X
    tree.remove_child(r, x);
    tree.add_child(x, r);
    assert!(!tree.is_valid());
}

#[test]
fn test_replace_child_keeps_slot() {
    let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let a = tree.find_by_label("A").unwrap();
    let c = tree.find_by_label("C").unwrap();
    let r = tree.root_index();

    assert!(tree.replace_child(x, a, c));
    assert!(tree.replace_child(r, c, a));
    tree.set_parent(c, Some(x));
    tree.set_parent(a, Some(r));

    assert!(tree.is_valid());
    assert_eq!(tree.to_newick(), "((C,B)X,A)R;");
}

#[test]
fn test_remove_and_add_child() {
    let mut tree = parse_newick_str("((A,B)X,C)R;").unwrap();
    let x = tree.find_by_label("X").unwrap();
    let b = tree.find_by_label("B").unwrap();
    let r = tree.root_index();

    assert!(tree.remove_child(x, b));
    assert!(!tree.remove_child(x, b));
    assert_eq!(tree.parent(b), None);
    assert!(!tree.is_valid());

    tree.add_child(r, b);
    assert!(tree.is_valid());
    assert_eq!(tree.to_newick(), "((A)X,C,B)R;");
}

// ============= Labeling Tests =============

#[test]
fn test_label_internal_vertices() {
    let mut tree = parse_newick_str("(((A,B)0.9,(C,D)X)X,(E,F))0.5;").unwrap();
    let already_labeled = tree.label_internal_vertices(false);
    assert!(!already_labeled);

    let mut seen = HashSet::new();
    for vertex in tree.post_order_iter().filter(|v| !v.is_leaf()) {
        let label = vertex.label().unwrap();
        assert!(!is_numeric_label(label));
        assert!(seen.insert(label.to_string()), "duplicate label {label}");
    }
    assert_eq!(tree.to_newick(), "(((A,B)I0,(C,D)X)I1,(E,F)I2)I3;");
}

#[test]
fn test_labeling_is_idempotent() {
    let mut tree = parse_newick_str("((A,B),(C,D));").unwrap();
    tree.label_internal_vertices(false);
    let first = tree.to_newick();

    assert!(tree.label_internal_vertices(false));
    assert_eq!(tree.to_newick(), first);
}

#[test]
fn test_labeling_zeroes_leaf_edges() {
    let mut tree = parse_newick_str("((A:1,B:2)X:3,C:4)Y;").unwrap();
    assert!(tree.label_internal_vertices(true));
    assert_eq!(tree.to_newick(), "((A:0,B:0)X:3,C:0)Y;");
}

#[test]
fn test_labeling_skips_existing_synthetic_names() {
    let mut tree = parse_newick_str("((A,B)I0,(C,D))R;").unwrap();
    assert!(!tree.label_internal_vertices(false));
    assert_eq!(tree.to_newick(), "((A,B)I0,(C,D)I1)R;");

    // A later vertex already named I0 keeps it; the earlier one moves on
    let mut tree = parse_newick_str("((A,B),(C,D)I0);").unwrap();
    assert!(!tree.label_internal_vertices(false));
    assert_eq!(tree.to_newick(), "((A,B)I1,(C,D)I0)I2;");

    let mut seen = HashSet::new();
    for vertex in tree.post_order_iter().filter(|v| !v.is_leaf()) {
        assert!(seen.insert(vertex.label().unwrap().to_string()));
    }
    assert!(tree.label_internal_vertices(false));
    assert_eq!(tree.to_newick(), "((A,B)I1,(C,D)I0)I2;");
}
