use phylodisc::newick::{NewickParser, parse_str, to_newick, write_trees};
use phylodisc::parser::ParsingErrorType;
use phylodisc::parser::byte_parser::ByteParser;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5;";
    let mut parser = ByteParser::for_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3);
    let tree = newick_parser.parse_str(&mut parser).unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let root_index = root.index();
    let root_children = root.children();
    assert_eq!(root_children.len(), 2);

    // - Internal vertex has children (A, B)
    let internal = tree.vertex(root_children[0]);
    assert!(internal.is_internal());
    assert_eq!(*internal.branch_length().unwrap(), 3.0);
    let leaf_a = tree.vertex(internal.children()[0]);
    let leaf_b = tree.vertex(internal.children()[1]);
    let leaf_c = tree.vertex(root_children[1]);
    assert_eq!(leaf_a.label(), Some("A"));
    assert_eq!(leaf_b.label(), Some("B"));
    assert_eq!(leaf_c.label(), Some("C"));

    // - Parent relationships
    assert_eq!(internal.parent(), Some(root_index));
    assert_eq!(leaf_a.parent(), Some(internal.index()));
    assert_eq!(leaf_c.parent(), Some(root_index));

    // - Root branch length is kept
    assert_eq!(*root.branch_length().unwrap(), 0.5);
}

#[test]
fn test_multifurcating_root() {
    let tree = parse_str("(A:0.1,B:0.2,(C:0.3,D:0.4):0.5);").unwrap();
    assert_eq!(tree.root().num_children(), 3);
    assert_eq!(tree.num_leaves(), 4);
    assert!(tree.is_valid());
}

#[test]
fn test_internal_labels_and_support() {
    let tree = parse_str("(((A,B)0.95:0.1,C)Clade1:0.2,D);").unwrap();
    let ab = tree.parent(tree.find_by_label("A").unwrap()).unwrap();
    assert_eq!(tree[ab].label(), Some("0.95"));
    assert_eq!(tree[ab].support(), Some(0.95));

    let clade = tree.find_by_label("Clade1").unwrap();
    assert!(tree[clade].is_internal());
    assert_eq!(tree[clade].support(), None);
}

#[test]
fn test_quoted_labels_and_comments() {
    let tree = parse_str("[&R] ( 'Little Spotted Kiwi'[x]:1.0 , 'Baillon''s Crake' : 2.0 ) ;").unwrap();
    assert!(tree.find_by_label("Little Spotted Kiwi").is_ok());
    assert!(tree.find_by_label("Baillon's Crake").is_ok());
}

#[test]
fn test_single_leaf_tree() {
    let tree = parse_str("Apteryx_haastii;").unwrap();
    assert_eq!(tree.num_vertices(), 1);
    assert!(tree.root().is_leaf());
    assert!(tree.is_valid());
    assert_eq!(tree.to_newick(), "Apteryx_haastii;");
}

#[test]
fn test_scientific_notation_branch_length() {
    let tree = parse_str("(A:1.5e-10,B:2E3);").unwrap();
    let a = tree.find_by_label("A").unwrap();
    let b = tree.find_by_label("B").unwrap();
    assert_eq!(*tree[a].branch_length().unwrap(), 1.5e-10);
    assert_eq!(*tree[b].branch_length().unwrap(), 2000.0);
}

#[test]
fn test_parse_all() {
    let input = "(A,B);\n(B,A);\n\n[comment]\n((A,B),C);\n";
    let mut newick_parser = NewickParser::new();
    let trees = newick_parser.parse_all(ByteParser::for_str(input)).unwrap();
    assert_eq!(trees.len(), 3);
    assert_eq!(trees[2].num_leaves(), 3);
}

// --- TESTS PARSING ERRORS ---
#[test]
fn test_missing_semicolon() {
    let err = parse_str("(A,B)").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEof);
}

#[test]
fn test_unbalanced_parentheses() {
    let err = parse_str("((A,B),C;").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidNewickString(_)));
}

#[test]
fn test_negative_branch_length() {
    let err = parse_str("(A:-1.0,B:1.0);").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBranchLength(_)));
}

#[test]
fn test_unclosed_quote() {
    let err = parse_str("('A,B);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
}

#[test]
fn test_empty_input() {
    let err = parse_str("   ").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEof);
}

// --- TESTS NEWICK WRITING ---
#[test]
fn test_round_trip() {
    for newick in [
        "((A:1,B:2):3,C:4);",
        "((A:1,B:2)0.95:3,C:4)Root:0.5;",
        "(A,B,(C,D)I0);",
        "('Great Spotted Kiwi':0.25,'Baillon''s Crake':1.5);",
    ] {
        let tree = parse_str(newick).unwrap();
        assert_eq!(to_newick(&tree), newick);
    }
}

#[test]
fn test_write_trees() {
    let trees = vec![parse_str("(A,B);").unwrap(), parse_str("((A,B),C);").unwrap()];
    let mut buffer = Vec::new();
    write_trees(&mut buffer, &trees).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "(A,B);\n((A,B),C);\n");
}
