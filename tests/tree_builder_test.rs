//! Tests for TreeBuilder

use gedtree::util::testing;
use gedtree::{
    count_nodes, ChildFamilyPolicy, DomainError, RecordParser, Relation, TreeBuilder, TreeOptions,
    TreeType,
};

const FAMILY_GED: &str = include_str!("data/family.ged");

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn builder_for(text: &str) -> TreeBuilder {
    let outcome = RecordParser::new().parse(text);
    assert!(outcome.success, "{:?}", outcome.error);
    let mut builder = TreeBuilder::new();
    builder.initialize(outcome.individuals, outcome.families);
    builder
}

fn options(tree_type: TreeType, max_generations: u32) -> TreeOptions {
    TreeOptions {
        tree_type,
        max_generations,
        ..Default::default()
    }
}

#[test]
fn given_sample_file_when_building_ancestors_then_parents_at_generation_one() {
    let builder = builder_for(FAMILY_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Ancestors, 3))
        .unwrap();

    let root = &built.root;
    assert_eq!(root.id, "@I1@");
    assert_eq!(root.generation, 0);
    assert_eq!(root.relation, Relation::Root);

    let parents = root.children.as_ref().unwrap();
    assert_eq!(parents.len(), 2);
    assert_eq!(parents[0].id, "@I5@");
    assert_eq!(parents[0].relation, Relation::Father);
    assert_eq!(parents[0].generation, 1);
    assert_eq!(parents[1].id, "@I6@");
    assert_eq!(parents[1].relation, Relation::Mother);
    assert_eq!(parents[1].generation, 1);

    // Henry and Edith have no child-families in the sample, so generation 2
    // is empty.
    assert!(parents[0].children.is_none());
    assert!(parents[1].children.is_none());
}

#[test]
fn given_sample_file_when_building_descendants_then_fans_out_over_children() {
    let builder = builder_for(FAMILY_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Descendants, 3))
        .unwrap();

    let root = &built.root;
    assert_eq!(root.id, "@I1@");
    let children = root.children.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id, "@I3@");
    assert_eq!(children[1].id, "@I4@");
    assert!(children.iter().all(|c| c.generation == 1));
    assert!(children.iter().all(|c| c.relation == Relation::Child));
    assert!(children.iter().all(|c| c.children.is_none()));
}

#[test]
fn given_sample_file_when_building_both_then_children_grafted_after_parents() {
    let builder = builder_for(FAMILY_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Both, 3))
        .unwrap();

    let ids: Vec<&str> = built
        .root
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    // Ancestor children first, then the descendant root's children.
    assert_eq!(ids, ["@I5@", "@I6@", "@I3@", "@I4@"]);
    assert_eq!(built.metadata.total_nodes, 5);
}

const DEEP_GED: &str = "\
0 @I1@ INDI
1 NAME Gen0 /Line/
1 SEX M
1 FAMC @F1@
0 @I2@ INDI
1 NAME Gen1 /Line/
1 SEX M
1 FAMS @F1@
1 FAMC @F2@
0 @I3@ INDI
1 NAME Gen2 /Line/
1 SEX M
1 FAMS @F2@
1 FAMC @F3@
0 @I4@ INDI
1 NAME Gen3 /Line/
1 SEX M
1 FAMS @F3@
1 FAMC @F4@
0 @I5@ INDI
1 NAME Gen4 /Line/
1 SEX M
1 FAMS @F4@
0 @F1@ FAM
1 HUSB @I2@
1 CHIL @I1@
0 @F2@ FAM
1 HUSB @I3@
1 CHIL @I2@
0 @F3@ FAM
1 HUSB @I4@
1 CHIL @I3@
0 @F4@ FAM
1 HUSB @I5@
1 CHIL @I4@
";

fn max_generation(node: &gedtree::TreeNode) -> i32 {
    node.children
        .iter()
        .flatten()
        .map(max_generation)
        .max()
        .unwrap_or(node.generation)
}

#[test]
fn given_four_known_generations_when_bounded_to_two_then_deeper_pruned() {
    let builder = builder_for(DEEP_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Ancestors, 2))
        .unwrap();

    assert_eq!(max_generation(&built.root), 1);
    assert_eq!(built.metadata.total_nodes, 2);
}

#[test]
fn given_unbounded_depth_when_building_then_all_generations_present() {
    let builder = builder_for(DEEP_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Ancestors, 10))
        .unwrap();

    assert_eq!(max_generation(&built.root), 4);
    assert_eq!(built.metadata.total_nodes, 5);
}

#[test]
fn given_identical_arguments_when_building_twice_then_trees_structurally_equal() {
    let builder = builder_for(FAMILY_GED);
    let opts = options(TreeType::Both, 3);

    let first = builder.build_tree("@I1@", &opts).unwrap();
    let second = builder.build_tree("@I1@", &opts).unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_unknown_root_id_when_building_then_not_found_error() {
    let builder = builder_for(FAMILY_GED);

    let result = builder.build_tree("@NOPE@", &TreeOptions::default());

    assert!(matches!(result, Err(DomainError::RootNotFound(id)) if id == "@NOPE@"));
}

#[test]
fn given_invalid_tree_type_string_when_parsing_then_unknown_type_error() {
    let result = "sideways".parse::<TreeType>();

    assert!(matches!(result, Err(DomainError::UnknownTreeType(t)) if t == "sideways"));
    assert_eq!("Ancestors".parse::<TreeType>().unwrap(), TreeType::Ancestors);
    assert_eq!("both".parse::<TreeType>().unwrap(), TreeType::Both);
}

#[test]
fn given_node_when_built_then_carries_display_fields_and_back_reference() {
    let builder = builder_for(FAMILY_GED);

    let built = builder
        .build_tree("@I5@", &options(TreeType::Ancestors, 1))
        .unwrap();

    let root = &built.root;
    assert_eq!(root.display_name, "Henry Smith");
    assert_eq!(root.dates, "(11 MAR 1925 – 30 OCT 1999)");
    assert!(!root.is_alive);
    assert_eq!(root.individual.id, "@I5@");

    let spouses = &root.spouses;
    assert_eq!(spouses.len(), 1);
    assert_eq!(spouses[0].id, "@I6@");
    assert_eq!(spouses[0].display_name, "Edith Brown");
    assert_eq!(spouses[0].marriage_date.as_deref(), Some("22 MAY 1949"));
}

#[test]
fn given_living_individual_when_built_then_is_alive() {
    let builder = builder_for(FAMILY_GED);

    let built = builder
        .build_tree("@I1@", &options(TreeType::Ancestors, 1))
        .unwrap();

    assert!(built.root.is_alive);
    assert_eq!(built.root.dates, "(b. 2 JAN 1950)");
}

#[test]
fn given_metadata_when_building_then_options_recorded() {
    let builder = builder_for(FAMILY_GED);
    let opts = TreeOptions {
        tree_type: TreeType::Descendants,
        max_generations: 3,
        include_spouses: true,
        include_siblings: true,
        ..Default::default()
    };

    let built = builder.build_tree("@I1@", &opts).unwrap();

    assert_eq!(built.metadata.root_id, "@I1@");
    assert_eq!(built.metadata.tree_type, TreeType::Descendants);
    assert_eq!(built.metadata.max_generations, 3);
    assert!(built.metadata.include_spouses);
    assert!(built.metadata.include_siblings);
    assert_eq!(built.metadata.total_nodes, count_nodes(&built.root));
}

#[test]
fn given_second_child_family_policy_when_building_then_follows_selected_family() {
    // @I1@ is a child in two families; only the selected one is traversed.
    let text = "\
0 @I1@ INDI
1 NAME Adopted /Child/
1 FAMC @F1@
1 FAMC @F2@
0 @I2@ INDI
1 NAME Biological /Father/
1 SEX M
1 FAMS @F1@
0 @I3@ INDI
1 NAME Adoptive /Father/
1 SEX M
1 FAMS @F2@
0 @F1@ FAM
1 HUSB @I2@
1 CHIL @I1@
0 @F2@ FAM
1 HUSB @I3@
1 CHIL @I1@
";
    let builder = builder_for(text);

    let first = builder
        .build_tree("@I1@", &options(TreeType::Ancestors, 3))
        .unwrap();
    assert_eq!(first.root.children.as_ref().unwrap()[0].id, "@I2@");

    let opts = TreeOptions {
        child_family: ChildFamilyPolicy::Nth(1),
        ..options(TreeType::Ancestors, 3)
    };
    let second = builder.build_tree("@I1@", &opts).unwrap();
    assert_eq!(second.root.children.as_ref().unwrap()[0].id, "@I3@");
}

#[test]
fn given_reinitialized_builder_when_building_then_new_state_used() {
    let mut builder = TreeBuilder::new();

    let outcome = RecordParser::new().parse(FAMILY_GED);
    builder.initialize(outcome.individuals, outcome.families);
    assert!(builder.build_tree("@I1@", &TreeOptions::default()).is_ok());

    let other = RecordParser::new().parse("0 @X1@ INDI\n1 NAME Only /One/\n");
    builder.initialize(other.individuals, other.families);

    assert!(matches!(
        builder.build_tree("@I1@", &TreeOptions::default()),
        Err(DomainError::RootNotFound(_))
    ));
    assert!(builder.build_tree("@X1@", &TreeOptions::default()).is_ok());
}
