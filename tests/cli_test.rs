//! Tests for CLI helpers

use tempfile::TempDir;

use gedtree::cli::commands::{find_gedcom_files, render_tree};
use gedtree::util::testing;
use gedtree::{RecordParser, TreeBuilder, TreeOptions, TreeType};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_nested_directories_when_listing_then_only_ged_files_found() {
    // Arrange
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("family.ged"), "0 @I1@ INDI\n").unwrap();
    std::fs::write(temp.path().join("notes.txt"), "not gedcom\n").unwrap();
    std::fs::create_dir_all(temp.path().join("archive")).unwrap();
    std::fs::write(temp.path().join("archive/old.GED"), "0 @I1@ INDI\n").unwrap();

    // Act
    let files = find_gedcom_files(temp.path());

    // Assert
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| {
        f.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ged"))
    }));
}

#[test]
fn given_empty_directory_when_listing_then_no_files() {
    let temp = TempDir::new().unwrap();

    assert!(find_gedcom_files(temp.path()).is_empty());
}

#[test]
fn given_built_tree_when_rendering_then_labels_carry_names_and_relations() {
    let outcome = RecordParser::new().parse(include_str!("data/family.ged"));
    let mut builder = TreeBuilder::new();
    builder.initialize(outcome.individuals, outcome.families);
    let built = builder
        .build_tree(
            "@I1@",
            &TreeOptions {
                tree_type: TreeType::Ancestors,
                max_generations: 3,
                ..Default::default()
            },
        )
        .unwrap();

    let rendered = render_tree(&built.root).to_string();

    assert!(rendered.contains("John Smith"));
    assert!(rendered.contains("[father] Henry Smith"));
    assert!(rendered.contains("[mother] Edith Brown"));
}

#[test]
fn given_built_tree_when_serializing_then_json_exposes_contract_fields() {
    let outcome = RecordParser::new().parse(include_str!("data/family.ged"));
    let mut builder = TreeBuilder::new();
    builder.initialize(outcome.individuals, outcome.families);
    let built = builder.build_tree("@I1@", &TreeOptions::default()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&built).unwrap()).unwrap();

    assert_eq!(json["root"]["id"], "@I1@");
    assert_eq!(json["root"]["generation"], 0);
    assert_eq!(json["metadata"]["tree_type"], "ancestors");
    assert!(json["root"]["individual"]["name"]["full"].is_string());
}
