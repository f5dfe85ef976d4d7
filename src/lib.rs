//! gedtree: GEDCOM parsing and family-tree construction.
//!
//! Two components, consumed in sequence:
//!
//! 1. [`RecordParser`] converts raw GEDCOM text into individual and family
//!    records with all cross-references resolved and bidirectionally linked.
//! 2. [`TreeBuilder`] turns those mappings into a rooted hierarchy
//!    (ancestors, descendants or both) bounded by a maximum depth, ready
//!    for a layout or rendering stage.
//!
//! ```
//! use gedtree::{RecordParser, RootPreferences, TreeBuilder, TreeOptions};
//!
//! let text = "0 @I1@ INDI\n1 NAME John /Smith/\n";
//! let outcome = RecordParser::new().parse(text);
//! assert!(outcome.success);
//!
//! let mut builder = TreeBuilder::new();
//! builder.initialize(outcome.individuals, outcome.families);
//! let root = builder.find_root(&RootPreferences::default()).unwrap();
//! let tree = builder.build_tree(&root.id, &TreeOptions::default()).unwrap();
//! assert_eq!(tree.root.generation, 0);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod parser;
pub mod tree;
pub mod util;

pub use config::Settings;
pub use domain::{DomainError, Event, Family, GedcomDate, Individual, PersonName, Sex};
pub use parser::{ParseOutcome, ParseStats, RecordParser};
pub use tree::{
    count_nodes, find_root_person, BuiltTree, ChildFamilyPolicy, Relation, RootPreferences,
    SpouseSummary, TreeBuilder, TreeMetadata, TreeNode, TreeOptions, TreeType,
};
