//! Tree construction: rooted ancestor/descendant hierarchies

pub mod builder;
pub mod node;
pub mod root;

pub use builder::{
    count_nodes, BuiltTree, ChildFamilyPolicy, TreeBuilder, TreeMetadata, TreeOptions, TreeType,
};
pub use node::{display_name, format_life_dates, Relation, SpouseSummary, TreeNode};
pub use root::{find_root_person, RootPreferences};
