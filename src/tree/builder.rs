//! Tree builder: turns parsed records into a rooted hierarchy.
//!
//! The builder is a reusable, single-owner component: `initialize` replaces
//! its two mappings, `build_tree` constructs a fresh owned tree per call.
//! Recursion is bounded by the generation limit, which also serves as the
//! stack-depth ceiling.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{DomainError, Family, Individual};
use crate::tree::node::{spouse_summaries, Relation, TreeNode};
use crate::tree::root::{find_root_person, RootPreferences};

/// Traversal direction for a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    /// Upward via child-family links
    #[default]
    Ancestors,
    /// Downward via spouse-family links
    Descendants,
    /// Ancestor and descendant trees merged at the root
    Both,
}

impl FromStr for TreeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ancestors" => Ok(TreeType::Ancestors),
            "descendants" => Ok(TreeType::Descendants),
            "both" => Ok(TreeType::Both),
            other => Err(DomainError::UnknownTreeType(other.to_string())),
        }
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TreeType::Ancestors => "ancestors",
            TreeType::Descendants => "descendants",
            TreeType::Both => "both",
        };
        write!(f, "{}", s)
    }
}

/// Which child-family ancestor traversal follows for individuals linked to
/// more than one (e.g. adoption plus biological). Multiple child-families
/// are never merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildFamilyPolicy {
    /// First listed family (document order)
    #[default]
    First,
    /// Family at the given position; prunes the branch when out of range
    Nth(usize),
}

impl ChildFamilyPolicy {
    fn select<'a>(&self, family_ids: &'a [String]) -> Option<&'a String> {
        match self {
            ChildFamilyPolicy::First => family_ids.first(),
            ChildFamilyPolicy::Nth(n) => family_ids.get(*n),
        }
    }
}

/// Options recognized by [`TreeBuilder::build_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    /// Recursion depth bound; a node at this generation is not expanded
    pub max_generations: u32,
    pub tree_type: TreeType,
    /// Pass-through flag for the renderer; does not alter traversal
    pub include_spouses: bool,
    /// Pass-through flag for the renderer; does not alter traversal
    pub include_siblings: bool,
    pub child_family: ChildFamilyPolicy,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_generations: 5,
            tree_type: TreeType::default(),
            include_spouses: false,
            include_siblings: false,
            child_family: ChildFamilyPolicy::default(),
        }
    }
}

/// Metadata reported alongside a built tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeMetadata {
    pub root_id: String,
    pub tree_type: TreeType,
    pub max_generations: u32,
    pub include_spouses: bool,
    pub include_siblings: bool,
    pub total_nodes: usize,
}

/// A built hierarchy: the sole contract with the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltTree {
    pub root: TreeNode,
    pub metadata: TreeMetadata,
}

/// Constructs rooted hierarchies from parsed individual/family mappings.
pub struct TreeBuilder {
    individuals: HashMap<String, Rc<Individual>>,
    families: HashMap<String, Rc<Family>>,
    /// Document order, kept for root selection
    order: Vec<Rc<Individual>>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            individuals: HashMap::new(),
            families: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Load the two mappings, replacing any previous state.
    #[instrument(level = "debug", skip_all)]
    pub fn initialize(&mut self, individuals: Vec<Individual>, families: Vec<Family>) {
        self.order = individuals.into_iter().map(Rc::new).collect();
        self.individuals = self
            .order
            .iter()
            .map(|i| (i.id.clone(), Rc::clone(i)))
            .collect();
        self.families = families
            .into_iter()
            .map(|f| (f.id.clone(), Rc::new(f)))
            .collect();
        debug!(
            individuals = self.individuals.len(),
            families = self.families.len(),
            "tree builder initialized"
        );
    }

    /// Individuals in document order.
    pub fn individuals(&self) -> &[Rc<Individual>] {
        &self.order
    }

    /// Pick a root individual per the default or scored policy.
    pub fn find_root(&self, preferences: &RootPreferences) -> Option<Rc<Individual>> {
        find_root_person(&self.order, preferences)
    }

    /// Build a rooted hierarchy for `root_id`.
    ///
    /// Fails with [`DomainError::RootNotFound`] when the id is absent from
    /// the individual mapping.
    #[instrument(level = "debug", skip(self))]
    pub fn build_tree(&self, root_id: &str, options: &TreeOptions) -> Result<BuiltTree, DomainError> {
        if !self.individuals.contains_key(root_id) {
            return Err(DomainError::RootNotFound(root_id.to_string()));
        }
        // A zero bound would prune the root itself; one generation is the floor.
        let mut options = options.clone();
        options.max_generations = options.max_generations.max(1);

        let root = match options.tree_type {
            TreeType::Ancestors => self.build_ancestors(root_id, 0, Relation::Root, &options),
            TreeType::Descendants => self.build_descendants(root_id, 0, Relation::Root, &options),
            TreeType::Both => self.build_combined(root_id, &options),
        }
        .ok_or_else(|| DomainError::RootNotFound(root_id.to_string()))?;

        let metadata = TreeMetadata {
            root_id: root_id.to_string(),
            tree_type: options.tree_type,
            max_generations: options.max_generations,
            include_spouses: options.include_spouses,
            include_siblings: options.include_siblings,
            total_nodes: count_nodes(&root),
        };
        Ok(BuiltTree { root, metadata })
    }

    /// Ancestor traversal: single path per generation through the selected
    /// child-family, father subtree before mother subtree.
    fn build_ancestors(
        &self,
        id: &str,
        generation: i32,
        relation: Relation,
        options: &TreeOptions,
    ) -> Option<TreeNode> {
        if generation >= options.max_generations as i32 {
            return None;
        }
        let individual = self.individuals.get(id)?;
        let mut node = self.make_node(individual, generation, relation);

        let mut parents = Vec::new();
        if let Some(fam_id) = options.child_family.select(&individual.child_of) {
            if let Some(family) = self.families.get(fam_id) {
                if let Some(father) = family.husband.as_deref().and_then(|h| {
                    self.build_ancestors(h, generation + 1, Relation::Father, options)
                }) {
                    parents.push(father);
                }
                if let Some(mother) = family.wife.as_deref().and_then(|w| {
                    self.build_ancestors(w, generation + 1, Relation::Mother, options)
                }) {
                    parents.push(mother);
                }
            }
        }
        node.children = (!parents.is_empty()).then_some(parents);
        Some(node)
    }

    /// Descendant traversal: fans out over every spouse-family in list
    /// order, children in family order.
    fn build_descendants(
        &self,
        id: &str,
        generation: i32,
        relation: Relation,
        options: &TreeOptions,
    ) -> Option<TreeNode> {
        if generation >= options.max_generations as i32 {
            return None;
        }
        let individual = self.individuals.get(id)?;
        let mut node = self.make_node(individual, generation, relation);

        let mut children = Vec::new();
        for fam_id in &individual.spouse_in {
            let Some(family) = self.families.get(fam_id) else {
                continue;
            };
            for child_id in &family.children {
                if let Some(child) =
                    self.build_descendants(child_id, generation + 1, Relation::Child, options)
                {
                    children.push(child);
                }
            }
        }
        node.children = (!children.is_empty()).then_some(children);
        Some(node)
    }

    /// Combined traversal: ancestor and descendant trees built
    /// independently at full depth, then merged at the root. The descendant
    /// root duplicate is discarded; only its children survive, grafted
    /// after the ancestor root's children.
    fn build_combined(&self, root_id: &str, options: &TreeOptions) -> Option<TreeNode> {
        let ancestors = self.build_ancestors(root_id, 0, Relation::Root, options);
        let descendants = self.build_descendants(root_id, 0, Relation::Root, options);

        match (ancestors, descendants) {
            (Some(mut base), Some(down)) => {
                if let Some(grafted) = down.children {
                    base.children.get_or_insert_with(Vec::new).extend(grafted);
                }
                Some(base)
            }
            (Some(base), None) => Some(base),
            (None, Some(down)) => Some(down),
            (None, None) => None,
        }
    }

    fn make_node(
        &self,
        individual: &Rc<Individual>,
        generation: i32,
        relation: Relation,
    ) -> TreeNode {
        let spouses = spouse_summaries(
            individual,
            |id| self.families.get(id),
            |id| self.individuals.get(id),
        );
        TreeNode::from_individual(individual, generation, relation, spouses)
    }
}

/// Total node count of a subtree. Each owned node is counted once.
pub fn count_nodes(node: &TreeNode) -> usize {
    1 + node
        .children
        .iter()
        .flatten()
        .map(count_nodes)
        .sum::<usize>()
}
