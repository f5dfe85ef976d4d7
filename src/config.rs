//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/gedtree/gedtree.toml`
//! 3. Environment variables: `GEDTREE_*` prefix (e.g.
//!    `GEDTREE_TREE__MAX_GENERATIONS=8`)

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::tree::{TreeOptions, TreeType};

/// Default build options for the tree builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Recursion depth bound
    pub max_generations: u32,
    /// ancestors, descendants or both
    pub tree_type: TreeType,
    /// Renderer pass-through flags
    pub include_spouses: bool,
    pub include_siblings: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            max_generations: 5,
            tree_type: TreeType::Ancestors,
            include_spouses: false,
            include_siblings: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub tree: TreeSettings,
}

impl Settings {
    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = global_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("GEDTREE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Tree options seeded from these settings.
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            max_generations: self.tree.max_generations,
            tree_type: self.tree.tree_type,
            include_spouses: self.tree.include_spouses,
            include_siblings: self.tree.include_siblings,
            ..Default::default()
        }
    }

    /// Config file template with compiled defaults.
    pub fn template() -> String {
        toml::to_string_pretty(&Settings::default())
            .expect("default settings serialize to TOML")
    }
}

/// Path of the global config file, if a home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gedtree").map(|dirs| dirs.config_dir().join("gedtree.toml"))
}
