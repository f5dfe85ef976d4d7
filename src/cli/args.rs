//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// GEDCOM genealogy parser and family tree builder
#[derive(Parser, Debug)]
#[command(name = "gedtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a GEDCOM file and print record statistics
    Stats {
        /// GEDCOM file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Build and print a family tree
    Tree {
        /// GEDCOM file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Root individual id, e.g. @I1@ (default: first named individual)
        #[arg(short, long)]
        root: Option<String>,

        /// Traversal direction: ancestors, descendants, both
        #[arg(short = 't', long = "type")]
        tree_type: Option<String>,

        /// Maximum generations
        #[arg(short, long)]
        generations: Option<u32>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List GEDCOM files under a directory
    List {
        /// Directory to scan (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config path
    Path,
}
