//! Command dispatch for the gedtree CLI

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::parser::{ParseOutcome, RecordParser};
use crate::tree::{Relation, RootPreferences, TreeBuilder, TreeNode, TreeType};

pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Stats { file }) => stats(file),
        Some(Commands::Tree {
            file,
            root,
            tree_type,
            generations,
            format,
        }) => tree(
            file,
            root.as_deref(),
            tree_type.as_deref(),
            *generations,
            *format,
        ),
        Some(Commands::List { dir }) => list(dir.as_deref()),
        Some(Commands::Config { command }) => config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Parse a file and bail unless the outcome is usable.
fn parse_file(file: &Path) -> Result<ParseOutcome> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("cannot read GEDCOM file: {}", file.display()))?;
    let outcome = RecordParser::new().parse(&text);
    for warning in &outcome.warnings {
        output::warning(warning);
    }
    if !outcome.success {
        return Err(anyhow!(
            "{}: {}",
            file.display(),
            outcome
                .error
                .clone()
                .unwrap_or_else(|| "parse failed".to_string())
        ));
    }
    Ok(outcome)
}

#[instrument]
fn stats(file: &Path) -> Result<()> {
    let outcome = parse_file(file)?;

    output::header(&format!("{}", file.display()));
    output::detail(&format!("individuals: {}", outcome.stats.individuals));
    output::detail(&format!("families:    {}", outcome.stats.families));
    output::detail(&format!("warnings:    {}", outcome.stats.warnings));
    output::detail(&format!("errors:      {}", outcome.stats.errors));
    Ok(())
}

#[instrument]
fn tree(
    file: &Path,
    root: Option<&str>,
    tree_type: Option<&str>,
    generations: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let settings = Settings::load()?;
    let mut options = settings.tree_options();
    if let Some(value) = tree_type {
        options.tree_type = value.parse::<TreeType>()?;
    }
    if let Some(max) = generations {
        options.max_generations = max;
    }
    debug!(?options, "building tree");

    let outcome = parse_file(file)?;
    let mut builder = TreeBuilder::new();
    builder.initialize(outcome.individuals, outcome.families);

    let root_id = match root {
        Some(id) => id.to_string(),
        None => builder
            .find_root(&RootPreferences::default())
            .map(|i| i.id.clone())
            .ok_or_else(|| anyhow!("no individuals in {}", file.display()))?,
    };

    let built = builder.build_tree(&root_id, &options)?;
    match format {
        OutputFormat::Text => {
            println!("{}", render_tree(&built.root));
            output::detail(&format!(
                "{} nodes, {} tree, max {} generations",
                built.metadata.total_nodes, built.metadata.tree_type, built.metadata.max_generations
            ));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&built)?);
        }
    }
    Ok(())
}

/// Render a built tree as ASCII art.
pub fn render_tree(node: &TreeNode) -> Tree<String> {
    let mut label = node.display_name.clone();
    if !node.dates.is_empty() {
        label.push(' ');
        label.push_str(&node.dates);
    }
    if node.relation != Relation::Root {
        label = format!("[{}] {}", node.relation, label);
    }

    let leaves: Vec<_> = node.children.iter().flatten().map(render_tree).collect();
    Tree::new(label).with_leaves(leaves)
}

/// Collect `.ged` files under `dir`, sorted for deterministic output.
pub fn find_gedcom_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ged"))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

#[instrument]
fn list(dir: Option<&Path>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    if !dir.exists() {
        return Err(anyhow!("directory does not exist: {}", dir.display()));
    }
    for file in find_gedcom_files(dir) {
        output::info(&file.display());
    }
    Ok(())
}

fn config(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&toml::to_string_pretty(&settings)?);
            Ok(())
        }
        ConfigCommands::Init => {
            let path =
                global_config_path().ok_or_else(|| anyhow!("cannot determine config directory"))?;
            if path.exists() {
                return Err(anyhow!("config already exists: {}", path.display()));
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, Settings::template())?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            let path =
                global_config_path().ok_or_else(|| anyhow!("cannot determine config directory"))?;
            if path.exists() {
                output::success(&path.display());
            } else {
                output::failure(&format!("{} (not created)", path.display()));
            }
            Ok(())
        }
    }
}
