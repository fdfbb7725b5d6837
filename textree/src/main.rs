//! textree - heading trees for LaTeX documents
//!
//! A CLI tool for inspecting the section structure of LaTeX sources.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use textree::outline::{self, LoadedDocument};
use textree::{BuildConfig, ContentTree};

/// Main entry point for the textree CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Tree { input, max_depth } => {
            let config = resolve_config(cli.config.as_deref(), &input)?;
            handle_tree_command(&input, &config, max_depth)?;
        }

        Commands::Hierarchy { input } => {
            let config = resolve_config(cli.config.as_deref(), &input)?;
            handle_hierarchy_command(&input, &config)?;
        }

        Commands::Find { input, names } => {
            let config = resolve_config(cli.config.as_deref(), &input)?;
            handle_find_command(&input, &config, &names)?;
        }
    }

    Ok(())
}

/// Initialize logging, at info level when verbose and from `RUST_LOG` otherwise
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Use the explicit config file, or discover textree.toml next to the input
fn resolve_config(explicit: Option<&Path>, input: &Path) -> Result<BuildConfig> {
    if let Some(path) = explicit {
        return BuildConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()));
    }

    let dir = if input.is_dir() {
        input.to_path_buf()
    } else {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };

    BuildConfig::discover(&dir)
        .with_context(|| format!("Failed to load configuration from {}", dir.display()))
}

/// Load every document under `input`
fn load_documents(input: &Path, config: &BuildConfig) -> Result<Vec<LoadedDocument>> {
    let documents = outline::load_path(input, config)
        .with_context(|| format!("Failed to load documents from {}", input.display()))?;

    if documents.is_empty() {
        anyhow::bail!("No .tex files found in {}", input.display());
    }
    Ok(documents)
}

/// Handle the tree command
fn handle_tree_command(
    input: &Path,
    config: &BuildConfig,
    max_depth: Option<usize>,
) -> Result<()> {
    let documents = load_documents(input, config)?;
    let show_paths = documents.len() > 1;

    for document in &documents {
        if show_paths {
            println!("{}", document.path.display());
        }
        let rendered = outline::render_outline(&document.tree, max_depth);
        if rendered.is_empty() {
            println!("(no headings)");
        } else {
            print!("{}", rendered);
        }
        if show_paths {
            println!();
        }
    }

    Ok(())
}

/// Handle the hierarchy command
fn handle_hierarchy_command(input: &Path, config: &BuildConfig) -> Result<()> {
    for document in load_documents(input, config)? {
        let hierarchy = document.tree.hierarchy();
        if hierarchy.is_empty() {
            println!("{}: (no headings)", document.path.display());
        } else {
            println!("{}: {}", document.path.display(), hierarchy);
        }
    }

    Ok(())
}

/// Handle the find command
fn handle_find_command(input: &Path, config: &BuildConfig, names: &[String]) -> Result<()> {
    let tree = ContentTree::from_file_with_config(input, config)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let mut current = &tree;
    for name in names {
        current = current
            .branch(name)?
            .with_context(|| format!("No '{}' heading under '{}'", name, describe(current)))?;
    }

    println!("{}", current);
    let text = current.text();
    if !text.is_empty() {
        println!("{}", text);
    }
    print!("{}", outline::render_outline(current, None));

    Ok(())
}

/// Label used in messages, naming the root explicitly
fn describe(tree: &ContentTree) -> &str {
    if tree.depth() == 0 {
        "<document>"
    } else {
        tree.label()
    }
}
