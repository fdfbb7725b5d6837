//! Command-line interface definitions for textree

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the textree application
#[derive(Parser)]
#[command(name = "textree")]
#[command(version)]
#[command(about = "Heading trees for LaTeX documents", long_about = None)]
pub struct Cli {
    /// Enable info-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Build configuration file (defaults to textree.toml next to the input)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for textree
#[derive(Subcommand)]
pub enum Commands {
    /// Print the heading outline of a document or of every .tex file in a directory
    Tree {
        /// LaTeX file or directory
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Deepest heading depth to print
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,
    },

    /// Print the heading levels a document uses, topmost first
    Hierarchy {
        /// LaTeX file or directory
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,
    },

    /// Follow heading names from the root and print the subtree reached
    Find {
        /// LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Heading names to follow, e.g. `section subsection`
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
}
