//! Error types for tree construction and navigation

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading a document or navigating its tree
#[derive(Error, Debug)]
pub enum TreeError {
    /// Lookup by a name that is not a heading keyword, with no default supplied
    #[error("'{name}' is not a recognized heading name")]
    NotFound {
        /// The name that was looked up
        name: String,
    },

    /// Positional access past the last branch
    #[error("Branch index {index} out of range (node has {len} branches)")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of direct branches
        len: usize,
    },

    /// The document file could not be read
    #[error("Failed to read document '{}'", path.display())]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Walking a document directory failed
    #[error("Failed to walk directory '{}'", path.display())]
    Walk {
        /// Directory being walked
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },
}
