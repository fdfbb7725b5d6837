//! textree - heading trees for LaTeX documents
//!
//! Turns a LaTeX document into a [`ContentTree`] whose shape follows the
//! document's heading hierarchy (`chapter`, `section`, `subsection`, and any
//! deeper `sub...section` commands it actually uses).
//!
//! ```
//! use textree::ContentTree;
//!
//! let tree = ContentTree::from_text("\\section{A}\\subsection{A1}\\section{B}");
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree[0][0].label(), "A1");
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod content_tree;
pub mod error;
pub mod hierarchy;
pub mod markup;
pub mod outline;
pub mod tree_builder;

pub use config::{BuildConfig, ConfigError};
pub use content_tree::ContentTree;
pub use error::TreeError;
pub use hierarchy::Hierarchy;
pub use markup::TaggedNode;
