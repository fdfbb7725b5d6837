//! Loading documents from disk and rendering their outlines

use crate::config::BuildConfig;
use crate::content_tree::ContentTree;
use crate::error::TreeError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Placeholder printed for branches without a heading
const UNLABELED: &str = "(untitled)";

/// A document tree and the file it came from
#[derive(Debug)]
pub struct LoadedDocument {
    /// Source file
    pub path: PathBuf,
    /// Tree built from the file
    pub tree: ContentTree,
}

/// Load one `.tex` file, or every `.tex` file below a directory
///
/// # Parameters
/// * `path` - A LaTeX file or a directory to search recursively
/// * `config` - Build configuration applied to every document
///
/// # Returns
/// * `Ok(Vec<LoadedDocument>)` - Documents in file name order
/// * `Err(TreeError)` - A file could not be read or the directory could not be walked
pub fn load_path(path: &Path, config: &BuildConfig) -> Result<Vec<LoadedDocument>, TreeError> {
    if path.is_file() {
        return Ok(vec![load_document(path, config)?]);
    }

    let paths = discover_documents(path)?;

    // Each tree is independent, so documents can be built in parallel
    #[cfg(feature = "parallel")]
    let documents: Result<Vec<_>, _> = paths
        .par_iter()
        .map(|path| load_document(path, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let documents: Result<Vec<_>, _> = paths
        .iter()
        .map(|path| load_document(path, config))
        .collect();

    documents
}

/// Find `.tex` files below `root`, sorted by file name
pub fn discover_documents(root: &Path) -> Result<Vec<PathBuf>, TreeError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| TreeError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tex") {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

fn load_document(path: &Path, config: &BuildConfig) -> Result<LoadedDocument, TreeError> {
    let tree = ContentTree::from_file_with_config(path, config)?;
    log::info!(
        "Loaded {} ({} top-level branches, hierarchy: {})",
        path.display(),
        tree.len(),
        tree.hierarchy()
    );

    Ok(LoadedDocument {
        path: path.to_path_buf(),
        tree,
    })
}

/// Render the headings below `tree`, one per line, indented by depth
///
/// # Parameters
/// * `tree` - Subtree to render; the subtree's own heading is not printed
/// * `max_depth` - Deepest relative depth to print, unlimited when `None`
///
/// # Returns
/// * `String` - Lines of the form `section: Title`
pub fn render_outline(tree: &ContentTree, max_depth: Option<usize>) -> String {
    let mut out = String::new();

    for node in tree.walk().skip(1) {
        let relative = node.depth() - tree.depth();
        if max_depth.is_some_and(|max| relative > max) {
            continue;
        }

        let indent = "  ".repeat(relative - 1);
        let label = if node.label().is_empty() {
            UNLABELED
        } else {
            node.label()
        };
        let line = match node.name() {
            Some(name) => format!("{}{}: {}\n", indent, name, label),
            None => format!("{}{}\n", indent, label),
        };
        out.push_str(&line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_outline_indents_by_depth() {
        let tree = ContentTree::from_text("\\section{A}\\subsection{A1}\\section{B}");

        assert_eq!(
            render_outline(&tree, None),
            "section: A\n  subsection: A1\nsection: B\n"
        );
    }

    #[test]
    fn test_render_outline_respects_max_depth() {
        let tree = ContentTree::from_text("\\section{A}\\subsection{A1}\\section{B}");

        assert_eq!(render_outline(&tree, Some(1)), "section: A\nsection: B\n");
    }

    #[test]
    fn test_render_subtree_is_relative() {
        let tree = ContentTree::from_text("\\section{A}\\subsection{A1}\\subsubsection{A1a}");

        assert_eq!(
            render_outline(&tree[0], None),
            "subsection: A1\n  subsubsection: A1a\n"
        );
    }

    #[test]
    fn test_render_unlabeled_branch() {
        let tree = ContentTree::from_text("\\subsection{Early}\\section{A}");

        assert_eq!(
            render_outline(&tree, None),
            "(untitled)\n  subsection: Early\nsection: A\n"
        );
    }

    #[test]
    fn test_missing_directory_is_walk_error() {
        let err = load_path(Path::new("no/such/dir"), &BuildConfig::default()).unwrap_err();

        assert!(matches!(err, TreeError::Walk { .. }));
    }
}
