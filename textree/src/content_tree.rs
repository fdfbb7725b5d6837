//! Navigable tree of a document's headings
//!
//! Every node owns its branches outright and shares the document's
//! [`Hierarchy`]. Trees are built once and never mutated.

use crate::config::BuildConfig;
use crate::error::TreeError;
use crate::hierarchy::Hierarchy;
use crate::markup::{MarkupParser, TaggedNode};
use crate::tree_builder::{Partition, TreeBuilder};
use itertools::Itertools;
use std::fmt;
use std::ops::Index;
use std::path::Path;

/// A heading (or the document root) together with everything beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTree {
    /// Trimmed text of the heading, empty for the root and unlabeled groups
    label: String,
    /// The heading node this subtree was opened by
    heading: Option<TaggedNode>,
    /// 1-based heading level in the hierarchy
    level: Option<usize>,
    /// Nesting depth, 0 for the root
    depth: usize,
    /// Non-heading nodes before the first branch
    content: Vec<TaggedNode>,
    /// Direct children in document order
    branches: Vec<ContentTree>,
    /// Hierarchy resolved at the root
    hierarchy: Hierarchy,
}

impl ContentTree {
    pub(crate) fn from_parts(
        heading: Option<TaggedNode>,
        level: Option<usize>,
        depth: usize,
        content: Vec<TaggedNode>,
        branches: Vec<ContentTree>,
        hierarchy: Hierarchy,
    ) -> Self {
        let label = heading
            .as_ref()
            .map(|node| node.text.trim().to_string())
            .unwrap_or_default();

        Self {
            label,
            heading,
            level,
            depth,
            content,
            branches,
            hierarchy,
        }
    }

    /// Build a tree from LaTeX source with the default configuration
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_config(text, &BuildConfig::default())
    }

    /// Build a tree from LaTeX source
    pub fn from_text_with_config(text: &str, config: &BuildConfig) -> Self {
        Self::from_node(MarkupParser::parse(text, config.max_nesting), config)
    }

    /// Build a tree from an already tokenized document root
    ///
    /// The hierarchy is resolved once from all of `root`'s descendants and
    /// shared by every node of the resulting tree.
    pub fn from_node(root: TaggedNode, config: &BuildConfig) -> Self {
        let hierarchy = Hierarchy::resolve(&root, config);
        let builder = TreeBuilder::new(hierarchy.clone());
        let stream = builder.element_stream(root);
        let Partition { content, branches } = builder.build(stream, 0);

        Self::from_parts(None, None, 0, content, branches, hierarchy)
    }

    /// Read a LaTeX file and build its tree with the default configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        Self::from_file_with_config(path, &BuildConfig::default())
    }

    /// Read a LaTeX file and build its tree
    ///
    /// # Returns
    /// * `Ok(ContentTree)` - Root of the document tree
    /// * `Err(TreeError::Io)` - The file is missing or unreadable
    pub fn from_file_with_config<P: AsRef<Path>>(
        path: P,
        config: &BuildConfig,
    ) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_text_with_config(&text, config))
    }

    /// Heading text, empty for the root
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the originating heading command
    pub fn name(&self) -> Option<&str> {
        self.heading.as_ref().map(|node| node.name.as_str())
    }

    /// The originating heading node
    pub fn heading(&self) -> Option<&TaggedNode> {
        self.heading.as_ref()
    }

    /// 1-based heading level within [`ContentTree::hierarchy`]
    pub fn level(&self) -> Option<usize> {
        self.level
    }

    /// Nesting depth; the root is 0 and every branch is one deeper than its parent
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Non-heading nodes belonging directly to this node
    pub fn content(&self) -> &[TaggedNode] {
        &self.content
    }

    /// Text of [`ContentTree::content`] with whitespace collapsed
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|node| node.text.as_str())
            .collect::<String>()
            .split_whitespace()
            .join(" ")
    }

    /// Direct children in document order
    pub fn branches(&self) -> &[ContentTree] {
        &self.branches
    }

    /// The hierarchy resolved for the whole document
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// A node without branches
    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }

    /// Number of direct branches
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether there are no direct branches
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// The flattened element stream of this subtree
    ///
    /// Reassembled from content, branch headings and branch streams in
    /// document order. Partitioning it again with the same hierarchy yields
    /// the same branches.
    pub fn descendants(&self) -> Vec<TaggedNode> {
        let mut stream = Vec::new();
        self.collect_stream(&mut stream);
        stream
    }

    fn collect_stream(&self, stream: &mut Vec<TaggedNode>) {
        stream.extend(self.content.iter().cloned());
        for branch in &self.branches {
            if let Some(heading) = &branch.heading {
                stream.push(heading.clone());
            }
            branch.collect_stream(stream);
        }
    }

    /// First direct branch opened by heading command `name`
    ///
    /// # Returns
    /// * `Ok(Some(branch))` - A matching branch exists
    /// * `Ok(None)` - `name` is a heading keyword but no branch uses it
    /// * `Err(TreeError::NotFound)` - `name` is not a heading keyword at all
    pub fn branch(&self, name: &str) -> Result<Option<&ContentTree>, TreeError> {
        if let Some(branch) = self.find_branch(name) {
            return Ok(Some(branch));
        }
        if self.hierarchy.recognizes(name) {
            Ok(None)
        } else {
            Err(TreeError::NotFound {
                name: name.to_string(),
            })
        }
    }

    /// First direct branch opened by `name`, or `default` when there is none
    pub fn branch_or<'a>(&'a self, name: &str, default: &'a ContentTree) -> &'a ContentTree {
        self.find_branch(name).unwrap_or(default)
    }

    fn find_branch(&self, name: &str) -> Option<&ContentTree> {
        self.branches.iter().find(|branch| branch.name() == Some(name))
    }

    /// All direct branches opened by heading command `name`, in document order
    pub fn branches_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ContentTree> + 'a {
        self.branches
            .iter()
            .filter(move |branch| branch.name() == Some(name))
    }

    /// Direct branch at `index`
    pub fn get(&self, index: usize) -> Result<&ContentTree, TreeError> {
        self.branches.get(index).ok_or(TreeError::IndexOutOfRange {
            index,
            len: self.branches.len(),
        })
    }

    /// Iterate over direct branches
    pub fn iter(&self) -> std::slice::Iter<'_, ContentTree> {
        self.branches.iter()
    }

    /// Pre-order traversal of this subtree, starting with `self`
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

impl Index<usize> for ContentTree {
    type Output = ContentTree;

    fn index(&self, index: usize) -> &Self::Output {
        &self.branches[index]
    }
}

impl<'a> IntoIterator for &'a ContentTree {
    type Item = &'a ContentTree;
    type IntoIter = std::slice::Iter<'a, ContentTree>;

    fn into_iter(self) -> Self::IntoIter {
        self.branches.iter()
    }
}

impl fmt::Display for ContentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Pre-order traversal returned by [`ContentTree::walk`]
pub struct Walk<'a> {
    stack: Vec<&'a ContentTree>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ContentTree;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.stack.pop()?;
        self.stack.extend(tree.branches.iter().rev());
        Some(tree)
    }
}
