//! Partitioning of a node stream into heading branches
//!
//! One pass over a stream finds the topmost heading level present, opens a
//! group at every heading of that level and collects everything after it
//! until the next one. Each group is then built recursively one depth lower.

use crate::content_tree::ContentTree;
use crate::hierarchy::Hierarchy;
use crate::markup::TaggedNode;

/// A group collected during one partitioning pass
#[derive(Debug)]
struct PendingGroup {
    /// Heading that opened the group, `None` for a leading group without one
    heading: Option<TaggedNode>,
    /// Heading level shared by the group's opener
    level: Option<usize>,
    /// Nodes following the heading up to the next heading of the same level
    descendants: Vec<TaggedNode>,
}

impl PendingGroup {
    fn opened_by(heading: TaggedNode, level: usize) -> Self {
        Self {
            heading: Some(heading),
            level: Some(level),
            descendants: Vec::new(),
        }
    }

    fn anonymous(descendants: Vec<TaggedNode>) -> Self {
        Self {
            heading: None,
            level: None,
            descendants,
        }
    }
}

/// Output of partitioning one node stream
#[derive(Debug, Default)]
pub struct Partition {
    /// Non-heading nodes that precede the first branch
    pub content: Vec<TaggedNode>,
    /// Branches in document order
    pub branches: Vec<ContentTree>,
}

/// Builds branches against a hierarchy resolved once for the whole document
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    hierarchy: Hierarchy,
}

impl TreeBuilder {
    /// Create a builder for one document's hierarchy
    pub fn new(hierarchy: Hierarchy) -> Self {
        Self { hierarchy }
    }

    /// The hierarchy every built node shares
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Flatten a document root into the stream the partitioner scans
    ///
    /// Containers that hold headings somewhere inside them (such as the
    /// `document` environment) are replaced by their children; every other
    /// node, headings included, is kept whole.
    pub fn element_stream(&self, root: TaggedNode) -> Vec<TaggedNode> {
        let mut stream = Vec::new();
        for child in root.children {
            self.flatten_into(child, &mut stream);
        }
        stream
    }

    fn flatten_into(&self, node: TaggedNode, stream: &mut Vec<TaggedNode>) {
        let wraps_headings = self.hierarchy.level_of(&node).is_none()
            && node
                .descendants()
                .any(|inner| self.hierarchy.level_of(inner).is_some());

        if wraps_headings {
            for child in node.children {
                self.flatten_into(child, stream);
            }
        } else {
            stream.push(node);
        }
    }

    /// Partition `nodes` into branches one level below `depth`
    ///
    /// # Parameters
    /// * `nodes` - Element stream owned by the node at `depth`
    /// * `depth` - Depth of the node that owns `nodes` (root is 0)
    ///
    /// # Returns
    /// * `Partition` - Leading content plus branches at `depth + 1`; when no
    ///   heading is present everything is content and there are no branches
    pub fn build(&self, nodes: Vec<TaggedNode>, depth: usize) -> Partition {
        let nodes: Vec<TaggedNode> = nodes
            .into_iter()
            .filter(|node| {
                if node.is_empty() {
                    log::trace!("Skipping empty node at depth {}", depth);
                    return false;
                }
                true
            })
            .collect();

        let Some(top) = nodes
            .iter()
            .filter_map(|node| self.hierarchy.level_of(node))
            .min()
        else {
            return Partition {
                content: nodes,
                branches: Vec::new(),
            };
        };

        let mut leading = Vec::new();
        let mut groups: Vec<PendingGroup> = Vec::new();

        for node in nodes {
            if self.hierarchy.level_of(&node) == Some(top) {
                groups.push(PendingGroup::opened_by(node, top));
            } else if let Some(group) = groups.last_mut() {
                group.descendants.push(node);
            } else {
                leading.push(node);
            }
        }

        // Deeper headings before the first top-level one keep their structure
        // under an unlabeled leading branch; plain leading content stays here
        let content = if leading
            .iter()
            .any(|node| self.hierarchy.level_of(node).is_some())
        {
            groups.insert(0, PendingGroup::anonymous(leading));
            Vec::new()
        } else {
            leading
        };

        let branches = groups
            .into_iter()
            .map(|group| self.build_group(group, depth + 1))
            .collect();

        Partition { content, branches }
    }

    fn build_group(&self, group: PendingGroup, depth: usize) -> ContentTree {
        let Partition { content, branches } = self.build(group.descendants, depth);

        ContentTree::from_parts(
            group.heading,
            group.level,
            depth,
            content,
            branches,
            self.hierarchy.clone(),
        )
    }
}
