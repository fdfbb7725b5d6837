//! Tagged node representation

use std::fmt;

/// One unit of tokenized markup
///
/// Commands (`\section{Intro}`) and environments (`\begin{document}...`) have a
/// non-empty `name`. Plain text runs have an empty `name` and keep their
/// literal characters in `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedNode {
    /// Command or environment name, empty for plain text
    pub name: String,

    /// Literal text for text nodes, flattened first required argument for
    /// commands, flattened body for environments
    pub text: String,

    /// Nested nodes in document order (argument contents, then body)
    pub children: Vec<TaggedNode>,
}

impl TaggedNode {
    /// Create a plain text node
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create a named node (command or environment)
    pub fn command(
        name: impl Into<String>,
        text: impl Into<String>,
        children: Vec<TaggedNode>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children,
        }
    }

    /// Create the nameless container that holds a whole document
    pub fn root(children: Vec<TaggedNode>) -> Self {
        let text = children.iter().map(|child| child.text.as_str()).collect();
        Self {
            name: String::new(),
            text,
            children,
        }
    }

    /// Whether this is a plain text run
    pub fn is_text(&self) -> bool {
        self.name.is_empty()
    }

    /// A node with no name, no text and no children
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.text.is_empty() && self.children.is_empty()
    }

    /// Pre-order iterator over every node nested inside this one (excluding itself)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Whether any nested node carries `name`
    pub fn has_descendant_named(&self, name: &str) -> bool {
        self.descendants().any(|node| node.name == name)
    }
}

impl fmt::Display for TaggedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Pre-order traversal returned by [`TaggedNode::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a TaggedNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TaggedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
