//! Markup model consumed by the tree builder
//!
//! A LaTeX source string is tokenized into [`TaggedNode`]s: commands and
//! environments carry a name, plain text runs carry only text. The tree
//! builder never looks at raw syntax, only at this node model.

mod node;
mod parser;

pub use node::{Descendants, TaggedNode};
pub use parser::MarkupParser;
