//! Heading hierarchy resolution
//!
//! A document's hierarchy is the top-down list of heading commands it
//! actually uses. Canonical names are tried first, followed by synthetic
//! `sub...section` names up to a configured bound. Levels are 1-based
//! positions in that list.

use crate::config::BuildConfig;
use crate::markup::TaggedNode;
use itertools::Itertools;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

static SUB_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:sub)*)section$").expect("sub-section pattern is valid"));

/// Number of leading `sub` prefixes on a `...section` name
///
/// # Examples
/// * `"section"` -> `Some(0)`
/// * `"subsubsection"` -> `Some(2)`
/// * `"paragraph"` -> `None`
pub fn sub_prefix_count(name: &str) -> Option<usize> {
    SUB_SECTION
        .captures(name)
        .map(|captures| captures[1].len() / "sub".len())
}

/// Whether `name` is a heading command worth looking up at all
pub fn is_heading_keyword(canonical: &[String], name: &str) -> bool {
    canonical.iter().any(|level| level == name) || sub_prefix_count(name).is_some()
}

/// Ordered heading names in use by one document
///
/// Cloning shares the underlying lists; every node of a tree holds the same
/// hierarchy that was resolved at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    /// Heading names, topmost first
    levels: Arc<[String]>,
    /// Canonical names from the build configuration
    keywords: Arc<[String]>,
}

impl Hierarchy {
    /// Create a hierarchy from explicit level names
    pub fn new(levels: Vec<String>, keywords: Vec<String>) -> Self {
        Self {
            levels: levels.into(),
            keywords: keywords.into(),
        }
    }

    /// Resolve the hierarchy used by the document under `root`
    ///
    /// # Parameters
    /// * `root` - Document root; all of its descendants are searched
    /// * `config` - Canonical names and the synthetic name bound
    ///
    /// # Returns
    /// * `Hierarchy` - Present levels in canonical order, empty for a document without headings
    pub fn resolve(root: &TaggedNode, config: &BuildConfig) -> Self {
        let present: HashSet<&str> = root
            .descendants()
            .filter(|node| !node.is_text())
            .map(|node| node.name.as_str())
            .collect();

        let deepest = present
            .iter()
            .filter_map(|name| sub_prefix_count(name))
            .max();

        let levels = candidate_levels(config, deepest)
            .filter(|name| present.contains(name.as_str()))
            .collect_vec();

        if !levels.is_empty() {
            log::debug!("Resolved heading hierarchy: {}", levels.join(" > "));
            return Self::new(levels, config.canonical_levels.clone());
        }

        // Only names deeper than the synthetic bound can still be headings here
        let fallback = present
            .iter()
            .filter_map(|name| sub_prefix_count(name).map(|count| (count, *name)))
            .sorted()
            .map(|(_, name)| name.to_string())
            .collect_vec();

        if fallback.is_empty() {
            log::debug!("No heading commands found; document is a single leaf");
        } else {
            log::debug!(
                "Resolved heading hierarchy by sub-prefix rule: {}",
                fallback.join(" > ")
            );
        }

        Self::new(fallback, config.canonical_levels.clone())
    }

    /// 1-based level of `node`, or `None` when it is not a heading
    pub fn level_of(&self, node: &TaggedNode) -> Option<usize> {
        self.level_of_name(&node.name)
    }

    /// 1-based level of a heading name, or `None` when not in this hierarchy
    pub fn level_of_name(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.levels
            .iter()
            .position(|level| level == name)
            .map(|index| index + 1)
    }

    /// Heading name at a 1-based level
    pub fn name_at(&self, level: usize) -> Option<&str> {
        level
            .checked_sub(1)
            .and_then(|index| self.levels.get(index))
            .map(String::as_str)
    }

    /// Whether `name` is a heading keyword, used by name lookups
    pub fn recognizes(&self, name: &str) -> bool {
        self.level_of_name(name).is_some() || is_heading_keyword(&self.keywords, name)
    }

    /// Level names, topmost first
    pub fn names(&self) -> &[String] {
        &self.levels
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the document has no headings at all
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.levels.join(" > "))
    }
}

/// Canonical names followed by synthetic `sub...section` names, without repeats
///
/// Synthetic names stop at `deepest` prefixes, the longest chain the document uses.
fn candidate_levels(
    config: &BuildConfig,
    deepest: Option<usize>,
) -> impl Iterator<Item = String> + '_ {
    let bound = deepest.map_or(0, |deepest| deepest.min(config.max_sub_prefixes) + 1);
    let synthetic = (0..bound).map(|count| format!("{}section", "sub".repeat(count)));

    config
        .canonical_levels
        .iter()
        .cloned()
        .chain(synthetic)
        .unique()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupParser;

    fn resolve(source: &str) -> Hierarchy {
        resolve_with(source, &BuildConfig::default())
    }

    fn resolve_with(source: &str, config: &BuildConfig) -> Hierarchy {
        let root = MarkupParser::parse(source, config.max_nesting);
        Hierarchy::resolve(&root, config)
    }

    #[test]
    fn test_sub_prefix_count() {
        assert_eq!(sub_prefix_count("section"), Some(0));
        assert_eq!(sub_prefix_count("subsection"), Some(1));
        assert_eq!(sub_prefix_count("subsubsubsection"), Some(3));
        assert_eq!(sub_prefix_count("subsect"), None);
        assert_eq!(sub_prefix_count("chapter"), None);
        assert_eq!(sub_prefix_count("xsection"), None);
    }

    #[test]
    fn test_only_present_levels_are_kept() {
        let hierarchy = resolve("\\subsection{X}\\subsection{Y}");

        assert_eq!(hierarchy.names(), ["subsection"]);
        assert_eq!(hierarchy.level_of_name("subsection"), Some(1));
        assert_eq!(hierarchy.level_of_name("section"), None);
    }

    #[test]
    fn test_canonical_order_wins_over_document_order() {
        let hierarchy = resolve("\\subsection{A1}\\chapter{C}\\section{A}");

        assert_eq!(hierarchy.names(), ["chapter", "section", "subsection"]);
        assert_eq!(hierarchy.to_string(), "chapter > section > subsection");
    }

    #[test]
    fn test_synthetic_levels_extend_canonical_ones() {
        let hierarchy = resolve("\\section{A}\\subsubsubsection{B}\\subsubsection{C}");

        assert_eq!(
            hierarchy.names(),
            ["section", "subsubsection", "subsubsubsection"]
        );
        assert_eq!(hierarchy.name_at(3), Some("subsubsubsection"));
        assert_eq!(hierarchy.name_at(0), None);
        assert_eq!(hierarchy.name_at(4), None);
    }

    #[test]
    fn test_nested_headings_are_found() {
        let hierarchy = resolve("\\begin{document}\\section{A}\\end{document}");

        assert_eq!(hierarchy.names(), ["section"]);
    }

    #[test]
    fn test_fallback_beyond_synthetic_bound() {
        let config = BuildConfig {
            canonical_levels: vec!["chapter".to_string()],
            max_sub_prefixes: 1,
            ..BuildConfig::default()
        };
        let hierarchy = resolve_with("\\subsubsubsection{B}\\subsubsection{A}", &config);

        assert_eq!(hierarchy.names(), ["subsubsection", "subsubsubsection"]);
    }

    #[test]
    fn test_synthetic_names_stop_at_deepest_present_chain() {
        let config = BuildConfig {
            max_sub_prefixes: usize::MAX,
            ..BuildConfig::default()
        };
        let hierarchy = resolve_with("\\section{A}\\subsubsection{B}", &config);

        assert_eq!(hierarchy.names(), ["section", "subsubsection"]);
        assert_eq!(candidate_levels(&config, Some(2)).count(), 4);
        assert_eq!(candidate_levels(&config, None).count(), 3);
    }

    #[test]
    fn test_document_without_headings() {
        let hierarchy = resolve("Just \\textbf{text}.");

        assert!(hierarchy.is_empty());
        assert_eq!(hierarchy.len(), 0);
    }

    #[test]
    fn test_recognizes_absent_keywords() {
        let hierarchy = resolve("\\subsection{X}");

        assert!(hierarchy.recognizes("section"));
        assert!(hierarchy.recognizes("chapter"));
        assert!(hierarchy.recognizes("subsubsubsection"));
        assert!(!hierarchy.recognizes("textbf"));
        assert!(!hierarchy.recognizes(""));
    }

    #[test]
    fn test_text_never_has_a_level() {
        let hierarchy = resolve("\\section{A}");

        assert_eq!(hierarchy.level_of(&TaggedNode::text("section")), None);
    }
}
