//! LaTeX tokenizer
//!
//! Converts LaTeX source into [`TaggedNode`]s. Tokenizing never fails:
//! unbalanced groups are closed at end of input and stray closers are dropped.

use super::node::TaggedNode;

/// Environments whose bodies are kept as literal text
const RAW_ENVIRONMENTS: [&str; 3] = ["verbatim", "lstlisting", "minted"];

/// Commands followed by a delimiter token rather than arguments
const DELIMITER_COMMANDS: [&str; 14] = [
    "left", "right", "big", "Big", "bigg", "Bigg", "bigl", "bigr", "Bigl", "Bigr", "biggl",
    "biggr", "Biggl", "Biggr",
];

/// Characters that a backslash turns back into themselves
const ESCAPED_CHARS: &str = "%{}$&#_ ";

/// What closes the sequence currently being parsed
#[derive(Debug, Clone, PartialEq, Eq)]
enum Terminator {
    Eof,
    Brace,
    Bracket,
    Environment(String),
}

/// Outcome of reading a backslash sequence
enum Control {
    /// A command or environment node
    Node(TaggedNode),
    /// Literal text produced by an escape
    Text(String),
    /// The `\end{...}` closing the current environment
    End,
    /// Something to drop
    Skip,
}

/// An `[optional]` or `{required}` argument following a command
struct Argument {
    optional: bool,
    nodes: Vec<TaggedNode>,
}

/// Tokenizer state over a single source string
pub struct MarkupParser {
    /// Source characters
    chars: Vec<char>,
    /// Index of the next unread character
    pos: usize,
    /// Current group/environment nesting
    depth: usize,
    /// Nesting beyond which groups are kept as raw text
    max_nesting: usize,
}

impl MarkupParser {
    fn new(source: &str, max_nesting: usize) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
            max_nesting,
        }
    }

    /// Tokenize a LaTeX document
    ///
    /// # Parameters
    /// * `source` - Raw LaTeX text
    /// * `max_nesting` - Deepest brace/environment nesting parsed into nodes
    ///
    /// # Returns
    /// * `TaggedNode` - Nameless root whose children are the top-level nodes
    pub fn parse(source: &str, max_nesting: usize) -> TaggedNode {
        let mut parser = Self::new(source, max_nesting);
        let children = parser.parse_sequence(&Terminator::Eof);
        TaggedNode::root(children)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Parse nodes until `until` is reached or input ends
    fn parse_sequence(&mut self, until: &Terminator) -> Vec<TaggedNode> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.bump() {
            match c {
                '%' => self.skip_comment(),
                '}' if *until == Terminator::Brace => break,
                '}' => log::debug!("Dropping unmatched '}}' at offset {}", self.pos - 1),
                ']' if *until == Terminator::Bracket => break,
                '{' => {
                    // Bare groups only scope formatting; splice their contents in place
                    for node in self.parse_nested(Terminator::Brace) {
                        if node.is_text() && node.children.is_empty() {
                            text.push_str(&node.text);
                        } else {
                            Self::flush_text(&mut text, &mut nodes);
                            nodes.push(node);
                        }
                    }
                }
                '\\' => match self.parse_control(until) {
                    Control::Node(node) => {
                        Self::flush_text(&mut text, &mut nodes);
                        nodes.push(node);
                    }
                    Control::Text(literal) => text.push_str(&literal),
                    Control::End => break,
                    Control::Skip => {}
                },
                _ => text.push(c),
            }
        }

        Self::flush_text(&mut text, &mut nodes);
        nodes
    }

    /// Parse one nesting level deeper, or keep it raw once the bound is hit
    fn parse_nested(&mut self, until: Terminator) -> Vec<TaggedNode> {
        if self.depth >= self.max_nesting {
            log::debug!(
                "Nesting limit {} reached at offset {}, keeping raw text",
                self.max_nesting,
                self.pos
            );
            let raw = self.take_raw(&until);
            return if raw.is_empty() {
                Vec::new()
            } else {
                vec![TaggedNode::text(raw)]
            };
        }

        self.depth += 1;
        let nodes = self.parse_sequence(&until);
        self.depth -= 1;
        nodes
    }

    /// Read a backslash sequence (the backslash is already consumed)
    fn parse_control(&mut self, until: &Terminator) -> Control {
        let Some(c) = self.peek() else {
            return Control::Text("\\".to_string());
        };

        if c.is_ascii_alphabetic() {
            let name = self.read_name();
            if self.peek() == Some('*') {
                self.pos += 1;
            }
            return match name.as_str() {
                "begin" => self.parse_environment(),
                "end" => {
                    let env = self.read_braced_word();
                    if *until == Terminator::Environment(env.clone()) {
                        Control::End
                    } else {
                        log::debug!("Dropping unmatched \\end{{{}}}", env);
                        Control::Skip
                    }
                }
                _ if DELIMITER_COMMANDS.contains(&name.as_str()) => {
                    Control::Node(TaggedNode::command(name, "", Vec::new()))
                }
                _ => Control::Node(self.parse_command(name)),
            };
        }

        self.pos += 1;
        match c {
            '\\' => Control::Text("\n".to_string()),
            c if ESCAPED_CHARS.contains(c) => Control::Text(c.to_string()),
            // Spacing symbols such as \, and \; become nameable commands
            c => Control::Node(TaggedNode::command(c.to_string(), "", Vec::new())),
        }
    }

    /// Parse the arguments after `\name` and assemble the command node
    fn parse_command(&mut self, name: String) -> TaggedNode {
        let arguments = self.parse_arguments();
        let text = arguments
            .iter()
            .find(|argument| !argument.optional)
            .map(|argument| Self::joined_text(&argument.nodes))
            .unwrap_or_default();
        let children = arguments
            .into_iter()
            .flat_map(|argument| argument.nodes)
            .collect();

        TaggedNode::command(name, text, children)
    }

    /// Parse `\begin{env}...\end{env}` (the `\begin` is already consumed)
    fn parse_environment(&mut self) -> Control {
        let name = self.read_braced_word();
        if name.is_empty() {
            log::debug!("Ignoring \\begin without an environment name");
            return Control::Skip;
        }

        let arguments = self.parse_arguments();
        let body = if RAW_ENVIRONMENTS.contains(&name.as_str()) {
            let raw = self.take_raw(&Terminator::Environment(name.clone()));
            vec![TaggedNode::text(raw)]
        } else {
            self.parse_nested(Terminator::Environment(name.clone()))
        };

        let text = Self::joined_text(&body);
        let mut children: Vec<TaggedNode> = arguments
            .into_iter()
            .flat_map(|argument| argument.nodes)
            .collect();
        children.extend(body);

        Control::Node(TaggedNode::command(name, text, children))
    }

    /// Collect `[...]` and `{...}` arguments
    ///
    /// Whitespace is allowed before the first argument only; later arguments
    /// must follow directly. A `[` without a reachable `]` is left as text.
    fn parse_arguments(&mut self) -> Vec<Argument> {
        let mut arguments = Vec::new();

        loop {
            let start = self.pos;
            if arguments.is_empty() {
                self.skip_inline_space();
            }

            let terminator = match self.peek() {
                Some('{') => Terminator::Brace,
                Some('[') if self.bracket_closes() => Terminator::Bracket,
                _ => {
                    self.pos = start;
                    break;
                }
            };
            self.pos += 1;

            let optional = terminator == Terminator::Bracket;
            let nodes = self.parse_nested(terminator);
            arguments.push(Argument { optional, nodes });
        }

        arguments
    }

    /// Whether the `[` at the current position has a matching `]`
    ///
    /// The search gives up at end of input, at a blank line, or at a `}`
    /// that closes a group opened before the `[`.
    fn bracket_closes(&self) -> bool {
        let mut braces = 0usize;
        let mut brackets = 0usize;
        let mut i = self.pos + 1;

        while let Some(&c) = self.chars.get(i) {
            match c {
                '\\' => i += 1,
                '%' => {
                    while self.chars.get(i + 1).is_some_and(|&next| next != '\n') {
                        i += 1;
                    }
                }
                '{' => braces += 1,
                '}' if braces == 0 => return false,
                '}' => braces -= 1,
                '[' if braces == 0 => brackets += 1,
                ']' if braces == 0 && brackets == 0 => return true,
                ']' if braces == 0 => brackets -= 1,
                '\n' if self.chars.get(i + 1) == Some(&'\n') => return false,
                _ => {}
            }
            i += 1;
        }

        false
    }

    /// Read raw characters up to the closer for `until`, honoring nesting
    fn take_raw(&mut self, until: &Terminator) -> String {
        let mut raw = String::new();

        match until {
            Terminator::Eof => {
                raw.extend(&self.chars[self.pos..]);
                self.pos = self.chars.len();
            }
            Terminator::Brace | Terminator::Bracket => {
                let (open, close) = if *until == Terminator::Brace {
                    ('{', '}')
                } else {
                    ('[', ']')
                };
                let mut level = 0usize;
                while let Some(c) = self.bump() {
                    if c == '\\' {
                        raw.push(c);
                        if let Some(escaped) = self.bump() {
                            raw.push(escaped);
                        }
                        continue;
                    }
                    if c == open {
                        level += 1;
                    } else if c == close {
                        if level == 0 {
                            break;
                        }
                        level -= 1;
                    }
                    raw.push(c);
                }
            }
            Terminator::Environment(name) => {
                let end = format!("\\end{{{}}}", name);
                while let Some(c) = self.bump() {
                    raw.push(c);
                    if raw.ends_with(&end) {
                        raw.truncate(raw.len() - end.len());
                        break;
                    }
                }
            }
        }

        raw
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(c);
            self.pos += 1;
        }
        name
    }

    /// Read `{word}` verbatim, returning an empty string if no brace follows
    fn read_braced_word(&mut self) -> String {
        let start = self.pos;
        self.skip_inline_space();
        if self.peek() != Some('{') {
            self.pos = start;
            return String::new();
        }
        self.pos += 1;

        let mut word = String::new();
        while let Some(c) = self.bump() {
            if c == '}' {
                break;
            }
            word.push(c);
        }
        word.trim().to_string()
    }

    fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn flush_text(text: &mut String, nodes: &mut Vec<TaggedNode>) {
        if !text.is_empty() {
            nodes.push(TaggedNode::text(std::mem::take(text)));
        }
    }

    fn joined_text(nodes: &[TaggedNode]) -> String {
        nodes.iter().map(|node| node.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TaggedNode {
        MarkupParser::parse(source, 64)
    }

    #[test]
    fn test_command_with_argument() {
        let root = parse("\\section{Intro} Hello");

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "section");
        assert_eq!(root.children[0].text, "Intro");
        assert_eq!(root.children[0].children, vec![TaggedNode::text("Intro")]);
        assert_eq!(root.children[1], TaggedNode::text(" Hello"));
    }

    #[test]
    fn test_optional_argument_does_not_become_text() {
        let root = parse("\\section[Short]{Long Title}");
        let section = &root.children[0];

        assert_eq!(section.text, "Long Title");
        assert_eq!(section.children.len(), 2);
    }

    #[test]
    fn test_starred_command_keeps_plain_name() {
        let root = parse("\\section*{Preface}");

        assert_eq!(root.children[0].name, "section");
        assert_eq!(root.children[0].text, "Preface");
    }

    #[test]
    fn test_comments_are_dropped_and_escapes_kept() {
        let root = parse("50\\% done % a comment\nnext\\\\line");

        assert_eq!(root.children, vec![TaggedNode::text("50% done next\nline")]);
    }

    #[test]
    fn test_environment_nesting() {
        let root = parse("\\begin{document}\n\\section{A}\nText\n\\end{document}");

        assert_eq!(root.children.len(), 1);
        let document = &root.children[0];
        assert_eq!(document.name, "document");
        assert_eq!(document.children[1].name, "section");
        assert!(root.has_descendant_named("section"));
    }

    #[test]
    fn test_environment_arguments_precede_body() {
        let root = parse("\\begin{tabular}{cc}a & b\\end{tabular}");
        let tabular = &root.children[0];

        assert_eq!(tabular.name, "tabular");
        assert_eq!(tabular.children[0], TaggedNode::text("cc"));
        assert_eq!(tabular.text, "a & b");
    }

    #[test]
    fn test_verbatim_body_is_not_tokenized() {
        let root = parse("\\begin{verbatim}\\section{X}\\end{verbatim}");

        assert_eq!(root.children[0].text, "\\section{X}");
        assert!(!root.has_descendant_named("section"));
    }

    #[test]
    fn test_bare_groups_are_spliced() {
        let root = parse("a{b}c{\\bf d}");

        assert_eq!(root.children[0], TaggedNode::text("abc"));
        assert_eq!(root.children[1].name, "bf");
    }

    #[test]
    fn test_unbalanced_input_recovers() {
        let root = parse("} \\section{A \\end{itemize}");

        assert_eq!(root.children[0], TaggedNode::text(" "));
        assert_eq!(root.children[1].name, "section");
        assert_eq!(root.children[1].text, "A ");
    }

    #[test]
    fn test_unclosed_bracket_after_command_is_text() {
        let root = parse("Let $x \\in [0,1)$ hold.");

        assert_eq!(root.children[1].name, "in");
        assert!(root.children[1].children.is_empty());
        assert_eq!(root.children[2], TaggedNode::text(" [0,1)$ hold."));
    }

    #[test]
    fn test_bracket_inside_heading_argument_stays_inside() {
        let root = parse("\\section{Values $x \\in [0,1)$}\\subsection{B}\\section{C}");
        let names: Vec<&str> = root.children.iter().map(|node| node.name.as_str()).collect();

        assert_eq!(names, vec!["section", "subsection", "section"]);
        assert_eq!(root.children[0].text, "Values $x  [0,1)$");
        assert_eq!(root.children[1].text, "B");
    }

    #[test]
    fn test_bracket_closed_after_blank_line_is_text() {
        let root = parse("\\item [draft\n\nNext] done");

        assert!(root.children[0].children.is_empty());
        assert_eq!(root.children[1], TaggedNode::text(" [draft\n\nNext] done"));
    }

    #[test]
    fn test_delimiter_commands_take_no_arguments() {
        let root = parse("$\\left[ a \\right]$");
        let text: String = root.children.iter().map(|node| node.text.as_str()).collect();

        assert_eq!(root.children[1].name, "left");
        assert!(root.children[1].children.is_empty());
        assert_eq!(text, "$[ a ]$");
    }

    #[test]
    fn test_nesting_limit_keeps_raw_text() {
        let root = MarkupParser::parse("{{{x}}}", 1);

        assert_eq!(root.children, vec![TaggedNode::text("{x}")]);
    }

    #[test]
    fn test_control_symbol_becomes_command() {
        let root = parse("a\\,b");

        assert_eq!(root.children[1].name, ",");
        assert_eq!(root.children[2], TaggedNode::text("b"));
    }
}
