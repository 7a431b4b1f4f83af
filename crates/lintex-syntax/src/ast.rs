//! Ownership tree over commands, environments, math spans, comments and
//! literal text.
//!
//! The tree is built in a single left-to-right pass, independently of
//! the tokenizer, and is deliberately lenient: malformed nesting is
//! absorbed rather than reported. Structural soundness is the business
//! of the diagnostic passes; this tree exists for display and
//! statistics.
//!
//! Nodes live by value in an arena owned by [`SyntaxTree`]. Parent links
//! are plain indices used for upward traversal only, so ownership stays
//! strictly top-down.

use serde::Serialize;

/// Kind tag of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Command,
    Environment,
    Math,
    Text,
    Comment,
}

impl NodeKind {
    fn label(self) -> &'static str {
        match self {
            NodeKind::Command => "command",
            NodeKind::Environment => "environment",
            NodeKind::Math => "math",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
        }
    }
}

/// Index of a node inside its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

/// A single tree node. `value` holds the command name (without the
/// backslash), the environment name, the math delimiter, one character
/// of text, or the full comment text, depending on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<NodeId>,
    /// Advisory back link; `None` only for the root.
    pub parent: Option<NodeId>,
}

/// The syntax tree of one document. The root is a synthetic [`Text`]
/// node with an empty value.
///
/// [`Text`]: NodeKind::Text
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// Builds the tree for `text` in one pass.
    ///
    /// Construction rules, in order of precedence at each position:
    ///
    /// - `\begin{name}` opens an Environment node and descends into it.
    /// - `\end{name}` closes the current node only when it is an
    ///   Environment named `name`; anything else is absorbed silently.
    /// - `\command` opens a Command node and descends into it: a command
    ///   scopes over what follows until a `}` or a matching `\end`
    ///   returns to its parent.
    /// - `{` descends without creating a node; `}` ascends to the
    ///   parent of the current node.
    /// - `$` inserts a Math node and descends. The builder does not
    ///   distinguish delimiter flavors and never ascends out of a Math
    ///   node except through an enclosing `}`.
    /// - `%` inserts a Comment node holding the remainder of the
    ///   document and ends the pass. The tokenizer stops its comments at
    ///   end of line; the divergence is intentional and documented.
    /// - Any other character becomes its own single-character Text node.
    pub fn build(text: &str) -> SyntaxTree {
        Builder::new().build(text)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal. The callback receives each node together
    /// with its depth (root is depth 0).
    pub fn walk<F: FnMut(NodeId, &Node, usize)>(&self, f: &mut F) {
        self.walk_from(self.root, 0, f);
    }

    fn walk_from<F: FnMut(NodeId, &Node, usize)>(&self, id: NodeId, depth: usize, f: &mut F) {
        let node = self.node(id);
        f(id, node, depth);
        for &child in &node.children {
            self.walk_from(child, depth + 1, f);
        }
    }

    /// Indented plain-text dump, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |_, node, depth| {
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(node.kind.label());
            out.push_str(": ");
            out.push_str(&node.value);
            out.push('\n');
        });
        out
    }
}

struct Builder {
    nodes: Vec<Node>,
    current: NodeId,
}

impl Builder {
    fn new() -> Self {
        let root = Node {
            kind: NodeKind::Text,
            value: String::new(),
            children: Vec::new(),
            parent: None,
        };
        Self {
            nodes: vec![root],
            current: NodeId(0),
        }
    }

    fn push(&mut self, kind: NodeKind, value: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            value,
            children: Vec::new(),
            parent: Some(self.current),
        });
        self.nodes[self.current.0].children.push(id);
        id
    }

    fn descend(&mut self, kind: NodeKind, value: String) {
        self.current = self.push(kind, value);
    }

    fn ascend(&mut self) {
        self.current = self.nodes[self.current.0].parent.unwrap_or(NodeId(0));
    }

    fn build(mut self, text: &str) -> SyntaxTree {
        let mut i = 0;
        while i < text.len() {
            let rest = &text[i..];

            if let Some((name, len)) = braced_tag(rest, "\\begin{") {
                self.descend(NodeKind::Environment, name.to_string());
                i += len;
                continue;
            }

            if let Some((name, len)) = braced_tag(rest, "\\end{") {
                let node = &self.nodes[self.current.0];
                if node.kind == NodeKind::Environment && node.value == name {
                    self.ascend();
                }
                // A mismatched \end closes nothing.
                i += len;
                continue;
            }

            if rest.starts_with('\\') {
                let name: String = rest[1..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphabetic() || *c == '@')
                    .collect();
                i += 1 + name.len();
                self.descend(NodeKind::Command, name);
                continue;
            }

            let c = match rest.chars().next() {
                Some(c) => c,
                None => break,
            };

            match c {
                '{' => {
                    // Argument opening is invisible; the command node is
                    // already the current scope.
                    i += 1;
                }
                '}' => {
                    self.ascend();
                    i += 1;
                }
                '$' => {
                    self.descend(NodeKind::Math, "$".to_string());
                    i += 1;
                }
                '%' => {
                    // The comment swallows everything to end of input
                    // and terminates the pass.
                    self.push(NodeKind::Comment, rest.to_string());
                    break;
                }
                _ => {
                    self.push(NodeKind::Text, c.to_string());
                    i += c.len_utf8();
                }
            }
        }

        SyntaxTree {
            nodes: self.nodes,
            root: NodeId(0),
        }
    }
}

/// Matches `prefix` + any characters up to `}`, returning the name and
/// the total byte length. Unlike the tokenizer, the builder accepts any
/// name that reaches a closing brace.
fn braced_tag<'a>(rest: &'a str, prefix: &str) -> Option<(&'a str, usize)> {
    let after = rest.strip_prefix(prefix)?;
    let name_len = after.find('}')?;
    Some((&after[..name_len], prefix.len() + name_len + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_kinds(tree: &SyntaxTree, id: NodeId) -> Vec<(NodeKind, String)> {
        tree.node(id)
            .children
            .iter()
            .map(|&c| (tree.node(c).kind, tree.node(c).value.clone()))
            .collect()
    }

    #[test]
    fn test_root_is_synthetic_text() {
        let tree = SyntaxTree::build("");
        let root = tree.node(tree.root());
        assert_eq!(root.kind, NodeKind::Text);
        assert_eq!(root.value, "");
        assert!(root.parent.is_none());
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_command_scopes_over_argument() {
        let tree = SyntaxTree::build(r"\textbf{bold}");
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 1);

        let cmd = tree.node(root.children[0]);
        assert_eq!(cmd.kind, NodeKind::Command);
        assert_eq!(cmd.value, "textbf");

        let letters = child_kinds(&tree, root.children[0]);
        assert_eq!(
            letters,
            vec![
                (NodeKind::Text, "b".to_string()),
                (NodeKind::Text, "o".to_string()),
                (NodeKind::Text, "l".to_string()),
                (NodeKind::Text, "d".to_string()),
            ]
        );
    }

    #[test]
    fn test_closing_brace_returns_to_parent() {
        let tree = SyntaxTree::build(r"\textbf{b}c");
        let root = tree.node(tree.root());
        // `c` is a sibling of the command, not its child.
        assert_eq!(root.children.len(), 2);
        assert_eq!(tree.node(root.children[1]).kind, NodeKind::Text);
        assert_eq!(tree.node(root.children[1]).value, "c");
    }

    #[test]
    fn test_environment_nesting() {
        let tree = SyntaxTree::build("\\begin{itemize}a\\end{itemize}b");
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 2);

        let env = tree.node(root.children[0]);
        assert_eq!(env.kind, NodeKind::Environment);
        assert_eq!(env.value, "itemize");
        assert_eq!(env.children.len(), 1);

        let after = tree.node(root.children[1]);
        assert_eq!(after.value, "b");
    }

    #[test]
    fn test_mismatched_end_is_absorbed() {
        let tree = SyntaxTree::build("\\begin{itemize}a\\end{enumerate}b");
        let root = tree.node(tree.root());
        // The environment never closes, so `b` stays inside it.
        assert_eq!(root.children.len(), 1);
        let env = tree.node(root.children[0]);
        assert_eq!(env.kind, NodeKind::Environment);
        let values: Vec<_> = child_kinds(&tree, root.children[0]);
        assert_eq!(
            values,
            vec![
                (NodeKind::Text, "a".to_string()),
                (NodeKind::Text, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_math_node_descends_and_stays_open() {
        let tree = SyntaxTree::build("$x$y");
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 1);

        let math = tree.node(root.children[0]);
        assert_eq!(math.kind, NodeKind::Math);
        assert_eq!(math.value, "$");
        // The second `$` opens a nested Math node; `y` lands inside it.
        assert_eq!(math.children.len(), 2);
        let inner = tree.node(math.children[1]);
        assert_eq!(inner.kind, NodeKind::Math);
        assert_eq!(child_kinds(&tree, math.children[1]), vec![(NodeKind::Text, "y".to_string())]);
    }

    #[test]
    fn test_comment_swallows_to_end_of_document() {
        let tree = SyntaxTree::build("a% rest\nof doc");
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 2);
        let comment = tree.node(root.children[1]);
        assert_eq!(comment.kind, NodeKind::Comment);
        assert_eq!(comment.value, "% rest\nof doc");
    }

    #[test]
    fn test_command_name_without_backslash() {
        let tree = SyntaxTree::build(r"\section{A}");
        let root = tree.node(tree.root());
        assert_eq!(tree.node(root.children[0]).value, "section");
    }

    #[test]
    fn test_parent_links_point_upward() {
        let tree = SyntaxTree::build("\\begin{a}\\textbf{x}\\end{a}");
        tree.walk(&mut |id, node, _| {
            if let Some(parent) = node.parent {
                assert!(tree.node(parent).children.contains(&id));
            } else {
                assert_eq!(id, tree.root());
            }
        });
    }

    #[test]
    fn test_render_indents_by_depth() {
        let tree = SyntaxTree::build(r"\textbf{b}");
        let rendered = tree.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "text: ");
        assert_eq!(lines[1], "  command: textbf");
        assert_eq!(lines[2], "    text: b");
    }

    #[test]
    fn test_unterminated_begin_becomes_command() {
        // `\begin{` with no closing brace is not an environment tag; the
        // command rule picks up `\begin` instead.
        let tree = SyntaxTree::build("\\begin{ab");
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 1);
        let cmd = tree.node(root.children[0]);
        assert_eq!(cmd.kind, NodeKind::Command);
        assert_eq!(cmd.value, "begin");
    }
}
