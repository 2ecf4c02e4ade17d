//! Language-neutral syntax tree consumed by rules.
//!
//! Parsers lower their concrete trees into [`Node`], a closed set of node
//! kinds with just enough payload for pattern matching. Rules never see the
//! parser's own tree type.

use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `offset`.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-length span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Discriminant of [`NodeKind`], used for rule dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTag {
    /// Document root.
    Program,
    /// Method call / message send.
    Call,
    /// Constant reference, possibly namespaced.
    Const,
    /// Literal string without interpolation.
    Str,
    /// Line comment.
    Comment,
    /// Block attached to a call.
    Block,
    /// Any other construct.
    Other,
}

impl NodeTag {
    /// All tags, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Program,
        Self::Call,
        Self::Const,
        Self::Str,
        Self::Comment,
        Self::Block,
        Self::Other,
    ];
}

impl std::fmt::Display for NodeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Program => "program",
            Self::Call => "call",
            Self::Const => "const",
            Self::Str => "str",
            Self::Comment => "comment",
            Self::Block => "block",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Node kind plus its semantic payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root; children are top-level statements and comments.
    Program,
    /// Method call. Children are `[receiver?] ++ arguments ++ [comments]`.
    Call {
        /// Method name as written, including `!`/`?` suffixes.
        method: String,
        /// Span of the method name alone.
        method_span: Span,
        /// Whether the first child is an explicit receiver.
        has_receiver: bool,
        /// Number of argument children following the receiver.
        arg_count: usize,
    },
    /// Constant reference. Child `[scope]` when namespaced.
    Const {
        /// Last path segment (`Runner` in `ChefSpec::Runner`).
        name: String,
        /// True for `::Name` (explicit top-level lookup).
        rooted: bool,
    },
    /// Literal string.
    Str {
        /// Unescaped value.
        value: String,
    },
    /// Comment, including the leading `#`.
    Comment {
        /// Raw comment text.
        text: String,
    },
    /// Block. First child is the call it is attached to, then body statements.
    Block,
    /// Anything without a dedicated kind.
    Other {
        /// Parser-specific kind name.
        kind: String,
    },
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node kind and payload.
    pub kind: NodeKind,
    /// Source range covered by this node.
    pub span: Span,
    /// Ordered child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node.
    #[must_use]
    pub fn new(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    /// Creates a childless node.
    #[must_use]
    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Self::new(kind, span, Vec::new())
    }

    /// Returns the dispatch tag of this node.
    #[must_use]
    pub fn tag(&self) -> NodeTag {
        match self.kind {
            NodeKind::Program => NodeTag::Program,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::Const { .. } => NodeTag::Const,
            NodeKind::Str { .. } => NodeTag::Str,
            NodeKind::Comment { .. } => NodeTag::Comment,
            NodeKind::Block => NodeTag::Block,
            NodeKind::Other { .. } => NodeTag::Other,
        }
    }

    /// Method name if this is a call.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Call { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Span of the method name if this is a call.
    #[must_use]
    pub fn method_span(&self) -> Option<Span> {
        match self.kind {
            NodeKind::Call { method_span, .. } => Some(method_span),
            _ => None,
        }
    }

    /// Explicit receiver of a call.
    #[must_use]
    pub fn receiver(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Call {
                has_receiver: true,
                ..
            } => self.children.first(),
            _ => None,
        }
    }

    /// Arguments of a call, empty for other kinds.
    #[must_use]
    pub fn arguments(&self) -> &[Node] {
        match self.kind {
            NodeKind::Call {
                has_receiver,
                arg_count,
                ..
            } => {
                let start = usize::from(has_receiver);
                self.children.get(start..start + arg_count).unwrap_or(&[])
            }
            _ => &[],
        }
    }

    /// Returns true for a call without receiver named `method`
    /// (a command sent to `self`, e.g. `depends 'apt'`).
    #[must_use]
    pub fn is_command(&self, method: &str) -> bool {
        self.method_name() == Some(method) && self.receiver().is_none()
    }

    /// Value of a string literal node.
    #[must_use]
    pub fn str_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Str { value } => Some(value),
            _ => None,
        }
    }

    /// Value of the first argument when it is a string literal.
    #[must_use]
    pub fn first_string_arg(&self) -> Option<&str> {
        self.arguments().first().and_then(Node::str_value)
    }

    /// Comment text if this is a comment.
    #[must_use]
    pub fn comment_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Namespace of a constant (`ChefSpec` in `ChefSpec::Runner`).
    #[must_use]
    pub fn const_scope(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Const { .. } => self.children.first(),
            _ => None,
        }
    }

    /// Path segments of an unrooted constant chain, outermost first.
    ///
    /// Returns `None` when this is not a constant or any scope segment is
    /// not itself a constant.
    #[must_use]
    pub fn const_path(&self) -> Option<Vec<&str>> {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            let NodeKind::Const { name, rooted } = &current.kind else {
                return None;
            };
            segments.push(name.as_str());
            match current.const_scope() {
                Some(scope) => current = scope,
                None if *rooted => return None,
                None => break,
            }
        }
        segments.reverse();
        Some(segments)
    }

    /// Returns true when this constant is exactly `path` with no leading `::`.
    #[must_use]
    pub fn is_const_path(&self, path: &[&str]) -> bool {
        self.const_path().is_some_and(|p| p == path)
    }

    /// Call a block is attached to.
    #[must_use]
    pub fn block_call(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Block => self.children.first().filter(|c| c.tag() == NodeTag::Call),
            _ => None,
        }
    }

    /// Statements inside a block.
    #[must_use]
    pub fn block_body(&self) -> &[Node] {
        match self.kind {
            NodeKind::Block => self.children.get(1..).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Pre-order iterator over this node and all descendants.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator returned by [`Node::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn konst(name: &str, start: usize, end: usize, scope: Option<Node>) -> Node {
        Node::new(
            NodeKind::Const {
                name: name.to_string(),
                rooted: false,
            },
            Span::new(start, end),
            scope.into_iter().collect(),
        )
    }

    fn string(value: &str, start: usize, end: usize) -> Node {
        Node::leaf(
            NodeKind::Str {
                value: value.to_string(),
            },
            Span::new(start, end),
        )
    }

    #[test]
    fn const_path_of_namespaced_constant() {
        let node = konst("Runner", 0, 16, Some(konst("ChefSpec", 0, 8, None)));
        assert_eq!(node.const_path(), Some(vec!["ChefSpec", "Runner"]));
        assert!(node.is_const_path(&["ChefSpec", "Runner"]));
        assert!(!node.is_const_path(&["Runner"]));
    }

    #[test]
    fn rooted_constant_has_no_relative_path() {
        let root = Node::leaf(
            NodeKind::Const {
                name: "ChefSpec".to_string(),
                rooted: true,
            },
            Span::new(0, 10),
        );
        let node = konst("Runner", 0, 18, Some(root));
        assert_eq!(node.const_path(), None);
    }

    #[test]
    fn call_accessors_split_receiver_and_arguments() {
        let call = Node::new(
            NodeKind::Call {
                method: "converge".to_string(),
                method_span: Span::new(4, 12),
                has_receiver: true,
                arg_count: 1,
            },
            Span::new(0, 17),
            vec![konst("Foo", 0, 3, None), string("x", 13, 16)],
        );
        assert_eq!(call.method_name(), Some("converge"));
        assert!(call.receiver().is_some());
        assert_eq!(call.arguments().len(), 1);
        assert_eq!(call.first_string_arg(), Some("x"));
        assert!(!call.is_command("converge"));
    }

    #[test]
    fn walk_is_pre_order() {
        let tree = Node::new(
            NodeKind::Program,
            Span::new(0, 20),
            vec![
                konst("B", 0, 4, Some(konst("A", 0, 1, None))),
                string("s", 10, 13),
            ],
        );
        let tags: Vec<NodeTag> = tree.walk().map(Node::tag).collect();
        assert_eq!(
            tags,
            vec![NodeTag::Program, NodeTag::Const, NodeTag::Const, NodeTag::Str]
        );
    }

    #[test]
    fn span_len() {
        let a = Span::new(2, 5);
        assert_eq!(a.len(), 3);
        assert!(Span::empty(4).is_empty());
    }
}
