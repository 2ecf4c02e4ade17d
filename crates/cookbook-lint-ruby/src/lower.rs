//! Lowering of the tree-sitter Ruby tree into the lint AST.

use cookbook_lint_core::{Node, NodeKind, Span};
use std::collections::HashSet;
use tree_sitter::Node as TsNode;

/// Wrapper nodes whose children are spliced into a block body.
const BODY_WRAPPERS: &[&str] = &["body_statement", "block_body"];

/// Parents whose identifier children always bind a local variable.
const BINDING_PARENTS: &[&str] = &[
    "left_assignment_list",
    "destructured_left_assignment",
    "destructured_parameter",
    "rest_assignment",
    "exception_variable",
];

pub(crate) struct Lowerer<'s> {
    src: &'s str,
    /// Every local variable name bound anywhere in the file.
    locals: HashSet<&'s str>,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(src: &'s str) -> Self {
        Self {
            src,
            locals: HashSet::new(),
        }
    }

    fn text(&self, node: TsNode<'_>) -> &'s str {
        self.src.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    fn span(node: TsNode<'_>) -> Span {
        Span::new(node.start_byte(), node.end_byte())
    }

    pub(crate) fn lower_program(&mut self, root: TsNode<'_>) -> Node {
        self.collect_locals(root);
        Node::new(
            NodeKind::Program,
            Span::new(0, self.src.len()),
            self.lower_children(root),
        )
    }

    /// Records names bound by assignments, parameters, rescue variables
    /// and `for` loops. Scopes are not tracked, so a name bound anywhere
    /// counts as a local everywhere in the file.
    fn collect_locals(&mut self, node: TsNode<'_>) {
        if node.kind() == "identifier" && binds_local(node) {
            let name = self.text(node);
            self.locals.insert(name);
        }
        let mut cursor = node.walk();
        let children: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.collect_locals(child);
        }
    }

    /// Ruby reads an identifier that is not a known local as a method call
    /// on `self` without arguments.
    fn lower_identifier(&self, node: TsNode<'_>) -> Node {
        let name = self.text(node);
        let names_definition = node.parent().is_some_and(|p| match p.kind() {
            "alias" | "undef" => true,
            "method" | "singleton_method" => p.child_by_field_name("name") == Some(node),
            _ => false,
        });
        if names_definition || self.locals.contains(name) {
            return Node::leaf(
                NodeKind::Other {
                    kind: node.kind().to_string(),
                },
                Self::span(node),
            );
        }
        Node::leaf(
            NodeKind::Call {
                method: name.to_string(),
                method_span: Self::span(node),
                has_receiver: false,
                arg_count: 0,
            },
            Self::span(node),
        )
    }

    fn lower_children(&self, node: TsNode<'_>) -> Vec<Node> {
        let mut cursor = node.walk();
        let children: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();
        children.into_iter().map(|c| self.lower(c)).collect()
    }

    fn lower(&self, node: TsNode<'_>) -> Node {
        match node.kind() {
            "comment" => Node::leaf(
                NodeKind::Comment {
                    text: self.text(node).to_string(),
                },
                Self::span(node),
            ),
            "call" => self.lower_call(node),
            "identifier" => self.lower_identifier(node),
            "constant" => Node::leaf(
                NodeKind::Const {
                    name: self.text(node).to_string(),
                    rooted: false,
                },
                Self::span(node),
            ),
            "scope_resolution" => self.lower_scope_resolution(node),
            "string" => self.lower_string(node),
            kind => Node::new(
                NodeKind::Other {
                    kind: kind.to_string(),
                },
                Self::span(node),
                self.lower_children(node),
            ),
        }
    }

    /// `Foo::Bar` becomes `Const(Bar)` with child `Const(Foo)`;
    /// `::Bar` becomes a rooted `Const(Bar)`.
    fn lower_scope_resolution(&self, node: TsNode<'_>) -> Node {
        let Some(name) = node
            .child_by_field_name("name")
            .filter(|n| n.kind() == "constant")
        else {
            return Node::new(
                NodeKind::Other {
                    kind: node.kind().to_string(),
                },
                Self::span(node),
                self.lower_children(node),
            );
        };

        let scope = node.child_by_field_name("scope");
        Node::new(
            NodeKind::Const {
                name: self.text(name).to_string(),
                rooted: scope.is_none(),
            },
            Self::span(node),
            scope.map(|s| self.lower(s)).into_iter().collect(),
        )
    }

    fn lower_call(&self, node: TsNode<'_>) -> Node {
        let receiver = node.child_by_field_name("receiver");
        let method = node.child_by_field_name("method");
        let arguments = node.child_by_field_name("arguments");
        let block = node.child_by_field_name("block");

        let mut children = Vec::new();
        let mut comments = Vec::new();

        if let Some(receiver) = receiver {
            children.push(self.lower(receiver));
        }

        let mut arg_count = 0;
        if let Some(arguments) = arguments {
            let mut cursor = arguments.walk();
            let args: Vec<TsNode<'_>> = arguments.named_children(&mut cursor).collect();
            for arg in args {
                if arg.kind() == "comment" {
                    comments.push(self.lower(arg));
                } else {
                    children.push(self.lower(arg));
                    arg_count += 1;
                }
            }
        }

        // comments between a receiver and a chained method
        let mut cursor = node.walk();
        let direct: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();
        comments.extend(
            direct
                .into_iter()
                .filter(|c| c.kind() == "comment")
                .map(|c| self.lower(c)),
        );
        children.extend(comments);

        let (method_name, method_span) = match method {
            Some(m) => (self.text(m).to_string(), Self::span(m)),
            None => ("call".to_string(), Span::empty(node.start_byte())),
        };

        let call_end = arguments
            .or(method)
            .or(receiver)
            .map_or(node.start_byte(), |n| n.end_byte());
        let call = Node::new(
            NodeKind::Call {
                method: method_name,
                method_span,
                has_receiver: receiver.is_some(),
                arg_count,
            },
            Span::new(node.start_byte(), call_end),
            children,
        );

        match block {
            Some(block) => {
                let mut body = vec![call];
                body.extend(self.lower_block_body(block));
                Node::new(NodeKind::Block, Self::span(node), body)
            }
            None => call,
        }
    }

    /// Statements of a `do ... end` or `{ ... }` block; parameters dropped.
    fn lower_block_body(&self, block: TsNode<'_>) -> Vec<Node> {
        let mut cursor = block.walk();
        let parts: Vec<TsNode<'_>> = block.named_children(&mut cursor).collect();
        let mut body = Vec::new();
        for part in parts {
            match part.kind() {
                "block_parameters" => {}
                kind if BODY_WRAPPERS.contains(&kind) => body.extend(self.lower_children(part)),
                _ => body.push(self.lower(part)),
            }
        }
        body
    }

    /// Literal strings become `Str`; interpolated ones stay `Other` so that
    /// embedded expressions are still visited.
    fn lower_string(&self, node: TsNode<'_>) -> Node {
        let mut cursor = node.walk();
        let parts: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();

        if parts.iter().any(|p| p.kind() == "interpolation") {
            return Node::new(
                NodeKind::Other {
                    kind: "dstr".to_string(),
                },
                Self::span(node),
                self.lower_children(node),
            );
        }

        let raw = self.text(node);
        let value = if raw.starts_with('\'') {
            let inner = raw
                .strip_prefix('\'')
                .and_then(|r| r.strip_suffix('\''))
                .unwrap_or("");
            unescape_single_quoted(inner)
        } else {
            let mut value = String::new();
            for part in parts {
                match part.kind() {
                    "string_content" => value.push_str(self.text(part)),
                    "escape_sequence" => value.push_str(&unescape_sequence(self.text(part))),
                    _ => {}
                }
            }
            value
        };

        Node::leaf(NodeKind::Str { value }, Self::span(node))
    }
}

/// Returns true when `ident` is the target of a binding rather than a
/// read.
fn binds_local(ident: TsNode<'_>) -> bool {
    let Some(parent) = ident.parent() else {
        return false;
    };
    let kind = parent.kind();
    let field_is = |field: &str| parent.child_by_field_name(field) == Some(ident);
    match kind {
        "assignment" | "operator_assignment" => field_is("left"),
        "for" => field_is("pattern"),
        _ if BINDING_PARENTS.contains(&kind) || kind.ends_with("parameters") => true,
        _ if kind.ends_with("_parameter") => field_is("name"),
        _ => false,
    }
}

/// Single quotes only recognise `\\` and `\'`.
fn unescape_single_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '\'' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn unescape_sequence(seq: &str) -> String {
    let Some(rest) = seq.strip_prefix('\\') else {
        return seq.to_string();
    };
    match rest {
        "n" => "\n".to_string(),
        "t" => "\t".to_string(),
        "r" => "\r".to_string(),
        "0" => "\0".to_string(),
        "s" => " ".to_string(),
        "e" => "\u{1b}".to_string(),
        _ => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quoted_unescape() {
        assert_eq!(unescape_single_quoted(r"it\'s"), "it's");
        assert_eq!(unescape_single_quoted(r"C:\\temp"), r"C:\temp");
        assert_eq!(unescape_single_quoted(r"HKLM\SOFTWARE"), r"HKLM\SOFTWARE");
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(unescape_sequence(r"\n"), "\n");
        assert_eq!(unescape_sequence(r"\\"), r"\");
        assert_eq!(unescape_sequence(r#"\""#), "\"");
    }
}
