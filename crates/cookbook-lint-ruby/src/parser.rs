//! Ruby parser using Tree-sitter.

use cookbook_lint_core::{Node, SourceParser, SyntaxError};
use tree_sitter::{Language, Parser};

use crate::lower::Lowerer;

/// Parses Ruby source into the lint AST.
pub struct RubyParser {
    language: Language,
}

impl RubyParser {
    /// Creates a new Ruby parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_ruby::LANGUAGE.into(),
        }
    }
}

impl Default for RubyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RubyParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RubyParser").finish_non_exhaustive()
    }
}

/// First error or missing node in document order.
fn first_error<'t>(node: tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

fn describe(node: tree_sitter::Node<'_>, src: &str) -> String {
    if node.is_missing() {
        return format!("missing '{}'", node.kind());
    }
    let text = src.get(node.start_byte()..node.end_byte()).unwrap_or("");
    let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
    if snippet.trim().is_empty() {
        "unexpected end of input".to_string()
    } else {
        format!("unexpected '{}'", snippet.trim())
    }
}

impl SourceParser for RubyParser {
    fn language_id(&self) -> &'static str {
        "ruby"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn parse(&self, source: &str) -> Result<Node, SyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| SyntaxError::new(format!("failed to load Ruby grammar: {e}"), 0, 0))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::new("parser produced no tree", 0, 0))?;
        let root = tree.root_node();

        if let Some(bad) = first_error(root) {
            let message = describe(bad, source);
            tracing::debug!("Ruby syntax error at byte {}: {}", bad.start_byte(), message);
            return Err(SyntaxError::new(
                message,
                bad.start_byte(),
                bad.end_byte() - bad.start_byte(),
            ));
        }

        Ok(Lowerer::new(source).lower_program(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_lint_core::NodeTag;

    fn parse(src: &str) -> Node {
        RubyParser::new().parse(src).expect("valid ruby")
    }

    #[test]
    fn parses_empty_source() {
        let tree = parse("");
        assert_eq!(tree.tag(), NodeTag::Program);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn reports_unterminated_block() {
        let err = RubyParser::new()
            .parse("package 'x' do\n  action :install\n")
            .unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn reports_stray_tokens() {
        assert!(RubyParser::new().parse("depends 'apt'\n)\n").is_err());
        assert!(RubyParser::new().parse("def foo(\n").is_err());
    }

    #[test]
    fn handles_rb_files_only() {
        let parser = RubyParser::new();
        assert!(parser.handles(std::path::Path::new("recipes/default.rb")));
        assert!(!parser.handles(std::path::Path::new("templates/default/foo.erb")));
        assert!(!parser.handles(std::path::Path::new("Berksfile")));
    }
}
