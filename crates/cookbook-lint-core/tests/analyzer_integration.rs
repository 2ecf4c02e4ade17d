//! Integration test: discovery, parallel linting and autocorrect on disk.
//!
//! Uses a line-oriented stand-in parser so the pipeline can be exercised
//! without a real grammar.

use cookbook_lint_core::{
    Analyzer, Config, Correction, FileErrorKind, Node, NodeKind, NodeTag, Offense, Rule,
    RuleContext, RuleError, Severity, SourceParser, Span, Suggestion, SyntaxError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct LineParser;

impl SourceParser for LineParser {
    fn language_id(&self) -> &'static str {
        "lines"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn parse(&self, source: &str) -> Result<Node, SyntaxError> {
        if let Some(i) = source.find("<<<") {
            return Err(SyntaxError::new("unterminated heredoc", i, 3));
        }
        let mut children = Vec::new();
        let mut offset = 0;
        for line in source.split_inclusive('\n') {
            let text = line.trim_end_matches('\n');
            children.push(Node::leaf(
                NodeKind::Comment {
                    text: text.to_string(),
                },
                Span::new(offset, offset + text.len()),
            ));
            offset += line.len();
        }
        Ok(Node::new(NodeKind::Program, Span::new(0, source.len()), children))
    }
}

/// Flags `legacy_call` and rewrites it to `modern_call`.
struct LegacyCall;

impl Rule for LegacyCall {
    fn name(&self) -> &'static str {
        "legacy-call"
    }

    fn code(&self) -> &'static str {
        "T001"
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Comment]
    }

    fn is_autocorrectable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        let Some(i) = node.comment_text().and_then(|t| t.find("legacy_call")) else {
            return Ok(Vec::new());
        };
        let start = node.span.start + i;
        let span = Span::new(start, start + "legacy_call".len());
        let fix = Correction::replace(ctx.location(span), "modern_call");
        Ok(vec![ctx
            .offense(self, span, "legacy_call is deprecated")
            .with_suggestion(Suggestion::with_fix("Use modern_call", fix))])
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn cookbook() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "recipes/default.rb", "package 'x'\nlegacy_call\n");
    write(dir.path(), "recipes/clean.rb", "package 'y'\n");
    write(dir.path(), "libraries/broken.rb", "x = <<<\n");
    write(dir.path(), "vendor/other/recipes/default.rb", "legacy_call\n");
    write(dir.path(), "README.md", "legacy_call\n");
    dir
}

fn analyzer(root: &Path, autocorrect: bool) -> Analyzer {
    Analyzer::builder()
        .root(root)
        .parser(LineParser)
        .rule(LegacyCall)
        .current_year(2024)
        .autocorrect(autocorrect)
        .build()
        .expect("analyzer should build")
}

#[test]
fn reports_offenses_and_isolates_syntax_errors() {
    let dir = cookbook();
    let result = analyzer(dir.path(), false).analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 3, "vendor and non-ruby files are skipped");
    assert_eq!(result.offenses.len(), 1);
    let offense = &result.offenses[0];
    assert_eq!(offense.location.file, Path::new("recipes/default.rb"));
    assert_eq!((offense.location.line, offense.location.column), (2, 1));
    assert_eq!(offense.severity, Severity::Warning);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, FileErrorKind::Syntax);
    assert_eq!(result.errors[0].file, Path::new("libraries/broken.rb"));
    assert_eq!(result.exit_code(Severity::Refactor), 2);
}

#[test]
fn autocorrect_rewrites_files_on_disk() {
    let dir = cookbook();
    fs::remove_file(dir.path().join("libraries/broken.rb")).unwrap();

    let result = analyzer(dir.path(), true).analyze().expect("analysis should succeed");

    assert_eq!(result.files_corrected, 1);
    assert_eq!(result.corrected_count(), 1);
    assert_eq!(result.exit_code(Severity::Refactor), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("recipes/default.rb")).unwrap(),
        "package 'x'\nmodern_call\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("vendor/other/recipes/default.rb")).unwrap(),
        "legacy_call\n",
        "excluded files are never touched"
    );
}

#[test]
fn explicit_file_paths_are_linted_directly() {
    let dir = cookbook();
    let result = Analyzer::builder()
        .root(dir.path())
        .path(dir.path().join("recipes/default.rb"))
        .path(dir.path().join("recipes/clean.rb"))
        .parser(LineParser)
        .rule(LegacyCall)
        .current_year(2024)
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(result.files_checked, 2);
    assert_eq!(result.offenses.len(), 1);
    assert!(result.errors.is_empty());
}

#[test]
fn config_disables_rules_and_bounds_parallelism() {
    let dir = cookbook();
    let config = Config::parse(
        r#"
[analyzer]
parallelism = 2

[rules.legacy-call]
enabled = false
"#,
    )
    .unwrap();

    let result = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .parser(LineParser)
        .rule(LegacyCall)
        .current_year(2024)
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert!(result.offenses.is_empty());
    assert_eq!(result.files_checked, 3);
}

#[test]
fn missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = Analyzer::builder()
        .root(dir.path())
        .path(dir.path().join("nope"))
        .parser(LineParser)
        .current_year(2024)
        .build()
        .unwrap()
        .analyze()
        .unwrap_err();
    assert!(err.to_string().contains("Path not found"));
}
