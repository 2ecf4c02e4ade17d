//! Single-pass rule evaluation over one document.

use crate::ast::Node;
use crate::config::Config;
use crate::context::FileContext;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleContext};
use crate::types::{FileError, FileErrorKind, Location, Offense, Severity, Suggestion};
use crate::utils::allowance::AllowIndex;
use crate::version::{is_eligible, TargetVersion};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::debug;

/// A rule failed on one node; evaluation of other nodes continued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "rule '{}' failed at {}:{}:{}: {}",
    .rule,
    .location.file.display(),
    .location.line,
    .location.column,
    .message
)]
pub struct RuleEvaluationError {
    /// Name of the failing rule.
    pub rule: String,
    /// Location of the node being inspected.
    pub location: Location,
    /// Error or panic message.
    pub message: String,
}

impl From<&RuleEvaluationError> for FileError {
    fn from(e: &RuleEvaluationError) -> Self {
        FileError::new(
            e.location.file.clone(),
            FileErrorKind::RuleEvaluation,
            format!("rule '{}' failed: {}", e.rule, e.message),
        )
        .at(e.location.line, e.location.column)
    }
}

/// Output of one evaluation pass.
#[derive(Debug, Default)]
pub struct Evaluation {
    /// Offenses in source order.
    pub offenses: Vec<Offense>,
    /// Rules that failed on individual nodes.
    pub errors: Vec<RuleEvaluationError>,
}

/// Walks a document once and dispatches every node to the active rules.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a RuleRegistry,
    config: Option<&'a Config>,
    target_version: Option<TargetVersion>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over every rule in `registry`.
    #[must_use]
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            config: None,
            target_version: None,
        }
    }

    /// Applies enablement and severity settings from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &'a Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the platform version used by the version gate.
    #[must_use]
    pub fn with_target_version(mut self, target: Option<TargetVersion>) -> Self {
        self.target_version = target;
        self
    }

    /// Rules that run on `file`: enabled, version-eligible and applicable.
    #[must_use]
    pub fn active_rules(&self, file: &FileContext<'_>) -> Vec<&'a dyn Rule> {
        self.registry
            .iter()
            .filter(|rule| {
                if let Some(config) = self.config {
                    if !config.is_rule_enabled(rule.name(), rule.code()) {
                        debug!("Skipping disabled rule: {}", rule.name());
                        return false;
                    }
                }
                if !is_eligible(*rule, self.target_version) {
                    debug!(
                        "Skipping {}: requires target version {}",
                        rule.name(),
                        rule.minimum_version().map(|v| v.to_string()).unwrap_or_default()
                    );
                    return false;
                }
                rule.applies_to(file)
            })
            .collect()
    }

    /// Evaluates the active rules against `root`.
    #[must_use]
    pub fn evaluate(&self, file: &FileContext<'_>, root: &Node) -> Evaluation {
        let active: HashSet<&str> = self.active_rules(file).iter().map(|r| r.name()).collect();
        let mut pass = Pass {
            evaluator: self,
            file,
            active,
            allow: AllowIndex::scan(file.content),
            evaluation: Evaluation::default(),
        };

        if !pass.active.is_empty() {
            let mut ancestors = Vec::new();
            pass.visit(root, &mut ancestors);
        }

        let mut evaluation = pass.evaluation;
        evaluation.offenses.sort_by_key(|o| o.location.offset);
        evaluation
    }

    fn severity_for(&self, rule: &dyn Rule) -> Option<Severity> {
        self.config
            .and_then(|c| c.rule_severity(rule.name(), rule.code()))
    }
}

struct Pass<'e, 'f> {
    evaluator: &'e Evaluator<'e>,
    file: &'e FileContext<'f>,
    active: HashSet<&'e str>,
    allow: AllowIndex,
    evaluation: Evaluation,
}

impl Pass<'_, '_> {
    fn visit<'n>(&mut self, node: &'n Node, ancestors: &mut Vec<&'n Node>) {
        let registry = self.evaluator.registry;
        let rules: Vec<&dyn Rule> = registry
            .rules_for(node.tag())
            .filter(|r| self.active.contains(r.name()))
            .collect();
        for rule in rules {
            self.dispatch(rule, node, ancestors);
        }

        ancestors.push(node);
        for child in &node.children {
            self.visit(child, ancestors);
        }
        ancestors.pop();
    }

    fn dispatch(&mut self, rule: &dyn Rule, node: &Node, ancestors: &[&Node]) {
        let ctx = RuleContext::new(self.file, ancestors);
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.check(&ctx, node)));

        let offenses = match outcome {
            Ok(Ok(offenses)) => offenses,
            Ok(Err(e)) => return self.fail(rule, node, e.to_string()),
            Err(payload) => return self.fail(rule, node, panic_message(payload.as_ref())),
        };

        let severity = self.evaluator.severity_for(rule);
        for mut offense in offenses {
            let allow = self.allow.check(offense.location.line, rule.name(), rule.code());
            if allow.is_allowed() {
                if rule.requires_allow_reason() && allow.reason().is_none() {
                    self.evaluation.offenses.push(
                        Offense::new(
                            rule.code(),
                            rule.name(),
                            Severity::Warning,
                            offense.location,
                            format!(
                                "Allow directive for '{}' is missing required reason",
                                rule.name()
                            ),
                        )
                        .with_suggestion(Suggestion::new(
                            "Add reason=\"...\" to explain why this exception is necessary",
                        )),
                    );
                }
                continue;
            }
            if let Some(severity) = severity {
                offense.severity = severity;
            }
            self.evaluation.offenses.push(offense);
        }
    }

    fn fail(&mut self, rule: &dyn Rule, node: &Node, message: String) {
        let location = self.file.location(node.span);
        debug!("Rule {} failed at {}:{}: {}", rule.name(), location.file.display(), location.line, message);
        self.evaluation.errors.push(RuleEvaluationError {
            rule: rule.name().to_string(),
            location,
            message,
        });
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
