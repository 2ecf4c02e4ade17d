//! Rule registry with per-node-kind dispatch.

use crate::ast::NodeTag;
use crate::rule::{Rule, RuleBox};
use std::collections::HashMap;

/// A rule with the same name or code is already registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rule '{name}' is already registered")]
pub struct DuplicateRuleError {
    /// Name (or code) of the conflicting rule.
    pub name: String,
}

/// Ordered collection of rules, indexed by the node kinds they inspect.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    by_tag: HashMap<NodeTag, Vec<usize>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRuleError`] when a rule with the same name or code
    /// is already registered.
    pub fn register(&mut self, rule: RuleBox) -> Result<(), DuplicateRuleError> {
        if let Some(existing) = self
            .rules
            .iter()
            .find(|r| r.name() == rule.name() || r.code() == rule.code())
        {
            let name = if existing.name() == rule.name() {
                rule.name()
            } else {
                rule.code()
            };
            return Err(DuplicateRuleError {
                name: name.to_string(),
            });
        }

        let index = self.rules.len();
        for tag in rule.node_kinds() {
            let slot = self.by_tag.entry(*tag).or_default();
            if !slot.contains(&index) {
                slot.push(index);
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Rules that may match nodes of `tag`, in registration order.
    pub fn rules_for(&self, tag: NodeTag) -> impl Iterator<Item = &dyn Rule> {
        self.by_tag
            .get(&tag)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(move |&i| self.rules[i].as_ref())
    }

    /// Every registered rule, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Looks up a rule by name or code.
    #[must_use]
    pub fn get(&self, name_or_code: &str) -> Option<&dyn Rule> {
        self.iter()
            .find(|r| r.name() == name_or_code || r.code() == name_or_code)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::rule::{RuleContext, RuleError};
    use crate::types::Offense;

    struct Named {
        name: &'static str,
        code: &'static str,
        kinds: &'static [NodeTag],
    }

    impl Rule for Named {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            self.code
        }
        fn node_kinds(&self) -> &'static [NodeTag] {
            self.kinds
        }
        fn check(&self, _ctx: &RuleContext<'_>, _node: &Node) -> Result<Vec<Offense>, RuleError> {
            Ok(Vec::new())
        }
    }

    fn named(name: &'static str, code: &'static str, kinds: &'static [NodeTag]) -> RuleBox {
        Box::new(Named { name, code, kinds })
    }

    #[test]
    fn rules_for_keeps_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register(named("b", "T2", &[NodeTag::Call])).unwrap();
        registry
            .register(named("a", "T1", &[NodeTag::Call, NodeTag::Const]))
            .unwrap();
        registry.register(named("c", "T3", &[NodeTag::Comment])).unwrap();

        let calls: Vec<_> = registry.rules_for(NodeTag::Call).map(|r| r.name()).collect();
        assert_eq!(calls, vec!["b", "a"]);
        let consts: Vec<_> = registry.rules_for(NodeTag::Const).map(|r| r.name()).collect();
        assert_eq!(consts, vec!["a"]);
        assert_eq!(registry.rules_for(NodeTag::Block).count(), 0);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(named("a", "T1", &[NodeTag::Call])).unwrap();
        let err = registry
            .register(named("a", "T9", &[NodeTag::Call]))
            .unwrap_err();
        assert_eq!(err.name, "a");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(named("a", "T1", &[NodeTag::Call])).unwrap();
        let err = registry
            .register(named("b", "T1", &[NodeTag::Call]))
            .unwrap_err();
        assert_eq!(err.to_string(), "rule 'T1' is already registered");
    }

    #[test]
    fn get_by_name_or_code() {
        let mut registry = RuleRegistry::new();
        registry.register(named("a", "T1", &[NodeTag::Call])).unwrap();
        assert!(registry.get("a").is_some());
        assert!(registry.get("T1").is_some());
        assert!(registry.get("zzz").is_none());
    }
}
