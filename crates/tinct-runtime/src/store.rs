//! Style Store
//!
//! Process-wide storage for compiled rule sets, keyframes and variables.
//! Every entry is an observable, so an evaluation that looked up a class
//! name re-runs when a later injection replaces it.

use std::rc::Rc;

use tinct_core::{CompiledStylesheet, KeyframeFrame, StyleRule, VariableValue};

use crate::observable::{Batch, Effect, ObservableFamily};

/// Shared, immutable rule list of one class name
pub type RuleList = Rc<[StyleRule]>;

/// Shared, immutable frames of one animation
pub type FrameList = Rc<[KeyframeFrame]>;

#[derive(Default)]
pub struct StyleStore {
    rule_sets: ObservableFamily<String, Option<RuleList>>,
    keyframes: ObservableFamily<String, Option<FrameList>>,
    root_vars: ObservableFamily<String, Option<VariableValue>>,
    universal_vars: ObservableFamily<String, Option<VariableValue>>,
}

impl StyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a compiled stylesheet into the store.
    ///
    /// Rule sets of a class name already present are replaced, not
    /// appended. All resulting notifications run in one flush.
    pub fn inject(&self, stylesheet: CompiledStylesheet) {
        Batch::run(|batch| self.inject_in(stylesheet, batch));
    }

    /// Inject as part of a caller's batch
    pub fn inject_in(&self, mut stylesheet: CompiledStylesheet, batch: &Batch) {
        stylesheet.sort_rule_sets();
        tracing::debug!(
            "Injecting {} rules for {} classes, {} keyframes, {} variables",
            stylesheet.rule_count(),
            stylesheet.rule_sets.len(),
            stylesheet.keyframes.len(),
            stylesheet.root_vars.len() + stylesheet.universal_vars.len()
        );

        for (class_name, rules) in stylesheet.rule_sets {
            self.rule_sets.set(&class_name, Some(Rc::from(rules)), Some(batch));
        }
        for (name, frames) in stylesheet.keyframes {
            self.keyframes.set(&name, Some(Rc::from(frames)), Some(batch));
        }
        for (name, value) in stylesheet.root_vars {
            self.root_vars.set(&name, Some(value), Some(batch));
        }
        for (name, value) in stylesheet.universal_vars {
            self.universal_vars.set(&name, Some(value), Some(batch));
        }
    }

    /// Rules of a class name, sorted by specificity
    pub fn query(&self, class_name: &str, effect: Option<&Effect>) -> Option<RuleList> {
        self.rule_sets.get(&class_name.to_string(), effect)
    }

    pub fn keyframes(&self, name: &str, effect: Option<&Effect>) -> Option<FrameList> {
        self.keyframes.get(&name.to_string(), effect)
    }

    pub fn root_var(&self, name: &str, effect: Option<&Effect>) -> Option<VariableValue> {
        self.root_vars.get(&name.to_string(), effect)
    }

    pub fn universal_var(&self, name: &str, effect: Option<&Effect>) -> Option<VariableValue> {
        self.universal_vars.get(&name.to_string(), effect)
    }

    /// Class names with rules
    pub fn class_names(&self) -> Vec<String> {
        self.rule_sets
            .keys()
            .into_iter()
            .filter(|name| self.rule_sets.get(name, None).is_some())
            .collect()
    }

    /// Release cells nothing reads and nothing was injected into
    pub fn prune(&self) {
        self.rule_sets.prune();
        self.keyframes.prune();
        self.root_vars.prune();
        self.universal_vars.prune();
    }
}

impl std::fmt::Debug for StyleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleStore")
            .field("rule_sets", &self.rule_sets.len())
            .field("keyframes", &self.keyframes.len())
            .field("root_vars", &self.root_vars.len())
            .field("universal_vars", &self.universal_vars.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tinct_core::{Specificity, StyleDescriptor};

    fn sheet(class_name: &str, order: u32) -> CompiledStylesheet {
        let mut sheet = CompiledStylesheet::default();
        sheet.rule_sets.insert(
            class_name.to_string(),
            vec![StyleRule::new(Specificity::with_order(order))],
        );
        sheet
    }

    #[test]
    fn test_inject_and_query() {
        let store = StyleStore::new();
        assert!(store.query("a", None).is_none());
        store.inject(sheet("a", 1));
        assert_eq!(store.query("a", None).map(|rules| rules.len()), Some(1));
        assert_eq!(store.class_names(), ["a"]);
    }

    #[test]
    fn test_later_inject_replaces() {
        let store = StyleStore::new();
        store.inject(sheet("a", 1));
        store.inject(sheet("a", 7));
        let rules = store.query("a", None).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].specificity.order, 7);
    }

    #[test]
    fn test_inject_notifies_once() {
        let store = StyleStore::new();
        let runs = Rc::new(Cell::new(0));
        let seen = runs.clone();
        let effect = Effect::new(move || seen.set(seen.get() + 1));
        store.query("a", Some(&effect));
        store.root_var("--v", Some(&effect));

        let mut both = sheet("a", 1);
        both.root_vars.insert(
            "--v".into(),
            VariableValue { light: Some(StyleDescriptor::string("red")), dark: None },
        );
        store.inject(both);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_inject_sorts_rules() {
        let mut unsorted = CompiledStylesheet::default();
        unsorted.rule_sets.insert(
            "a".into(),
            vec![
                StyleRule::new(Specificity::with_order(2)),
                StyleRule::new(Specificity::with_order(1)),
            ],
        );
        let store = StyleStore::new();
        store.inject(unsorted);
        let orders: Vec<u32> = store.query("a", None)
            .unwrap()
            .iter()
            .map(|r| r.specificity.order)
            .collect();
        assert_eq!(orders, [1, 2]);
    }
}
