//! Compiled Stylesheet
//!
//! Top-level output of one compile, ready to be serialized or injected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::{StyleDeclaration, StyleDescriptor};
use crate::rule::StyleRule;

/// Light and dark values of one custom property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<StyleDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark: Option<StyleDescriptor>,
}

impl VariableValue {
    /// Value for the given scheme, falling back to the light slot
    pub fn get(&self, dark: bool) -> Option<&StyleDescriptor> {
        if dark {
            self.dark.as_ref().or(self.light.as_ref())
        } else {
            self.light.as_ref()
        }
    }

    pub fn set(&mut self, dark: bool, value: StyleDescriptor) {
        if dark {
            self.dark = Some(value);
        } else {
            self.light = Some(value);
        }
    }
}

/// One `@keyframes` step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeFrame {
    /// Position in `[0, 1]`
    pub progress: f64,
    pub declarations: Vec<StyleDeclaration>,
}

/// Variables keyed by name, including the leading `--`
pub type VariableTable = IndexMap<String, VariableValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompiledStylesheet {
    pub rule_sets: IndexMap<String, Vec<StyleRule>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub keyframes: IndexMap<String, Vec<KeyframeFrame>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub root_vars: VariableTable,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub universal_vars: VariableTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rem: Option<f64>,
}

impl CompiledStylesheet {
    /// Sort every rule set by specificity. Stable, so equal rules keep source order.
    pub fn sort_rule_sets(&mut self) {
        for rules in self.rule_sets.values_mut() {
            rules.sort_by(|a, b| a.specificity.cmp(&b.specificity));
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rule_sets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
            && self.keyframes.is_empty()
            && self.root_vars.is_empty()
            && self.universal_vars.is_empty()
    }

    /// Append another compile's output; later rule sets replace earlier ones
    pub fn extend(&mut self, other: CompiledStylesheet) {
        self.rule_sets.extend(other.rule_sets);
        self.keyframes.extend(other.keyframes);
        self.root_vars.extend(other.root_vars);
        self.universal_vars.extend(other.universal_vars);
        if other.rem.is_some() {
            self.rem = other.rem;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specificity::Specificity;

    #[test]
    fn test_sort_is_stable() {
        let mut sheet = CompiledStylesheet::default();
        let hover = StyleRule::new(Specificity { class_name: 2, ..Specificity::with_order(1) });
        let plain = StyleRule::new(Specificity { class_name: 1, ..Specificity::with_order(2) });
        sheet.rule_sets.insert("a".into(), vec![hover.clone(), plain.clone()]);
        sheet.sort_rule_sets();
        assert_eq!(sheet.rule_sets["a"], vec![plain, hover]);
    }

    #[test]
    fn test_dark_falls_back_to_light() {
        let mut value = VariableValue::default();
        value.set(false, StyleDescriptor::string("red"));
        assert_eq!(value.get(true), Some(&StyleDescriptor::string("red")));
        value.set(true, StyleDescriptor::string("blue"));
        assert_eq!(value.get(true), Some(&StyleDescriptor::string("blue")));
    }

    #[test]
    fn test_serialized_keys() {
        let mut sheet = CompiledStylesheet { rem: Some(14.0), ..Default::default() };
        sheet
            .root_vars
            .insert("--v".into(), VariableValue { light: Some("red".into()), dark: None });
        let json = serde_json::to_string(&sheet).unwrap();
        assert_eq!(json, r#"{"ruleSets":{},"rootVars":{"--v":{"light":"red"}},"rem":14.0}"#);
    }
}
