//! Render Guards
//!
//! Dependencies recorded while evaluating an element that are not carried
//! by observables: props, inherited variables and container ancestry, plus
//! a snapshot of every environment feature a media query read. The caller
//! re-validates them to decide whether a re-render is needed.

use tinct_core::{ConditionValue, StyleDescriptor, StyleValue};

use crate::element::{data_set_value, Props, RenderContext};
use crate::environment::Environment;
use crate::resolve::var::{lookup_external, VariableSources};
use crate::store::StyleStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    /// A prop read by an attribute selector
    Attribute { name: String, value: StyleValue },
    /// A `dataSet` entry read by a data-attribute selector
    DataSet { name: String, value: StyleValue },
    /// A custom property looked up outside the element's own rules
    Variable { name: String, value: Option<StyleDescriptor> },
    /// The ancestor registered under a container name
    Container { name: String, element: Option<u64> },
    /// A media feature
    Environment { feature: String, value: Option<ConditionValue> },
}

/// Guard list without duplicates, in first-recorded order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guards {
    guards: Vec<Guard>,
    /// Props whose `--` entries are inline variables
    inline_targets: Vec<String>,
}

impl Guards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inline_targets(targets: Vec<String>) -> Self {
        Self { guards: Vec::new(), inline_targets: targets }
    }

    pub fn push(&mut self, guard: Guard) {
        if !self.guards.contains(&guard) {
            self.guards.push(guard);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Guard> {
        self.guards.iter()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn contains(&self, guard: &Guard) -> bool {
        self.guards.contains(guard)
    }

    /// True when any dependency reads differently now
    pub fn changed(
        &self,
        props: &Props,
        context: &RenderContext,
        store: &StyleStore,
        environment: &Environment,
    ) -> bool {
        let inline = crate::evaluate::inline_variables(props, &self.inline_targets);
        let sources = VariableSources {
            inherited: &context.variables,
            inline: &inline,
            store,
            dark: environment.is_dark(None),
        };
        self.guards.iter().any(|guard| match guard {
            Guard::Attribute { name, value } => {
                props.get(name).unwrap_or(&StyleValue::Null) != value
            }
            Guard::DataSet { name, value } => {
                data_set_value(props, name).unwrap_or(&StyleValue::Null) != value
            }
            Guard::Variable { name, value } => {
                lookup_external(name, &sources, None).as_ref() != value.as_ref()
            }
            Guard::Container { name, element } => {
                context.containers.get(name).map(|entry| entry.element.id()) != *element
            }
            Guard::Environment { feature, value } => environment.feature(feature, None) != *value,
        })
    }
}

impl IntoIterator for Guards {
    type Item = Guard;
    type IntoIter = std::vec::IntoIter<Guard>;

    fn into_iter(self) -> Self::IntoIter {
        self.guards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_dedups() {
        let mut guards = Guards::new();
        let guard = Guard::Environment {
            feature: "width".into(),
            value: Some(ConditionValue::Number(1.0)),
        };
        guards.push(guard.clone());
        guards.push(guard);
        assert_eq!(guards.len(), 1);
    }

    #[test]
    fn test_attribute_change_detected() {
        let mut guards = Guards::new();
        guards.push(Guard::Attribute { name: "disabled".into(), value: StyleValue::Null });
        let store = StyleStore::new();
        let environment = Environment::default();
        let context = RenderContext::default();

        let mut props = Props::new();
        assert!(!guards.changed(&props, &context, &store, &environment));
        props.insert("disabled".into(), true.into());
        assert!(guards.changed(&props, &context, &store, &environment));
    }

    #[test]
    fn test_environment_change_detected() {
        let environment = Environment::default();
        let mut guards = Guards::new();
        guards.push(
            Guard::Environment {
                feature: "width".into(),
                value: environment.feature("width", None),
            },
        );
        let (props, context, store) = (Props::new(), RenderContext::default(), StyleStore::new());
        assert!(!guards.changed(&props, &context, &store, &environment));
        environment.set_viewport(1000.0, 800.0, None);
        assert!(guards.changed(&props, &context, &store, &environment));
    }
}
