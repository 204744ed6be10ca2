//! `var()` resolution
//!
//! Lookup order: the element's variables (inherited plus its own rules),
//! inline variables, universal variables, root variables, then the
//! fallback argument. The first defined value wins.

use tinct_core::{StyleDescriptor, StyleFunction, StyleValue};

use super::ResolveContext;
use crate::element::VariableMap;
use crate::guards::Guard;
use crate::observable::Effect;
use crate::store::StyleStore;

/// Variable sources outside the element's own rules
#[derive(Clone, Copy)]
pub struct VariableSources<'a> {
    pub inherited: &'a VariableMap,
    pub inline: &'a VariableMap,
    pub store: &'a StyleStore,
    pub dark: bool,
}

/// Raw value of a variable from inherited, inline, universal and root scopes
pub fn lookup_external(
    name: &str,
    sources: &VariableSources<'_>,
    effect: Option<&Effect>,
) -> Option<StyleDescriptor> {
    if let Some(value) = sources.inherited.get(name) {
        return Some(value.clone());
    }
    if let Some(value) = sources.inline.get(name) {
        return Some(value.clone());
    }
    global(name, sources, effect)
}

/// Universal, then root
fn global(
    name: &str,
    sources: &VariableSources<'_>,
    effect: Option<&Effect>,
) -> Option<StyleDescriptor> {
    let from =
        |value: Option<tinct_core::VariableValue>| value.and_then(|v| v.get(sources.dark).cloned());
    from(sources.store.universal_var(name, effect))
        .or_else(|| from(sources.store.root_var(name, effect)))
}

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let name = function.arguments.first()?.as_str()?;
    let fallback = function.arguments.get(1);

    context.guards.push(Guard::Variable {
        name: name.to_string(),
        value: lookup_external(name, &context.external, None),
    });

    let found = context
        .variables
        .get(name)
        .or_else(|| context.external.inline.get(name))
        .cloned()
        .or_else(|| global(name, &context.external, context.effect));

    let value = match found {
        Some(descriptor) => resolve_variable(context, name, &descriptor),
        None => None,
    };
    match (value, fallback) {
        (Some(value), _) => Some(value),
        (None, Some(fallback)) => context.resolve(fallback),
        (None, None) => None,
    }
}

/// Resolve a variable's own value, short-circuiting cycles
pub fn resolve_variable(
    context: &mut ResolveContext<'_>,
    name: &str,
    descriptor: &StyleDescriptor,
) -> Option<StyleValue> {
    if !context.enter(name) {
        tracing::debug!("custom property cycle through {name}");
        return None;
    }
    let value = context.resolve(descriptor);
    context.leave(name);
    value
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use tinct_core::{CompiledStylesheet, FunctionName, VariableValue};

    fn var(name: &str) -> StyleDescriptor {
        call(FunctionName::Var, vec![name.into()])
    }

    fn root(fixture: &Fixture, name: &str, value: &str) {
        let mut sheet = CompiledStylesheet::default();
        sheet.root_vars.insert(
            name.into(),
            VariableValue { light: Some(value.into()), dark: None },
        );
        fixture.store.inject(sheet);
    }

    #[test]
    fn test_root_value() {
        let mut fixture = Fixture::new();
        root(&fixture, "--v", "#f00");
        assert_eq!(fixture.resolve(&var("--v")), Some("#f00".into()));
    }

    #[test]
    fn test_element_beats_root() {
        let mut fixture = Fixture::new();
        root(&fixture, "--v", "#f00");
        fixture.variables.insert("--v".into(), "#00f".into());
        assert_eq!(fixture.resolve(&var("--v")), Some("#00f".into()));
    }

    #[test]
    fn test_universal_beats_root() {
        let mut fixture = Fixture::new();
        root(&fixture, "--v", "#f00");
        let mut sheet = CompiledStylesheet::default();
        sheet.universal_vars.insert(
            "--v".into(),
            VariableValue { light: Some("#0f0".into()), dark: None },
        );
        fixture.store.inject(sheet);
        assert_eq!(fixture.resolve(&var("--v")), Some("#0f0".into()));
    }

    #[test]
    fn test_fallback() {
        let mut fixture = Fixture::new();
        let with_fallback = call(FunctionName::Var, vec!["--missing".into(), 4.0.into()]);
        assert_eq!(fixture.resolve(&with_fallback), Some(4.0.into()));
        assert_eq!(fixture.resolve(&var("--missing")), None);
    }

    #[test]
    fn test_nested_variables() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--a".into(), var("--b"));
        fixture.variables.insert("--b".into(), 3.0.into());
        assert_eq!(fixture.resolve(&var("--a")), Some(3.0.into()));
    }

    #[test]
    fn test_cycle_is_undefined() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--a".into(), var("--b"));
        fixture.variables.insert("--b".into(), var("--a"));
        assert_eq!(fixture.resolve(&var("--a")), None);

        let with_fallback = call(FunctionName::Var, vec!["--a".into(), "ok".into()]);
        assert_eq!(fixture.resolve(&with_fallback), Some("ok".into()));
    }

    #[test]
    fn test_lookup_records_guard() {
        let mut fixture = Fixture::new();
        fixture.resolve(&var("--missing"));
        assert!(fixture.guards.contains(
            &Guard::Variable { name: "--missing".into(), value: None },
        ));
    }
}
