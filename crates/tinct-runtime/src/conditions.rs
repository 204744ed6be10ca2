//! Rule Qualifiers
//!
//! Tests for every qualifier a compiled rule can carry: media conditions
//! against the environment, container conditions against an ancestor's
//! layout, interaction state and attribute selectors against props.

use tinct_core::{
    AttrOperator, AttrQuery, AttrSource, Comparator, Condition, ConditionValue, ContainerQuery,
    PseudoClassesQuery, StyleValue, DEFAULT_CONTAINER_NAME,
};

use crate::element::{data_set_value, ContainerMap, ElementState, Props};
use crate::environment::Environment;
use crate::guards::{Guard, Guards};
use crate::observable::Effect;

/// Something that answers condition features
pub trait FeatureSource {
    fn feature(&self, name: &str, effect: Option<&Effect>) -> Option<ConditionValue>;
}

impl FeatureSource for Environment {
    fn feature(&self, name: &str, effect: Option<&Effect>) -> Option<ConditionValue> {
        Environment::feature(self, name, effect)
    }
}

impl FeatureSource for ElementState {
    fn feature(&self, name: &str, effect: Option<&Effect>) -> Option<ConditionValue> {
        ElementState::feature(self, name, effect)
    }
}

fn is_truthy(value: &ConditionValue) -> bool {
    match value {
        ConditionValue::Number(n) => *n != 0.0,
        ConditionValue::Bool(b) => *b,
        ConditionValue::String(s) => !s.is_empty() && s != "none" && s != "no-preference",
    }
}

fn compare(actual: &ConditionValue, comparator: Comparator, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (ConditionValue::Number(a), ConditionValue::Number(e)) => comparator.test(*a, *e),
        (ConditionValue::String(a), ConditionValue::String(e)) => {
            comparator == Comparator::Equal && a.eq_ignore_ascii_case(e)
        }
        (ConditionValue::Bool(a), ConditionValue::Bool(e)) => {
            comparator == Comparator::Equal && a == e
        }
        (actual, ConditionValue::Bool(e)) => {
            comparator == Comparator::Equal && is_truthy(actual) == *e
        }
        _ => false,
    }
}

/// Evaluate a condition tree. Unknown features never match.
pub fn test_condition(
    condition: &Condition,
    source: &dyn FeatureSource,
    effect: Option<&Effect>,
) -> bool {
    match condition {
        Condition::Feature(name) if name == Condition::TRUE => true,
        Condition::Feature(name) if name == Condition::FALSE => false,
        Condition::Feature(name) => {
            source.feature(name, effect).is_some_and(|value| is_truthy(&value))
        }
        Condition::Not(inner) => !test_condition(inner, source, effect),
        Condition::And(items) => items.iter().all(|item| test_condition(item, source, effect)),
        Condition::Or(items) => items.iter().any(|item| test_condition(item, source, effect)),
        Condition::Compare(name, comparator, expected) => {
            source.feature(name, effect)
                .is_some_and(|actual| compare(&actual, *comparator, expected))
        }
        Condition::Interval(name, start, start_op, end, end_op) => {
            let Some(actual) = source.feature(name, effect)
                .as_ref()
                .and_then(ConditionValue::as_number) else {
                return false;
            };
            match (start.as_number(), end.as_number()) {
                (Some(start), Some(end)) => {
                    start_op.test(start, actual) && end_op.test(actual, end)
                }
                _ => false,
            }
        }
    }
}

/// Every pseudo-class in the query must be in the requested state
pub fn test_pseudo_classes(
    query: &PseudoClassesQuery,
    element: &ElementState,
    effect: Option<&Effect>,
) -> bool {
    let state = |expected: Option<bool>, read: fn(&ElementState, Option<&Effect>) -> bool| {
        match expected {
            Some(expected) => read(element, effect) == expected,
            None => true,
        }
    };
    state(query.hover, ElementState::hover)
        && state(query.active, ElementState::active)
        && state(query.focus, ElementState::focus)
}

fn attribute<'p>(props: &'p Props, query: &AttrQuery) -> Option<&'p StyleValue> {
    match query.source {
        AttrSource::Attribute => props.get(&query.name),
        AttrSource::DataSet => data_set_value(props, &query.name),
    }
}

/// Attribute guard recording the value the test is about to read
pub fn attr_guard(query: &AttrQuery, props: &Props) -> Guard {
    let value = attribute(props, query).cloned().unwrap_or(StyleValue::Null);
    match query.source {
        AttrSource::Attribute => Guard::Attribute { name: query.name.clone(), value },
        AttrSource::DataSet => Guard::DataSet { name: query.name.clone(), value },
    }
}

pub fn test_attr(query: &AttrQuery, props: &Props) -> bool {
    let value = attribute(props, query).filter(|value| !value.is_null());
    match (query.operator, value) {
        (None, value) => value.is_some(),
        (Some(AttrOperator::Truthy), value) => value.is_some_and(StyleValue::is_truthy),
        (Some(AttrOperator::Falsy), value) => !value.is_some_and(StyleValue::is_truthy),
        (Some(AttrOperator::Empty), value) => {
            value.is_none_or(|value| value.to_attribute_text().is_empty())
        }
        (Some(_), Some(value)) => query.matches_text(&value.to_attribute_text()),
        (Some(_), None) => false,
    }
}

/// Container qualifier against the nearest registered ancestor.
///
/// Records a container guard, plus attribute guards for the container's
/// own props.
pub fn test_container(
    query: &ContainerQuery,
    containers: &ContainerMap,
    effect: Option<&Effect>,
    guards: &mut Guards,
) -> bool {
    let name = query.name.as_deref().unwrap_or(DEFAULT_CONTAINER_NAME);
    let entry = containers.get(name);
    guards.push(
        Guard::Container { name: name.to_string(), element: entry.map(|entry| entry.element.id()) },
    );
    let Some(entry) = entry else {
        return false;
    };

    if let Some(pseudo) = &query.pseudo_classes {
        if !test_pseudo_classes(pseudo, &entry.element, effect) {
            return false;
        }
    }
    if !query.attrs.iter().all(|attr| test_attr(attr, &entry.props)) {
        return false;
    }
    match &query.condition {
        Some(condition) => test_condition(condition, entry.element.as_ref(), effect),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ContainerEntry, Layout};
    use crate::environment::EnvironmentConfig;
    use std::rc::Rc;

    fn min_width(value: f64) -> Condition {
        Condition::Compare(
            "width".into(),
            Comparator::GreaterThanEqual,
            ConditionValue::Number(value),
        )
    }

    #[test]
    fn test_media_compare() {
        let environment = Environment::new(
            EnvironmentConfig { width: 500.0, ..Default::default() },
        );
        assert!(test_condition(&min_width(500.0), &environment, None));
        assert!(!test_condition(&min_width(501.0), &environment, None));
        assert!(test_condition(&Condition::Not(Box::new(min_width(501.0))), &environment, None));
    }

    #[test]
    fn test_interval() {
        let environment = Environment::new(
            EnvironmentConfig { width: 500.0, ..Default::default() },
        );
        let interval = |start: f64, end: f64| {
            Condition::Interval(
                "width".into(),
                ConditionValue::Number(start),
                Comparator::LessThanEqual,
                ConditionValue::Number(end),
                Comparator::LessThan,
            )
        };
        assert!(test_condition(&interval(400.0, 600.0), &environment, None));
        assert!(!test_condition(&interval(400.0, 500.0), &environment, None));
    }

    #[test]
    fn test_strings_and_constants() {
        let environment = Environment::default();
        let light = Condition::Compare(
            "prefers-color-scheme".into(),
            Comparator::Equal,
            ConditionValue::String("light".into()),
        );
        assert!(test_condition(&light, &environment, None));
        assert!(test_condition(&Condition::always(), &environment, None));
        assert!(!test_condition(&Condition::never(), &environment, None));
        assert!(!test_condition(
            &Condition::Feature("prefers-reduced-motion".into()),
            &environment,
            None,
        ));
        assert!(!test_condition(&Condition::Feature("grid".into()), &environment, None));
    }

    #[test]
    fn test_attribute_operators() {
        let mut props = Props::new();
        props.insert("disabled".into(), true.into());
        props.insert("label".into(), "".into());

        let exists = AttrQuery::new(AttrSource::Attribute, "disabled", None, None);
        let missing = AttrQuery::new(AttrSource::Attribute, "checked", None, None);
        let falsy = AttrQuery::new(
            AttrSource::Attribute,
            "checked",
            Some(AttrOperator::Falsy),
            None,
        );
        let equals = AttrQuery::new(
            AttrSource::Attribute,
            "disabled",
            Some(AttrOperator::Equals),
            Some("true".into()),
        );
        assert!(test_attr(&exists, &props));
        assert!(!test_attr(&missing, &props));
        assert!(test_attr(&falsy, &props));
        assert!(test_attr(&equals, &props));
    }

    #[test]
    fn test_empty_without_children() {
        let empty = AttrQuery::new(
            AttrSource::Attribute,
            "children",
            Some(AttrOperator::Empty),
            None,
        );
        let mut props = Props::new();
        assert!(test_attr(&empty, &props));
        props.insert("children".into(), StyleValue::Null);
        assert!(test_attr(&empty, &props));
        props.insert("children".into(), "".into());
        assert!(test_attr(&empty, &props));
        props.insert("children".into(), "label".into());
        assert!(!test_attr(&empty, &props));
    }

    #[test]
    fn test_data_set() {
        let mut data = tinct_core::StyleObject::new();
        data.insert("state".into(), "open".into());
        let mut props = Props::new();
        props.insert("dataSet".into(), StyleValue::Object(data));

        let open = AttrQuery::new(
            AttrSource::DataSet,
            "state",
            Some(AttrOperator::Equals),
            Some("open".into()),
        );
        assert!(test_attr(&open, &props));
        assert_eq!(
            attr_guard(&open, &props),
            Guard::DataSet { name: "state".into(), value: "open".into() },
        );
    }

    #[test]
    fn test_pseudo_classes() {
        let element = ElementState::new();
        let hover = PseudoClassesQuery { hover: Some(true), ..Default::default() };
        assert!(!super::test_pseudo_classes(&hover, &element, None));
        element.set_hover(true, None);
        assert!(super::test_pseudo_classes(&hover, &element, None));
    }

    #[test]
    fn test_container_query() {
        let card = ElementState::new();
        card.set_layout(Layout { width: 300.0, height: 100.0 }, None);
        let mut containers = ContainerMap::new();
        containers.insert(
            "card".into(),
            ContainerEntry { element: card.clone(), props: Rc::new(Props::new()) },
        );

        let mut query = ContainerQuery::named("card");
        query.condition = Some(min_width(200.0));
        let mut guards = Guards::new();
        assert!(test_container(&query, &containers, None, &mut guards));
        assert!(guards.contains(
            &Guard::Container { name: "card".into(), element: Some(card.id()) },
        ));

        let unnamed = ContainerQuery::default();
        assert!(!test_container(&unnamed, &containers, None, &mut guards));
    }
}
