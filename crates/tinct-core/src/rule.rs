//! Style Rules
//!
//! One specificity tier of one selector's declarations, plus every
//! qualifier that must hold for the rule to apply.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::descriptor::{StyleDeclaration, StyleDescriptor};
use crate::specificity::Specificity;

/// Compiled rule for a single class name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleRule {
    pub specificity: Specificity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<StyleDeclaration>,
    /// Custom properties set while this rule matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<(String, StyleDescriptor)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_queries: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo_classes_query: Option<PseudoClassesQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attr_queries: Vec<AttrQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_queries: Vec<ContainerQuery>,
    /// Container names the owning element registers as
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub animations: bool,
    /// Output prop the declarations attach to, when not the primary style prop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl StyleRule {
    pub fn new(specificity: Specificity) -> Self {
        Self { specificity, ..Self::default() }
    }

    /// True when the rule has no qualifiers and always applies
    pub fn is_unconditional(&self) -> bool {
        self.media_queries.is_empty()
            && self.pseudo_classes_query.is_none()
            && self.attr_queries.is_empty()
            && self.container_queries.is_empty()
    }

    /// True when the rule carries nothing to apply
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.vars.is_empty() && self.containers.is_empty()
    }

    pub fn has_pseudo_classes(&self) -> bool {
        self.pseudo_classes_query.as_ref().is_some_and(|q| !q.is_empty())
            || self
                .container_queries
                .iter()
                .any(|q| q.pseudo_classes.as_ref().is_some_and(|p| !p.is_empty()))
    }

    /// Merge interaction qualifiers into the rule, later values winning
    pub fn merge_pseudo_classes(&mut self, query: &PseudoClassesQuery) {
        let current = self.pseudo_classes_query.get_or_insert_with(PseudoClassesQuery::default);
        current.merge(query);
    }
}

/// Interaction state the element must be in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PseudoClassesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<bool>,
}

impl PseudoClassesQuery {
    pub fn is_empty(&self) -> bool {
        self.hover.is_none() && self.active.is_none() && self.focus.is_none()
    }

    pub fn merge(&mut self, other: &PseudoClassesQuery) {
        if other.hover.is_some() {
            self.hover = other.hover;
        }
        if other.active.is_some() {
            self.active = other.active;
        }
        if other.focus.is_some() {
            self.focus = other.focus;
        }
    }

    /// Number of pseudo-classes tested
    pub fn count(&self) -> u32 {
        [self.hover, self.active, self.focus].iter().filter(|v| v.is_some()).count() as u32
    }
}

/// Where an attribute test reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttrSource {
    /// A prop on the element
    Attribute,
    /// An entry of the element's `dataSet` prop
    DataSet,
}

/// Attribute test operator. Absent means "exists".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrOperator {
    #[serde(rename = "truthy")]
    Truthy,
    #[serde(rename = "falsy")]
    Falsy,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "~=")]
    Includes,
    #[serde(rename = "|=")]
    DashMatch,
    #[serde(rename = "^=")]
    Prefix,
    #[serde(rename = "$=")]
    Suffix,
    #[serde(rename = "*=")]
    Substring,
}

impl AttrOperator {
    pub fn from_css(text: &str) -> Option<Self> {
        Some(match text {
            "=" => Self::Equals,
            "~=" => Self::Includes,
            "|=" => Self::DashMatch,
            "^=" => Self::Prefix,
            "$=" => Self::Suffix,
            "*=" => Self::Substring,
            _ => return None,
        })
    }
}

/// Attribute or data-attribute qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrQuery {
    pub source: AttrSource,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<AttrOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl AttrQuery {
    pub fn new(
        source: AttrSource,
        name: impl Into<String>,
        operator: Option<AttrOperator>,
        value: Option<String>,
    ) -> Self {
        Self { source, name: name.into(), operator, value }
    }

    /// Test a string form of the attribute value
    pub fn matches_text(&self, actual: &str) -> bool {
        let expected = self.value.as_deref().unwrap_or_default();
        match self.operator {
            None => true,
            Some(AttrOperator::Truthy) => !actual.is_empty() && actual != "false",
            Some(AttrOperator::Falsy) => actual.is_empty() || actual == "false",
            Some(AttrOperator::Empty) => actual.is_empty(),
            Some(AttrOperator::Equals) => actual == expected,
            Some(AttrOperator::Includes) => actual.split_whitespace().any(|word| word == expected),
            Some(AttrOperator::DashMatch) => {
                actual == expected
                    || actual.strip_prefix(expected).is_some_and(|rest| rest.starts_with('-'))
            }
            Some(AttrOperator::Prefix) => !expected.is_empty() && actual.starts_with(expected),
            Some(AttrOperator::Suffix) => !expected.is_empty() && actual.ends_with(expected),
            Some(AttrOperator::Substring) => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// Qualifier evaluated against an ancestor container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerQuery {
    /// Container name; absent means the nearest default container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "pseudoClasses", skip_serializing_if = "Option::is_none")]
    pub pseudo_classes: Option<PseudoClassesQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<AttrQuery>,
    #[serde(rename = "query", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl ContainerQuery {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }
}

/// Name registered by `container-type` without an explicit name
pub const DEFAULT_CONTAINER_NAME: &str = "__default";
