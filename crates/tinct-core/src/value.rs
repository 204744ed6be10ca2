//! Runtime Values
//!
//! Resolved style values and element props. Unlike descriptors these never
//! contain functions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::StyleDescriptor;

/// A resolved value in an output style object or a prop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<StyleValue>),
    Object(IndexMap<String, StyleValue>),
}

/// Flat style object
pub type StyleObject = IndexMap<String, StyleValue>;

impl StyleValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StyleValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&StyleObject> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// JavaScript-style truthiness used by attribute tests
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// String form used when comparing against attribute selectors
    pub fn to_attribute_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Array(items) => items
                .iter()
                .map(Self::to_attribute_text)
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Convert a static descriptor. Function descriptors have no static value.
    pub fn from_static(descriptor: &StyleDescriptor) -> Option<StyleValue> {
        Some(match descriptor {
            StyleDescriptor::Undefined => Self::Null,
            StyleDescriptor::Bool(b) => Self::Bool(*b),
            StyleDescriptor::Number(n) => Self::Number(*n),
            StyleDescriptor::String(s) => Self::String(s.clone()),
            StyleDescriptor::Function(_) => return None,
            StyleDescriptor::Array(items) => {
                Self::Array(items.iter().map(Self::from_static).collect::<Option<_>>()?)
            }
            StyleDescriptor::Record(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(k, v)| Some((k.clone(), Self::from_static(v)?)))
                    .collect::<Option<_>>()?,
            ),
        })
    }

    /// Back into a static descriptor, for storing resolved variables
    pub fn to_descriptor(&self) -> StyleDescriptor {
        match self {
            Self::Null => StyleDescriptor::Undefined,
            Self::Bool(b) => StyleDescriptor::Bool(*b),
            Self::Number(n) => StyleDescriptor::Number(*n),
            Self::String(s) => StyleDescriptor::String(s.clone()),
            Self::Array(items) => {
                StyleDescriptor::Array(items.iter().map(Self::to_descriptor).collect())
            }
            Self::Object(fields) => StyleDescriptor::Record(
                fields.iter().map(|(k, v)| (k.clone(), v.to_descriptor())).collect(),
            ),
        }
    }

    /// Text used when a value is spliced into a CSS function or shorthand
    pub fn to_css_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(n) => format_number(*n),
            Self::Array(items) => items.iter().map(Self::to_css_text).collect::<Vec<_>>().join(" "),
            other => other.to_attribute_text(),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Print a number without a trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = (value * 1e6).round() / 1e6;
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FunctionName;

    #[test]
    fn test_truthiness() {
        assert!(!StyleValue::Null.is_truthy());
        assert!(!StyleValue::from("").is_truthy());
        assert!(!StyleValue::from(0.0).is_truthy());
        assert!(StyleValue::from("x").is_truthy());
        assert!(StyleValue::Object(IndexMap::new()).is_truthy());
    }

    #[test]
    fn test_from_static_rejects_functions() {
        let function = StyleDescriptor::function(FunctionName::Vw, vec![1.0.into()]);
        assert_eq!(StyleValue::from_static(&function), None);
        let array = StyleDescriptor::Array(vec![1.0.into(), "a".into()]);
        assert_eq!(
            StyleValue::from_static(&array),
            Some(StyleValue::Array(vec![1.0.into(), "a".into()]))
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }
}
