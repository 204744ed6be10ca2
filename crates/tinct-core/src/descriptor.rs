//! Style Descriptors
//!
//! The value IR: static primitives and records, plus function descriptors
//! for values that can only be computed at render time. Descriptors are
//! plain data and serialize to JSON unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A compiled style value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleDescriptor {
    #[default]
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Box<StyleFunction>),
    Array(Vec<StyleDescriptor>),
    Record(IndexMap<String, StyleDescriptor>),
}

impl StyleDescriptor {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Build a function descriptor
    pub fn function(name: FunctionName, arguments: Vec<StyleDescriptor>) -> Self {
        Self::Function(Box::new(StyleFunction::new(name, arguments)))
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

    pub fn as_function(&self) -> Option<&StyleFunction> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// True when no function descriptor appears anywhere inside this value
    pub fn is_static(&self) -> bool {
        match self {
            Self::Function(_) => false,
            Self::Array(items) => items.iter().all(Self::is_static),
            Self::Record(fields) => fields.values().all(Self::is_static),
            _ => true,
        }
    }

    /// True when any nested function must wait for the rest of the render
    pub fn is_deferred(&self) -> bool {
        match self {
            Self::Function(f) => f.deferred || f.arguments.iter().any(Self::is_deferred),
            Self::Array(items) => items.iter().any(Self::is_deferred),
            Self::Record(fields) => fields.values().any(Self::is_deferred),
            _ => false,
        }
    }

    /// True when any nested function reads a custom property
    pub fn uses_variables(&self) -> bool {
        match self {
            Self::Function(f) => {
                f.uses_variables
                    || f.name == FunctionName::Var
                    || f.arguments.iter().any(Self::uses_variables)
            }
            Self::Array(items) => items.iter().any(Self::uses_variables),
            Self::Record(fields) => fields.values().any(Self::uses_variables),
            _ => false,
        }
    }

    /// Visit the name of every `var()` reference
    pub fn for_each_variable(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            Self::Function(f) => {
                if f.name == FunctionName::Var {
                    if let Some(name) = f.arguments.first().and_then(Self::as_str) {
                        visit(name);
                    }
                }
                for argument in &f.arguments {
                    argument.for_each_variable(visit);
                }
            }
            Self::Array(items) => items.iter().for_each(|item| item.for_each_variable(visit)),
            Self::Record(fields) => fields.values().for_each(|item| item.for_each_variable(visit)),
            _ => {}
        }
    }
}

impl From<f64> for StyleDescriptor {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleDescriptor {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StyleDescriptor {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for StyleDescriptor {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A deferred computation: resolver name plus its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct StyleFunction {
    #[serde(rename = "fn")]
    pub name: FunctionName,
    #[serde(rename = "args", default)]
    pub arguments: Vec<StyleDescriptor>,
    /// Resolve only after every non-deferred declaration of the render
    #[serde(default, skip_serializing_if = "is_false")]
    pub deferred: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub uses_variables: bool,
}

impl StyleFunction {
    pub fn new(name: FunctionName, arguments: Vec<StyleDescriptor>) -> Self {
        let uses_variables = name == FunctionName::Var
            || arguments.iter().any(StyleDescriptor::uses_variables);
        Self {
            deferred: name.is_deferred(),
            name,
            arguments,
            uses_variables,
        }
    }
}

/// The closed set of render-time resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionName {
    /// `var(--name, fallback)`
    Var,
    /// Flat `calc()` token stream
    Calc,
    Em,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
    PlatformColor,
    HairlineWidth,
    PixelRatio,
    FontScale,
    RoundToNearestPixel,
    /// `border` shorthand whose parts are only known at render time
    Border,
    BoxShadow,
    TextShadow,
    Transform,
    /// Keyframes lookup for `animation-name`
    AnimationName,
    /// Any other CSS function, re-serialized once its arguments resolve
    CssFunction,
}

impl FunctionName {
    /// Functions that read the element's own resolved font size
    pub fn is_deferred(self) -> bool {
        matches!(self, Self::Em)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Calc => "calc",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::PlatformColor => "platformColor",
            Self::HairlineWidth => "hairlineWidth",
            Self::PixelRatio => "pixelRatio",
            Self::FontScale => "fontScale",
            Self::RoundToNearestPixel => "roundToNearestPixel",
            Self::Border => "border",
            Self::BoxShadow => "boxShadow",
            Self::TextShadow => "textShadow",
            Self::Transform => "transform",
            Self::AnimationName => "animationName",
            Self::CssFunction => "cssFunction",
        }
    }
}

/// Where a resolved declaration is written.
///
/// A leading `^` segment writes into the element props instead of the
/// rule's target object. An empty path merges a record into the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath(pub Vec<String>);

impl PropertyPath {
    pub const TOP_LEVEL: &'static str = "^";

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    /// The record-merge path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `@prop` target such as `^numberOfLines` or `shadowOffset.width`
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let (top_level, rest) = match text.strip_prefix(Self::TOP_LEVEL) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut segments: Vec<String> = Vec::new();
        if top_level {
            segments.push(Self::TOP_LEVEL.to_string());
        }
        segments.extend(rest.split('.').filter(|s| !s.is_empty()).map(str::to_string));
        Self(segments)
    }

    pub fn is_top_level(&self) -> bool {
        self.0.first().map(String::as_str) == Some(Self::TOP_LEVEL)
    }

    /// Single key inside the target object
    pub fn as_key(&self) -> Option<&str> {
        match self.0.as_slice() {
            [key] if key != Self::TOP_LEVEL => Some(key),
            _ => None,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry of a rule's ordered declaration list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleDeclaration {
    /// Static key/value pairs written straight into the target object
    Static(IndexMap<String, StyleDescriptor>),
    /// Resolved after all other declarations of the render
    Deferred(StyleDescriptor, PropertyPath, bool),
    /// Resolved in order
    Dynamic(StyleDescriptor, PropertyPath),
}

impl StyleDeclaration {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_serializes_as_plain_json() {
        let var = StyleDescriptor::function(
            FunctionName::Var,
            vec![StyleDescriptor::string("--color"), StyleDescriptor::string("red")],
        );
        let json = serde_json::to_string(&var).unwrap();
        assert_eq!(json, r#"{"fn":"var","args":["--color","red"],"usesVariables":true}"#);

        let back: StyleDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, var);
    }

    #[test]
    fn test_record_is_not_mistaken_for_function() {
        let json = r#"{"width":1,"height":2}"#;
        let value: StyleDescriptor = serde_json::from_str(json).unwrap();
        assert!(matches!(value, StyleDescriptor::Record(ref r) if r.len() == 2));
        assert!(value.is_static());
    }

    #[test]
    fn test_em_is_deferred() {
        let em = StyleDescriptor::function(FunctionName::Em, vec![2.0.into()]);
        assert!(em.is_deferred());
        let nested = StyleDescriptor::Array(vec![em]);
        assert!(nested.is_deferred());
        assert!(!nested.is_static());
    }

    #[test]
    fn test_declaration_shapes() {
        let mut record = IndexMap::new();
        record.insert("color".to_string(), StyleDescriptor::string("#f00"));
        let decls = vec![
            StyleDeclaration::Static(record),
            StyleDeclaration::Dynamic(
                StyleDescriptor::function(FunctionName::Vw, vec![50.0.into()]),
                PropertyPath::key("width"),
            ),
            StyleDeclaration::Deferred(
                StyleDescriptor::function(FunctionName::Em, vec![2.0.into()]),
                PropertyPath::key("lineHeight"),
                true,
            ),
        ];
        let json = serde_json::to_string(&decls).unwrap();
        let back: Vec<StyleDeclaration> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decls);
    }

    #[test]
    fn test_property_path_parse() {
        assert_eq!(PropertyPath::parse("^numberOfLines").segments(), ["^", "numberOfLines"]);
        assert!(PropertyPath::parse("^numberOfLines").is_top_level());
        assert_eq!(PropertyPath::parse("shadowOffset.width").segments(), ["shadowOffset", "width"]);
        assert_eq!(PropertyPath::parse("textColor").as_key(), Some("textColor"));
    }

    #[test]
    fn test_collect_variables() {
        let value = StyleDescriptor::function(
            FunctionName::Calc,
            vec![
                StyleDescriptor::function(FunctionName::Var, vec!["--a".into()]),
                "+".into(),
                StyleDescriptor::function(FunctionName::Var, vec!["--b".into(), 1.0.into()]),
            ],
        );
        let mut names = Vec::new();
        value.for_each_variable(&mut |name| names.push(name.to_string()));
        assert_eq!(names, ["--a", "--b"]);
        assert!(value.uses_variables());
    }
}
