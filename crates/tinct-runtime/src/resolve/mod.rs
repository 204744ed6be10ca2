//! Style Function Resolvers
//!
//! A closed registry of render-time resolvers, one per [`FunctionName`].
//! Each resolver receives the [`ResolveContext`], which resolves nested
//! descriptors, reads observables with the render's effect and collects
//! guards.

pub mod animation;
pub mod calc;
pub mod platform;
pub mod shorthand;
pub mod transform;
pub mod units;
pub mod var;

use std::collections::HashSet;

use tinct_core::{FunctionName, StyleDescriptor, StyleFunction, StyleValue};

use crate::element::VariableMap;
use crate::environment::Environment;
use crate::guards::Guards;
use crate::observable::Effect;
use crate::store::StyleStore;
use var::VariableSources;

pub struct ResolveContext<'a> {
    pub store: &'a StyleStore,
    pub environment: &'a Environment,
    pub effect: Option<&'a Effect>,
    /// The element's variables: inherited, then its rules, then inline
    pub variables: &'a VariableMap,
    /// Inline variables and the variables inherited from the parent
    pub external: VariableSources<'a>,
    pub guards: &'a mut Guards,
    /// Base for `em` units
    pub font_size: Option<f64>,
    visited: HashSet<String>,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        store: &'a StyleStore,
        environment: &'a Environment,
        effect: Option<&'a Effect>,
        variables: &'a VariableMap,
        external: VariableSources<'a>,
        guards: &'a mut Guards,
    ) -> Self {
        Self {
            store,
            environment,
            effect,
            variables,
            external,
            guards,
            font_size: None,
            visited: HashSet::new(),
        }
    }

    /// Resolve any descriptor. `None` means the value is undefined.
    pub fn resolve(&mut self, descriptor: &StyleDescriptor) -> Option<StyleValue> {
        match descriptor {
            StyleDescriptor::Function(function) => self.call(function),
            StyleDescriptor::Array(items) => Some(StyleValue::Array(
                items.iter().map(|item| self.resolve(item)).collect::<Option<_>>()?,
            )),
            StyleDescriptor::Record(fields) => Some(StyleValue::Object(
                fields
                    .iter()
                    .map(|(key, value)| Some((key.clone(), self.resolve(value)?)))
                    .collect::<Option<_>>()?,
            )),
            StyleDescriptor::Undefined => None,
            primitive => StyleValue::from_static(primitive),
        }
    }

    /// Resolve every argument, in order
    pub fn resolve_all(&mut self, arguments: &[StyleDescriptor]) -> Option<Vec<StyleValue>> {
        arguments.iter().map(|argument| self.resolve(argument)).collect()
    }

    fn call(&mut self, function: &StyleFunction) -> Option<StyleValue> {
        let value = match function.name {
            FunctionName::Var => var::resolve(self, function),
            FunctionName::Calc => calc::resolve(self, function),
            FunctionName::Em
            | FunctionName::Rem
            | FunctionName::Vw
            | FunctionName::Vh
            | FunctionName::Vmin
            | FunctionName::Vmax => units::resolve(self, function),
            FunctionName::PlatformColor
            | FunctionName::HairlineWidth
            | FunctionName::PixelRatio
            | FunctionName::FontScale
            | FunctionName::RoundToNearestPixel => platform::resolve(self, function),
            FunctionName::Border => shorthand::border(self, function),
            FunctionName::BoxShadow => shorthand::box_shadow(self, function),
            FunctionName::TextShadow => shorthand::text_shadow(self, function),
            FunctionName::Transform => transform::resolve(self, function),
            FunctionName::CssFunction => transform::css_function(self, function),
            FunctionName::AnimationName => animation::resolve(self, function),
        };
        if value.is_none() {
            tracing::trace!("{}() resolved to undefined", function.name.as_str());
        }
        value
    }

    /// Enter a variable; false when it is already being resolved
    pub(crate) fn enter(&mut self, name: &str) -> bool {
        self.visited.insert(name.to_string())
    }

    pub(crate) fn leave(&mut self, name: &str) {
        self.visited.remove(name);
    }
}

/// Flatten resolved arguments into positional words
pub(crate) fn flatten(values: Vec<StyleValue>) -> Vec<StyleValue> {
    let mut words = Vec::new();
    for value in values {
        match value {
            StyleValue::Array(items) => words.extend(flatten(items)),
            StyleValue::Null => {}
            other => words.push(other),
        }
    }
    words
}
