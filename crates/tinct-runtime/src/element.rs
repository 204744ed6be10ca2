//! Element State
//!
//! Per-element reactive cells (interaction state and layout) and the
//! context an element passes down to its children.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use tinct_core::{ConditionValue, StyleDescriptor, StyleObject, StyleValue};

use crate::environment::{aspect_ratio, orientation};
use crate::error::RuntimeError;
use crate::observable::{Batch, Effect, Observable};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Element props, keyed by prop name
pub type Props = StyleObject;

/// Custom properties in scope, keyed by name including the leading `--`
pub type VariableMap = IndexMap<String, StyleDescriptor>;

/// Variable carrying the nearest numeric font size to descendants
pub const FONT_SIZE_VARIABLE: &str = "--tinct-em";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
}

/// What an element's matching rules can require of it.
///
/// Fixed after the first render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub variables: bool,
    pub containers: bool,
    pub animations: bool,
    pub pressable: bool,
}

impl Capabilities {
    pub fn union(self, other: Capabilities) -> Capabilities {
        Capabilities {
            variables: self.variables || other.variables,
            containers: self.containers || other.containers,
            animations: self.animations || other.animations,
            pressable: self.pressable || other.pressable,
        }
    }

    /// First capability present in `self` but not in `before`
    pub fn added_since(&self, before: &Capabilities) -> Option<&'static str> {
        [
            (self.variables && !before.variables, "variables"),
            (self.containers && !before.containers, "containers"),
            (self.animations && !before.animations, "animations"),
            (self.pressable && !before.pressable, "pressable"),
        ]
        .into_iter()
        .find_map(|(added, name)| added.then_some(name))
    }
}

/// Reactive state owned by one rendered element
#[derive(Debug)]
pub struct ElementState {
    id: u64,
    hover: Observable<bool>,
    active: Observable<bool>,
    focus: Observable<bool>,
    layout: Observable<Option<Layout>>,
    capabilities: Cell<Option<Capabilities>>,
}

impl ElementState {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed),
            hover: Observable::new(false),
            active: Observable::new(false),
            focus: Observable::new(false),
            layout: Observable::new(None),
            capabilities: Cell::new(None),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn hover(&self, effect: Option<&Effect>) -> bool {
        self.hover.get(effect)
    }

    pub fn active(&self, effect: Option<&Effect>) -> bool {
        self.active.get(effect)
    }

    pub fn focus(&self, effect: Option<&Effect>) -> bool {
        self.focus.get(effect)
    }

    pub fn layout(&self, effect: Option<&Effect>) -> Option<Layout> {
        self.layout.get(effect)
    }

    pub fn set_hover(&self, value: bool, batch: Option<&Batch>) {
        self.hover.set(value, batch);
    }

    pub fn set_active(&self, value: bool, batch: Option<&Batch>) {
        self.active.set(value, batch);
    }

    pub fn set_focus(&self, value: bool, batch: Option<&Batch>) {
        self.focus.set(value, batch);
    }

    pub fn set_layout(&self, layout: Layout, batch: Option<&Batch>) {
        self.layout.set(Some(layout), batch);
    }

    /// Container feature of this element's layout
    pub fn feature(&self, name: &str, effect: Option<&Effect>) -> Option<ConditionValue> {
        let layout = self.layout(effect)?;
        Some(match name {
            "width" | "inline-size" => ConditionValue::Number(layout.width),
            "height" | "block-size" => ConditionValue::Number(layout.height),
            "aspect-ratio" => ConditionValue::Number(aspect_ratio(layout.width, layout.height)?),
            "orientation" => {
                ConditionValue::String(orientation(layout.width, layout.height).to_string())
            }
            _ => return None,
        })
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.capabilities.get()
    }

    /// Record the first render's capabilities and reject later additions.
    ///
    /// In non-strict mode an addition is logged and accepted.
    pub fn check_capabilities(
        &self,
        current: Capabilities,
        strict: bool,
    ) -> Result<(), RuntimeError> {
        let Some(first) = self.capabilities.get() else {
            self.capabilities.set(Some(current));
            return Ok(());
        };
        let Some(capability) = current.added_since(&first) else {
            return Ok(());
        };
        if strict {
            return Err(RuntimeError::CapabilityAdded { element: self.id, capability });
        }
        tracing::warn!(
            "element {} gained the `{}` capability after its first render",
            self.id,
            capability,
        );
        self.capabilities.set(Some(first.union(current)));
        Ok(())
    }
}

/// An ancestor registered as a named container
#[derive(Debug, Clone)]
pub struct ContainerEntry {
    pub element: Rc<ElementState>,
    pub props: Rc<Props>,
}

pub type ContainerMap = IndexMap<String, ContainerEntry>;

/// What an element passes down to its children
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub variables: Rc<VariableMap>,
    pub containers: Rc<ContainerMap>,
}

impl RenderContext {
    /// Numeric font size inherited for `em` units
    pub fn font_size(&self) -> Option<f64> {
        self.variables.get(FONT_SIZE_VARIABLE).and_then(StyleDescriptor::as_number)
    }
}

/// Value of a `dataSet` entry
pub fn data_set_value<'p>(props: &'p Props, name: &str) -> Option<&'p StyleValue> {
    props.get("dataSet").and_then(StyleValue::as_object).and_then(|data| data.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_fixed_after_first_render() {
        let element = ElementState::new();
        let plain = Capabilities::default();
        let animated = Capabilities { animations: true, ..Default::default() };

        element.check_capabilities(plain, true).unwrap();
        let error = element.check_capabilities(animated, true).unwrap_err();
        assert_eq!(
            error,
            RuntimeError::CapabilityAdded { element: element.id(), capability: "animations" },
        );
    }

    #[test]
    fn test_lenient_mode_accepts_additions() {
        let element = ElementState::new();
        element.check_capabilities(Capabilities::default(), false).unwrap();
        let pressable = Capabilities { pressable: true, ..Default::default() };
        element.check_capabilities(pressable, false).unwrap();
        assert_eq!(element.capabilities(), Some(pressable));
    }

    #[test]
    fn test_layout_features() {
        let element = ElementState::new();
        assert_eq!(element.feature("width", None), None);
        element.set_layout(Layout { width: 300.0, height: 100.0 }, None);
        assert_eq!(element.feature("width", None), Some(ConditionValue::Number(300.0)));
        assert_eq!(
            element.feature("orientation", None),
            Some(ConditionValue::String("landscape".into())),
        );
    }

    #[test]
    fn test_data_set_lookup() {
        let mut data = StyleObject::new();
        data.insert("state".into(), "open".into());
        let mut props = Props::new();
        props.insert("dataSet".into(), StyleValue::Object(data));
        assert_eq!(data_set_value(&props, "state"), Some(&StyleValue::from("open")));
        assert_eq!(data_set_value(&props, "other"), None);
    }
}
