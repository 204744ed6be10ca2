//! Output Merging
//!
//! Writes resolved declarations into the element's output props. Every
//! write lands in a target prop object (usually `style`) unless its path
//! starts with `^`, which addresses the props themselves.
//!
//! Deferred declarations reserve their key with a placeholder so the final
//! order matches declaration order, and are resolved once every other
//! declaration of the render has been written.

use indexmap::IndexMap;
use tinct_core::{PropertyPath, StyleDescriptor, StyleObject, StyleValue};

use crate::element::Props;

/// A deferred declaration waiting for the second pass
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub target: String,
    pub path: PropertyPath,
    pub descriptor: StyleDescriptor,
}

/// Output props under construction
#[derive(Debug, Clone, Default)]
pub struct Output {
    props: Props,
    pending: IndexMap<(String, PropertyPath), StyleDescriptor>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a resolved value. `None` removes the key.
    pub fn write(&mut self, target: &str, path: &PropertyPath, value: Option<StyleValue>) {
        self.pending.shift_remove(&(target.to_string(), path.clone()));
        match path.segments() {
            [top, rest @ ..] if top == PropertyPath::TOP_LEVEL => {
                write_path(&mut self.props, rest, value)
            }
            segments => write_nested(&mut self.props, target, segments, value),
        }
    }

    /// Reserve the key and resolve later
    pub fn defer(&mut self, target: &str, path: &PropertyPath, descriptor: StyleDescriptor) {
        if !path.is_empty() {
            self.write(target, path, Some(StyleValue::Null));
        }
        self.pending.insert((target.to_string(), path.clone()), descriptor);
    }

    /// Take the pending declarations. `fontSize` entries come first so the
    /// rest can be resolved against the element's own font size.
    pub fn take_pending(&mut self) -> Vec<Pending> {
        let mut pending: Vec<Pending> = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|((target, path), descriptor)| Pending { target, path, descriptor })
            .collect();
        pending.sort_by_key(|entry| entry.path.as_key() != Some("fontSize"));
        pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Current value at a target key
    pub fn get(&self, target: &str, key: &str) -> Option<&StyleValue> {
        self.props.get(target).and_then(StyleValue::as_object).and_then(|object| object.get(key))
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn into_props(self) -> Props {
        self.props
    }
}

/// Write inside the object stored under `key`, replacing any non-object value
fn write_nested(
    object: &mut StyleObject,
    key: &str,
    segments: &[String],
    value: Option<StyleValue>,
) {
    let slot = object.entry(key.to_string())
        .or_insert_with(|| StyleValue::Object(StyleObject::new()));
    if !matches!(slot, StyleValue::Object(_)) {
        *slot = StyleValue::Object(StyleObject::new());
    }
    if let StyleValue::Object(inner) = slot {
        write_path(inner, segments, value);
    }
}

/// Write `value` at `segments` inside `object`.
///
/// An empty path merges an object value key by key. `["transform", op]`
/// replaces the matching operation of the transform list or appends one.
pub fn write_path(object: &mut StyleObject, segments: &[String], value: Option<StyleValue>) {
    match segments {
        [] => {
            if let Some(StyleValue::Object(fields)) = value {
                for (key, field) in fields {
                    object.insert(key, field);
                }
            }
        }
        [transform, operation] if transform == "transform" => {
            write_transform(object, operation, value)
        }
        [key] => match value {
            Some(value) => {
                object.insert(key.clone(), value);
            }
            None => {
                object.shift_remove(key);
            }
        },
        [key, rest @ ..] => write_nested(object, key, rest, value),
    }
}

fn write_transform(object: &mut StyleObject, operation: &str, value: Option<StyleValue>) {
    let slot = object.entry("transform".to_string())
        .or_insert_with(|| StyleValue::Array(Vec::new()));
    if !matches!(slot, StyleValue::Array(_)) {
        *slot = StyleValue::Array(Vec::new());
    }
    let StyleValue::Array(list) = slot else {
        return;
    };
    let position = list
        .iter()
        .position(|entry| entry.as_object().is_some_and(|record| record.contains_key(operation)));
    match (position, value) {
        (Some(index), Some(value)) => {
            let mut record = StyleObject::new();
            record.insert(operation.to_string(), value);
            list[index] = StyleValue::Object(record);
        }
        (Some(index), None) => {
            list.remove(index);
        }
        (None, Some(value)) => {
            let mut record = StyleObject::new();
            record.insert(operation.to_string(), value);
            list.push(StyleValue::Object(record));
        }
        (None, None) => {}
    }
}
