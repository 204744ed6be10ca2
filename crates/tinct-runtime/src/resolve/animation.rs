//! `animation-name` lookup
//!
//! Each name becomes the keyframes registered under it, with every frame's
//! declarations resolved into a style object. Unknown names are skipped but
//! still observed, so injecting the keyframes later re-renders the element.

use tinct_core::{KeyframeFrame, StyleDeclaration, StyleFunction, StyleObject, StyleValue};

use super::ResolveContext;
use crate::merge::write_path;

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let names = context.resolve_all(&function.arguments)?;
    let mut animations = Vec::new();
    for name in super::flatten(names) {
        let Some(name) = name.as_str() else {
            continue;
        };
        if name == "none" {
            continue;
        }
        let Some(frames) = context.store.keyframes(name, context.effect) else {
            tracing::debug!("no keyframes named {name}");
            continue;
        };
        let frames = frames.iter().map(|frame| resolve_frame(context, frame)).collect();

        let mut animation = StyleObject::new();
        animation.insert("name".to_string(), name.into());
        animation.insert("frames".to_string(), StyleValue::Array(frames));
        animations.push(StyleValue::Object(animation));
    }
    Some(StyleValue::Array(animations))
}

fn resolve_frame(context: &mut ResolveContext<'_>, frame: &KeyframeFrame) -> StyleValue {
    let mut style = StyleObject::new();
    for declaration in &frame.declarations {
        match declaration {
            StyleDeclaration::Static(fields) => {
                for (key, descriptor) in fields {
                    if let Some(value) = StyleValue::from_static(descriptor) {
                        style.insert(key.clone(), value);
                    }
                }
            }
            StyleDeclaration::Dynamic(descriptor, path)
            | StyleDeclaration::Deferred(descriptor, path, _) => {
                let value = context.resolve(descriptor);
                write_path(&mut style, path.segments(), value);
            }
        }
    }

    let mut output = StyleObject::new();
    output.insert("progress".to_string(), frame.progress.into());
    output.insert("style".to_string(), StyleValue::Object(style));
    StyleValue::Object(output)
}
