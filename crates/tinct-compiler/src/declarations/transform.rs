//! Transforms
//!
//! `transform` compiles to an ordered list of single-key records, one per
//! operation. Lists containing `var()` are deferred as a whole: each
//! operation is kept as a CSS function descriptor and re-parsed once the
//! variables are known.

use indexmap::IndexMap;
use tinct_core::{FunctionName, PropertyPath, StyleDescriptor};

use super::values;
use super::DeclarationContext;
use crate::options::CompilerOptions;
use crate::tokens::{self, ValueToken};

fn record(key: &str, value: StyleDescriptor) -> StyleDescriptor {
    let mut map = IndexMap::new();
    map.insert(key.to_string(), value);
    StyleDescriptor::Record(map)
}

fn arguments<'t>(args: &'t [ValueToken]) -> Vec<&'t ValueToken> {
    tokens::split_commas(args)
        .into_iter()
        .flat_map(|part| tokens::words(part))
        .collect()
}

/// One transform function into its records
fn operation(token: &ValueToken, options: &CompilerOptions) -> Option<Vec<StyleDescriptor>> {
    let (name, args) = token.function()?;
    let args = arguments(args);
    let length = |token: &ValueToken| values::length(token, options);
    let number = |token: &ValueToken| values::number(token, options);
    let angle = |token: &ValueToken| values::angle_or_dynamic(token, options);

    Some(match (name, args.as_slice()) {
        ("translate", [x]) => vec![record("translateX", length(x)?)],
        ("translate", [x, y]) => {
            vec![record("translateX", length(x)?), record("translateY", length(y)?)]
        }
        ("translatex", [x]) => vec![record("translateX", length(x)?)],
        ("translatey", [y]) => vec![record("translateY", length(y)?)],
        ("scale", [both]) => vec![record("scale", number(both)?)],
        ("scale", [x, y]) => {
            let (x, y) = (number(x)?, number(y)?);
            if x == y {
                vec![record("scale", x)]
            } else {
                vec![record("scaleX", x), record("scaleY", y)]
            }
        }
        ("scalex", [x]) => vec![record("scaleX", number(x)?)],
        ("scaley", [y]) => vec![record("scaleY", number(y)?)],
        ("rotate", [a]) => vec![record("rotate", angle(a)?)],
        ("rotatex", [a]) => vec![record("rotateX", angle(a)?)],
        ("rotatey", [a]) => vec![record("rotateY", angle(a)?)],
        ("rotatez", [a]) => vec![record("rotateZ", angle(a)?)],
        ("skew", [x]) => vec![record("skewX", angle(x)?)],
        ("skew", [x, y]) => vec![record("skewX", angle(x)?), record("skewY", angle(y)?)],
        ("skewx", [x]) => vec![record("skewX", angle(x)?)],
        ("skewy", [y]) => vec![record("skewY", angle(y)?)],
        ("perspective", [d]) => vec![record("perspective", length(d)?)],
        ("matrix", cells) if cells.len() == 6 => {
            let n = cells
                .iter()
                .map(|v| match v {
                    ValueToken::Number(n) => Some(*n),
                    _ => None,
                })
                .collect::<Option<Vec<f64>>>()?;
            let matrix = [
                n[0], n[1], 0.0, 0.0, n[2], n[3], 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, n[4], n[5], 0.0,
                1.0,
            ];
            vec![record(
                "matrix",
                StyleDescriptor::Array(matrix.iter().map(|v| (*v).into()).collect()),
            )]
        }
        _ => return None,
    })
}

/// Parse a whole transform list into records
pub fn parse_transform_list(
    tokens: &[ValueToken],
    options: &CompilerOptions,
) -> Option<Vec<StyleDescriptor>> {
    let mut records = Vec::new();
    for word in tokens::words(tokens) {
        records.extend(operation(word, options)?);
    }
    Some(records)
}

/// Each function kept as `cssFunction(name, args...)`
fn deferred_list(tokens: &[ValueToken], options: &CompilerOptions) -> Option<StyleDescriptor> {
    let mut arguments = Vec::new();
    for word in tokens::words(tokens) {
        let descriptor = match word {
            ValueToken::Function(name, _) if name == "var" => {
                values::dynamic(word, options, values::generic)?
            }
            ValueToken::Function(name, args) => {
                let mut parts = vec![StyleDescriptor::String(name.clone())];
                parts.extend(
                    tokens::split_commas(args)
                        .into_iter()
                        .map(|part| values::generic_value(part, options)),
                );
                StyleDescriptor::function(FunctionName::CssFunction, parts)
            }
            _ => return None,
        };
        arguments.push(descriptor);
    }
    Some(StyleDescriptor::function(FunctionName::Transform, arguments))
}

pub fn transform(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    if let [ValueToken::Ident(none)] = tokens {
        if none.eq_ignore_ascii_case("none") {
            context.emit("transform", StyleDescriptor::Array(Vec::new()));
            return Some(());
        }
    }
    let value = if tokens::contains_var(tokens) {
        deferred_list(tokens, context.options)?
    } else {
        StyleDescriptor::Array(parse_transform_list(tokens, context.options)?)
    };
    context.emit("transform", value);
    Some(())
}

fn transform_path(operation: &str) -> PropertyPath {
    PropertyPath::new(["transform", operation])
}

/// The individual `translate` property
pub fn translate(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let words = tokens::words(tokens);
    let options = context.options;
    match words.as_slice() {
        [x] => context.emit_path(transform_path("translateX"), values::length(x, options)?),
        [x, y] => {
            let (x, y) = (values::length(x, options)?, values::length(y, options)?);
            context.emit_path(transform_path("translateX"), x);
            context.emit_path(transform_path("translateY"), y);
        }
        _ => return None,
    }
    Some(())
}

pub fn rotate(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let words = tokens::words(tokens);
    let options = context.options;
    let (key, angle) = match words.as_slice() {
        [angle] => ("rotate", *angle),
        [axis, angle] => match axis.ident().map(str::to_ascii_lowercase).as_deref() {
            Some("x") => ("rotateX", *angle),
            Some("y") => ("rotateY", *angle),
            Some("z") => ("rotateZ", *angle),
            _ => return None,
        },
        _ => return None,
    };
    let value = values::angle_or_dynamic(angle, options)?;
    context.emit_path(transform_path(key), value);
    Some(())
}

pub fn scale(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let words = tokens::words(tokens);
    let options = context.options;
    let factor = |token: &ValueToken| match token {
        ValueToken::Percentage(p) => Some(StyleDescriptor::Number(values::round(p / 100.0))),
        other => values::number(other, options),
    };
    match words.as_slice() {
        [both] => context.emit_path(transform_path("scale"), factor(both)?),
        [x, y] => {
            let (x, y) = (factor(x)?, factor(y)?);
            if x == y {
                context.emit_path(transform_path("scale"), x);
            } else {
                context.emit_path(transform_path("scaleX"), x);
                context.emit_path(transform_path("scaleY"), y);
            }
        }
        _ => return None,
    }
    Some(())
}

/// Kept as written after keyword normalisation
pub fn transform_origin(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let mut parts = Vec::new();
    for word in tokens::words(tokens) {
        let part = match word {
            ValueToken::Ident(name) => match name.to_ascii_lowercase().as_str() {
                keyword @ ("left" | "right" | "top" | "bottom" | "center") => keyword.to_string(),
                _ => return None,
            },
            ValueToken::Dimension(value, unit) => match values::absolute_px(*value, unit) {
                Some(px) => format!("{}px", tinct_core::format_number(px)),
                None => return None,
            },
            ValueToken::Number(n) if *n == 0.0 => "0".to_string(),
            ValueToken::Percentage(_) => word.to_css(),
            _ => return None,
        };
        parts.push(part);
    }
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    context.emit("transformOrigin", parts.join(" ").into());
    Some(())
}
