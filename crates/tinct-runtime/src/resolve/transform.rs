//! Deferred transforms
//!
//! A transform list that referenced variables is kept as text-like function
//! descriptors. Once every argument is resolved the list is spliced back
//! into CSS text and parsed into the same single-key records the compiler
//! emits for static transforms.

use tinct_core::{format_number, StyleFunction, StyleObject, StyleValue};

use super::ResolveContext;

/// `cssFunction(name, args...)` as CSS text
pub fn css_function(
    context: &mut ResolveContext<'_>,
    function: &StyleFunction,
) -> Option<StyleValue> {
    let (name, rest) = function.arguments.split_first()?;
    let name = name.as_str()?;
    let arguments = context.resolve_all(rest)?;
    let text = arguments.iter().map(StyleValue::to_css_text).collect::<Vec<_>>().join(", ");
    Some(StyleValue::String(format!("{name}({text})")))
}

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let parts = context.resolve_all(&function.arguments)?;
    let text = parts.iter().map(StyleValue::to_css_text).collect::<Vec<_>>().join(" ");
    parse_list(&text).map(StyleValue::Array)
}

/// `rotate(45deg) translateX(10px)` into records
pub fn parse_list(text: &str) -> Option<Vec<StyleValue>> {
    let mut records = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let name = rest[..open].trim().to_ascii_lowercase();
        let arguments: Vec<&str> = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        records.extend(operation(&name, &arguments)?);
        rest = rest[close + 1..].trim_start();
    }
    Some(records)
}

fn record(key: &str, value: StyleValue) -> StyleValue {
    let mut object = StyleObject::new();
    object.insert(key.to_string(), value);
    StyleValue::Object(object)
}

fn length(text: &str) -> Option<StyleValue> {
    if text.ends_with('%') {
        text[..text.len() - 1].parse::<f64>().ok()?;
        return Some(StyleValue::String(text.to_string()));
    }
    let number = text.strip_suffix("px").unwrap_or(text);
    number.parse().ok().map(StyleValue::Number)
}

fn number(text: &str) -> Option<StyleValue> {
    text.parse().ok().map(StyleValue::Number)
}

fn angle(text: &str) -> Option<StyleValue> {
    let split = text.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(text.len());
    let value: f64 = text[..split].parse().ok()?;
    let degrees = match &text[split..] {
        "deg" => value,
        "rad" => value.to_degrees(),
        "grad" => value * 0.9,
        "turn" => value * 360.0,
        "" if value == 0.0 => 0.0,
        _ => return None,
    };
    let degrees = (degrees * 1e6).round() / 1e6;
    Some(StyleValue::String(format!("{}deg", format_number(degrees))))
}

fn operation(name: &str, arguments: &[&str]) -> Option<Vec<StyleValue>> {
    Some(match (name, arguments) {
        ("translate", [x]) | ("translatex", [x]) => vec![record("translateX", length(x)?)],
        ("translate", [x, y]) => {
            vec![record("translateX", length(x)?), record("translateY", length(y)?)]
        }
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
        ("skew", [x]) | ("skewx", [x]) => vec![record("skewX", angle(x)?)],
        ("skew", [x, y]) => vec![record("skewX", angle(x)?), record("skewY", angle(y)?)],
        ("skewy", [y]) => vec![record("skewY", angle(y)?)],
        ("perspective", [d]) => vec![record("perspective", length(d)?)],
        ("matrix", cells) if cells.len() == 6 => {
            let n = cells.iter()
                .map(|cell| cell.parse::<f64>().ok())
                .collect::<Option<Vec<f64>>>()?;
            let matrix = [
                n[0], n[1], 0.0, 0.0, n[2], n[3], 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, n[4], n[5], 0.0,
                1.0,
            ];
            vec![record(
                "matrix",
                StyleValue::Array(matrix.iter().map(|v| StyleValue::Number(*v)).collect()),
            )]
        }
        _ => return None,
    })
}
