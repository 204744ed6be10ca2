//! Shorthand Resolvers
//!
//! `border`, `box-shadow` and `text-shadow` values whose parts were only
//! known at render time. The resolved positional words are matched against
//! an ordered list of shape signatures and the first match names them.

use tinct_core::{Color, StyleFunction, StyleObject, StyleValue};

use super::{flatten, ResolveContext};

#[derive(Debug, Clone, Copy)]
enum Kind {
    Length,
    Color,
    Keyword(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    key: &'static str,
    kind: Kind,
}

const fn slot(key: &'static str, kind: Kind) -> Slot {
    Slot { key, kind }
}

type Shape = &'static [Slot];

const LINE_STYLES: &[&str] = &[
    "none", "hidden", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];
const LINE_WIDTHS: &[&str] = &["thin", "medium", "thick"];

const X: Slot = slot("offsetX", Kind::Length);
const Y: Slot = slot("offsetY", Kind::Length);
const BLUR: Slot = slot("blurRadius", Kind::Length);
const SPREAD: Slot = slot("spreadDistance", Kind::Length);
const COLOR: Slot = slot("color", Kind::Color);

const BOX_SHADOW: &[Shape] = &[
    &[X, Y],
    &[X, Y, COLOR],
    &[X, Y, BLUR],
    &[X, Y, BLUR, COLOR],
    &[X, Y, BLUR, SPREAD],
    &[X, Y, BLUR, SPREAD, COLOR],
    &[COLOR, X, Y],
    &[COLOR, X, Y, BLUR],
    &[COLOR, X, Y, BLUR, SPREAD],
];
const BOX_SHADOW_DEFAULTS: &[(&str, f64)] = &[("blurRadius", 0.0), ("spreadDistance", 0.0)];

const WIDTH: Slot = slot("width", Kind::Length);
const HEIGHT: Slot = slot("height", Kind::Length);
const RADIUS: Slot = slot("radius", Kind::Length);

const TEXT_SHADOW: &[Shape] = &[
    &[WIDTH, HEIGHT],
    &[WIDTH, HEIGHT, COLOR],
    &[WIDTH, HEIGHT, RADIUS],
    &[WIDTH, HEIGHT, RADIUS, COLOR],
    &[COLOR, WIDTH, HEIGHT],
    &[COLOR, WIDTH, HEIGHT, RADIUS],
];

const LINE_WIDTH: Slot = slot("width", Kind::Length);
const LINE_WIDTH_KEYWORD: Slot = slot("width", Kind::Keyword(LINE_WIDTHS));
const LINE_STYLE: Slot = slot("style", Kind::Keyword(LINE_STYLES));
const LINE_COLOR: Slot = slot("color", Kind::Color);

const BORDER: &[Shape] = &[
    &[LINE_WIDTH, LINE_STYLE, LINE_COLOR],
    &[LINE_WIDTH_KEYWORD, LINE_STYLE, LINE_COLOR],
    &[LINE_STYLE, LINE_WIDTH, LINE_COLOR],
    &[LINE_STYLE, LINE_COLOR, LINE_WIDTH],
    &[LINE_COLOR, LINE_WIDTH, LINE_STYLE],
    &[LINE_COLOR, LINE_STYLE, LINE_WIDTH],
    &[LINE_WIDTH, LINE_COLOR, LINE_STYLE],
    &[LINE_WIDTH, LINE_STYLE],
    &[LINE_WIDTH_KEYWORD, LINE_STYLE],
    &[LINE_STYLE, LINE_WIDTH],
    &[LINE_WIDTH, LINE_COLOR],
    &[LINE_COLOR, LINE_WIDTH],
    &[LINE_STYLE, LINE_COLOR],
    &[LINE_COLOR, LINE_STYLE],
    &[LINE_WIDTH],
    &[LINE_WIDTH_KEYWORD],
    &[LINE_STYLE],
    &[LINE_COLOR],
];

fn is_kind(kind: Kind, value: &StyleValue) -> bool {
    match (kind, value) {
        (Kind::Length, StyleValue::Number(_)) => true,
        (Kind::Keyword(words), StyleValue::String(s)) => words.contains(&s.as_str()),
        (Kind::Color, StyleValue::String(s)) => {
            !LINE_STYLES.contains(&s.as_str()) && Color::parse(s).is_some()
        }
        // platformColor() references
        (Kind::Color, StyleValue::Object(_)) => true,
        _ => false,
    }
}

/// Name the words with the first shape that fits
fn match_shape(words: &[StyleValue], shapes: &[Shape]) -> Option<StyleObject> {
    let shape = shapes.iter().find(|shape| {
        shape.len() == words.len()
            && shape.iter().zip(words).all(|(slot, word)| is_kind(slot.kind, word))
    })?;
    Some(shape.iter().zip(words).map(|(slot, word)| (slot.key.to_string(), word.clone())).collect())
}

fn resolved_words(
    context: &mut ResolveContext<'_>,
    arguments: &[tinct_core::StyleDescriptor],
) -> Option<Vec<StyleValue>> {
    Some(flatten(context.resolve_all(arguments)?))
}

/// `border` / `border-<side>`; the first argument is the output key prefix
pub fn border(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let (prefix, rest) = function.arguments.split_first()?;
    let prefix = prefix.as_str()?;
    let words = resolved_words(context, rest)?;
    let mut parts = match_shape(&words, BORDER)?;

    let mut output = StyleObject::new();
    if matches!(parts.get("style").and_then(StyleValue::as_str), Some("none" | "hidden")) {
        output.insert(format!("{prefix}Width"), 0.0.into());
        return Some(StyleValue::Object(output));
    }
    if let Some(width) = parts.shift_remove("width") {
        let width = match width.as_str() {
            Some("thin") => 1.0.into(),
            Some("medium") => 3.0.into(),
            Some("thick") => 5.0.into(),
            _ => width,
        };
        output.insert(format!("{prefix}Width"), width);
    }
    if let Some(style) = parts.shift_remove("style") {
        if prefix == "border" {
            output.insert("borderStyle".to_string(), style);
        }
    }
    if let Some(color) = parts.shift_remove("color") {
        output.insert(format!("{prefix}Color"), color);
    }
    Some(StyleValue::Object(output))
}

/// Every argument is one layer
pub fn box_shadow(
    context: &mut ResolveContext<'_>,
    function: &StyleFunction,
) -> Option<StyleValue> {
    let mut layers = Vec::new();
    for layer in &function.arguments {
        let mut words = flatten(vec![context.resolve(layer)?]);
        let before = words.len();
        words.retain(|word| word.as_str() != Some("inset"));
        let inset = words.len() != before;

        let mut shadow = match_shape(&words, BOX_SHADOW)?;
        for (key, default) in BOX_SHADOW_DEFAULTS {
            shadow.entry(key.to_string()).or_insert(StyleValue::Number(*default));
        }
        if inset {
            shadow.insert("inset".to_string(), true.into());
        }
        layers.push(StyleValue::Object(shadow));
    }
    Some(StyleValue::Array(layers))
}

/// Expands to `textShadowOffset`, `textShadowRadius` and `textShadowColor`
pub fn text_shadow(
    context: &mut ResolveContext<'_>,
    function: &StyleFunction,
) -> Option<StyleValue> {
    let words = resolved_words(context, &function.arguments)?;
    let mut parts = match_shape(&words, TEXT_SHADOW)?;

    let mut offset = StyleObject::new();
    offset.insert("width".to_string(), parts.shift_remove("width")?);
    offset.insert("height".to_string(), parts.shift_remove("height")?);

    let mut output = StyleObject::new();
    output.insert("textShadowOffset".to_string(), StyleValue::Object(offset));
    if let Some(radius) = parts.shift_remove("radius") {
        output.insert("textShadowRadius".to_string(), radius);
    }
    if let Some(color) = parts.shift_remove("color") {
        output.insert("textShadowColor".to_string(), color);
    }
    Some(StyleValue::Object(output))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use tinct_core::{FunctionName, StyleDescriptor};

    fn var(name: &str) -> StyleDescriptor {
        call(FunctionName::Var, vec![name.into()])
    }

    fn field<'v>(value: &'v StyleValue, key: &str) -> Option<&'v StyleValue> {
        value.as_object().and_then(|o| o.get(key))
    }

    #[test]
    fn test_border_with_variable_color() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--line".into(), "#f00".into());
        let border = call(
            FunctionName::Border,
            vec!["border".into(), 1.0.into(), "solid".into(), var("--line")],
        );
        let value = fixture.resolve(&border).unwrap();
        assert_eq!(field(&value, "borderWidth"), Some(&1.0.into()));
        assert_eq!(field(&value, "borderStyle"), Some(&"solid".into()));
        assert_eq!(field(&value, "borderColor"), Some(&"#f00".into()));
    }

    #[test]
    fn test_border_variable_holding_all_parts() {
        let mut fixture = Fixture::new();
        fixture.variables.insert(
            "--line".into(),
            StyleDescriptor::Array(vec!["thick".into(), "dashed".into(), "#00f".into()]),
        );
        let border = call(FunctionName::Border, vec!["borderTop".into(), var("--line")]);
        let value = fixture.resolve(&border).unwrap();
        assert_eq!(field(&value, "borderTopWidth"), Some(&5.0.into()));
        assert_eq!(field(&value, "borderTopColor"), Some(&"#00f".into()));
        assert_eq!(field(&value, "borderStyle"), None);
    }

    #[test]
    fn test_border_none() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--style".into(), "none".into());
        let border = call(FunctionName::Border, vec!["border".into(), var("--style")]);
        let value = fixture.resolve(&border).unwrap();
        assert_eq!(value.as_object().map(|o| o.len()), Some(1));
        assert_eq!(field(&value, "borderWidth"), Some(&0.0.into()));
    }

    #[test]
    fn test_box_shadow_layers() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--shadow-color".into(), "#0000ff80".into());
        let shadow = call(
            FunctionName::BoxShadow,
            vec![
                StyleDescriptor::Array(vec![2.0.into(), 4.0.into(), var("--shadow-color")]),
                StyleDescriptor::Array(vec!["inset".into(), 0.0.into(), 1.0.into(), 3.0.into()]),
            ],
        );
        let value = fixture.resolve(&shadow).unwrap();
        let layers = value.as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(field(&layers[0], "offsetY"), Some(&4.0.into()));
        assert_eq!(field(&layers[0], "blurRadius"), Some(&0.0.into()));
        assert_eq!(field(&layers[0], "color"), Some(&"#0000ff80".into()));
        assert_eq!(field(&layers[1], "blurRadius"), Some(&3.0.into()));
        assert_eq!(field(&layers[1], "inset"), Some(&true.into()));
    }

    #[test]
    fn test_box_shadow_rejects_unknown_shape() {
        let mut fixture = Fixture::new();
        let shadow = call(FunctionName::BoxShadow, vec![StyleDescriptor::Array(vec![1.0.into()])]);
        assert_eq!(fixture.resolve(&shadow), None);
    }

    #[test]
    fn test_text_shadow() {
        let mut fixture = Fixture::new();
        fixture.variables.insert("--offset".into(), 2.0.into());
        let shadow = call(
            FunctionName::TextShadow,
            vec![var("--offset"), var("--offset"), 1.0.into(), "#000".into()],
        );
        let value = fixture.resolve(&shadow).unwrap();
        let offset = field(&value, "textShadowOffset").unwrap();
        assert_eq!(field(offset, "width"), Some(&2.0.into()));
        assert_eq!(field(&value, "textShadowRadius"), Some(&1.0.into()));
        assert_eq!(field(&value, "textShadowColor"), Some(&"#000".into()));
    }
}
