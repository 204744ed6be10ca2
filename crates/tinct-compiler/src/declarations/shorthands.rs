//! Shorthand expansion
//!
//! Shorthands expand into their longhands. When every longhand would get
//! the same value a single shorthand key is emitted instead.

use tinct_core::{FunctionName, PropertyPath, StyleDescriptor};

use super::values::{self, TokenParser};
use super::DeclarationContext;
use crate::properties::Property;
use crate::tokens::{self, ValueToken};

const SIDES: [&str; 4] = ["Top", "Right", "Bottom", "Left"];
const CORNERS: [&str; 4] = ["TopLeft", "TopRight", "BottomRight", "BottomLeft"];

/// Parse every word with the same converter
fn parse_words(
    tokens: &[ValueToken],
    parser: TokenParser,
    context: &DeclarationContext<'_>,
) -> Option<Vec<StyleDescriptor>> {
    let words = tokens::words(tokens);
    if words.is_empty() {
        return None;
    }
    words.into_iter().map(|word| parser(word, context.options)).collect()
}

/// CSS 1-4 value expansion into top, right, bottom, left
fn expand_edges(values: Vec<StyleDescriptor>) -> Option<[StyleDescriptor; 4]> {
    let mut values = values.into_iter();
    let a = values.next()?;
    let b = values.next();
    let c = values.next();
    let d = values.next();
    if values.next().is_some() {
        return None;
    }
    Some(match (b, c, d) {
        (None, _, _) => [a.clone(), a.clone(), a.clone(), a],
        (Some(b), None, _) => [a.clone(), b.clone(), a, b],
        (Some(b), Some(c), None) => [a, b.clone(), c, b],
        (Some(b), Some(c), Some(d)) => [a, b, c, d],
    })
}

fn all_equal(values: &[StyleDescriptor]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// `margin`, `padding`
pub fn box_edges(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let prefix = context.key();
    let edges = expand_edges(parse_words(tokens, values::length, context)?)?;
    if all_equal(&edges) {
        let [top, ..] = edges;
        context.emit(prefix, top);
    } else if edges[0] == edges[2] && edges[1] == edges[3] {
        let [vertical, horizontal, ..] = edges;
        context.emit(format!("{prefix}Vertical"), vertical);
        context.emit(format!("{prefix}Horizontal"), horizontal);
    } else {
        for (side, value) in SIDES.iter().zip(edges) {
            context.emit(format!("{prefix}{side}"), value);
        }
    }
    Some(())
}

pub fn inset(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let edges = expand_edges(parse_words(tokens, values::length, context)?)?;
    if all_equal(&edges) {
        let [top, ..] = edges;
        context.emit("inset", top);
    } else {
        for (side, value) in ["top", "right", "bottom", "left"].iter().zip(edges) {
            context.emit(*side, value);
        }
    }
    Some(())
}

/// Keys for `(equal, start, end)` of the logical axis shorthands
fn axis_keys(property: Property) -> Option<(&'static str, &'static str, &'static str)> {
    Some(match property {
        Property::MarginBlock => ("marginVertical", "marginTop", "marginBottom"),
        Property::PaddingBlock => ("paddingVertical", "paddingTop", "paddingBottom"),
        Property::InsetBlock => ("insetBlock", "top", "bottom"),
        Property::MarginInline => ("marginHorizontal", "marginStart", "marginEnd"),
        Property::PaddingInline => ("paddingHorizontal", "paddingStart", "paddingEnd"),
        Property::InsetInline => ("insetInline", "start", "end"),
        _ => return None,
    })
}

fn axis(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let (equal, start_key, end_key) = axis_keys(context.property)?;
    let mut parsed = parse_words(tokens, values::length, context)?.into_iter();
    let start = parsed.next()?;
    let end = parsed.next().unwrap_or_else(|| start.clone());
    if parsed.next().is_some() {
        return None;
    }
    if start == end {
        context.emit(equal, start);
    } else {
        context.emit(start_key, start);
        context.emit(end_key, end);
    }
    Some(())
}

/// `margin-block`, `padding-block`, `inset-block`
pub fn block_axis(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    axis(tokens, context)
}

/// `margin-inline`, `padding-inline`, `inset-inline`
pub fn inline_axis(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    axis(tokens, context)
}

pub fn gap(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let mut parsed = parse_words(tokens, values::length, context)?.into_iter();
    let row = parsed.next()?;
    let column = parsed.next().unwrap_or_else(|| row.clone());
    if parsed.next().is_some() {
        return None;
    }
    if row == column {
        context.emit("gap", row);
    } else {
        context.emit("rowGap", row);
        context.emit("columnGap", column);
    }
    Some(())
}

/// Border width including the `thin`/`medium`/`thick` keywords
pub fn border_width_value(
    token: &ValueToken,
    options: &crate::options::CompilerOptions,
) -> Option<StyleDescriptor> {
    match token.ident().map(str::to_ascii_lowercase).as_deref() {
        Some("thin") => Some(1.0.into()),
        Some("medium") => Some(3.0.into()),
        Some("thick") => Some(5.0.into()),
        _ => values::length(token, options),
    }
}

fn sided(
    tokens: &[ValueToken],
    context: &mut DeclarationContext<'_>,
    parser: TokenParser,
    suffix: &str,
) -> Option<()> {
    let edges = expand_edges(parse_words(tokens, parser, context)?)?;
    if all_equal(&edges) {
        let [top, ..] = edges;
        context.emit(format!("border{suffix}"), top);
    } else {
        for (side, value) in SIDES.iter().zip(edges) {
            context.emit(format!("border{side}{suffix}"), value);
        }
    }
    Some(())
}

pub fn border_width(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    sided(tokens, context, border_width_value, "Width")
}

pub fn border_color(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    sided(tokens, context, values::color, "Color")
}

pub fn border_radius(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    if tokens.iter().any(|t| t.is_delim('/')) {
        return None;
    }
    let corners = expand_edges(parse_words(tokens, values::length, context)?)?;
    if all_equal(&corners) {
        let [first, ..] = corners;
        context.emit("borderRadius", first);
    } else {
        for (corner, value) in CORNERS.iter().zip(corners) {
            context.emit(format!("border{corner}Radius"), value);
        }
    }
    Some(())
}

fn is_line_style(token: &ValueToken) -> Option<String> {
    let name = token.ident()?.to_ascii_lowercase();
    matches!(name.as_str(), "solid" | "dotted" | "dashed" | "none" | "hidden").then_some(name)
}

/// Width, style and colour in any order
struct LineParts {
    width: Option<StyleDescriptor>,
    style: Option<String>,
    color: Option<StyleDescriptor>,
}

fn line_parts(tokens: &[ValueToken], context: &DeclarationContext<'_>) -> Option<LineParts> {
    let mut parts = LineParts { width: None, style: None, color: None };
    for word in tokens::words(tokens) {
        if let Some(style) = is_line_style(word) {
            if parts.style.replace(style).is_some() {
                return None;
            }
        } else if let Some(width) = border_width_value(word, context.options) {
            if parts.width.replace(width).is_some() {
                return None;
            }
        } else if let Some(color) = values::color(word, context.options) {
            if parts.color.replace(color).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }
    Some(parts)
}

/// `border` and `border-<side>`
pub fn border(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let prefix = context.key();
    if tokens::contains_var(tokens) {
        let mut arguments = vec![StyleDescriptor::String(prefix)];
        for word in tokens::words(tokens) {
            arguments.push(values::generic(word, context.options)?);
        }
        context.emit_path(
            PropertyPath::root(),
            StyleDescriptor::function(FunctionName::Border, arguments),
        );
        return Some(());
    }

    let parts = line_parts(tokens, context)?;
    let hidden = matches!(parts.style.as_deref(), Some("none" | "hidden"));
    if hidden {
        context.emit(format!("{prefix}Width"), 0.0.into());
        return Some(());
    }
    if let Some(width) = parts.width {
        context.emit(format!("{prefix}Width"), width);
    }
    if let Some(style) = parts.style {
        if prefix == "border" {
            context.emit("borderStyle", style.into());
        }
    }
    if let Some(color) = parts.color {
        context.emit(format!("{prefix}Color"), color);
    }
    Some(())
}

pub fn outline(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let parts = line_parts(tokens, context)?;
    if let Some(width) = parts.width {
        context.emit("outlineWidth", width);
    }
    if let Some(style) = parts.style {
        if style == "none" || style == "hidden" {
            context.emit("outlineWidth", 0.0.into());
        } else {
            context.emit("outlineStyle", style.into());
        }
    }
    if let Some(color) = parts.color {
        context.emit("outlineColor", color);
    }
    Some(())
}

pub fn flex(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let words = tokens::words(tokens);
    let options = context.options;
    let zero_basis = || StyleDescriptor::from("0%");
    let (grow, shrink, basis) = match words.as_slice() {
        [ValueToken::Ident(word)] if word.eq_ignore_ascii_case("none") => {
            (0.0.into(), 0.0.into(), "auto".into())
        }
        [ValueToken::Ident(word)] if word.eq_ignore_ascii_case("auto") => {
            (1.0.into(), 1.0.into(), "auto".into())
        }
        [token @ ValueToken::Function(name, _)] if name == "var" => {
            let value = values::dynamic(token, options, values::generic)?;
            context.emit_own(value);
            return Some(());
        }
        [ValueToken::Number(grow)] => ((*grow).into(), 1.0.into(), zero_basis()),
        [ValueToken::Number(grow), ValueToken::Number(shrink)] => {
            ((*grow).into(), (*shrink).into(), zero_basis())
        }
        [ValueToken::Number(grow), basis] => {
            ((*grow).into(), 1.0.into(), values::length(basis, options)?)
        }
        [ValueToken::Number(grow), ValueToken::Number(shrink), basis] => {
            ((*grow).into(), (*shrink).into(), values::length(basis, options)?)
        }
        [basis] => (1.0.into(), 1.0.into(), values::length(basis, options)?),
        _ => return None,
    };
    context.emit("flexGrow", grow);
    context.emit("flexShrink", shrink);
    context.emit("flexBasis", basis);
    Some(())
}

pub fn flex_flow(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    for word in tokens::words(tokens) {
        let name = word.ident()?.to_ascii_lowercase();
        if Property::FlexDirection.keywords().contains(&name.as_str()) {
            context.emit("flexDirection", name.into());
        } else if Property::FlexWrap.keywords().contains(&name.as_str()) {
            context.emit("flexWrap", name.into());
        } else {
            return None;
        }
    }
    Some(())
}

/// `font: [style] [weight] size[/line-height] family`
pub fn font(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let tokens = tokens::trim(tokens);
    let words: Vec<(usize, &ValueToken)> =
        tokens.iter().enumerate().filter(|(_, t)| !t.is_whitespace()).collect();

    let mut style = None;
    let mut weight = None;
    let mut cursor = 0;
    let size = loop {
        let (_, word) = words.get(cursor)?;
        cursor += 1;
        match word {
            ValueToken::Dimension(..) | ValueToken::Percentage(_) => {
                break values::length(word, context.options)?
            }
            ValueToken::Number(n) => {
                weight = Some(StyleDescriptor::String(tinct_core::format_number(*n)))
            }
            ValueToken::Ident(name) => match name.to_ascii_lowercase().as_str() {
                "normal" => {}
                "italic" | "oblique" => style = Some("italic"),
                "bold" => weight = Some("bold".into()),
                "small-caps" => {}
                _ => return None,
            },
            _ => return None,
        }
    };

    let mut line_height = None;
    if words.get(cursor).is_some_and(|(_, t)| t.is_delim('/')) {
        let (_, value) = words.get(cursor + 1)?;
        line_height = Some(match value {
            ValueToken::Number(n) => StyleDescriptor::function(FunctionName::Em, vec![(*n).into()]),
            other => values::length(other, context.options)?,
        });
        cursor += 2;
    }

    let (family_start, _) = *words.get(cursor)?;
    let family_tokens = tokens::split_commas(&tokens[family_start..]);
    let family = match tokens::words(family_tokens.first()?).as_slice() {
        [ValueToken::String(name)] => name.clone(),
        many => many.iter().map(|w| w.ident()).collect::<Option<Vec<_>>>()?.join(" "),
    };

    if let Some(style) = style {
        context.emit("fontStyle", style.into());
    }
    if let Some(weight) = weight {
        context.emit("fontWeight", weight);
    }
    context.emit("fontSize", size);
    if let Some(line_height) = line_height {
        context.emit("lineHeight", line_height);
    }
    context.emit("fontFamily", family.into());
    Some(())
}

pub fn text_decoration(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let mut lines: Vec<String> = Vec::new();
    let mut none = false;
    let mut style = None;
    let mut color = None;
    for word in tokens::words(tokens) {
        let ident = word.ident().map(str::to_ascii_lowercase);
        match ident.as_deref() {
            Some("none") => none = true,
            Some(line @ ("underline" | "line-through")) => lines.push(line.to_string()),
            Some(s) if Property::TextDecorationStyle.keywords().contains(&s) => {
                style = Some(s.to_string())
            }
            _ => color = Some(values::color(word, context.options)?),
        }
    }
    if none || !lines.is_empty() {
        let line = if lines.is_empty() { "none".to_string() } else { lines.join(" ") };
        context.emit("textDecorationLine", line.into());
    }
    if let Some(style) = style {
        context.emit("textDecorationStyle", style.into());
    }
    if let Some(color) = color {
        context.emit("textDecorationColor", color);
    }
    Some(())
}

fn is_gradient(name: &str) -> bool {
    matches!(
        name,
        "linear-gradient"
            | "radial-gradient"
            | "repeating-linear-gradient"
            | "repeating-radial-gradient"
    )
}

/// Gradient with every colour stop serialized per the output options
fn gradient(token: &ValueToken, context: &DeclarationContext<'_>) -> Option<String> {
    let (name, args) = token.function().filter(|(name, _)| is_gradient(name))?;
    let stops: Vec<String> = tokens::split_commas(args)
        .into_iter()
        .map(|stop| {
            tokens::words(stop)
                .into_iter()
                .map(|word| match values::color(word, context.options) {
                    Some(StyleDescriptor::String(color)) => color,
                    _ => word.to_css(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(format!("{name}({})", stops.join(", ")))
}

/// Only colours and gradients are supported
pub fn background(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let layers = tokens::split_commas(tokens);
    let last = layers.last()?;
    let mut gradients: Vec<String> = layers[..layers.len() - 1]
        .iter()
        .map(|layer| match tokens::words(layer).as_slice() {
            [token] => gradient(token, context),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let mut color = None;
    for word in tokens::words(last) {
        match word {
            ValueToken::Function(name, _) if is_gradient(name) => {
                gradients.push(gradient(word, context)?)
            }
            ValueToken::Ident(name) if name.eq_ignore_ascii_case("none") => {}
            _ => color = Some(values::color(word, context.options)?),
        }
    }
    if let Some(color) = color {
        context.emit("backgroundColor", color);
    }
    if !gradients.is_empty() {
        context.emit("experimental_backgroundImage", gradients.join(", ").into());
    }
    Some(())
}

pub fn background_image(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let layers = tokens::split_commas(tokens);
    if let [[ValueToken::Ident(none)]] = layers.as_slice() {
        if none.eq_ignore_ascii_case("none") {
            context.emit("experimental_backgroundImage", "none".into());
            return Some(());
        }
    }
    let mut images = Vec::new();
    for layer in &layers {
        match *layer {
            [token @ ValueToken::Function(name, _)] if is_gradient(name) => {
                if tokens::contains_var(layer) {
                    let value = values::css_function(token, context.options)?;
                    context.emit("experimental_backgroundImage", value);
                    return Some(());
                }
                images.push(gradient(token, context)?);
            }
            _ => return None,
        }
    }
    context.emit("experimental_backgroundImage", images.join(", ").into());
    Some(())
}

#[cfg(test)]
mod tests {
    use super::super::{parse_declaration, Output};
    use crate::options::CompilerOptions;
    use tinct_core::{FunctionName, PropertyPath, StyleDescriptor};

    fn parse(name: &str, value: &str) -> Vec<(String, StyleDescriptor)> {
        parse_declaration(name, value, &CompilerOptions::default())
            .unwrap()
            .into_iter()
            .map(|output| match output {
                Output::Value(path, value) => (path.segments().join("."), value),
                Output::Containers(names) => (String::from("containers"), names.join(",").into()),
            })
            .collect()
    }

    fn kv(key: &str, value: impl Into<StyleDescriptor>) -> (String, StyleDescriptor) {
        (key.to_string(), value.into())
    }

    #[test]
    fn test_margin_dedup() {
        assert_eq!(parse("margin", "4px"), vec![kv("margin", 4.0)]);
        assert_eq!(
            parse("margin", "4px 8px"),
            vec![kv("marginVertical", 4.0), kv("marginHorizontal", 8.0)]
        );
        assert_eq!(
            parse("padding", "1px 2px 3px"),
            vec![
                kv("paddingTop", 1.0),
                kv("paddingRight", 2.0),
                kv("paddingBottom", 3.0),
                kv("paddingLeft", 2.0)
            ]
        );
    }

    #[test]
    fn test_border_shorthand() {
        assert_eq!(
            parse("border", "1px solid red"),
            vec![kv("borderWidth", 1.0), kv("borderStyle", "solid"), kv("borderColor", "#f00")]
        );
        assert_eq!(
            parse("border-top", "2px blue"),
            vec![kv("borderTopWidth", 2.0), kv("borderTopColor", "#00f")]
        );
        assert_eq!(parse("border", "none"), vec![kv("borderWidth", 0.0)]);
    }

    #[test]
    fn test_border_with_variable_defers() {
        let outputs = parse_declaration("border", "1px solid var(--c)", &CompilerOptions::default())
            .unwrap();
        match &outputs[0] {
            Output::Value(path, StyleDescriptor::Function(function)) => {
                assert_eq!(*path, PropertyPath::root());
                assert_eq!(function.name, FunctionName::Border);
                assert_eq!(function.arguments.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_radius_and_widths() {
        assert_eq!(parse("border-radius", "4px"), vec![kv("borderRadius", 4.0)]);
        assert_eq!(parse("border-width", "thin"), vec![kv("borderWidth", 1.0)]);
        assert_eq!(parse("border-color", "red blue").len(), 4);
    }

    #[test]
    fn test_flex() {
        assert_eq!(
            parse("flex", "1"),
            vec![kv("flexGrow", 1.0), kv("flexShrink", 1.0), kv("flexBasis", "0%")]
        );
        assert_eq!(
            parse("flex", "none"),
            vec![kv("flexGrow", 0.0), kv("flexShrink", 0.0), kv("flexBasis", "auto")]
        );
    }

    #[test]
    fn test_gap_and_axes() {
        assert_eq!(parse("gap", "4px"), vec![kv("gap", 4.0)]);
        assert_eq!(parse("gap", "4px 8px"), vec![kv("rowGap", 4.0), kv("columnGap", 8.0)]);
        assert_eq!(parse("margin-inline", "2px"), vec![kv("marginHorizontal", 2.0)]);
        assert_eq!(
            parse("padding-block", "1px 2px"),
            vec![kv("paddingTop", 1.0), kv("paddingBottom", 2.0)],
        );
    }

    #[test]
    fn test_font_shorthand() {
        let font = parse("font", "italic bold 12px/1.5 \"Helvetica Neue\", sans-serif");
        assert_eq!(font[0], kv("fontStyle", "italic"));
        assert_eq!(font[1], kv("fontWeight", "bold"));
        assert_eq!(font[2], kv("fontSize", 12.0));
        assert_eq!(
            font[3],
            kv("lineHeight", StyleDescriptor::function(FunctionName::Em, vec![1.5.into()])),
        );
        assert_eq!(font[4], kv("fontFamily", "Helvetica Neue"));
    }

    #[test]
    fn test_text_decoration() {
        assert_eq!(
            parse("text-decoration", "underline dotted red"),
            vec![
                kv("textDecorationLine", "underline"),
                kv("textDecorationStyle", "dotted"),
                kv("textDecorationColor", "#f00")
            ]
        );
    }

    #[test]
    fn test_background_gradient() {
        assert_eq!(parse("background", "red"), vec![kv("backgroundColor", "#f00")]);
        assert_eq!(
            parse("background-image", "linear-gradient(red, blue)"),
            vec![kv("experimental_backgroundImage", "linear-gradient(#f00, #00f)")]
        );
    }

    #[test]
    fn test_gradient_stops_follow_color_options() {
        assert_eq!(
            parse("background", "linear-gradient(to right, red 10%, transparent), blue"),
            vec![
                kv("backgroundColor", "#00f"),
                kv("experimental_backgroundImage", "linear-gradient(to right, #f00 10%, #0000)")
            ]
        );

        let options = CompilerOptions { hex_colors: false, ..Default::default() };
        let outputs: Vec<_> = parse_declaration(
            "background-image",
            "radial-gradient(circle, red, blue)",
            &options,
        )
        .unwrap()
            .into_iter()
            .filter_map(|output| match output {
                Output::Value(path, value) => Some((path.segments().join("."), value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            outputs,
            vec![kv(
                "experimental_backgroundImage",
                "radial-gradient(circle, rgb(255, 0, 0), rgb(0, 0, 255))",
            )]
        );
    }
}
