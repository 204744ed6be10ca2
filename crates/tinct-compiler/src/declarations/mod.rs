//! Declaration Parser
//!
//! Maps each property/value pair to output entries: static values, records
//! for compound properties, or function descriptors for values that can
//! only be resolved at render time. Unsupported input is reported as a
//! warning and the declaration is dropped.

pub mod effects;
pub mod shorthands;
pub mod transform;
pub mod values;

use tinct_core::{PropertyPath, StyleDescriptor};

use crate::options::CompilerOptions;
use crate::properties::Property;
use crate::selector::camel_case;
use crate::tokens::{self, ValueToken};
use crate::warning::CompileWarning;

use values::TokenParser;

/// Parses one property value into the context. `None` means the value is unsupported.
pub type Handler = fn(&[ValueToken], &mut DeclarationContext<'_>) -> Option<()>;

/// One parsed output of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Value(PropertyPath, StyleDescriptor),
    /// Container names the element registers as
    Containers(Vec<String>),
}

/// State shared by the handlers of one declaration
pub struct DeclarationContext<'a> {
    pub property: Property,
    pub name: &'a str,
    pub options: &'a CompilerOptions,
    pub outputs: Vec<Output>,
}

impl<'a> DeclarationContext<'a> {
    pub fn new(property: Property, name: &'a str, options: &'a CompilerOptions) -> Self {
        Self { property, name, options, outputs: Vec::new() }
    }

    /// Output key of the property itself
    pub fn key(&self) -> String {
        camel_case(self.name)
    }

    pub fn emit(&mut self, key: impl Into<String>, value: StyleDescriptor) {
        self.outputs.push(Output::Value(PropertyPath::key(key), value));
    }

    pub fn emit_path(&mut self, path: PropertyPath, value: StyleDescriptor) {
        self.outputs.push(Output::Value(path, value));
    }

    pub fn emit_own(&mut self, value: StyleDescriptor) {
        let key = self.key();
        self.emit(key, value);
    }

    pub fn containers(&mut self, names: Vec<String>) {
        self.outputs.push(Output::Containers(names));
    }

    /// Parse a single-word value with the given converter
    pub fn single(&self, tokens: &[ValueToken], parser: TokenParser) -> Option<StyleDescriptor> {
        match tokens::words(tokens).as_slice() {
            [word] => parser(word, self.options),
            _ => None,
        }
    }
}

/// Parse a declaration. Custom properties are handled by [`parse_variable`].
pub fn parse_declaration(
    name: &str,
    value: &str,
    options: &CompilerOptions,
) -> Result<Vec<Output>, CompileWarning> {
    let property = Property::from_name(name).ok_or_else(|| CompileWarning::UnsupportedProperty {
        property: name.to_string(),
    })?;
    let unsupported = || CompileWarning::UnsupportedValue {
        property: name.to_string(),
        value: value.to_string(),
    };

    let tokens = tokens::tokenize(value);
    let tokens = tokens::trim(&tokens);
    if tokens.is_empty() || is_global_keyword(tokens) {
        return Err(unsupported());
    }

    let mut context = DeclarationContext::new(property, name, options);
    match property.handler()(tokens, &mut context) {
        Some(()) => Ok(context.outputs),
        None => Err(unsupported()),
    }
}

/// Parse a custom property value
pub fn parse_variable(value: &str, options: &CompilerOptions) -> StyleDescriptor {
    let tokens = tokens::tokenize(value);
    values::generic_value(tokens::trim(&tokens), options)
}

fn is_global_keyword(tokens: &[ValueToken]) -> bool {
    match tokens {
        [ValueToken::Ident(name)] => matches!(
            name.to_ascii_lowercase().as_str(),
            "inherit" | "initial" | "unset" | "revert" | "revert-layer"
        ),
        _ => false,
    }
}

/// Keyword from the property's allowed list
pub fn keyword(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let words = tokens::words(tokens);
    let value = match words.as_slice() {
        [ValueToken::Ident(word)] => {
            let word = word.to_ascii_lowercase();
            let word = match word.as_str() {
                "start" => "flex-start".to_string(),
                "end" => "flex-end".to_string(),
                _ => word,
            };
            if !context.property.keywords().contains(&word.as_str()) {
                return None;
            }
            StyleDescriptor::String(word)
        }
        [token @ ValueToken::Function(..)] => {
            values::dynamic(token, context.options, values::generic)?
        }
        _ => return None,
    };
    context.emit_own(value);
    Some(())
}

pub fn text_decoration_line(
    tokens: &[ValueToken],
    context: &mut DeclarationContext<'_>,
) -> Option<()> {
    let words = tokens::words(tokens);
    if let [token @ ValueToken::Function(..)] = words.as_slice() {
        let value = values::dynamic(token, context.options, values::generic)?;
        context.emit_own(value);
        return Some(());
    }
    let mut lines = Vec::new();
    for word in words {
        match word.ident()?.to_ascii_lowercase().as_str() {
            "none" => lines.clear(),
            line @ ("underline" | "line-through") => lines.push(line.to_string()),
            _ => return None,
        }
    }
    let value = if lines.is_empty() { "none".to_string() } else { lines.join(" ") };
    context.emit_own(value.into());
    Some(())
}

pub fn length(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = context.single(tokens, values::length)?;
    context.emit_own(value);
    Some(())
}

pub fn number(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = match tokens::words(tokens).as_slice() {
        [ValueToken::Percentage(p)] if context.property == Property::Opacity => {
            StyleDescriptor::Number(values::round(p / 100.0))
        }
        [word] => values::number(word, context.options)?,
        _ => return None,
    };
    context.emit_own(value);
    Some(())
}

pub fn color(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = context.single(tokens, values::color)?;
    context.emit_own(value);
    Some(())
}

/// `margin-inline-start` writes `marginStart`
pub fn inline_start(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    logical_edge(tokens, context, "Start")
}

pub fn inline_end(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    logical_edge(tokens, context, "End")
}

fn logical_edge(
    tokens: &[ValueToken],
    context: &mut DeclarationContext<'_>,
    edge: &str,
) -> Option<()> {
    let value = context.single(tokens, values::length)?;
    let name = context.name;
    let base = name.split('-').next().unwrap_or_default();
    context.emit(format!("{base}{edge}"), value);
    Some(())
}

pub fn aspect_ratio(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = match tokens::words(tokens).as_slice() {
        [ValueToken::Number(n)] => StyleDescriptor::Number(*n),
        [ValueToken::Number(a), ValueToken::Delim('/'), ValueToken::Number(b)] if *b != 0.0 => {
            StyleDescriptor::Number(values::round(a / b))
        }
        [ValueToken::Ident(auto)] if auto.eq_ignore_ascii_case("auto") => "auto".into(),
        [word] => values::number(word, context.options)?,
        _ => return None,
    };
    context.emit_own(value);
    Some(())
}

/// Written to the element's `numberOfLines` prop
pub fn line_clamp(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = match tokens::words(tokens).as_slice() {
        [ValueToken::Ident(none)] if none.eq_ignore_ascii_case("none") => {
            StyleDescriptor::Number(0.0)
        }
        [word] => values::number(word, context.options)?,
        _ => return None,
    };
    context.emit_path(PropertyPath::new(["^", "numberOfLines"]), value);
    Some(())
}

/// Unitless and relative line heights scale with the element's font size
pub fn line_height(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = match tokens::words(tokens).as_slice() {
        [ValueToken::Number(n)] => em(*n),
        [ValueToken::Percentage(p)] => em(values::round(p / 100.0)),
        [word] => values::length(word, context.options)?,
        _ => return None,
    };
    context.emit_own(value);
    Some(())
}

fn em(value: f64) -> StyleDescriptor {
    StyleDescriptor::function(tinct_core::FunctionName::Em, vec![StyleDescriptor::Number(value)])
}

pub fn font_weight(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = match tokens::words(tokens).as_slice() {
        [ValueToken::Number(n)] if (1.0..=1000.0).contains(n) => {
            StyleDescriptor::String(tinct_core::format_number(*n))
        }
        [ValueToken::Ident(word)] => match word.to_ascii_lowercase().as_str() {
            weight @ ("normal" | "bold") => weight.into(),
            _ => return None,
        },
        [token @ ValueToken::Function(..)] => {
            values::dynamic(token, context.options, values::generic)?
        }
        _ => return None,
    };
    context.emit_own(value);
    Some(())
}

/// Only the first family is kept
pub fn font_family(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let families = tokens::split_commas(tokens);
    let first = families.first()?;
    let value = match tokens::words(first).as_slice() {
        [ValueToken::String(name)] => StyleDescriptor::String(name.clone()),
        [token @ ValueToken::Function(..)] => {
            values::dynamic(token, context.options, values::generic)?
        }
        words => {
            let names = words.iter().map(|w| w.ident()).collect::<Option<Vec<_>>>()?;
            if names.is_empty() {
                return None;
            }
            StyleDescriptor::String(names.join(" "))
        }
    };
    context.emit_own(value);
    Some(())
}

pub fn font_variant(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let mut variants = Vec::new();
    for word in tokens::words(tokens) {
        let name = word.ident()?.to_ascii_lowercase();
        match name.as_str() {
            "normal" => {}
            "small-caps"
            | "oldstyle-nums"
            | "lining-nums"
            | "tabular-nums"
            | "proportional-nums" => {
                variants.push(StyleDescriptor::String(name))
            }
            _ => return None,
        }
    }
    context.emit_own(StyleDescriptor::Array(variants));
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_core::FunctionName;

    fn parse(name: &str, value: &str) -> Result<Vec<Output>, CompileWarning> {
        parse_declaration(name, value, &CompilerOptions::default())
    }

    fn value(key: &str, value: impl Into<StyleDescriptor>) -> Output {
        Output::Value(PropertyPath::key(key), value.into())
    }

    #[test]
    fn test_longhands() {
        assert_eq!(parse("color", "red").unwrap(), vec![value("color", "#f00")]);
        assert_eq!(parse("width", "10px").unwrap(), vec![value("width", 10.0)]);
        assert_eq!(parse("opacity", "50%").unwrap(), vec![value("opacity", 0.5)]);
        assert_eq!(
            parse("justify-content", "start").unwrap(),
            vec![value("justifyContent", "flex-start")],
        );
    }

    #[test]
    fn test_unsupported_inputs_warn() {
        assert!(matches!(parse("float", "left"), Err(CompileWarning::UnsupportedProperty { .. })));
        assert!(matches!(parse("display", "grid"), Err(CompileWarning::UnsupportedValue { .. })));
        assert!(matches!(parse("color", "inherit"), Err(CompileWarning::UnsupportedValue { .. })));
    }

    #[test]
    fn test_line_height_defers_unitless() {
        assert_eq!(
            parse("line-height", "1.5").unwrap(),
            vec![value("lineHeight", StyleDescriptor::function(FunctionName::Em, vec![1.5.into()]))]
        );
        assert_eq!(parse("line-height", "20px").unwrap(), vec![value("lineHeight", 20.0)]);
    }

    #[test]
    fn test_line_clamp_targets_prop() {
        assert_eq!(
            parse("line-clamp", "2").unwrap(),
            vec![Output::Value(PropertyPath::new(["^", "numberOfLines"]), 2.0.into())]
        );
    }

    #[test]
    fn test_logical_edges() {
        assert_eq!(parse("margin-inline-start", "4px").unwrap(), vec![value("marginStart", 4.0)]);
        assert_eq!(parse("padding-inline-end", "4px").unwrap(), vec![value("paddingEnd", 4.0)]);
    }

    #[test]
    fn test_font_family_and_weight() {
        assert_eq!(
            parse("font-family", "\"Inter\", sans-serif").unwrap(),
            vec![value("fontFamily", "Inter")],
        );
        assert_eq!(parse("font-weight", "700").unwrap(), vec![value("fontWeight", "700")]);
    }

    #[test]
    fn test_variable_value() {
        let options = CompilerOptions::default();
        assert_eq!(parse_variable("red", &options), "#f00".into());
        assert_eq!(parse_variable(" 12px ", &options), 12.0.into());
    }
}
