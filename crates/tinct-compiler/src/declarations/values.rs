//! Value converters shared by every property handler

use tinct_core::{format_number, FunctionName, StyleDescriptor};

use crate::options::CompilerOptions;
use crate::tokens::{self, ValueToken};

/// Converts one component value, or fails for an unsupported value
pub type TokenParser = fn(&ValueToken, &CompilerOptions) -> Option<StyleDescriptor>;

/// Round away float noise from unit conversions
pub fn round(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Absolute length in px, or `None` for relative units
pub fn absolute_px(value: f64, unit: &str) -> Option<f64> {
    Some(round(match unit {
        "px" => value,
        "pt" => value * 96.0 / 72.0,
        "pc" => value * 16.0,
        "in" => value * 96.0,
        "cm" => value * 96.0 / 2.54,
        "mm" => value * 96.0 / 25.4,
        "q" => value * 96.0 / 101.6,
        _ => return None,
    }))
}

pub fn percentage(value: f64) -> StyleDescriptor {
    StyleDescriptor::String(format!("{}%", format_number(value)))
}

/// Length or percentage
pub fn length(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Number(n) => Some(StyleDescriptor::Number(*n)),
        ValueToken::Percentage(p) => Some(percentage(*p)),
        ValueToken::Dimension(value, unit) => {
            if let Some(px) = absolute_px(*value, unit) {
                return Some(StyleDescriptor::Number(px));
            }
            let name = match unit.as_str() {
                "rem" => match options.inline_rem {
                    Some(rem) => return Some(StyleDescriptor::Number(round(value * rem))),
                    None => FunctionName::Rem,
                },
                "em" => FunctionName::Em,
                "vw" => FunctionName::Vw,
                "vh" => FunctionName::Vh,
                "vmin" => FunctionName::Vmin,
                "vmax" => FunctionName::Vmax,
                _ => return None,
            };
            Some(StyleDescriptor::function(name, vec![StyleDescriptor::Number(*value)]))
        }
        ValueToken::Ident(name) if name.eq_ignore_ascii_case("auto") => Some("auto".into()),
        ValueToken::Function(..) => dynamic(token, options, length),
        _ => None,
    }
}

/// Plain number
pub fn number(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Number(n) => Some(StyleDescriptor::Number(*n)),
        ValueToken::Function(..) => dynamic(token, options, number),
        _ => None,
    }
}

/// Colour serialized per the output options
pub fn color(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Function(name, _) if is_color_function(name) => {
            color_text(&token.to_css(), options)
        }
        ValueToken::Function(..) => dynamic(token, options, color),
        ValueToken::Hash(_) => color_text(&token.to_css(), options),
        ValueToken::Ident(name) if !name.eq_ignore_ascii_case("currentcolor") => {
            color_text(name, options)
        }
        _ => None,
    }
}

fn color_text(text: &str, options: &CompilerOptions) -> Option<StyleDescriptor> {
    let parsed = tinct_core::Color::parse(text)?;
    Some(StyleDescriptor::String(parsed.serialize(options.hex_colors, options.color_precision)))
}

pub fn is_color_function(name: &str) -> bool {
    matches!(
        name,
        "rgb" | "rgba" | "hsl" | "hsla" | "hwb" | "lab" | "lch" | "oklab" | "oklch" | "color"
    )
}

/// Time in milliseconds
pub fn time(token: &ValueToken) -> Option<f64> {
    match token {
        ValueToken::Dimension(value, unit) if unit == "s" => Some(round(value * 1000.0)),
        ValueToken::Dimension(value, unit) if unit == "ms" => Some(*value),
        ValueToken::Number(n) if *n == 0.0 => Some(0.0),
        _ => None,
    }
}

/// Angle normalised to a `deg` string
pub fn angle(token: &ValueToken) -> Option<StyleDescriptor> {
    let degrees = match token {
        ValueToken::Dimension(value, unit) => match unit.as_str() {
            "deg" => *value,
            "rad" => value.to_degrees(),
            "grad" => value * 0.9,
            "turn" => value * 360.0,
            _ => return None,
        },
        ValueToken::Number(n) if *n == 0.0 => 0.0,
        _ => return None,
    };
    Some(StyleDescriptor::String(format!("{}deg", format_number(round(degrees)))))
}

/// Angle, or any runtime function yielding one
pub fn angle_or_dynamic(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Function(..) => dynamic(token, options, angle_or_dynamic),
        _ => angle(token),
    }
}

/// Best-effort conversion used for custom property values and fallbacks
pub fn generic(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    Some(match token {
        ValueToken::Number(n) => StyleDescriptor::Number(*n),
        ValueToken::Percentage(p) => percentage(*p),
        ValueToken::Dimension(..) => length(token, options)
            .or_else(|| angle(token))
            .or_else(|| time(token).map(StyleDescriptor::Number))
            .unwrap_or_else(|| StyleDescriptor::String(token.to_css())),
        ValueToken::Ident(_) | ValueToken::Hash(_) => {
            color(token, options).unwrap_or_else(|| StyleDescriptor::String(token.to_css()))
        }
        ValueToken::String(value) => StyleDescriptor::String(value.clone()),
        ValueToken::Function(name, _) if is_color_function(name) => {
            color(token, options).unwrap_or_else(|| StyleDescriptor::String(token.to_css()))
        }
        ValueToken::Function(..) => dynamic(token, options, generic)
            .or_else(|| css_function(token, options))
            .unwrap_or_else(|| StyleDescriptor::String(token.to_css())),
        other => StyleDescriptor::String(other.to_css()),
    })
}

/// Convert a whole value: one word stays scalar, several become an array,
/// comma-separated lists become nested arrays
pub fn generic_value(tokens: &[ValueToken], options: &CompilerOptions) -> StyleDescriptor {
    let parts = tokens::split_commas(tokens);
    if parts.len() > 1 {
        return StyleDescriptor::Array(
            parts.iter().map(|part| words_value(part, options)).collect(),
        );
    }
    words_value(tokens::trim(tokens), options)
}

fn words_value(tokens: &[ValueToken], options: &CompilerOptions) -> StyleDescriptor {
    let words = tokens::words(tokens);
    match words.as_slice() {
        [] => StyleDescriptor::Undefined,
        [single] => generic(single, options).unwrap_or_default(),
        many => StyleDescriptor::Array(
            many.iter().map(|word| generic(word, options).unwrap_or_default()).collect(),
        ),
    }
}

/// Runtime functions: `var()`, `calc()` and the platform helpers
pub fn dynamic(
    token: &ValueToken,
    options: &CompilerOptions,
    parser: TokenParser,
) -> Option<StyleDescriptor> {
    let (name, args) = token.function()?;
    match name {
        "var" => var(args, options, parser),
        "calc" => Some(StyleDescriptor::function(FunctionName::Calc, calc_stream(args, options)?)),
        "platformcolor" => {
            let names = tokens::split_commas(args)
                .into_iter()
                .map(|part| match part {
                    [ValueToken::String(s)] | [ValueToken::Ident(s)] => {
                        Some(StyleDescriptor::String(s.clone()))
                    }
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            Some(StyleDescriptor::function(FunctionName::PlatformColor, names))
        }
        "hairlinewidth" => Some(StyleDescriptor::function(FunctionName::HairlineWidth, Vec::new())),
        "pixelratio" | "fontscale" => {
            let function = if name == "pixelratio" {
                FunctionName::PixelRatio
            } else {
                FunctionName::FontScale
            };
            let arguments = match tokens::words(args).as_slice() {
                [] => Vec::new(),
                [value] => vec![number(value, options)?],
                _ => return None,
            };
            Some(StyleDescriptor::function(function, arguments))
        }
        "roundtonearestpixel" => match tokens::words(args).as_slice() {
            [value] => Some(StyleDescriptor::function(
                FunctionName::RoundToNearestPixel,
                vec![length(value, options)?],
            )),
            _ => None,
        },
        _ => None,
    }
}

/// `var(--name, fallback)`
fn var(
    args: &[ValueToken],
    options: &CompilerOptions,
    parser: TokenParser,
) -> Option<StyleDescriptor> {
    let comma = args.iter().position(|t| matches!(t, ValueToken::Comma));
    let (name_tokens, fallback) = match comma {
        Some(index) => (&args[..index], Some(tokens::trim(&args[index + 1..]))),
        None => (args, None),
    };
    let name = match tokens::trim(name_tokens) {
        [ValueToken::Ident(name)] if name.starts_with("--") => name.clone(),
        _ => return None,
    };
    let mut arguments = vec![StyleDescriptor::String(name)];
    if let Some(fallback) = fallback {
        let words = tokens::words(fallback);
        let value = match words.as_slice() {
            [single] => parser(single, options).unwrap_or_else(|| generic_value(fallback, options)),
            _ => generic_value(fallback, options),
        };
        arguments.push(value);
    }
    Some(StyleDescriptor::function(FunctionName::Var, arguments))
}

/// Flatten a `calc()` body into numbers, percentages, operators and parentheses
fn calc_stream(args: &[ValueToken], options: &CompilerOptions) -> Option<Vec<StyleDescriptor>> {
    let mut stream = Vec::new();
    for token in tokens::words(args) {
        match token {
            ValueToken::Delim(op @ ('+' | '-' | '*' | '/')) => {
                stream.push(StyleDescriptor::String(op.to_string()))
            }
            ValueToken::Parens(inner) => {
                stream.push("(".into());
                stream.extend(calc_stream(inner, options)?);
                stream.push(")".into());
            }
            ValueToken::Function(name, inner) if name == "calc" => {
                stream.push("(".into());
                stream.extend(calc_stream(inner, options)?);
                stream.push(")".into());
            }
            other => stream.push(length(other, options)?),
        }
    }
    (!stream.is_empty()).then_some(stream)
}

/// Any other function whose arguments need runtime resolution
pub fn css_function(token: &ValueToken, options: &CompilerOptions) -> Option<StyleDescriptor> {
    let (name, args) = token.function()?;
    if !tokens::contains_var(args) {
        return None;
    }
    let mut arguments = vec![StyleDescriptor::String(name.to_string())];
    for part in tokens::split_commas(args) {
        arguments.push(generic_value(part, options));
    }
    Some(StyleDescriptor::function(FunctionName::CssFunction, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::tokenize;

    fn first(text: &str) -> ValueToken {
        tokenize(text).remove(0)
    }

    #[test]
    fn test_lengths() {
        let options = CompilerOptions::default();
        assert_eq!(length(&first("10px"), &options), Some(10.0.into()));
        assert_eq!(length(&first("1in"), &options), Some(96.0.into()));
        assert_eq!(length(&first("2rem"), &options), Some(28.0.into()));
        assert_eq!(length(&first("50%"), &options), Some("50%".into()));
        assert_eq!(
            length(&first("2em"), &options),
            Some(StyleDescriptor::function(FunctionName::Em, vec![2.0.into()]))
        );
        assert_eq!(length(&first("1foo"), &options), None);
    }

    #[test]
    fn test_rem_without_inline_base() {
        let options = CompilerOptions { inline_rem: None, ..Default::default() };
        assert_eq!(
            length(&first("2rem"), &options),
            Some(StyleDescriptor::function(FunctionName::Rem, vec![2.0.into()]))
        );
    }

    #[test]
    fn test_colors() {
        let options = CompilerOptions::default();
        assert_eq!(color(&first("red"), &options), Some("#f00".into()));
        assert_eq!(color(&first("rgb(0 128 0)"), &options), Some("#008000".into()));
        assert_eq!(color(&first("currentcolor"), &options), None);

        let rgb = CompilerOptions { hex_colors: false, ..Default::default() };
        assert_eq!(color(&first("red"), &rgb), Some("rgb(255, 0, 0)".into()));
    }

    #[test]
    fn test_var_with_fallback() {
        let options = CompilerOptions::default();
        let value = color(&first("var(--brand, blue)"), &options).unwrap();
        assert_eq!(
            value,
            StyleDescriptor::function(FunctionName::Var, vec!["--brand".into(), "#00f".into()])
        );
    }

    #[test]
    fn test_calc_stream() {
        let options = CompilerOptions::default();
        let value = length(&first("calc(1px + 10%)"), &options).unwrap();
        assert_eq!(
            value,
            StyleDescriptor::function(
                FunctionName::Calc,
                vec![1.0.into(), "+".into(), "10%".into()],
            )
        );
    }

    #[test]
    fn test_time_and_angle() {
        assert_eq!(time(&first(".3s")), Some(300.0));
        assert_eq!(time(&first("150ms")), Some(150.0));
        assert_eq!(angle(&first("0.5turn")), Some("180deg".into()));
    }

    #[test]
    fn test_generic_values() {
        let options = CompilerOptions::default();
        assert_eq!(generic_value(&tokenize("red"), &options), "#f00".into());
        assert_eq!(
            generic_value(&tokenize("0 1px 2px black"), &options),
            StyleDescriptor::Array(vec![0.0.into(), 1.0.into(), 2.0.into(), "#000".into()])
        );
        assert_eq!(generic_value(&tokenize("flex-start"), &options), "flex-start".into());
    }
}
