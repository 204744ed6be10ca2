//! Component Values
//!
//! Tokenizes canonical CSS text printed by lightningcss into an owned
//! component-value tree. Selectors, conditions and declaration values are
//! all parsed from this tree.

use cssparser::{ParseError, Parser, ParserInput, Token};

use tinct_core::format_number;

/// One component value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueToken {
    Ident(String),
    AtKeyword(String),
    Number(f64),
    /// Percentage as written, `50%` is `50.0`
    Percentage(f64),
    /// Value and lowercase unit
    Dimension(f64, String),
    Hash(String),
    String(String),
    Url(String),
    /// Lowercase function name and its arguments
    Function(String, Vec<ValueToken>),
    Parens(Vec<ValueToken>),
    Brackets(Vec<ValueToken>),
    Braces(Vec<ValueToken>),
    Comma,
    Colon,
    Semicolon,
    Delim(char),
    /// Attribute matcher: `~=`, `|=`, `^=`, `$=`, `*=`
    Match(&'static str),
    Whitespace,
}

impl ValueToken {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_ident(&self, expected: &str) -> bool {
        self.ident().is_some_and(|name| name.eq_ignore_ascii_case(expected))
    }

    pub fn is_delim(&self, expected: char) -> bool {
        matches!(self, Self::Delim(c) if *c == expected)
    }

    pub fn function(&self) -> Option<(&str, &[ValueToken])> {
        match self {
            Self::Function(name, args) => Some((name, args)),
            _ => None,
        }
    }

    /// Serialize back to CSS text
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out);
        out
    }

    fn write_css(&self, out: &mut String) {
        match self {
            Self::Ident(name) => out.push_str(name),
            Self::AtKeyword(name) => {
                out.push('@');
                out.push_str(name);
            }
            Self::Number(value) => out.push_str(&format_number(*value)),
            Self::Percentage(value) => {
                out.push_str(&format_number(*value));
                out.push('%');
            }
            Self::Dimension(value, unit) => {
                out.push_str(&format_number(*value));
                out.push_str(unit);
            }
            Self::Hash(value) => {
                out.push('#');
                out.push_str(value);
            }
            Self::String(value) => {
                out.push('"');
                out.push_str(&value.replace('"', "\\\""));
                out.push('"');
            }
            Self::Url(value) => {
                out.push_str("url(");
                out.push_str(value);
                out.push(')');
            }
            Self::Function(name, args) => {
                out.push_str(name);
                out.push('(');
                write_all(args, out);
                out.push(')');
            }
            Self::Parens(inner) => {
                out.push('(');
                write_all(inner, out);
                out.push(')');
            }
            Self::Brackets(inner) => {
                out.push('[');
                write_all(inner, out);
                out.push(']');
            }
            Self::Braces(inner) => {
                out.push('{');
                write_all(inner, out);
                out.push('}');
            }
            Self::Comma => out.push(','),
            Self::Colon => out.push(':'),
            Self::Semicolon => out.push(';'),
            Self::Delim(c) => out.push(*c),
            Self::Match(op) => out.push_str(op),
            Self::Whitespace => out.push(' '),
        }
    }
}

fn write_all(tokens: &[ValueToken], out: &mut String) {
    for token in tokens {
        token.write_css(out);
    }
}

/// Tokenize CSS text. Comments are dropped and whitespace runs collapse to one token.
pub fn tokenize(text: &str) -> Vec<ValueToken> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    collect(&mut parser)
}

fn collect<'i>(parser: &mut Parser<'i, '_>) -> Vec<ValueToken> {
    let mut tokens = Vec::new();
    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let converted = match token {
            Token::Ident(name) => ValueToken::Ident(name.to_string()),
            Token::AtKeyword(name) => ValueToken::AtKeyword(name.to_string()),
            Token::Hash(value) | Token::IDHash(value) => ValueToken::Hash(value.to_string()),
            Token::QuotedString(value) => ValueToken::String(value.to_string()),
            Token::UnquotedUrl(value) => ValueToken::Url(value.to_string()),
            Token::Number { value, .. } => ValueToken::Number(widen(value)),
            Token::Percentage { unit_value, .. } => {
                ValueToken::Percentage(clean(widen(unit_value) * 100.0))
            }
            Token::Dimension { value, unit, .. } => {
                ValueToken::Dimension(widen(value), unit.to_ascii_lowercase())
            }
            Token::WhiteSpace(_) => {
                if tokens.last().is_some_and(ValueToken::is_whitespace) {
                    continue;
                }
                ValueToken::Whitespace
            }
            Token::Colon => ValueToken::Colon,
            Token::Semicolon => ValueToken::Semicolon,
            Token::Comma => ValueToken::Comma,
            Token::Delim(c) => ValueToken::Delim(c),
            Token::IncludeMatch => ValueToken::Match("~="),
            Token::DashMatch => ValueToken::Match("|="),
            Token::PrefixMatch => ValueToken::Match("^="),
            Token::SuffixMatch => ValueToken::Match("$="),
            Token::SubstringMatch => ValueToken::Match("*="),
            Token::Function(name) => {
                let name = name.to_ascii_lowercase();
                ValueToken::Function(name, nested(parser))
            }
            Token::ParenthesisBlock => ValueToken::Parens(nested(parser)),
            Token::SquareBracketBlock => ValueToken::Brackets(nested(parser)),
            Token::CurlyBracketBlock => ValueToken::Braces(nested(parser)),
            _ => continue,
        };
        tokens.push(converted);
    }
    tokens
}

fn nested<'i>(parser: &mut Parser<'i, '_>) -> Vec<ValueToken> {
    let result: Result<Vec<ValueToken>, ParseError<'i, ()>> =
        parser.parse_nested_block(|block| Ok(collect(block)));
    result.unwrap_or_default()
}

/// f32 to f64 through the shortest decimal form, so `0.1` stays `0.1`
fn widen(value: f32) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(value as f64)
}

fn clean(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Strip leading and trailing whitespace
pub fn trim(tokens: &[ValueToken]) -> &[ValueToken] {
    let start = tokens.iter().position(|t| !t.is_whitespace()).unwrap_or(tokens.len());
    let end = tokens.iter().rposition(|t| !t.is_whitespace()).map_or(start, |i| i + 1);
    &tokens[start..end]
}

/// Split on top-level commas, trimming each part
pub fn split_commas(tokens: &[ValueToken]) -> Vec<&[ValueToken]> {
    tokens
        .split(|t| matches!(t, ValueToken::Comma))
        .map(trim)
        .collect()
}

/// Top-level tokens without whitespace
pub fn words(tokens: &[ValueToken]) -> Vec<&ValueToken> {
    tokens.iter().filter(|t| !t.is_whitespace()).collect()
}

/// True when a `var()` appears anywhere in the tokens
pub fn contains_var(tokens: &[ValueToken]) -> bool {
    tokens.iter().any(|token| match token {
        ValueToken::Function(name, args) => name == "var" || contains_var(args),
        ValueToken::Parens(inner) | ValueToken::Brackets(inner) | ValueToken::Braces(inner) => {
            contains_var(inner)
        }
        _ => false,
    })
}

pub fn to_css(tokens: &[ValueToken]) -> String {
    let mut out = String::new();
    write_all(tokens, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_dimensions() {
        let tokens = tokenize("10PX 50% .5em");
        assert_eq!(
            words(&tokens),
            vec![
                &ValueToken::Dimension(10.0, "px".into()),
                &ValueToken::Percentage(50.0),
                &ValueToken::Dimension(0.5, "em".into()),
            ]
        );
    }

    #[test]
    fn test_nested_functions() {
        let tokens = tokenize("var(--a, rgb(1, 2, 3))");
        let (name, args) = tokens[0].function().unwrap();
        assert_eq!(name, "var");
        assert!(args.iter().any(|t| matches!(t, ValueToken::Function(n, _) if n == "rgb")));
        assert!(contains_var(&tokens));
    }

    #[test]
    fn test_split_commas_trims() {
        let tokens = tokenize("a b , c");
        let parts = split_commas(&tokens);
        assert_eq!(parts.len(), 2);
        assert_eq!(to_css(parts[0]), "a b");
        assert_eq!(to_css(parts[1]), "c");
    }

    #[test]
    fn test_attribute_matchers() {
        let tokens = tokenize("[data-x~=\"y\"]");
        match &tokens[0] {
            ValueToken::Brackets(inner) => assert!(inner.contains(&ValueToken::Match("~="))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_text() {
        let tokens = tokenize("translate(10px, 20%) rotate(45deg)");
        assert_eq!(to_css(&tokens), "translate(10px, 20%) rotate(45deg)");
    }
}
