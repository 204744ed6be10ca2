//! Condition Parsers
//!
//! Media and container preludes are translated into the condition IR.
//! A condition with any operand that cannot be resolved is rejected as a
//! whole so a rule never matches on part of a compound query.

use tinct_core::{Comparator, Condition, ConditionValue};

use crate::tokens::{self, ValueToken};

/// Parse a media query list. `None` means the list is invalid.
pub fn parse_media(prelude: &str, rem: f64) -> Option<Condition> {
    let tokens = tokens::tokenize(prelude);
    let mut queries = Vec::new();
    for part in tokens::split_commas(&tokens) {
        let words = tokens::words(part);
        if words.is_empty() {
            return None;
        }
        queries.push(media_query(&words, rem)?);
    }
    match queries.len() {
        0 => None,
        1 => queries.pop(),
        _ => Some(Condition::Or(queries)),
    }
}

/// Parse a container prelude into an optional container name and its condition
pub fn parse_container(prelude: &str, rem: f64) -> Option<(Option<String>, Condition)> {
    let tokens = tokens::tokenize(prelude);
    let words = tokens::words(&tokens);
    match words.split_first() {
        Some((ValueToken::Ident(name), rest)) if !name.eq_ignore_ascii_case("not") => {
            let condition = if rest.is_empty() {
                Condition::always()
            } else {
                condition(rest, rem)?
            };
            Some((Some(name.clone()), condition))
        }
        Some(_) => Some((None, condition(&words, rem)?)),
        None => None,
    }
}

fn media_query(words: &[&ValueToken], rem: f64) -> Option<Condition> {
    let mut index = 0;
    let mut negate = false;

    let has_type = |i: usize| {
        words.get(i).and_then(|t| t.ident()).is_some_and(|name| {
            !name.eq_ignore_ascii_case("not") && !name.eq_ignore_ascii_case("only")
        })
    };

    if words[0].is_ident("not") && has_type(1) {
        negate = true;
        index = 1;
    } else if words[0].is_ident("only") {
        index = 1;
    }

    let mut parts = Vec::new();
    if has_type(index) {
        let media_type = words[index].ident()?.to_ascii_lowercase();
        if let Some(condition) = media_type_condition(&media_type) {
            parts.push(condition);
        }
        index += 1;
        if index < words.len() {
            if !words[index].is_ident("and") {
                return None;
            }
            parts.push(condition(&words[index + 1..], rem)?);
        }
    } else if index == 0 {
        parts.push(condition(words, rem)?);
    } else {
        return None;
    }

    let combined = Condition::all(parts);
    Some(if negate { Condition::Not(Box::new(combined)) } else { combined })
}

fn media_type_condition(media_type: &str) -> Option<Condition> {
    match media_type {
        "all" | "screen" => None,
        "native" => Some(Condition::Or(vec![platform("ios"), platform("android")])),
        other => Some(platform(other)),
    }
}

fn platform(name: &str) -> Condition {
    Condition::Compare("platform".into(), Comparator::Equal, ConditionValue::String(name.into()))
}

/// `not (a)`, `(a) and (b) ...` or `(a) or (b) ...`
fn condition(words: &[&ValueToken], rem: f64) -> Option<Condition> {
    match words {
        [] => None,
        [not, inner] if not.is_ident("not") => {
            Some(Condition::Not(Box::new(in_parens(inner, rem)?)))
        }
        [single] => in_parens(single, rem),
        _ => {
            let joiner = words.get(1)?.ident()?.to_ascii_lowercase();
            if joiner != "and" && joiner != "or" {
                return None;
            }
            let mut items = Vec::new();
            for (i, word) in words.iter().enumerate() {
                if i % 2 == 1 {
                    if !word.is_ident(&joiner) {
                        return None;
                    }
                } else {
                    items.push(in_parens(word, rem)?);
                }
            }
            if words.len() % 2 == 0 {
                return None;
            }
            Some(if joiner == "and" { Condition::And(items) } else { Condition::Or(items) })
        }
    }
}

fn in_parens(token: &ValueToken, rem: f64) -> Option<Condition> {
    let ValueToken::Parens(inner) = token else {
        return None;
    };
    let words = tokens::words(inner);
    match words.first() {
        Some(ValueToken::Parens(_)) => condition(&words, rem),
        Some(first) if first.is_ident("not") => condition(&words, rem),
        Some(_) => feature(&words, rem),
        None => None,
    }
}

/// One operand or comparator of a feature test
enum Segment<'a> {
    Operand(Vec<&'a ValueToken>),
    Compare(Comparator),
}

fn feature(words: &[&ValueToken], rem: f64) -> Option<Condition> {
    // `(name)` and `(name: value)`
    if let Some(name) = words[0].ident() {
        match words.get(1) {
            None => return Some(Condition::Feature(name.to_ascii_lowercase())),
            Some(ValueToken::Colon) => {
                let name = name.to_ascii_lowercase();
                let value = value(&words[2..], rem)?;
                let (name, comparator) = legacy_range(&name);
                return Some(Condition::Compare(name.to_string(), comparator, value));
            }
            _ => {}
        }
    }

    let segments = segments(words)?;
    match segments.as_slice() {
        [Segment::Operand(left), Segment::Compare(op), Segment::Operand(right)] => {
            if let Some(name) = feature_name(left) {
                Some(Condition::Compare(name, *op, value(right, rem)?))
            } else {
                let name = feature_name(right)?;
                Some(Condition::Compare(name, op.flip(), value(left, rem)?))
            }
        }
        [
            Segment::Operand(start),
            Segment::Compare(start_op),
            Segment::Operand(name),
            Segment::Compare(end_op),
            Segment::Operand(end),
        ] => Some(Condition::Interval(
            feature_name(name)?,
            value(start, rem)?,
            *start_op,
            value(end, rem)?,
            *end_op,
        )),
        _ => None,
    }
}

fn segments<'a>(words: &[&'a ValueToken]) -> Option<Vec<Segment<'a>>> {
    let mut segments = Vec::new();
    let mut operand = Vec::new();
    let mut index = 0;
    while index < words.len() {
        let word = words[index];
        match word {
            ValueToken::Delim(c @ ('<' | '>' | '=')) => {
                let mut op = c.to_string();
                if *c != '=' && words.get(index + 1).is_some_and(|next| next.is_delim('=')) {
                    op.push('=');
                    index += 1;
                }
                if operand.is_empty() {
                    return None;
                }
                segments.push(Segment::Operand(std::mem::take(&mut operand)));
                segments.push(Segment::Compare(Comparator::parse(&op)?));
            }
            _ => operand.push(word),
        }
        index += 1;
    }
    if operand.is_empty() {
        return None;
    }
    segments.push(Segment::Operand(operand));
    Some(segments)
}

fn feature_name(operand: &[&ValueToken]) -> Option<String> {
    match operand {
        [ValueToken::Ident(name)] => Some(legacy_range(&name.to_ascii_lowercase()).0.to_string()),
        _ => None,
    }
}

/// `min-width` is `width >=`, `max-width` is `width <=`
fn legacy_range(name: &str) -> (&str, Comparator) {
    if let Some(rest) = name.strip_prefix("min-") {
        (rest, Comparator::GreaterThanEqual)
    } else if let Some(rest) = name.strip_prefix("max-") {
        (rest, Comparator::LessThanEqual)
    } else {
        (name, Comparator::Equal)
    }
}

/// Length, resolution, ratio, boolean or identifier
fn value(words: &[&ValueToken], rem: f64) -> Option<ConditionValue> {
    match words {
        [ValueToken::Number(n)] => Some(ConditionValue::Number(*n)),
        [ValueToken::Dimension(n, unit)] => Some(ConditionValue::Number(dimension(*n, unit, rem)?)),
        [ValueToken::Number(a), ValueToken::Delim('/'), ValueToken::Number(b)] if *b != 0.0 => {
            Some(ConditionValue::Number(a / b))
        }
        [ValueToken::Ident(name)] => Some(match name.to_ascii_lowercase().as_str() {
            "true" => ConditionValue::Bool(true),
            "false" => ConditionValue::Bool(false),
            other => ConditionValue::String(other.to_string()),
        }),
        _ => None,
    }
}

fn dimension(value: f64, unit: &str, rem: f64) -> Option<f64> {
    Some(match unit {
        "px" => value,
        "em" | "rem" => value * rem,
        "pt" => value * 96.0 / 72.0,
        "pc" => value * 16.0,
        "in" => value * 96.0,
        "cm" => value * 96.0 / 2.54,
        "mm" => value * 96.0 / 25.4,
        "q" => value * 96.0 / 101.6,
        "dppx" | "x" => value,
        "dpi" => value / 96.0,
        "dpcm" => value * 2.54 / 96.0,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(op: Comparator, value: f64) -> Condition {
        Condition::Compare("width".into(), op, ConditionValue::Number(value))
    }

    #[test]
    fn test_legacy_min_width() {
        assert_eq!(
            parse_media("(min-width: 500px)", 14.0),
            Some(width(Comparator::GreaterThanEqual, 500.0)),
        );
    }

    #[test]
    fn test_range_syntax() {
        assert_eq!(
            parse_media("(width >= 500px)", 14.0),
            Some(width(Comparator::GreaterThanEqual, 500.0)),
        );
        assert_eq!(
            parse_media("(500px < width)", 14.0),
            Some(width(Comparator::GreaterThan, 500.0)),
        );
        assert_eq!(
            parse_media("(400px <= width < 700px)", 14.0),
            Some(Condition::Interval(
                "width".into(),
                ConditionValue::Number(400.0),
                Comparator::LessThanEqual,
                ConditionValue::Number(700.0),
                Comparator::LessThan,
            ))
        );
    }

    #[test]
    fn test_negated_media_type() {
        assert_eq!(
            parse_media("not all and (min-width: 640px)", 14.0),
            Some(Condition::Not(Box::new(width(Comparator::GreaterThanEqual, 640.0))))
        );
    }

    #[test]
    fn test_media_types() {
        assert_eq!(parse_media("screen", 14.0), Some(Condition::always()));
        assert_eq!(
            parse_media("print", 14.0),
            Some(Condition::Compare(
                "platform".into(),
                Comparator::Equal,
                ConditionValue::String("print".into()),
            ))
        );
    }

    #[test]
    fn test_resolution_and_ratio() {
        assert_eq!(
            parse_media("(min-resolution: 192dpi)", 14.0),
            Some(Condition::Compare(
                "resolution".into(),
                Comparator::GreaterThanEqual,
                ConditionValue::Number(2.0),
            ))
        );
        assert_eq!(
            parse_media("(aspect-ratio: 16/8)", 14.0),
            Some(Condition::Compare(
                "aspect-ratio".into(),
                Comparator::Equal,
                ConditionValue::Number(2.0),
            ))
        );
    }

    #[test]
    fn test_boolean_combinations() {
        let parsed = parse_media(
            "(prefers-color-scheme: dark) and ((orientation: landscape) or (hover))",
            14.0,
        ).unwrap();
        match parsed {
            Condition::And(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[1], Condition::Or(inner) if inner.len() == 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_operand_invalidates_everything() {
        assert_eq!(parse_media("(min-width: 10px) and (width >= calc(1px + 1em))", 14.0), None);
        assert_eq!(parse_media("(width >= 10foo)", 14.0), None);
        assert_eq!(parse_media("(a) and (b) or (c)", 14.0), None);
    }

    #[test]
    fn test_container_prelude() {
        let (name, condition) = parse_container("sidebar (min-width: 400px)", 14.0).unwrap();
        assert_eq!(name.as_deref(), Some("sidebar"));
        assert_eq!(condition, width(Comparator::GreaterThanEqual, 400.0));

        let (name, _) = parse_container("(width > 10px)", 14.0).unwrap();
        assert!(name.is_none());
        assert!(parse_container("style(--x: 1)", 14.0).is_none());
    }
}
