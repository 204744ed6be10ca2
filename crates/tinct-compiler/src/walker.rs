//! AST Walker
//!
//! Parses CSS with lightningcss and walks the rule tree. Style rules go to
//! the builder, at-rules to their handlers. Selectors, preludes and values
//! are taken from lightningcss' printer so they arrive canonicalised.

use std::sync::{Arc, RwLock};

use lightningcss::declaration::DeclarationBlock;
use lightningcss::error::ParserError;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::at_rules;
use crate::builder::{CompileState, DeclarationText, Mode, RuleBuilder};
use crate::warning::{CompileError, CompileWarning};

/// Parse `css` and compile every rule into the state
pub fn compile_source(css: &str, state: &mut CompileState) -> Result<(), CompileError> {
    let parse_warnings = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        error_recovery: true,
        warnings: Some(parse_warnings.clone()),
        ..ParserOptions::default()
    };
    let stylesheet = StyleSheet::parse(css, options)
        .map_err(|e| CompileError::Parse { message: e.to_string() })?;

    if let Ok(recovered) = parse_warnings.read() {
        for warning in recovered.iter().filter(|warning| !is_custom_at_rule(&warning.kind)) {
            state.warn(CompileWarning::Parse { message: warning.to_string() });
        }
    }

    let mut builder = RuleBuilder::new(state);
    walk_rules(&mut builder, &stylesheet.rules.0);
    Ok(())
}

/// lightningcss reports our own at-rules as unknown
fn is_custom_at_rule(kind: &ParserError<'_>) -> bool {
    matches!(kind, ParserError::AtRuleInvalid(name) if at_rules::CUSTOM_AT_RULES.contains(&&**name))
}

/// Walk the rules of one block
pub fn walk_rules(builder: &mut RuleBuilder<'_>, rules: &[CssRule]) {
    // `@prop` applies to the whole block it appears in
    at_rules::collect_mappings(builder, rules);
    for rule in rules {
        walk_rule(builder, rule);
    }
}

fn walk_rule(builder: &mut RuleBuilder<'_>, rule: &CssRule) {
    match rule {
        CssRule::Style(style) => {
            let Some(selectors) = prelude(rule) else {
                return;
            };
            let mut scoped = builder.fork(builder.mode());
            at_rules::collect_mappings(&mut scoped, &style.rules.0);

            let normal = declaration_texts(&style.declarations.declarations);
            let important = declaration_texts(&style.declarations.important_declarations);
            let resolved = scoped.style_rule(&selectors, &normal, &important);

            if !style.rules.0.is_empty() {
                let mut nested = scoped.fork(Mode::Style);
                nested.scope.parent_selector = Some(resolved);
                walk_rules(&mut nested, &style.rules.0);
            }
        }
        // Declarations after a nested rule, or directly inside a nested
        // `@media`/`@container`, belong to the enclosing selector
        CssRule::NestedDeclarations(nested) => {
            if builder.scope.parent_selector.is_none() {
                return;
            }
            let normal = declaration_texts(&nested.declarations.declarations);
            let important = declaration_texts(&nested.declarations.important_declarations);
            builder.style_rule("&", &normal, &important);
        }
        CssRule::Media(media) => at_rules::media(builder, rule, &media.rules.0),
        CssRule::Container(container) => at_rules::container(builder, rule, &container.rules.0),
        CssRule::LayerBlock(layer) => {
            let mut child = builder.fork(builder.mode());
            walk_rules(&mut child, &layer.rules.0);
        }
        CssRule::Keyframes(keyframes) => at_rules::keyframes(builder, rule, keyframes),
        CssRule::Unknown(unknown) => at_rules::unknown(builder, &unknown.name, rule),
        CssRule::LayerStatement(_) | CssRule::Ignored => {}
        _ => {
            let name = at_rule_name(rule).unwrap_or_default();
            builder.state.warn(CompileWarning::UnsupportedAtRule { name });
        }
    }
}

/// Declarations of a block as printed name/value pairs
pub fn declaration_texts(properties: &[Property]) -> Vec<DeclarationText> {
    properties
        .iter()
        .filter_map(|property| {
            let name = property.property_id().name().to_string();
            let value = property.value_to_css_string(PrinterOptions::default()).ok()?;
            Some(DeclarationText::new(name, value))
        })
        .collect()
}

/// All declarations of a block, `!important` ones last
pub fn block_texts(block: &DeclarationBlock) -> Vec<DeclarationText> {
    let mut texts = declaration_texts(&block.declarations);
    texts.extend(declaration_texts(&block.important_declarations));
    texts
}

/// The printed rule
pub fn printed(rule: &CssRule) -> Option<String> {
    rule.to_css_string(PrinterOptions::default()).ok()
}

/// Text of a rule before its block, without the at-keyword
pub fn prelude(rule: &CssRule) -> Option<String> {
    let printed = printed(rule)?;
    let head = printed[..head_end(&printed)].trim();
    Some(match head.strip_prefix('@') {
        Some(rest) => rest
            .split_once(char::is_whitespace)
            .map(|(_, p)| p.trim())
            .unwrap_or_default()
            .to_string(),
        None => head.to_string(),
    })
}

fn at_rule_name(rule: &CssRule) -> Option<String> {
    let printed = printed(rule)?;
    let head = printed[..head_end(&printed)].trim();
    let rest = head.strip_prefix('@')?;
    Some(rest.split(char::is_whitespace).next().unwrap_or_default().to_string())
}

/// Offset of the first `{` or `;` outside quotes
fn head_end(text: &str) -> usize {
    let mut quote = None;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{' | ';') => return index,
            _ => {}
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_end_skips_quotes() {
        assert_eq!(head_end(".a[title=\"{\"] { color: red }"), 14);
        assert_eq!(head_end("@prop color: x;"), 14);
        assert_eq!(head_end(".a"), 2);
    }
}
