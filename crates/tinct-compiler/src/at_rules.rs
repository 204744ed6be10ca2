//! At-rule Handlers
//!
//! `@media` and `@container` fork the builder with an extra condition,
//! `@keyframes` compiles frames, and the custom `@tinct` and `@prop` rules
//! configure the compile.

use lightningcss::rules::keyframes::KeyframesRule;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::PrinterOptions;
use lightningcss::traits::ToCss;
use tinct_core::{Condition, ContainerQuery};

use crate::builder::{DeclarationText, Mode, RuleBuilder};
use crate::conditions;
use crate::tokens::{self, ValueToken};
use crate::walker::{self, walk_rules};
use crate::warning::CompileWarning;

/// At-rules handled here rather than by lightningcss
pub const CUSTOM_AT_RULES: [&str; 2] = ["tinct", "prop"];

/// Base used for `em`/`rem` in conditions when rem is not inlined
const CONDITION_REM_FALLBACK: f64 = 16.0;

fn condition_rem(builder: &RuleBuilder<'_>) -> f64 {
    builder.options().inline_rem.unwrap_or(CONDITION_REM_FALLBACK)
}

/// `@media <query-list> { ... }`
pub fn media(builder: &mut RuleBuilder<'_>, rule: &CssRule, children: &[CssRule]) {
    let Some(prelude) = walker::prelude(rule) else {
        return;
    };
    match conditions::parse_media(&prelude, condition_rem(builder)) {
        Some(condition) => {
            let mut child = builder.fork(Mode::Media);
            if condition != Condition::always() {
                child.scope.media.push(condition);
            }
            walk_rules(&mut child, children);
        }
        None => builder.state.warn(CompileWarning::InvalidCondition { kind: "media", prelude }),
    }
}

/// `@container [name] <condition> { ... }`
pub fn container(builder: &mut RuleBuilder<'_>, rule: &CssRule, children: &[CssRule]) {
    let Some(prelude) = walker::prelude(rule) else {
        return;
    };
    match conditions::parse_container(&prelude, condition_rem(builder)) {
        Some((name, condition)) => {
            let mut child = builder.fork(Mode::Container);
            let query = ContainerQuery {
                name,
                condition: (condition != Condition::always()).then_some(condition),
                ..ContainerQuery::default()
            };
            child.scope.containers.push(query);
            walk_rules(&mut child, children);
        }
        None => builder.state.warn(CompileWarning::InvalidCondition { kind: "container", prelude }),
    }
}

/// `@keyframes <name> { <selectors> { ... } ... }`
pub fn keyframes(builder: &mut RuleBuilder<'_>, rule: &CssRule, keyframes: &KeyframesRule) {
    let Some(name) = walker::prelude(rule) else {
        return;
    };
    let name = name.trim_matches(|c| c == '"' || c == '\'');
    let frames: Vec<(String, Vec<DeclarationText>)> = keyframes
        .keyframes
        .iter()
        .map(|frame| {
            let selectors = frame
                .selectors
                .iter()
                .filter_map(|selector| selector.to_css_string(PrinterOptions::default()).ok())
                .collect::<Vec<_>>()
                .join(", ");
            (selectors, walker::block_texts(&frame.declarations))
        })
        .collect();
    builder.fork(Mode::Keyframes).keyframes(name, &frames);
}

/// Custom at-rules. `@prop` is applied before the block is walked.
pub fn unknown(builder: &mut RuleBuilder<'_>, name: &str, rule: &CssRule) {
    match name {
        "tinct" => configure(builder, rule),
        "prop" => {}
        other => builder.state.warn(CompileWarning::UnsupportedAtRule { name: other.to_string() }),
    }
}

/// `key: value` pairs of an at-rule's prelude and block
fn pairs(rule: &CssRule) -> Vec<(String, String)> {
    let Some(printed) = walker::printed(rule) else {
        return Vec::new();
    };
    let tokens = tokens::tokenize(&printed);
    let mut body: Vec<&[ValueToken]> = Vec::new();
    let (head, block) = match tokens.iter().position(|t| matches!(t, ValueToken::Braces(_))) {
        Some(index) => (&tokens[..index], tokens.get(index)),
        None => (&tokens[..], None),
    };
    // Skip the at-keyword
    let head = head.get(1..).unwrap_or_default();
    body.extend(head.split(|t| matches!(t, ValueToken::Semicolon)));
    if let Some(ValueToken::Braces(inner)) = block {
        body.extend(inner.split(|t| matches!(t, ValueToken::Semicolon)));
    }

    body.into_iter()
        .filter_map(|statement| {
            let statement = tokens::trim(statement);
            let colon = statement.iter().position(|t| matches!(t, ValueToken::Colon))?;
            let key = tokens::to_css(tokens::trim(&statement[..colon]));
            let value = tokens::to_css(tokens::trim(&statement[colon + 1..]));
            (!key.is_empty()).then_some((key, value))
        })
        .collect()
}

/// `@tinct { option: value; ... }` toggles compiler options for the rest of the compile
fn configure(builder: &mut RuleBuilder<'_>, rule: &CssRule) {
    for (key, value) in pairs(rule) {
        if builder.state.options.apply(&key, &value) {
            tracing::debug!("@tinct {key}: {value}");
        } else {
            builder.state.warn(CompileWarning::InvalidOption { key, value });
        }
    }
}

/// Apply every `@prop` rule of a block to the builder's scope
pub fn collect_mappings(builder: &mut RuleBuilder<'_>, rules: &[CssRule]) {
    for rule in rules {
        if let CssRule::Unknown(unknown) = rule {
            if &*unknown.name == "prop" {
                for (property, path) in pairs(rule) {
                    builder.add_mapping(&property, &path);
                }
            }
        }
    }
}
