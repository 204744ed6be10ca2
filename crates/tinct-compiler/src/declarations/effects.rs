//! Shadows, Animations and Containers

use indexmap::IndexMap;
use tinct_core::{FunctionName, PropertyPath, StyleDescriptor, DEFAULT_CONTAINER_NAME};

use super::values;
use super::DeclarationContext;
use crate::options::CompilerOptions;
use crate::properties::Property;
use crate::selector::camel_case;
use crate::tokens::{self, ValueToken};

const DIRECTIONS: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];
const FILL_MODES: &[&str] = &["none", "forwards", "backwards", "both"];
const PLAY_STATES: &[&str] = &["running", "paused"];
const EASINGS: &[&str] = &[
    "ease",
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "step-start",
    "step-end",
];

/// Shadow lengths, colour and `inset` flag in any order
struct Shadow {
    lengths: Vec<StyleDescriptor>,
    color: Option<StyleDescriptor>,
    inset: bool,
}

fn shadow(layer: &[ValueToken], options: &CompilerOptions) -> Option<Shadow> {
    let mut shadow = Shadow { lengths: Vec::new(), color: None, inset: false };
    for word in tokens::words(layer) {
        if word.is_ident("inset") {
            shadow.inset = true;
        } else if let Some(length) =
            values::length(word, options).filter(|_| !word.is_ident("auto"))
        {
            shadow.lengths.push(length);
        } else if shadow.color.is_none() {
            shadow.color = Some(values::color(word, options)?);
        } else {
            return None;
        }
    }
    (2..=4).contains(&shadow.lengths.len()).then_some(shadow)
}

fn is_none(tokens: &[ValueToken]) -> bool {
    matches!(tokens, [ValueToken::Ident(none)] if none.eq_ignore_ascii_case("none"))
}

/// Each layer as a positional word list for the render-time resolver
fn positional_layers(
    tokens: &[ValueToken],
    options: &CompilerOptions,
) -> Option<Vec<StyleDescriptor>> {
    tokens::split_commas(tokens)
        .into_iter()
        .map(|layer| {
            tokens::words(layer)
                .into_iter()
                .map(|word| values::generic(word, options))
                .collect::<Option<Vec<_>>>()
                .map(StyleDescriptor::Array)
        })
        .collect()
}

pub fn box_shadow(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let options = context.options;
    if is_none(tokens) {
        context.emit("boxShadow", StyleDescriptor::Array(Vec::new()));
        return Some(());
    }
    if tokens::contains_var(tokens) {
        let layers = positional_layers(tokens, options)?;
        context.emit("boxShadow", StyleDescriptor::function(FunctionName::BoxShadow, layers));
        return Some(());
    }

    let mut layers = Vec::new();
    for layer in tokens::split_commas(tokens) {
        let Shadow { lengths, color, inset } = shadow(layer, options)?;
        let mut record = IndexMap::new();
        let mut lengths = lengths.into_iter();
        for key in ["offsetX", "offsetY", "blurRadius", "spreadDistance"] {
            if let Some(length) = lengths.next() {
                record.insert(key.to_string(), length);
            }
        }
        if let Some(color) = color {
            record.insert("color".to_string(), color);
        }
        if inset {
            record.insert("inset".to_string(), true.into());
        }
        layers.push(StyleDescriptor::Record(record));
    }
    context.emit("boxShadow", StyleDescriptor::Array(layers));
    Some(())
}

/// Only the first layer is used
pub fn text_shadow(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let options = context.options;
    let layers = tokens::split_commas(tokens);
    let first = layers.first()?;
    if tokens::contains_var(first) {
        let words = tokens::words(first)
            .into_iter()
            .map(|word| values::generic(word, options))
            .collect::<Option<Vec<_>>>()?;
        context.emit_path(
            PropertyPath::root(),
            StyleDescriptor::function(FunctionName::TextShadow, words),
        );
        return Some(());
    }

    let Shadow { lengths, color, inset } = shadow(first, options)?;
    if inset || lengths.len() > 3 {
        return None;
    }
    let mut lengths = lengths.into_iter();
    let mut offset = IndexMap::new();
    offset.insert("width".to_string(), lengths.next()?);
    offset.insert("height".to_string(), lengths.next()?);
    context.emit("textShadowOffset", StyleDescriptor::Record(offset));
    if let Some(radius) = lengths.next() {
        context.emit("textShadowRadius", radius);
    }
    if let Some(color) = color {
        context.emit("textShadowColor", color);
    }
    Some(())
}

/// `animation-name: a, b` looks up the keyframes at render time
pub fn animation_name(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let names = tokens::split_commas(tokens)
        .into_iter()
        .map(|part| match part {
            [ValueToken::Ident(name)] => Some(StyleDescriptor::String(name.clone())),
            [ValueToken::String(name)] => Some(StyleDescriptor::String(name.clone())),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    context.emit("animationName", StyleDescriptor::function(FunctionName::AnimationName, names));
    Some(())
}

fn list<F>(tokens: &[ValueToken], mut parse: F) -> Option<StyleDescriptor>
where
    F: FnMut(&ValueToken) -> Option<StyleDescriptor>,
{
    let items = tokens::split_commas(tokens)
        .into_iter()
        .map(|part| match part {
            [single] => parse(single),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(StyleDescriptor::Array(items))
}

/// Durations and delays in milliseconds
pub fn times(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = list(tokens, |token| values::time(token).map(StyleDescriptor::Number))?;
    context.emit_own(value);
    Some(())
}

fn easing(token: &ValueToken) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Ident(name) => {
            let name = name.to_ascii_lowercase();
            EASINGS.contains(&name.as_str()).then_some(StyleDescriptor::String(name))
        }
        ValueToken::Function(name, _) if name == "cubic-bezier" || name == "steps" => {
            Some(StyleDescriptor::String(token.to_css()))
        }
        _ => None,
    }
}

pub fn timing_functions(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = list(tokens, easing)?;
    context.emit_own(value);
    Some(())
}

fn iteration(token: &ValueToken) -> Option<StyleDescriptor> {
    match token {
        ValueToken::Number(n) if *n >= 0.0 => Some(StyleDescriptor::Number(*n)),
        ValueToken::Ident(name) if name.eq_ignore_ascii_case("infinite") => Some("infinite".into()),
        _ => None,
    }
}

pub fn iteration_count(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let value = list(tokens, iteration)?;
    context.emit_own(value);
    Some(())
}

fn keyword_list(property: Property) -> &'static [&'static str] {
    match property {
        Property::AnimationDirection => DIRECTIONS,
        Property::AnimationFillMode => FILL_MODES,
        Property::AnimationPlayState => PLAY_STATES,
        _ => &[],
    }
}

/// `animation-direction`, `animation-fill-mode`, `animation-play-state`
pub fn animation_keywords(
    tokens: &[ValueToken],
    context: &mut DeclarationContext<'_>,
) -> Option<()> {
    let allowed = keyword_list(context.property);
    let value = list(tokens, |token| {
        let name = token.ident()?.to_ascii_lowercase();
        allowed.contains(&name.as_str()).then_some(StyleDescriptor::String(name))
    })?;
    context.emit_own(value);
    Some(())
}

/// Longhand values of one `animation` layer
struct AnimationLayer {
    name: StyleDescriptor,
    duration: f64,
    delay: f64,
    easing: StyleDescriptor,
    iterations: StyleDescriptor,
    direction: String,
    fill_mode: String,
    play_state: String,
}

fn animation_layer(layer: &[ValueToken]) -> Option<AnimationLayer> {
    let mut parsed = AnimationLayer {
        name: "none".into(),
        duration: 0.0,
        delay: 0.0,
        easing: "ease".into(),
        iterations: 1.0.into(),
        direction: "normal".into(),
        fill_mode: "none".into(),
        play_state: "running".into(),
    };
    let mut times = 0;
    let mut named = false;
    for word in tokens::words(layer) {
        if let Some(ms) = values::time(word).filter(|_| !matches!(word, ValueToken::Number(_))) {
            match times {
                0 => parsed.duration = ms,
                1 => parsed.delay = ms,
                _ => return None,
            }
            times += 1;
        } else if let Some(value) = easing(word) {
            parsed.easing = value;
        } else if let Some(value) = iteration(word) {
            parsed.iterations = value;
        } else if let Some(ident) = word.ident().map(str::to_ascii_lowercase) {
            if DIRECTIONS.contains(&ident.as_str()) {
                parsed.direction = ident;
            } else if PLAY_STATES.contains(&ident.as_str()) {
                parsed.play_state = ident;
            } else if FILL_MODES.contains(&ident.as_str()) && (ident != "none" || named) {
                parsed.fill_mode = ident;
            } else if !named {
                parsed.name = StyleDescriptor::String(word.ident()?.to_string());
                named = true;
            } else {
                return None;
            }
        } else if let ValueToken::String(name) = word {
            parsed.name = StyleDescriptor::String(name.clone());
            named = true;
        } else {
            return None;
        }
    }
    Some(parsed)
}

pub fn animation(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let layers = tokens::split_commas(tokens)
        .into_iter()
        .map(animation_layer)
        .collect::<Option<Vec<_>>>()?;

    let column = |f: &dyn Fn(&AnimationLayer) -> StyleDescriptor| {
        StyleDescriptor::Array(layers.iter().map(f).collect())
    };
    let names = layers.iter().map(|layer| layer.name.clone()).collect();
    let durations = column(&|layer| layer.duration.into());
    let delays = column(&|layer| layer.delay.into());
    let easings = column(&|layer| layer.easing.clone());
    let iterations = column(&|layer| layer.iterations.clone());
    let directions = column(&|layer| layer.direction.clone().into());
    let fill_modes = column(&|layer| layer.fill_mode.clone().into());
    let play_states = column(&|layer| layer.play_state.clone().into());

    context.emit("animationName", StyleDescriptor::function(FunctionName::AnimationName, names));
    context.emit("animationDuration", durations);
    context.emit("animationDelay", delays);
    context.emit("animationTimingFunction", easings);
    context.emit("animationIterationCount", iterations);
    context.emit("animationDirection", directions);
    context.emit("animationFillMode", fill_modes);
    context.emit("animationPlayState", play_states);
    Some(())
}

fn transition_target(name: &str) -> String {
    match name {
        "all" | "none" => name.to_string(),
        other => camel_case(other),
    }
}

pub fn transition_property(
    tokens: &[ValueToken],
    context: &mut DeclarationContext<'_>,
) -> Option<()> {
    let value = list(
        tokens,
        |token| Some(StyleDescriptor::String(transition_target(
            &token.ident()?.to_ascii_lowercase(),
        ))),
    )?;
    context.emit("transitionProperty", value);
    Some(())
}

pub fn transition(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let mut properties = Vec::new();
    let mut durations = Vec::new();
    let mut delays = Vec::new();
    let mut easings = Vec::new();
    for layer in tokens::split_commas(tokens) {
        let mut property = String::from("all");
        let mut timing = StyleDescriptor::from("ease");
        let mut times = Vec::new();
        for word in tokens::words(layer) {
            if let Some(ms) = values::time(word) {
                times.push(ms);
            } else if let Some(value) = easing(word) {
                timing = value;
            } else {
                property = transition_target(&word.ident()?.to_ascii_lowercase());
            }
        }
        if times.len() > 2 {
            return None;
        }
        properties.push(StyleDescriptor::String(property));
        durations.push(StyleDescriptor::Number(times.first().copied().unwrap_or(0.0)));
        delays.push(StyleDescriptor::Number(times.get(1).copied().unwrap_or(0.0)));
        easings.push(timing);
    }
    context.emit("transitionProperty", StyleDescriptor::Array(properties));
    context.emit("transitionDuration", StyleDescriptor::Array(durations));
    context.emit("transitionDelay", StyleDescriptor::Array(delays));
    context.emit("transitionTimingFunction", StyleDescriptor::Array(easings));
    Some(())
}

fn container_names(tokens: &[ValueToken]) -> Option<Vec<String>> {
    let words = tokens::words(tokens);
    if let [word] = words.as_slice() {
        if word.is_ident("none") {
            return Some(Vec::new());
        }
    }
    words.iter().map(|word| word.ident().map(str::to_string)).collect()
}

/// Types that make the element a query container
fn queryable(tokens: &[ValueToken]) -> Option<bool> {
    match tokens::words(tokens).as_slice() {
        [word] => match word.ident()?.to_ascii_lowercase().as_str() {
            "normal" => Some(false),
            "size" | "inline-size" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// `container: <name> [/ <type>]`
pub fn container(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let (names, kind) = match tokens.iter().position(|t| t.is_delim('/')) {
        Some(slash) => (&tokens[..slash], Some(&tokens[slash + 1..])),
        None => (tokens, None),
    };
    let mut names = container_names(names)?;
    if let Some(kind) = kind {
        if queryable(kind)? {
            names.push(DEFAULT_CONTAINER_NAME.to_string());
        }
    }
    context.containers(names);
    Some(())
}

pub fn container_name(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    let names = container_names(tokens)?;
    context.containers(names);
    Some(())
}

pub fn container_type(tokens: &[ValueToken], context: &mut DeclarationContext<'_>) -> Option<()> {
    if queryable(tokens)? {
        context.containers(vec![DEFAULT_CONTAINER_NAME.to_string()]);
    }
    Some(())
}
