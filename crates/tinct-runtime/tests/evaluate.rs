//! Integration tests for tinct-runtime
//!
//! Compiles stylesheets, injects them into a store and evaluates elements
//! against a controlled environment.

use std::cell::RefCell;
use std::rc::Rc;

use tinct_compiler::{compile, CompilerOptions};
use tinct_core::{ConditionValue, StyleValue};
use tinct_runtime::{
    ColorScheme, Effect, ElementState, Environment, EnvironmentConfig, Evaluation, Evaluator,
    EvaluatorOptions, Guard, Layout, Props, RenderContext, RuntimeError, StyleStore,
};

fn evaluator(css: &str) -> Evaluator {
    evaluator_with(css, EnvironmentConfig::default())
}

fn evaluator_with(css: &str, config: EnvironmentConfig) -> Evaluator {
    let store = Rc::new(StyleStore::new());
    store.inject(compile(css, CompilerOptions::default()).unwrap());
    Evaluator::new(store, Rc::new(Environment::new(config)))
}

fn props(class_name: &str) -> Props {
    let mut props = Props::new();
    props.insert("className".into(), class_name.into());
    props
}

fn render(evaluator: &Evaluator, class_name: &str) -> Evaluation {
    evaluator
        .evaluate(&ElementState::new(), &props(class_name), &RenderContext::default(), None)
        .unwrap()
}

fn color(evaluation: &Evaluation) -> Option<StyleValue> {
    evaluation.style("style", "color")
}

// ============================================================================
// CASCADE
// ============================================================================

#[test]
fn test_hover_switches_color() {
    let evaluator = evaluator(".redOrGreen:hover { color: green } .redOrGreen { color: red }");
    let element = ElementState::new();
    let context = RenderContext::default();

    let idle = evaluator.evaluate(&element, &props("redOrGreen"), &context, None).unwrap();
    assert_eq!(color(&idle), Some("#f00".into()));

    element.set_hover(true, None);
    let hovered = evaluator.evaluate(&element, &props("redOrGreen"), &context, None).unwrap();
    assert_eq!(color(&hovered), Some("#008000".into()));
}

#[test]
fn test_important_written_separately() {
    let evaluator = evaluator(".red { color: red } .blue { color: blue !important }");
    let result = render(&evaluator, "blue red");

    let normal = result.normal.get("style").and_then(StyleValue::as_object).unwrap();
    let important = result.important.get("style").and_then(StyleValue::as_object).unwrap();
    assert_eq!(normal.get("color"), Some(&"#f00".into()));
    assert_eq!(important.get("color"), Some(&"#00f".into()));
    assert_eq!(color(&result), Some("#00f".into()));
}

#[test]
fn test_unknown_class_renders_nothing() {
    let evaluator = evaluator(".a { color: red }");
    let result = render(&evaluator, "missing");
    assert!(result.normal.is_empty());
    assert!(result.important.is_empty());
}

#[test]
fn test_prop_star_writes_to_other_prop() {
    let evaluator = evaluator(".list { @prop *: contentContainerStyle; color: red }");
    let result = render(&evaluator, "list");
    assert_eq!(result.style("contentContainerStyle", "color"), Some("#f00".into()));
    assert_eq!(color(&result), None);
}

#[test]
fn test_prop_caret_writes_top_level() {
    let evaluator = evaluator("@prop color: ^tint; .icon { color: red }");
    let result = render(&evaluator, "icon");
    assert_eq!(result.normal.get("tint"), Some(&"#f00".into()));
    assert_eq!(color(&result), None);
}

#[test]
fn test_empty_matches_without_children() {
    let evaluator = evaluator(".slot:empty { color: red }");
    let context = RenderContext::default();
    let mut slot = props("slot");
    let rendered = |props: &Props| evaluator.evaluate(&ElementState::new(), props, &context, None)
        .unwrap();

    assert_eq!(color(&rendered(&slot)), Some("#f00".into()));
    slot.insert("children".into(), StyleValue::Null);
    assert_eq!(color(&rendered(&slot)), Some("#f00".into()));
    slot.insert("children".into(), "label".into());
    assert_eq!(color(&rendered(&slot)), None);
}

// ============================================================================
// VARIABLES
// ============================================================================

#[test]
fn test_root_variable() {
    let evaluator = evaluator(":root { --v: red } .text { color: var(--v) }");
    assert_eq!(color(&render(&evaluator, "text")), Some("#f00".into()));
}

#[test]
fn test_ancestor_variable_overrides_root() {
    let evaluator = evaluator(":root { --v: red } .theme { --v: blue } .text { color: var(--v) }");
    let parent = render(&evaluator, "theme");

    let child = evaluator
        .evaluate(&ElementState::new(), &props("text"), &parent.context, None)
        .unwrap();
    assert_eq!(color(&child), Some("#00f".into()));
}

#[test]
fn test_calc_with_variable() {
    let evaluator = evaluator(":root { --gap: 4px } .a { width: calc(var(--gap) * 2) }");
    assert_eq!(render(&evaluator, "a").style("style", "width"), Some(8.0.into()));
}

#[test]
fn test_dark_scheme_switches_root_variable() {
    let evaluator = evaluator(
        r#"
        :root { --bg: white }
        @media (prefers-color-scheme: dark) { :root { --bg: black } }
        .a { background-color: var(--bg) }
        "#,
    );
    assert_eq!(render(&evaluator, "a").style("style", "backgroundColor"), Some("#fff".into()));

    evaluator.environment().set_color_scheme(ColorScheme::Dark, None);
    assert_eq!(render(&evaluator, "a").style("style", "backgroundColor"), Some("#000".into()));
}

#[test]
fn test_calc_keeps_one_mode() {
    let evaluator = evaluator(
        r#"
        :root { --one: 1px; --half: 50% }
        .sum { width: calc(1px + 2px) }
        .share { width: calc(50% + 10%) }
        .shareVar { width: calc(var(--half) + 10%) }
        .mixed { width: calc(1px + 10%) }
        .mixedVar { width: calc(var(--one) + 10%) }
        "#,
    );
    let width = |class_name: &str| render(&evaluator, class_name).style("style", "width");
    assert_eq!(width("sum"), Some(3.0.into()));
    assert_eq!(width("share"), Some("60%".into()));
    assert_eq!(width("shareVar"), Some("60%".into()));
    assert_eq!(width("mixed"), None);
    assert_eq!(width("mixedVar"), None);
}

// ============================================================================
// MEDIA QUERIES
// ============================================================================

#[test]
fn test_min_width_boundary() {
    let css = "@media (min-width: 500px) { .a { color: red } }";
    let wide = evaluator_with(css, EnvironmentConfig { width: 500.0, ..Default::default() });
    assert_eq!(color(&render(&wide, "a")), Some("#f00".into()));

    let narrow = evaluator_with(css, EnvironmentConfig { width: 499.0, ..Default::default() });
    assert_eq!(color(&render(&narrow, "a")), None);
}

#[test]
fn test_negated_media_query() {
    let css = "@media not all and (min-width: 640px) { .a { color: red } }";
    let below = evaluator_with(css, EnvironmentConfig { width: 639.0, ..Default::default() });
    assert_eq!(color(&render(&below, "a")), Some("#f00".into()));

    let at = evaluator_with(css, EnvironmentConfig { width: 640.0, ..Default::default() });
    assert_eq!(color(&render(&at, "a")), None);
}

// ============================================================================
// GUARDS AND REACTIVITY
// ============================================================================

#[test]
fn test_guards_cover_unmatched_rules() {
    let evaluator = evaluator_with(
        ".a[disabled] { color: red } @media (min-width: 500px) { .a { opacity: 0.5 } }",
        EnvironmentConfig { width: 400.0, ..Default::default() },
    );
    let result = render(&evaluator, "a");
    assert!(result.normal.is_empty());
    assert!(result.guards.contains(
        &Guard::Attribute { name: "disabled".into(), value: StyleValue::Null },
    ));
    assert!(result.guards.contains(&Guard::Environment {
        feature: "width".into(),
        value: Some(ConditionValue::Number(400.0)),
    }));

    let context = RenderContext::default();
    let mut disabled = props("a");
    disabled.insert("disabled".into(), true.into());
    assert!(result.guards_changed(&disabled, &context, evaluator.store(), evaluator.environment()));
    assert!(!result.guards_changed(
        &props("a"),
        &context,
        evaluator.store(),
        evaluator.environment(),
    ));
}

/// Re-evaluates `class_name` on `element` whenever the effect is notified
fn reactive(
    evaluator: Rc<Evaluator>,
    element: Rc<ElementState>,
    class_name: &str,
) -> (Effect, Rc<RefCell<Option<StyleValue>>>, Rc<RefCell<u32>>) {
    let output = Rc::new(RefCell::new(None));
    let runs = Rc::new(RefCell::new(0));
    let slot: Rc<RefCell<Option<Effect>>> = Rc::default();
    let props = props(class_name);

    let effect = Effect::new({
        let (output, runs, slot) = (output.clone(), runs.clone(), slot.clone());
        move || {
            let effect = slot.borrow().clone();
            if let Some(effect) = &effect {
                effect.cleanup();
            }
            let result = evaluator
                .evaluate(&element, &props, &RenderContext::default(), effect.as_ref())
                .unwrap();
            *output.borrow_mut() = color(&result);
            *runs.borrow_mut() += 1;
        }
    });
    *slot.borrow_mut() = Some(effect.clone());
    effect.run();
    (effect, output, runs)
}

#[test]
fn test_effect_reruns_on_hover() {
    let evaluator = Rc::new(evaluator(".b { color: red } .b:hover { color: blue }"));
    let element = ElementState::new();
    let (_effect, output, runs) = reactive(evaluator, element.clone(), "b");
    assert_eq!(*output.borrow(), Some("#f00".into()));

    element.set_hover(true, None);
    assert_eq!(*output.borrow(), Some("#00f".into()));
    assert_eq!(*runs.borrow(), 2);

    element.set_focus(true, None);
    assert_eq!(*runs.borrow(), 2);
}

#[test]
fn test_effect_reruns_on_injection() {
    let evaluator = Rc::new(evaluator(".late { opacity: 1 }"));
    let store = evaluator.store().clone();
    let (_effect, output, runs) = reactive(evaluator, ElementState::new(), "late");
    assert_eq!(*output.borrow(), None);

    store.inject(compile(".late { color: red }", CompilerOptions::default()).unwrap());
    assert_eq!(*output.borrow(), Some("#f00".into()));
    assert_eq!(*runs.borrow(), 2);
}

#[test]
fn test_effect_reruns_on_viewport_change() {
    let evaluator = Rc::new(evaluator("@media (min-width: 600px) { .wide { color: red } }"));
    let environment = evaluator.environment().clone();
    let (_effect, output, _runs) = reactive(evaluator, ElementState::new(), "wide");
    assert_eq!(*output.borrow(), None);

    environment.set_viewport(800.0, 600.0, None);
    assert_eq!(*output.borrow(), Some("#f00".into()));
}

// ============================================================================
// CONTAINERS AND INHERITANCE
// ============================================================================

#[test]
fn test_container_query_reads_ancestor_layout() {
    let evaluator = evaluator(
        r#"
        .parent { container-name: card; container-type: inline-size; }
        @container card (min-width: 300px) { .child { color: red } }
        "#,
    );
    let parent = ElementState::new();
    let parent_result = evaluator
        .evaluate(&parent, &props("parent"), &RenderContext::default(), None)
        .unwrap();
    assert!(parent_result.context.containers.contains_key("card"));

    let child = ElementState::new();
    parent.set_layout(Layout { width: 400.0, height: 100.0 }, None);
    let wide = evaluator.evaluate(&child, &props("child"), &parent_result.context, None).unwrap();
    assert_eq!(color(&wide), Some("#f00".into()));

    parent.set_layout(Layout { width: 200.0, height: 100.0 }, None);
    let narrow = evaluator.evaluate(&child, &props("child"), &parent_result.context, None).unwrap();
    assert_eq!(color(&narrow), None);
}

#[test]
fn test_container_query_without_container() {
    let evaluator = evaluator("@container card (min-width: 300px) { .child { color: red } }");
    let result = render(&evaluator, "child");
    assert_eq!(color(&result), None);
    assert!(result.guards.contains(&Guard::Container { name: "card".into(), element: None }));
}

#[test]
fn test_em_inherits_parent_font_size() {
    let evaluator = evaluator(".parent { font-size: 20px } .child { width: 2em }");
    let parent = render(&evaluator, "parent");
    assert_eq!(parent.context.font_size(), Some(20.0));

    let child = evaluator
        .evaluate(&ElementState::new(), &props("child"), &parent.context, None)
        .unwrap();
    assert_eq!(child.style("style", "width"), Some(40.0.into()));

    let orphan = render(&evaluator, "child");
    assert_eq!(orphan.style("style", "width"), Some(28.0.into()));
}

#[test]
fn test_inline_variable() {
    let evaluator = evaluator(".a { color: var(--tone) }");
    let mut style = tinct_core::StyleObject::new();
    style.insert("--tone".into(), "#123456".into());
    let mut element_props = props("a");
    element_props.insert("style".into(), StyleValue::Object(style));

    let result = evaluator
        .evaluate(&ElementState::new(), &element_props, &RenderContext::default(), None)
        .unwrap();
    assert_eq!(color(&result), Some("#123456".into()));
}

#[test]
fn test_animation_name_resolves_keyframes() {
    let evaluator = evaluator(
        r#"
        @keyframes fade { from { opacity: 0 } to { opacity: 1 } }
        .a { animation-name: fade }
        "#,
    );
    let result = render(&evaluator, "a");
    assert!(result.capabilities.animations);

    let animations = result.style("style", "animationName").unwrap();
    let fade = animations.as_array()
        .and_then(|list| list.first())
        .and_then(StyleValue::as_object)
        .unwrap();
    assert_eq!(fade.get("name"), Some(&"fade".into()));
    assert_eq!(
        fade.get("frames").and_then(StyleValue::as_array).map(|frames| frames.len()),
        Some(2),
    );
}

// ============================================================================
// CAPABILITIES
// ============================================================================

#[test]
fn test_gaining_capability_is_rejected_when_strict() {
    let store = Rc::new(StyleStore::new());
    store.inject(
        compile(".plain { color: red } .press:active { opacity: 0.5 }", CompilerOptions::default())
            .unwrap(),
    );
    let options = EvaluatorOptions { strict: true, ..Default::default() };
    let evaluator = Evaluator::with_options(store, Rc::new(Environment::default()), options);

    let element = ElementState::new();
    let context = RenderContext::default();
    evaluator.evaluate(&element, &props("plain"), &context, None).unwrap();
    let error = evaluator.evaluate(&element, &props("plain press"), &context, None).unwrap_err();
    assert!(matches!(error, RuntimeError::CapabilityAdded { capability: "pressable", .. }));
}

#[test]
fn test_gaining_capability_is_allowed_when_lenient() {
    let store = Rc::new(StyleStore::new());
    store.inject(
        compile(".plain { color: red } .press:active { opacity: 0.5 }", CompilerOptions::default())
            .unwrap(),
    );
    let options = EvaluatorOptions { strict: false, ..Default::default() };
    let evaluator = Evaluator::with_options(store, Rc::new(Environment::default()), options);

    let element = ElementState::new();
    let context = RenderContext::default();
    evaluator.evaluate(&element, &props("plain"), &context, None).unwrap();
    let result = evaluator.evaluate(&element, &props("plain press"), &context, None).unwrap();
    assert!(result.capabilities.pressable);
}
