//! Element Evaluation
//!
//! Turns an element's props into output props: looks up the rules of its
//! class names, keeps the ones whose qualifiers hold, resolves their
//! declarations in specificity order and builds the context its children
//! inherit.
//!
//! Every observable read goes through the render's [`Effect`], so a change
//! to the store, the environment or the element's interaction state re-runs
//! the render. Dependencies that are not observables are returned as
//! [`Guards`].

use std::rc::Rc;

use indexmap::IndexMap;
use tinct_core::{
    PropertyPath, Specificity, StyleDeclaration, StyleDescriptor, StyleRule, StyleValue,
};

use crate::conditions::{attr_guard, test_attr, test_condition, test_container, test_pseudo_classes};
use crate::element::{
    Capabilities, ContainerEntry, ElementState, Props, RenderContext, VariableMap,
    FONT_SIZE_VARIABLE,
};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::guards::{Guard, Guards};
use crate::merge::Output;
use crate::observable::Effect;
use crate::resolve::var::{resolve_variable, VariableSources};
use crate::resolve::ResolveContext;
use crate::store::{RuleList, StyleStore};

/// A prop holding class names and the prop its styles are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapping {
    pub source: String,
    pub target: String,
}

impl SourceMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    pub mappings: Vec<SourceMapping>,
    /// Fail instead of warn when an element gains a capability
    pub strict: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            mappings: vec![SourceMapping::new("className", "style")],
            strict: cfg!(debug_assertions),
        }
    }
}

/// Result of one render
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Output of normal declarations and inline styles
    pub normal: Props,
    /// Output of `!important` declarations, applied over `normal`
    pub important: Props,
    pub guards: Guards,
    /// What the element passes to its children
    pub context: RenderContext,
    pub capabilities: Capabilities,
}

impl Evaluation {
    /// `important` merged over `normal`, one object level deep
    pub fn merged(&self) -> Props {
        let mut props = self.normal.clone();
        for (key, value) in &self.important {
            match (props.get_mut(key), value) {
                (Some(StyleValue::Object(existing)), StyleValue::Object(fields)) => {
                    for (field, value) in fields {
                        existing.insert(field.clone(), value.clone());
                    }
                }
                _ => {
                    props.insert(key.clone(), value.clone());
                }
            }
        }
        props
    }

    /// Value of `key` inside the merged output prop `target`
    pub fn style(&self, target: &str, key: &str) -> Option<StyleValue> {
        let read = |props: &Props| {
            props.get(target)
                .and_then(StyleValue::as_object)
                .and_then(|object| object.get(key))
                .cloned()
        };
        read(&self.important).or_else(|| read(&self.normal))
    }

    /// True when the element must be re-evaluated for new props or a new
    /// parent context even though no observable changed
    pub fn guards_changed(
        &self,
        props: &Props,
        parent: &RenderContext,
        store: &StyleStore,
        environment: &Environment,
    ) -> bool {
        self.guards.changed(props, parent, store, environment)
    }
}

/// Inline custom properties: the `--` entries of every target prop object
pub fn inline_variables(props: &Props, targets: &[String]) -> VariableMap {
    let mut variables = VariableMap::new();
    for target in targets {
        let Some(style) = props.get(target).and_then(StyleValue::as_object) else {
            continue;
        };
        for (name, value) in style {
            if name.starts_with("--") {
                variables.insert(name.clone(), value.to_descriptor());
            }
        }
    }
    variables
}

/// Inline style as a rule that outranks every normal rule
fn inline_rule(props: &Props, target: &str) -> Option<StyleRule> {
    let style = props.get(target).and_then(StyleValue::as_object)?;
    let fields: IndexMap<String, StyleDescriptor> = style
        .iter()
        .filter(|(name, _)| !name.starts_with("--"))
        .map(|(name, value)| (name.clone(), value.to_descriptor()))
        .collect();
    if fields.is_empty() {
        return None;
    }
    let mut rule = StyleRule::new(Specificity::inline());
    rule.declarations.push(StyleDeclaration::Static(fields));
    rule.target = Some(target.to_string());
    Some(rule)
}

fn capabilities_of<'r>(rules: impl Iterator<Item = &'r StyleRule>) -> Capabilities {
    rules.fold(Capabilities::default(), |capabilities, rule| {
        capabilities.union(Capabilities {
            variables: !rule.vars.is_empty(),
            containers: !rule.containers.is_empty(),
            animations: rule.animations,
            pressable: rule.has_pseudo_classes(),
        })
    })
}

pub struct Evaluator {
    store: Rc<StyleStore>,
    environment: Rc<Environment>,
    options: EvaluatorOptions,
}

impl Evaluator {
    pub fn new(store: Rc<StyleStore>, environment: Rc<Environment>) -> Self {
        Self::with_options(store, environment, EvaluatorOptions::default())
    }

    pub fn with_options(
        store: Rc<StyleStore>,
        environment: Rc<Environment>,
        options: EvaluatorOptions,
    ) -> Self {
        Self { store, environment, options }
    }

    pub fn store(&self) -> &Rc<StyleStore> {
        &self.store
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.environment
    }

    fn targets(&self) -> Vec<String> {
        self.options.mappings.iter().map(|mapping| mapping.target.clone()).collect()
    }

    /// Rule lists of every class name, each with the prop it writes to
    fn lookup(
        &self,
        props: &Props,
        guards: &mut Guards,
        effect: Option<&Effect>,
    ) -> Vec<(RuleList, String)> {
        let mut lists = Vec::new();
        for mapping in &self.options.mappings {
            let classes = props.get(&mapping.source).cloned().unwrap_or(StyleValue::Null);
            guards.push(Guard::Attribute { name: mapping.source.clone(), value: classes.clone() });
            let Some(classes) = classes.as_str() else {
                continue;
            };
            for class_name in classes.split_whitespace() {
                match self.store.query(class_name, effect) {
                    Some(rules) => lists.push((rules, mapping.target.clone())),
                    None => tracing::trace!("no rules for class {class_name}"),
                }
            }
        }
        lists
    }

    /// Register every dependency of a rule's qualifiers, then test them
    fn matches(
        &self,
        rule: &StyleRule,
        element: &ElementState,
        props: &Props,
        context: &RenderContext,
        guards: &mut Guards,
        effect: Option<&Effect>,
    ) -> bool {
        for query in &rule.attr_queries {
            guards.push(attr_guard(query, props));
        }
        for condition in &rule.media_queries {
            condition.for_each_feature(&mut |feature| {
                guards.push(Guard::Environment {
                    feature: feature.to_string(),
                    value: self.environment.feature(feature, None),
                });
            });
        }

        let mut matched = rule.media_queries.iter()
            .all(|condition| test_condition(condition, self.environment.as_ref(), effect));
        matched &= rule
            .pseudo_classes_query
            .as_ref()
            .is_none_or(|query| test_pseudo_classes(query, element, effect));
        matched &= rule.attr_queries.iter().all(|query| test_attr(query, props));
        // every container is visited so each one records its guard
        for query in &rule.container_queries {
            matched &= test_container(query, &context.containers, effect, guards);
        }
        matched
    }

    /// Evaluate an element for one render
    pub fn evaluate(
        &self,
        element: &Rc<ElementState>,
        props: &Props,
        context: &RenderContext,
        effect: Option<&Effect>,
    ) -> Result<Evaluation, RuntimeError> {
        let targets = self.targets();
        let primary = targets.first().map(String::as_str).unwrap_or("style");
        let mut guards = Guards::with_inline_targets(targets.clone());
        let lists = self.lookup(props, &mut guards, effect);

        let capabilities = capabilities_of(lists.iter().flat_map(|(rules, _)| rules.iter()));
        element.check_capabilities(capabilities, self.options.strict)?;

        let inline = inline_variables(props, &targets);
        let inline_rules: Vec<StyleRule> = targets.iter()
            .filter_map(|target| inline_rule(props, target))
            .collect();

        let mut candidates: Vec<(&StyleRule, &str)> = lists
            .iter()
            .flat_map(|(rules, target)| rules.iter().map(move |rule| (rule, target.as_str())))
            .chain(inline_rules.iter().map(|rule| (rule, primary)))
            .collect();
        candidates.sort_by(|(a, _), (b, _)| a.specificity.cmp(&b.specificity));

        let matched: Vec<(&StyleRule, &str)> = candidates
            .into_iter()
            .filter(|(rule, _)| self.matches(rule, element, props, context, &mut guards, effect))
            .collect();

        // inherited, then each matching rule's variables, then inline
        let mut variables = VariableMap::clone(&context.variables);
        let mut own_variables = Vec::new();
        for (rule, _) in &matched {
            for (name, value) in &rule.vars {
                variables.insert(name.clone(), value.clone());
                own_variables.push(name.clone());
            }
        }
        for (name, value) in &inline {
            variables.insert(name.clone(), value.clone());
            own_variables.push(name.clone());
        }

        let dark = self.environment.is_dark(effect);
        let external = VariableSources {
            inherited: &context.variables,
            inline: &inline,
            store: &self.store,
            dark,
        };
        let mut resolver = ResolveContext::new(
            &self.store,
            &self.environment,
            effect,
            &variables,
            external,
            &mut guards,
        );

        let mut normal = Output::new();
        let mut important = Output::new();
        for (rule, mapped) in &matched {
            let target = rule.target.as_deref().unwrap_or(mapped);
            let output = if rule.specificity.is_important() { &mut important } else { &mut normal };
            for declaration in &rule.declarations {
                apply(output, &mut resolver, target, declaration);
            }
        }

        let inherited_font = context.font_size();
        resolve_pending(&mut normal, &mut resolver, inherited_font, None);
        let normal_font = normal.get(primary, "fontSize").and_then(StyleValue::as_number);
        resolve_pending(&mut important, &mut resolver, inherited_font, normal_font);

        // children see computed values of the variables set here
        let mut exported = VariableMap::new();
        for name in &own_variables {
            if exported.contains_key(name) {
                continue;
            }
            let Some(descriptor) = variables.get(name).cloned() else {
                continue;
            };
            if descriptor.uses_variables() || !descriptor.is_static() {
                if let Some(value) = resolve_variable(&mut resolver, name, &descriptor) {
                    exported.insert(name.clone(), value.to_descriptor());
                }
            } else {
                exported.insert(name.clone(), descriptor);
            }
        }
        drop(resolver);

        let font_size = important
            .get(primary, "fontSize")
            .or_else(|| normal.get(primary, "fontSize"))
            .and_then(StyleValue::as_number);
        let unchanged_font = font_size.is_none() || font_size == inherited_font;
        let child_variables = if exported.is_empty() && unchanged_font {
            Rc::clone(&context.variables)
        } else {
            let mut child = VariableMap::clone(&context.variables);
            child.extend(exported);
            if let Some(font_size) = font_size {
                child.insert(FONT_SIZE_VARIABLE.to_string(), StyleDescriptor::Number(font_size));
            }
            Rc::new(child)
        };

        let container_names: Vec<&String> = matched.iter()
            .flat_map(|(rule, _)| rule.containers.iter())
            .collect();
        let child_containers = if container_names.is_empty() {
            Rc::clone(&context.containers)
        } else {
            let mut containers = (*context.containers).clone();
            let entry = ContainerEntry {
                element: Rc::clone(element),
                props: Rc::new(props.clone()),
            };
            for name in container_names {
                containers.insert(name.clone(), entry.clone());
            }
            Rc::new(containers)
        };

        tracing::trace!(
            "element {}: {} of {} rules matched, {} guards",
            element.id(),
            matched.len(),
            lists.iter().map(|(rules, _)| rules.len()).sum::<usize>(),
            guards.len()
        );

        Ok(Evaluation {
            normal: normal.into_props(),
            important: important.into_props(),
            guards,
            context: RenderContext { variables: child_variables, containers: child_containers },
            capabilities,
        })
    }
}

fn apply(
    output: &mut Output,
    resolver: &mut ResolveContext<'_>,
    target: &str,
    declaration: &StyleDeclaration,
) {
    match declaration {
        StyleDeclaration::Static(fields) => {
            for (key, descriptor) in fields {
                output.write(
                    target,
                    &PropertyPath::key(key.clone()),
                    StyleValue::from_static(descriptor),
                );
            }
        }
        StyleDeclaration::Dynamic(descriptor, path) => {
            let value = resolver.resolve(descriptor);
            output.write(target, path, value);
        }
        StyleDeclaration::Deferred(descriptor, path, _) => {
            output.defer(target, path, descriptor.clone())
        }
    }
}

/// Second pass. `fontSize` resolves against the inherited font size, the
/// rest against the element's own.
fn resolve_pending(
    output: &mut Output,
    resolver: &mut ResolveContext<'_>,
    inherited: Option<f64>,
    base: Option<f64>,
) {
    for pending in output.take_pending() {
        resolver.font_size = if pending.path.as_key() == Some("fontSize") {
            inherited
        } else {
            output
                .get(&pending.target, "fontSize")
                .and_then(StyleValue::as_number)
                .or(base)
                .or(inherited)
        };
        let value = resolver.resolve(&pending.descriptor);
        output.write(&pending.target, &pending.path, value);
    }
    resolver.font_size = None;
}
