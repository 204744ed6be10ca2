//! StyleSheet Builder
//!
//! Accumulates parsed declarations into rules and commits them to the rule
//! set of every class the selector list names. Nested blocks fork the
//! builder: the child receives a copy of the parent's qualifiers, and
//! nothing that happens inside the block reaches the parent.

use indexmap::{IndexMap, IndexSet};
use tinct_core::{
    Comparator, CompiledStylesheet, Condition, ConditionValue, ContainerQuery, KeyframeFrame,
    PropertyPath, Specificity, StyleDeclaration, StyleDescriptor, StyleRule,
};

use crate::declarations::{self, Output};
use crate::options::CompilerOptions;
use crate::properties::Property;
use crate::selector::{
    self, camel_case, ClassSelector, NormalizedSelector, SelectorContext, VariableScope,
};
use crate::tokens::{self, ValueToken};
use crate::warning::CompileWarning;

/// Block the builder is currently inside
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Style,
    Media,
    Container,
    Keyframes,
}

/// One declaration as printed by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationText {
    pub name: String,
    pub value: String,
}

impl DeclarationText {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Output and bookkeeping shared by every builder of one compile
pub struct CompileState {
    pub options: CompilerOptions,
    pub stylesheet: CompiledStylesheet,
    pub warnings: Vec<CompileWarning>,
    order: u32,
    /// Classes that already have a container placeholder rule
    placeholders: IndexSet<String>,
}

impl CompileState {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            order: options.stylesheet_order,
            options,
            stylesheet: CompiledStylesheet::default(),
            warnings: Vec::new(),
            placeholders: IndexSet::new(),
        }
    }

    /// Report a non-fatal problem
    pub fn warn(&mut self, warning: CompileWarning) {
        tracing::warn!("{warning}");
        if let Some(logger) = &self.options.logger {
            logger(&warning);
        }
        self.warnings.push(warning);
    }

    /// Next value of the global rule order counter
    fn next_order(&mut self) -> u32 {
        self.order += 1;
        self.order
    }

    fn selector_context(&self) -> SelectorContext<'_> {
        SelectorContext {
            dark_class: self.options.dark_mode.class_name(),
            prefix: self.options.selector_prefix.as_deref(),
        }
    }

    /// Finalize the output: strip variables, sort rule sets, record the rem base
    pub fn finish(mut self) -> (CompiledStylesheet, Vec<CompileWarning>) {
        if self.options.strip_unused_variables {
            strip_unused_variables(&mut self.stylesheet);
        }
        self.stylesheet.sort_rule_sets();
        self.stylesheet.rem = self.options.inline_rem;
        tracing::debug!(
            "compiled {} rules for {} classes, {} warnings",
            self.stylesheet.rule_count(),
            self.stylesheet.rule_sets.len(),
            self.warnings.len()
        );
        (self.stylesheet, self.warnings)
    }
}

/// Qualifiers inherited by nested blocks
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub mode: Mode,
    pub media: Vec<Condition>,
    pub containers: Vec<ContainerQuery>,
    /// Resolved selector of the enclosing style rule
    pub parent_selector: Option<String>,
    /// `@prop` remapping, keyed by output property
    pub mapping: IndexMap<String, PropertyPath>,
    /// `@prop *: <prop>` target
    pub target: Option<String>,
}

pub struct RuleBuilder<'s> {
    pub state: &'s mut CompileState,
    pub scope: Scope,
}

impl<'s> RuleBuilder<'s> {
    pub fn new(state: &'s mut CompileState) -> Self {
        Self { state, scope: Scope::default() }
    }

    /// Builder for a nested block. The parent's scope is copied, never shared.
    pub fn fork(&mut self, mode: Mode) -> RuleBuilder<'_> {
        RuleBuilder {
            state: &mut *self.state,
            scope: Scope { mode, ..self.scope.clone() },
        }
    }

    pub fn mode(&self) -> Mode {
        self.scope.mode
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.state.options
    }

    /// Fresh rule carrying the scope's media and container qualifiers
    pub fn new_rule(&self, order: u32, important: bool) -> StyleRule {
        let mut specificity = Specificity::with_order(order);
        if important {
            specificity.important = 1;
        }
        let mut rule = StyleRule::new(specificity);
        rule.media_queries = self.scope.media.clone();
        rule.container_queries = self.scope.containers.clone();
        rule.target = self.scope.target.clone();
        rule
    }

    /// Parse one declaration into the rule, warning on unsupported input
    pub fn add_declaration(&mut self, rule: &mut StyleRule, declaration: &DeclarationText) {
        let DeclarationText { name, value } = declaration;
        if name.starts_with("--") {
            let parsed = declarations::parse_variable(value, &self.state.options);
            rule.vars.retain(|(existing, _)| existing != name);
            rule.vars.push((name.clone(), parsed));
            return;
        }

        match declarations::parse_declaration(name, value, &self.state.options) {
            Ok(outputs) => {
                if Property::from_name(name).is_some_and(Property::is_animation) {
                    rule.animations = true;
                }
                for output in outputs {
                    match output {
                        Output::Value(path, descriptor) => {
                            let path = self.remap(path);
                            push_declaration(rule, path, descriptor);
                        }
                        Output::Containers(names) => {
                            for name in names {
                                if !rule.containers.contains(&name) {
                                    rule.containers.push(name);
                                }
                            }
                        }
                    }
                }
            }
            Err(warning) => self.state.warn(warning),
        }
    }

    fn remap(&self, path: PropertyPath) -> PropertyPath {
        match path.as_key().and_then(|key| self.scope.mapping.get(key)) {
            Some(mapped) => mapped.clone(),
            None => path,
        }
    }

    /// Register a `@prop` mapping. `*` redirects the whole rule.
    pub fn add_mapping(&mut self, property: &str, path: &str) {
        let path = path.trim();
        if property == "*" {
            self.scope.target = Some(path.trim_start_matches(PropertyPath::TOP_LEVEL).to_string());
        } else {
            self.scope.mapping.insert(camel_case(property.trim()), PropertyPath::parse(path));
        }
    }

    /// Compile one style rule. Returns the resolved selector for nested rules.
    pub fn style_rule(
        &mut self,
        selector_text: &str,
        normal: &[DeclarationText],
        important: &[DeclarationText],
    ) -> String {
        let resolved = self.resolve_nesting(selector_text);
        let order = self.state.next_order();

        let mut rule = self.new_rule(order, false);
        for declaration in normal {
            self.add_declaration(&mut rule, declaration);
        }
        let mut important_rule = self.new_rule(order, true);
        for declaration in important {
            self.add_declaration(&mut important_rule, declaration);
        }

        let list = selector::normalize(&resolved, self.state.selector_context());
        for rejected in list.rejected {
            self.state.warn(CompileWarning::UnsupportedSelector { selector: rejected });
        }
        for committed in [rule, important_rule] {
            if !committed.is_empty() {
                self.apply_rule_to_selectors(&committed, &list.selectors, &resolved);
            }
        }
        resolved
    }

    /// Commit a rule to every normalized selector
    pub fn apply_rule_to_selectors(
        &mut self,
        rule: &StyleRule,
        selectors: &[NormalizedSelector],
        text: &str,
    ) {
        for selector in selectors {
            match selector {
                NormalizedSelector::ClassName(class) => self.commit_class(rule, class),
                NormalizedSelector::Variables { scope, dark } => {
                    self.commit_variables(rule, *scope, *dark, text)
                }
            }
        }
    }

    fn commit_class(&mut self, rule: &StyleRule, selector: &ClassSelector) {
        let mut rule = rule.clone();
        rule.specificity.add(selector.specificity);
        if let Some(pseudo) = &selector.pseudo_classes {
            rule.merge_pseudo_classes(pseudo);
        }
        rule.attr_queries.extend(selector.attrs.iter().cloned());
        for container in &selector.containers {
            if let Some(name) = &container.name {
                self.register_container(name);
            }
        }
        rule.container_queries.extend(selector.containers.iter().cloned());
        self.state
            .stylesheet
            .rule_sets
            .entry(selector.class_name.clone())
            .or_default()
            .push(rule);
    }

    /// Zero-specificity rule registering an ancestor class as a container
    fn register_container(&mut self, class_name: &str) {
        if !self.state.placeholders.insert(class_name.to_string()) {
            return;
        }
        let mut placeholder = StyleRule::new(Specificity::ZERO);
        placeholder.containers.push(class_name.to_string());
        self.state
            .stylesheet
            .rule_sets
            .entry(class_name.to_string())
            .or_default()
            .push(placeholder);
    }

    fn commit_variables(&mut self, rule: &StyleRule, scope: VariableScope, dark: bool, text: &str) {
        if rule.vars.is_empty() {
            return;
        }
        let dark = match self.scope.media.as_slice() {
            _ if !self.scope.containers.is_empty() => None,
            [] => Some(dark),
            [condition] if is_dark_scheme(condition) => Some(true),
            _ => None,
        };
        let Some(dark) = dark else {
            self.state.warn(
                CompileWarning::UnsupportedVariableScope { selector: text.to_string() },
            );
            return;
        };
        let table = match scope {
            VariableScope::Root => &mut self.state.stylesheet.root_vars,
            VariableScope::Universal => &mut self.state.stylesheet.universal_vars,
        };
        for (name, value) in &rule.vars {
            table.entry(name.clone()).or_default().set(dark, value.clone());
        }
    }

    /// Substitute `&` with the parent selector, or nest as a descendant
    fn resolve_nesting(&self, text: &str) -> String {
        let Some(parent) = &self.scope.parent_selector else {
            return text.trim().to_string();
        };
        let parent_tokens = tokens::tokenize(parent);
        let child_tokens = tokens::tokenize(text);
        let parents: Vec<String> = tokens::split_commas(&parent_tokens)
            .into_iter()
            .map(tokens::to_css)
            .collect();
        let mut resolved = Vec::new();
        for child in tokens::split_commas(&child_tokens) {
            let nests = child.iter().any(|token| token.is_delim('&'));
            let child = tokens::to_css(child);
            for parent in &parents {
                if nests {
                    resolved.push(child.replace('&', parent));
                } else {
                    resolved.push(format!("{parent} {child}"));
                }
            }
        }
        resolved.join(", ")
    }

    /// Compile `@keyframes name { ... }`
    pub fn keyframes(&mut self, name: &str, frames: &[(String, Vec<DeclarationText>)]) {
        let mut compiled = Vec::new();
        for (selectors, declarations) in frames {
            let mut rule = StyleRule::default();
            for declaration in declarations {
                if !declaration.name.starts_with("--") {
                    self.add_declaration(&mut rule, declaration);
                }
            }
            for progress in keyframe_progress(selectors) {
                compiled.push(KeyframeFrame { progress, declarations: rule.declarations.clone() });
            }
        }
        compiled.sort_by(|a, b| a.progress.total_cmp(&b.progress));
        self.state.stylesheet.keyframes.insert(name.to_string(), compiled);
    }
}

/// Static single-key values merge into the trailing static record
fn push_declaration(rule: &mut StyleRule, path: PropertyPath, descriptor: StyleDescriptor) {
    if descriptor.is_deferred() {
        rule.declarations.push(StyleDeclaration::Deferred(descriptor, path, true));
        return;
    }
    match path.as_key() {
        Some(key) if descriptor.is_static() => {
            if let Some(StyleDeclaration::Static(fields)) = rule.declarations.last_mut() {
                fields.shift_remove(key);
                fields.insert(key.to_string(), descriptor);
            } else {
                let mut fields = IndexMap::new();
                fields.insert(key.to_string(), descriptor);
                rule.declarations.push(StyleDeclaration::Static(fields));
            }
        }
        _ => rule.declarations.push(StyleDeclaration::Dynamic(descriptor, path)),
    }
}

fn is_dark_scheme(condition: &Condition) -> bool {
    matches!(
        condition,
        Condition::Compare(name, Comparator::Equal, ConditionValue::String(value))
            if name == "prefers-color-scheme" && value == "dark"
    )
}

/// `from`, `to` and percentages as progress in `[0, 1]`
fn keyframe_progress(selectors: &str) -> Vec<f64> {
    let tokens = tokens::tokenize(selectors);
    tokens::split_commas(&tokens)
        .into_iter()
        .filter_map(|part| match part {
            [ValueToken::Ident(word)] if word.eq_ignore_ascii_case("from") => Some(0.0),
            [ValueToken::Ident(word)] if word.eq_ignore_ascii_case("to") => Some(1.0),
            [ValueToken::Percentage(p)] => Some(p / 100.0),
            _ => None,
        })
        .collect()
}

/// Drop custom properties that no `var()` in the compile references
fn strip_unused_variables(stylesheet: &mut CompiledStylesheet) {
    let mut used = IndexSet::new();
    let mut visit = |descriptor: &StyleDescriptor| {
        descriptor.for_each_variable(&mut |name| {
            used.insert(name.to_string());
        })
    };
    for rule in stylesheet.rule_sets.values().flatten() {
        for declaration in &rule.declarations {
            declaration_descriptors(declaration).into_iter().for_each(&mut visit);
        }
        rule.vars.iter().for_each(|(_, value)| visit(value));
    }
    for frame in stylesheet.keyframes.values().flatten() {
        for declaration in &frame.declarations {
            declaration_descriptors(declaration).into_iter().for_each(&mut visit);
        }
    }
    for value in stylesheet.root_vars.values().chain(stylesheet.universal_vars.values()) {
        value.light.iter().chain(value.dark.iter()).for_each(&mut visit);
    }

    let before = stylesheet.root_vars.len() + stylesheet.universal_vars.len();
    stylesheet.root_vars.retain(|name, _| used.contains(name));
    stylesheet.universal_vars.retain(|name, _| used.contains(name));
    for rule in stylesheet.rule_sets.values_mut().flatten() {
        rule.vars.retain(|(name, _)| used.contains(name));
    }
    tracing::debug!(
        "stripped {} unused variables",
        before - stylesheet.root_vars.len() - stylesheet.universal_vars.len()
    );
}

fn declaration_descriptors(declaration: &StyleDeclaration) -> Vec<&StyleDescriptor> {
    match declaration {
        StyleDeclaration::Static(fields) => fields.values().collect(),
        StyleDeclaration::Deferred(descriptor, ..) | StyleDeclaration::Dynamic(descriptor, _) => {
            vec![descriptor]
        }
    }
}
