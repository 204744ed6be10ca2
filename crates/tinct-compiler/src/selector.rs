//! Selector Normalizer
//!
//! Reduces CSS selectors to the shapes the runtime can evaluate: a class
//! name with interaction and attribute qualifiers, optionally nested inside
//! ancestor class "containers", or a variable scope (`:root`, `*`).

use tinct_core::{
    AttrOperator, AttrQuery, AttrSource, ContainerQuery, PseudoClassesQuery, Specificity,
};

use crate::tokens::{self, ValueToken};

/// Where custom properties declared by a variable selector are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableScope {
    Root,
    Universal,
}

/// A selector the compiler can emit rules for
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedSelector {
    ClassName(ClassSelector),
    Variables { scope: VariableScope, dark: bool },
}

/// Class selector with its qualifiers
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSelector {
    pub class_name: String,
    pub specificity: Specificity,
    pub pseudo_classes: Option<PseudoClassesQuery>,
    pub attrs: Vec<AttrQuery>,
    /// Ancestor tiers, nearest first
    pub containers: Vec<ContainerQuery>,
}

/// Result of normalizing one selector list
#[derive(Debug, Default)]
pub struct SelectorList {
    pub selectors: Vec<NormalizedSelector>,
    /// Selectors that were dropped, as written
    pub rejected: Vec<String>,
}

/// Settings that change how selectors are read
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorContext<'a> {
    pub dark_class: Option<&'a str>,
    pub prefix: Option<&'a str>,
}

/// Selector components grouped between descendant combinators
#[derive(Debug, Default)]
struct Compound {
    classes: Vec<String>,
    pseudo: PseudoClassesQuery,
    attrs: Vec<AttrQuery>,
    root: bool,
    universal: bool,
    weight: u32,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.pseudo.is_empty()
            && self.attrs.is_empty()
            && !self.root
            && !self.universal
    }

    fn has_qualifiers(&self) -> bool {
        !self.pseudo.is_empty() || !self.attrs.is_empty()
    }

    /// Only the dark class, optionally on `:root`
    fn is_dark_marker(&self, dark_class: Option<&str>) -> bool {
        match dark_class {
            Some(dark) => {
                self.classes.len() == 1
                    && self.classes[0] == dark
                    && !self.has_qualifiers()
                    && !self.universal
            }
            None => false,
        }
    }

    fn is_bare_root(&self) -> bool {
        self.root && self.classes.is_empty() && !self.has_qualifiers() && !self.universal
    }

    fn is_bare_universal(&self) -> bool {
        self.universal && self.classes.is_empty() && !self.has_qualifiers() && !self.root
    }

    /// Extra classes become `className ~= class` tests
    fn class_attrs(&self) -> impl Iterator<Item = AttrQuery> + '_ {
        self.classes.iter().skip(1).map(|class| {
            AttrQuery::new(
                AttrSource::Attribute,
                "className",
                Some(AttrOperator::Includes),
                Some(class.clone()),
            )
        })
    }
}

/// Normalize a printed selector list
pub fn normalize(text: &str, context: SelectorContext<'_>) -> SelectorList {
    let mut list = SelectorList::default();
    let tokens = tokens::tokenize(text);
    for part in tokens::split_commas(&tokens) {
        let written = tokens::to_css(part);
        match normalize_one(&written, context) {
            Some(selector) => list.selectors.push(selector),
            None => list.rejected.push(written),
        }
    }
    list
}

fn normalize_one(text: &str, context: SelectorContext<'_>) -> Option<NormalizedSelector> {
    let text = strip_prefix(text, context.prefix);
    let tokens = tokens::tokenize(text);
    let compounds = parse_complex(tokens::trim(&tokens))?;
    let (element, ancestors) = compounds.split_last()?;

    if let Some(variables) = variable_selector(element, ancestors, context.dark_class) {
        return Some(variables);
    }
    if element.root || element.classes.is_empty() {
        return None;
    }

    let mut weight = element.weight;
    let mut attrs: Vec<AttrQuery> = element.class_attrs().collect();
    attrs.extend(element.attrs.iter().cloned());

    let mut containers = Vec::new();
    for ancestor in ancestors.iter().rev() {
        if ancestor.is_bare_root() {
            continue;
        }
        let name = ancestor.classes.first()?;
        weight += ancestor.weight;
        let mut query = ContainerQuery::named(name.clone());
        if !ancestor.pseudo.is_empty() {
            query.pseudo_classes = Some(ancestor.pseudo);
        }
        query.attrs = ancestor.class_attrs().collect();
        query.attrs.extend(ancestor.attrs.iter().cloned());
        containers.push(query);
    }

    Some(NormalizedSelector::ClassName(ClassSelector {
        class_name: element.classes[0].clone(),
        specificity: Specificity { class_name: weight, ..Specificity::ZERO },
        pseudo_classes: (!element.pseudo.is_empty()).then_some(element.pseudo),
        attrs,
        containers,
    }))
}

fn variable_selector(
    element: &Compound,
    ancestors: &[Compound],
    dark_class: Option<&str>,
) -> Option<NormalizedSelector> {
    let root_dark = |compound: &Compound| {
        compound.is_dark_marker(dark_class)
            || (compound.root
                && dark_class.is_some_and(|dark| compound.classes == [dark])
                && !compound.has_qualifiers())
    };

    if ancestors.is_empty() {
        if element.is_bare_root() {
            return Some(NormalizedSelector::Variables { scope: VariableScope::Root, dark: false });
        }
        if root_dark(element) {
            return Some(NormalizedSelector::Variables { scope: VariableScope::Root, dark: true });
        }
        if element.is_bare_universal() {
            return Some(NormalizedSelector::Variables {
                scope: VariableScope::Universal,
                dark: false,
            });
        }
        return None;
    }

    if element.is_bare_universal() && ancestors.len() == 1 && root_dark(&ancestors[0]) {
        return Some(NormalizedSelector::Variables { scope: VariableScope::Universal, dark: true });
    }
    None
}

fn strip_prefix<'a>(text: &'a str, prefix: Option<&str>) -> &'a str {
    match prefix {
        Some(prefix) if !prefix.is_empty() => match text.strip_prefix(prefix) {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => text,
        },
        _ => text,
    }
}

/// Split a complex selector into compounds joined by descendant combinators.
/// Any other combinator or unsupported component rejects the selector.
fn parse_complex(tokens: &[ValueToken]) -> Option<Vec<Compound>> {
    let mut compounds = Vec::new();
    let mut current = Compound::default();
    let mut index = 0;

    while index < tokens.len() {
        match &tokens[index] {
            ValueToken::Whitespace => {
                if !current.is_empty() {
                    compounds.push(std::mem::take(&mut current));
                }
            }
            ValueToken::Delim('.') => {
                let name = tokens.get(index + 1)?.ident()?;
                current.classes.push(name.to_string());
                current.weight += 1;
                index += 1;
            }
            ValueToken::Delim('*') => current.universal = true,
            ValueToken::Colon => {
                index += 1;
                match tokens.get(index)? {
                    ValueToken::Ident(name) => pseudo_class(&mut current, name)?,
                    ValueToken::Function(name, args) if name == "not" => {
                        let attr = negated_attribute(args)?;
                        current.attrs.push(attr);
                        current.weight += 1;
                    }
                    _ => return None,
                }
            }
            ValueToken::Brackets(inner) => {
                current.attrs.push(attribute(inner)?);
                current.weight += 1;
            }
            _ => return None,
        }
        index += 1;
    }
    if !current.is_empty() {
        compounds.push(current);
    }
    (!compounds.is_empty()).then_some(compounds)
}

fn pseudo_class(compound: &mut Compound, name: &str) -> Option<()> {
    match name.to_ascii_lowercase().as_str() {
        "hover" => compound.pseudo.hover = Some(true),
        "active" => compound.pseudo.active = Some(true),
        "focus" => compound.pseudo.focus = Some(true),
        "disabled" => compound.attrs.push(AttrQuery::new(
            AttrSource::Attribute,
            "disabled",
            Some(AttrOperator::Truthy),
            None,
        )),
        "empty" => compound.attrs.push(AttrQuery::new(
            AttrSource::Attribute,
            "children",
            Some(AttrOperator::Empty),
            None,
        )),
        "root" | "host" => {
            compound.root = true;
            return Some(());
        }
        _ => return None,
    }
    compound.weight += 1;
    Some(())
}

/// `:not([attr])` is the only supported negation
fn negated_attribute(args: &[ValueToken]) -> Option<AttrQuery> {
    match tokens::trim(args) {
        [ValueToken::Brackets(inner)] => {
            let mut attr = attribute(inner)?;
            if attr.operator.is_some() {
                return None;
            }
            attr.operator = Some(AttrOperator::Falsy);
            Some(attr)
        }
        _ => None,
    }
}

fn attribute(inner: &[ValueToken]) -> Option<AttrQuery> {
    let words = tokens::words(inner);
    let name = words.first()?.ident()?;
    let (source, name) = match name.strip_prefix("data-") {
        Some(rest) => (AttrSource::DataSet, camel_case(rest)),
        None => (AttrSource::Attribute, camel_case(name)),
    };

    match words.as_slice() {
        [_] => Some(AttrQuery::new(source, name, None, None)),
        [_, operator, value] | [_, operator, value, _] => {
            let operator = match operator {
                ValueToken::Delim('=') => AttrOperator::Equals,
                ValueToken::Match(op) => AttrOperator::from_css(op)?,
                _ => return None,
            };
            let value = match value {
                ValueToken::Ident(v) | ValueToken::String(v) => v.clone(),
                ValueToken::Number(_) | ValueToken::Dimension(..) => value.to_css(),
                _ => return None,
            };
            Some(AttrQuery::new(source, name, Some(operator), Some(value)))
        }
        _ => None,
    }
}

/// `aria-label` to `ariaLabel`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(text: &str) -> ClassSelector {
        let list = normalize(text, SelectorContext::default());
        match list.selectors.into_iter().next() {
            Some(NormalizedSelector::ClassName(selector)) => selector,
            other => panic!("expected class selector, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_class() {
        let selector = class(".text-red");
        assert_eq!(selector.class_name, "text-red");
        assert_eq!(selector.specificity.class_name, 1);
        assert!(selector.containers.is_empty());
    }

    #[test]
    fn test_hover_adds_specificity() {
        let selector = class(".redOrGreen:hover");
        assert_eq!(selector.specificity.class_name, 2);
        assert_eq!(selector.pseudo_classes.unwrap().hover, Some(true));
    }

    #[test]
    fn test_descendant_becomes_container() {
        let selector = class(".my-class .test");
        assert_eq!(selector.class_name, "test");
        assert_eq!(selector.containers.len(), 1);
        assert_eq!(selector.containers[0].name.as_deref(), Some("my-class"));
        assert_eq!(selector.specificity.class_name, 2);
    }

    #[test]
    fn test_group_hover_tier() {
        let selector = class(".group:hover .item");
        let tier = &selector.containers[0];
        assert_eq!(tier.pseudo_classes.unwrap().hover, Some(true));
        assert!(selector.pseudo_classes.is_none());
    }

    #[test]
    fn test_compound_classes_become_attr_tests() {
        let selector = class(".a.b");
        assert_eq!(selector.class_name, "a");
        assert_eq!(selector.attrs[0].name, "className");
        assert_eq!(selector.attrs[0].value.as_deref(), Some("b"));
    }

    #[test]
    fn test_attribute_selectors() {
        let selector = class(".btn[data-state=\"open\"]:not([aria-disabled])");
        assert_eq!(selector.attrs[0].source, AttrSource::DataSet);
        assert_eq!(selector.attrs[0].name, "state");
        assert_eq!(selector.attrs[0].operator, Some(AttrOperator::Equals));
        assert_eq!(selector.attrs[1].name, "ariaDisabled");
        assert_eq!(selector.attrs[1].operator, Some(AttrOperator::Falsy));
    }

    #[test]
    fn test_rejected_shapes() {
        let rejected =
            ["#id", "div", ".a > .b", ".a + .b", ".a::before", ".a:first-child", "&:hover"];
        for text in rejected {
            let list = normalize(text, SelectorContext::default());
            assert!(list.selectors.is_empty(), "{text} should be rejected");
            assert_eq!(list.rejected.len(), 1);
        }
    }

    #[test]
    fn test_variable_scopes() {
        let context = SelectorContext { dark_class: Some("dark"), prefix: None };
        let list = normalize(":root, *, .dark, :root.dark, .dark *", context);
        assert_eq!(
            list.selectors,
            vec![
                NormalizedSelector::Variables { scope: VariableScope::Root, dark: false },
                NormalizedSelector::Variables { scope: VariableScope::Universal, dark: false },
                NormalizedSelector::Variables { scope: VariableScope::Root, dark: true },
                NormalizedSelector::Variables { scope: VariableScope::Root, dark: true },
                NormalizedSelector::Variables { scope: VariableScope::Universal, dark: true },
            ]
        );
    }

    #[test]
    fn test_selector_prefix() {
        let context = SelectorContext { dark_class: None, prefix: Some(".app") };
        let list = normalize(".app .title", context);
        match &list.selectors[0] {
            NormalizedSelector::ClassName(selector) => {
                assert_eq!(selector.class_name, "title");
                assert!(selector.containers.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("aria-label"), "ariaLabel");
        assert_eq!(camel_case("state"), "state");
    }
}
