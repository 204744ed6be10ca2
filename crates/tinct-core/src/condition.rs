//! Condition IR
//!
//! Compact boolean trees for media and container queries, evaluated at
//! render time against a fixed feature table.

use serde::{Deserialize, Serialize};

/// Media or container condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// Boolean feature test such as `(color)` or a constant `true`/`false`
    Feature(String),
    Not(Box<Condition>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    /// `feature <op> value`
    Compare(String, Comparator, ConditionValue),
    /// `start <op> feature <op> end`
    Interval(String, ConditionValue, Comparator, ConditionValue, Comparator),
}

impl Condition {
    /// Constant condition that always holds
    pub fn always() -> Self {
        Self::Feature(Self::TRUE.to_string())
    }

    /// Constant condition that never holds
    pub fn never() -> Self {
        Self::Feature(Self::FALSE.to_string())
    }

    pub const TRUE: &'static str = "true";
    pub const FALSE: &'static str = "false";

    /// Visit every feature name referenced by this condition
    pub fn for_each_feature(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            Self::Feature(name) => {
                if name != Self::TRUE && name != Self::FALSE {
                    visit(name);
                }
            }
            Self::Not(inner) => inner.for_each_feature(visit),
            Self::And(items) | Self::Or(items) => {
                items.iter().for_each(|item| item.for_each_feature(visit))
            }
            Self::Compare(name, ..) | Self::Interval(name, ..) => visit(name),
        }
    }

    /// Combine conditions with `and`, flattening trivial cases
    pub fn all(mut conditions: Vec<Condition>) -> Condition {
        match conditions.len() {
            0 => Self::always(),
            1 => conditions.remove(0),
            _ => Self::And(conditions),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanEqual,
}

impl Comparator {
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "=" => Self::Equal,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanEqual,
            _ => return None,
        })
    }

    /// Operator seen from the other operand: `a < b` is `b > a`
    pub fn flip(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanEqual => Self::LessThanEqual,
            Self::LessThan => Self::GreaterThan,
            Self::LessThanEqual => Self::GreaterThanEqual,
        }
    }

    /// Apply the operator to `left <op> right`
    pub fn test(self, left: f64, right: f64) -> bool {
        match self {
            Self::Equal => (left - right).abs() < f64::EPSILON,
            Self::GreaterThan => left > right,
            Self::GreaterThanEqual => left >= right,
            Self::LessThan => left < right,
            Self::LessThanEqual => left <= right,
        }
    }
}

/// Right-hand operand of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    String(String),
    Bool(bool),
}

impl ConditionValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let condition = Condition::And(vec![
            Condition::Compare(
                "width".into(),
                Comparator::GreaterThanEqual,
                ConditionValue::Number(500.0),
            ),
            Condition::Not(Box::new(Condition::Feature("hover".into()))),
        ]);
        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(
            json,
            r#"{"and":[{"compare":["width",">=",500.0]},{"not":{"feature":"hover"}}]}"#
        );
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn test_comparator_flip() {
        assert_eq!(Comparator::LessThan.flip(), Comparator::GreaterThan);
        assert_eq!(Comparator::GreaterThanEqual.flip(), Comparator::LessThanEqual);
        assert!(Comparator::GreaterThanEqual.test(500.0, 500.0));
        assert!(!Comparator::GreaterThanEqual.test(499.0, 500.0));
    }

    #[test]
    fn test_features_skip_constants() {
        let condition = Condition::Or(vec![
            Condition::always(),
            Condition::Interval(
                "width".into(),
                ConditionValue::Number(1.0),
                Comparator::LessThan,
                ConditionValue::Number(2.0),
                Comparator::LessThan,
            ),
        ]);
        let mut seen = Vec::new();
        condition.for_each_feature(&mut |name| seen.push(name.to_string()));
        assert_eq!(seen, ["width"]);
    }
}
