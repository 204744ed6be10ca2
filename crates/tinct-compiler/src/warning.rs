//! Compile warnings and errors

/// Non-fatal diagnostic. The offending declaration, selector or rule is
/// left out of the output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileWarning {
    #[error("unsupported property `{property}`")]
    UnsupportedProperty { property: String },

    #[error("unsupported value `{value}` for `{property}`")]
    UnsupportedValue { property: String, value: String },

    #[error("unsupported selector `{selector}`")]
    UnsupportedSelector { selector: String },

    #[error("unsupported at-rule `@{name}`")]
    UnsupportedAtRule { name: String },

    #[error("invalid {kind} condition `{prelude}`, rule dropped")]
    InvalidCondition { kind: &'static str, prelude: String },

    #[error("variables on `{selector}` can only be scoped by color scheme, rule dropped")]
    UnsupportedVariableScope { selector: String },

    #[error("invalid `@tinct` option `{key}: {value}`")]
    InvalidOption { key: String, value: String },

    #[error("css parse warning: {message}")]
    Parse { message: String },
}

/// Fatal compile error
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to parse stylesheet: {message}")]
    Parse { message: String },
}
