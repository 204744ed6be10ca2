//! Tinct Core
//!
//! The compiled stylesheet IR shared by the compiler and the runtime:
//! rules, specificity, descriptors, conditions, colours and resolved values.

pub mod color;
pub mod condition;
pub mod descriptor;
pub mod rule;
pub mod specificity;
pub mod stylesheet;
pub mod value;

pub use color::Color;
pub use condition::{Comparator, Condition, ConditionValue};
pub use descriptor::{FunctionName, PropertyPath, StyleDeclaration, StyleDescriptor, StyleFunction};
pub use rule::{
    AttrOperator, AttrQuery, AttrSource, ContainerQuery, PseudoClassesQuery, StyleRule,
    DEFAULT_CONTAINER_NAME,
};
pub use specificity::Specificity;
pub use stylesheet::{CompiledStylesheet, KeyframeFrame, VariableTable, VariableValue};
pub use value::{format_number, StyleObject, StyleValue};
