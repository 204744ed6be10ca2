//! Tinct Runtime
//!
//! Evaluates compiled stylesheets against live elements. The store holds
//! injected rules, the environment holds the device state media queries
//! read, and the evaluator turns an element's props into resolved style
//! objects while recording what the result depends on.

pub mod conditions;
pub mod element;
pub mod environment;
pub mod error;
pub mod evaluate;
pub mod guards;
pub mod merge;
pub mod observable;
pub mod resolve;
pub mod store;

pub use element::{
    Capabilities, ContainerEntry, ContainerMap, ElementState, Layout, Props, RenderContext,
    VariableMap, FONT_SIZE_VARIABLE,
};
pub use environment::{ColorScheme, Environment, EnvironmentConfig, Platform};
pub use error::RuntimeError;
pub use evaluate::{inline_variables, Evaluation, Evaluator, EvaluatorOptions, SourceMapping};
pub use guards::{Guard, Guards};
pub use observable::{Batch, Effect, Observable, ObservableFamily};
pub use store::StyleStore;
