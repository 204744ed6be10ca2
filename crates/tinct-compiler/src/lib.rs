//! Tinct Compiler
//!
//! Compiles CSS into the style-rule IR: an ordered, specificity-annotated
//! list of rules per class name, keyframes, and root/universal variables.
//! Unsupported input never fails a compile; it is reported as a warning
//! and left out of the output.

pub mod at_rules;
pub mod builder;
pub mod conditions;
pub mod declarations;
pub mod options;
pub mod properties;
pub mod selector;
pub mod tokens;
pub mod walker;
pub mod warning;

pub use builder::{CompileState, DeclarationText, Mode, RuleBuilder};
pub use options::{CompilerOptions, DarkMode, DEFAULT_REM};
pub use warning::{CompileError, CompileWarning};

use tinct_core::CompiledStylesheet;

/// Output of a compile together with everything it warned about
#[derive(Debug, Clone)]
pub struct CompileReport {
    pub stylesheet: CompiledStylesheet,
    pub warnings: Vec<CompileWarning>,
}

/// Compile a stylesheet
pub fn compile(css: &str, options: CompilerOptions) -> Result<CompiledStylesheet, CompileError> {
    compile_with_report(css, options).map(|report| report.stylesheet)
}

/// Compile a stylesheet and return its warnings as well
pub fn compile_with_report(
    css: &str,
    options: CompilerOptions,
) -> Result<CompileReport, CompileError> {
    let mut state = CompileState::new(options);
    walker::compile_source(css, &mut state)?;
    let (stylesheet, warnings) = state.finish();
    Ok(CompileReport { stylesheet, warnings })
}
