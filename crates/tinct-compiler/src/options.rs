//! Compiler Options
//!
//! Every option is optional. Options can be loaded from JSON and toggled
//! per stylesheet with an `@tinct { ... }` block.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::warning::CompileWarning;

/// Default rem multiplier when none is configured
pub const DEFAULT_REM: f64 = 14.0;

/// Callback receiving every warning of a compile
pub type Logger = Arc<dyn Fn(&CompileWarning) + Send + Sync>;

/// How dark variants of variables are declared
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`
    #[default]
    Media,
    /// A class such as `.dark` or `:root.dark`
    Class(String),
}

impl DarkMode {
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Media => None,
            Self::Class(name) => Some(name),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Fixed rem multiplier. `None` keeps `rem` as a runtime function.
    #[serde(deserialize_with = "deserialize_rem")]
    pub inline_rem: Option<f64>,
    pub selector_prefix: Option<String>,
    /// Offset for the global rule order counter
    pub stylesheet_order: u32,
    pub strip_unused_variables: bool,
    /// Decimal places for `rgb()` output. Setting it implies `rgb()` output.
    pub color_precision: Option<u32>,
    pub hex_colors: bool,
    pub dark_mode: DarkMode,
    #[serde(skip)]
    pub logger: Option<Logger>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            inline_rem: Some(DEFAULT_REM),
            selector_prefix: None,
            stylesheet_order: 0,
            strip_unused_variables: false,
            color_precision: None,
            hex_colors: true,
            dark_mode: DarkMode::default(),
            logger: None,
        }
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("inline_rem", &self.inline_rem)
            .field("selector_prefix", &self.selector_prefix)
            .field("stylesheet_order", &self.stylesheet_order)
            .field("strip_unused_variables", &self.strip_unused_variables)
            .field("color_precision", &self.color_precision)
            .field("hex_colors", &self.hex_colors)
            .field("dark_mode", &self.dark_mode)
            .field("logger", &self.logger.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl CompilerOptions {
    pub fn with_logger(mut self, logger: impl Fn(&CompileWarning) + Send + Sync + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Apply one `@tinct` option. Returns false when the key or value is not understood.
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim().trim_matches('"');
        match key {
            "strip-unused-variables" | "preserve-variables" => match parse_bool(value) {
                Some(flag) => {
                    self.strip_unused_variables =
                        if key == "preserve-variables" { !flag } else { flag };
                    true
                }
                None => false,
            },
            "hex-colors" => match parse_bool(value) {
                Some(flag) => {
                    self.hex_colors = flag;
                    true
                }
                None => false,
            },
            "color-precision" => match value.parse::<u32>() {
                Ok(precision) => {
                    self.color_precision = Some(precision);
                    true
                }
                Err(_) => false,
            },
            "inline-rem" => {
                if value == "false" {
                    self.inline_rem = None;
                    true
                } else if let Ok(rem) = value.parse::<f64>() {
                    self.inline_rem = Some(rem);
                    true
                } else {
                    false
                }
            }
            "dark-mode" => {
                if value == "media" {
                    self.dark_mode = DarkMode::Media;
                } else if let Some(class) = value.strip_prefix("class") {
                    let class = class.trim().trim_start_matches('.').trim();
                    let class = if class.is_empty() { "dark" } else { class };
                    self.dark_mode = DarkMode::Class(class.to_string());
                } else {
                    return false;
                }
                true
            }
            _ => false,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// `inlineRem` accepts a number or `false`
fn deserialize_rem<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RemSetting {
        Number(f64),
        Flag(bool),
    }

    Ok(match Option::<RemSetting>::deserialize(deserializer)? {
        Some(RemSetting::Number(rem)) => Some(rem),
        Some(RemSetting::Flag(true)) => Some(DEFAULT_REM),
        Some(RemSetting::Flag(false)) | None => None,
    })
}
