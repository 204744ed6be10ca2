//! Environment
//!
//! Viewport, colour scheme and device values read by media queries, unit
//! conversion and the platform helpers. Each value is an observable with a
//! single writer, the host integration.

use serde::Deserialize;
use tinct_core::ConditionValue;

use crate::observable::{Batch, Effect, Observable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Android,
    Web,
    Windows,
    Macos,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
            Self::Windows => "windows",
            Self::Macos => "macos",
        }
    }
}

/// Initial environment, loadable from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConfig {
    pub width: f64,
    pub height: f64,
    pub color_scheme: ColorScheme,
    pub pixel_ratio: f64,
    pub font_scale: f64,
    pub reduced_motion: bool,
    pub platform: Platform,
    /// Base for `rem` units that were not inlined at compile time
    pub rem: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 812.0,
            color_scheme: ColorScheme::Light,
            pixel_ratio: 2.0,
            font_scale: 1.0,
            reduced_motion: false,
            platform: Platform::Ios,
            rem: 14.0,
        }
    }
}

#[derive(Debug)]
pub struct Environment {
    platform: Platform,
    width: Observable<f64>,
    height: Observable<f64>,
    color_scheme: Observable<ColorScheme>,
    pixel_ratio: Observable<f64>,
    font_scale: Observable<f64>,
    reduced_motion: Observable<bool>,
    rem: Observable<f64>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(EnvironmentConfig::default())
    }
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            platform: config.platform,
            width: Observable::new(config.width),
            height: Observable::new(config.height),
            color_scheme: Observable::new(config.color_scheme),
            pixel_ratio: Observable::new(config.pixel_ratio),
            font_scale: Observable::new(config.font_scale),
            reduced_motion: Observable::new(config.reduced_motion),
            rem: Observable::new(config.rem),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn width(&self, effect: Option<&Effect>) -> f64 {
        self.width.get(effect)
    }

    pub fn height(&self, effect: Option<&Effect>) -> f64 {
        self.height.get(effect)
    }

    pub fn color_scheme(&self, effect: Option<&Effect>) -> ColorScheme {
        self.color_scheme.get(effect)
    }

    pub fn is_dark(&self, effect: Option<&Effect>) -> bool {
        self.color_scheme(effect) == ColorScheme::Dark
    }

    pub fn pixel_ratio(&self, effect: Option<&Effect>) -> f64 {
        self.pixel_ratio.get(effect)
    }

    pub fn font_scale(&self, effect: Option<&Effect>) -> f64 {
        self.font_scale.get(effect)
    }

    pub fn reduced_motion(&self, effect: Option<&Effect>) -> bool {
        self.reduced_motion.get(effect)
    }

    pub fn rem(&self, effect: Option<&Effect>) -> f64 {
        self.rem.get(effect)
    }

    /// Width and height change together, so observers run once
    pub fn set_viewport(&self, width: f64, height: f64, batch: Option<&Batch>) {
        Batch::within(batch, |batch| {
            self.width.set(width, Some(batch));
            self.height.set(height, Some(batch));
        });
    }

    pub fn set_color_scheme(&self, scheme: ColorScheme, batch: Option<&Batch>) {
        self.color_scheme.set(scheme, batch);
    }

    pub fn set_pixel_ratio(&self, ratio: f64, batch: Option<&Batch>) {
        self.pixel_ratio.set(ratio, batch);
    }

    pub fn set_font_scale(&self, scale: f64, batch: Option<&Batch>) {
        self.font_scale.set(scale, batch);
    }

    pub fn set_reduced_motion(&self, reduced: bool, batch: Option<&Batch>) {
        self.reduced_motion.set(reduced, batch);
    }

    pub fn set_rem(&self, rem: f64, batch: Option<&Batch>) {
        self.rem.set(rem, batch);
    }

    /// Round a layout size to the nearest physical pixel
    pub fn round_to_nearest_pixel(&self, value: f64, effect: Option<&Effect>) -> f64 {
        let ratio = self.pixel_ratio(effect);
        if ratio <= 0.0 {
            return value;
        }
        (value * ratio).round() / ratio
    }

    /// Thinnest visible line on this display
    pub fn hairline_width(&self, effect: Option<&Effect>) -> f64 {
        let ratio = self.pixel_ratio(effect);
        let width = self.round_to_nearest_pixel(0.4, effect);
        if width == 0.0 && ratio > 0.0 { 1.0 / ratio } else { width }
    }

    /// Value of a media feature. Unknown names have no value.
    pub fn feature(&self, name: &str, effect: Option<&Effect>) -> Option<ConditionValue> {
        Some(match name {
            "width" => ConditionValue::Number(self.width(effect)),
            "height" => ConditionValue::Number(self.height(effect)),
            "aspect-ratio" => {
                ConditionValue::Number(aspect_ratio(self.width(effect), self.height(effect))?)
            }
            "orientation" => {
                ConditionValue::String(
                    orientation(self.width(effect), self.height(effect)).to_string(),
                )
            }
            "resolution" | "device-pixel-ratio" => ConditionValue::Number(self.pixel_ratio(effect)),
            "prefers-color-scheme" => {
                ConditionValue::String(self.color_scheme(effect).as_str().to_string())
            }
            "prefers-reduced-motion" => ConditionValue::String(
                if self.reduced_motion(effect) { "reduce" } else { "no-preference" }.to_string(),
            ),
            "platform" => ConditionValue::String(self.platform.as_str().to_string()),
            _ => return None,
        })
    }
}

pub(crate) fn aspect_ratio(width: f64, height: f64) -> Option<f64> {
    (height > 0.0).then(|| width / height)
}

pub(crate) fn orientation(width: f64, height: f64) -> &'static str {
    if width > height { "landscape" } else { "portrait" }
}
