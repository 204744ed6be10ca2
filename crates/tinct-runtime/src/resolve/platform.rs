//! Platform helpers
//!
//! `platformColor()`, `hairlineWidth()`, `pixelRatio()`, `fontScale()` and
//! `roundToNearestPixel()`, answered from the environment.

use tinct_core::{FunctionName, StyleFunction, StyleObject, StyleValue};

use super::ResolveContext;
use crate::environment::Platform;

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let arguments = context.resolve_all(&function.arguments)?;
    let environment = context.environment;
    let effect = context.effect;
    let factor = || match arguments.first() {
        Some(value) => value.as_number(),
        None => Some(1.0),
    };

    Some(match function.name {
        FunctionName::PlatformColor => platform_color(environment.platform(), arguments.clone())?,
        FunctionName::HairlineWidth => StyleValue::Number(environment.hairline_width(effect)),
        FunctionName::PixelRatio => StyleValue::Number(environment.pixel_ratio(effect) * factor()?),
        FunctionName::FontScale => StyleValue::Number(environment.font_scale(effect) * factor()?),
        FunctionName::RoundToNearestPixel => {
            let value = arguments.first()?.as_number()?;
            StyleValue::Number(environment.round_to_nearest_pixel(value, effect))
        }
        _ => return None,
    })
}

/// Opaque colour reference in the shape the host platform expects
fn platform_color(platform: Platform, names: Vec<StyleValue>) -> Option<StyleValue> {
    if names.is_empty() {
        return None;
    }
    let key = match platform {
        Platform::Ios | Platform::Macos => "semantic",
        Platform::Android => "resource_paths",
        Platform::Web | Platform::Windows => return names.into_iter().next(),
    };
    let mut object = StyleObject::new();
    object.insert(key.to_string(), StyleValue::Array(names));
    Some(StyleValue::Object(object))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::environment::{Environment, EnvironmentConfig};

    #[test]
    fn test_platform_color_on_ios() {
        let mut fixture = Fixture::new();
        let value = fixture.resolve(&call(FunctionName::PlatformColor, vec!["systemRed".into()]))
            .unwrap();
        assert_eq!(
            value.as_object().and_then(|o| o.get("semantic")),
            Some(&StyleValue::Array(vec!["systemRed".into()]))
        );
    }

    #[test]
    fn test_platform_color_on_web() {
        let mut fixture = Fixture::new();
        fixture.environment = Environment::new(
            EnvironmentConfig { platform: Platform::Web, ..Default::default() },
        );
        let value = fixture.resolve(&call(
            FunctionName::PlatformColor,
            vec!["red".into(), "blue".into()],
        ));
        assert_eq!(value, Some("red".into()));
    }

    #[test]
    fn test_pixel_helpers() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.resolve(&call(FunctionName::PixelRatio, vec![])), Some(2.0.into()));
        assert_eq!(
            fixture.resolve(&call(FunctionName::PixelRatio, vec![3.0.into()])),
            Some(6.0.into()),
        );
        assert_eq!(fixture.resolve(&call(FunctionName::FontScale, vec![])), Some(1.0.into()));
        assert_eq!(fixture.resolve(&call(FunctionName::HairlineWidth, vec![])), Some(0.5.into()));
        assert_eq!(
            fixture.resolve(&call(FunctionName::RoundToNearestPixel, vec![10.3.into()])),
            Some(10.5.into())
        );
    }
}
