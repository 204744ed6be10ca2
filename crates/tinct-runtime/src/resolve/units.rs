//! Relative length units

use tinct_core::{FunctionName, StyleFunction, StyleValue};

use super::ResolveContext;

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let magnitude = context.resolve(function.arguments.first()?)?.as_number()?;
    let environment = context.environment;
    let effect = context.effect;
    let viewport = |read: fn(f64, f64) -> f64| {
        read(environment.width(effect), environment.height(effect)) / 100.0
    };

    let base = match function.name {
        FunctionName::Em => context.font_size.unwrap_or_else(|| environment.rem(effect)),
        FunctionName::Rem => environment.rem(effect),
        FunctionName::Vw => environment.width(effect) / 100.0,
        FunctionName::Vh => environment.height(effect) / 100.0,
        FunctionName::Vmin => viewport(f64::min),
        FunctionName::Vmax => viewport(f64::max),
        _ => return None,
    };
    Some(StyleValue::Number(round(magnitude * base)))
}

fn round(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_viewport_units() {
        let mut fixture = Fixture::new();
        fixture.environment.set_viewport(400.0, 800.0, None);
        assert_eq!(fixture.resolve(&call(FunctionName::Vw, vec![50.0.into()])), Some(200.0.into()));
        assert_eq!(fixture.resolve(&call(FunctionName::Vh, vec![10.0.into()])), Some(80.0.into()));
        assert_eq!(
            fixture.resolve(&call(FunctionName::Vmin, vec![10.0.into()])),
            Some(40.0.into()),
        );
        assert_eq!(
            fixture.resolve(&call(FunctionName::Vmax, vec![10.0.into()])),
            Some(80.0.into()),
        );
    }

    #[test]
    fn test_rem_reads_environment() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.resolve(&call(FunctionName::Rem, vec![2.0.into()])), Some(28.0.into()));
        fixture.environment.set_rem(16.0, None);
        assert_eq!(fixture.resolve(&call(FunctionName::Rem, vec![2.0.into()])), Some(32.0.into()));
    }

    #[test]
    fn test_em_falls_back_to_rem() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.resolve(&call(FunctionName::Em, vec![1.5.into()])), Some(21.0.into()));
    }
}
