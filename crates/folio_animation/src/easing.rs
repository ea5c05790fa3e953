//! Easing curves
//!
//! Maps linear progress `t ∈ [0, 1]` to eased progress. Names follow the
//! conventions page authors already use: CSS keywords (`ease-in-out`,
//! `cubic-bezier(...)`) and the tween-library power family, where
//! `power1 = quad`, `power2 = cubic`, `power3 = quart` and a bare name means
//! the `.out` variant.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned for an unrecognised easing name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing: {0:?}")]
pub struct ParseEasingError(pub String);

/// Easing function
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in`
    EaseIn,
    /// CSS `ease-out`
    EaseOut,
    /// CSS `ease-in-out`
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the curve to linear progress `t` (clamped to `[0, 1]`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInOutQuad => in_out(t, 2),
            Easing::EaseInCubic => t.powi(3),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => in_out(t, 3),
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => in_out(t, 4),
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Canonical name, parseable by [`FromStr`]
    pub fn name(&self) -> String {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::EaseInQuad => "power1.in",
            Easing::EaseOutQuad => "power1.out",
            Easing::EaseInOutQuad => "power1.inOut",
            Easing::EaseInCubic => "power2.in",
            Easing::EaseOutCubic => "power2.out",
            Easing::EaseInOutCubic => "power2.inOut",
            Easing::EaseInQuart => "power3.in",
            Easing::EaseOutQuart => "power3.out",
            Easing::EaseInOutQuart => "power3.inOut",
            Easing::EaseInSine => "sine.in",
            Easing::EaseOutSine => "sine.out",
            Easing::EaseInOutSine => "sine.inOut",
            Easing::CubicBezier(a, b, c, d) => {
                return format!("cubic-bezier({}, {}, {}, {})", a, b, c, d)
            }
        };
        name.to_string()
    }
}

fn in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

/// Evaluate a CSS cubic bezier at linear progress `x`
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let bezier = |a: f32, b: f32, t: f32| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    let slope = |a: f32, b: f32, t: f32| {
        let u = 1.0 - t;
        3.0 * u * u * a + 6.0 * u * t * (b - a) + 3.0 * t * t * (1.0 - b)
    };

    // Newton-Raphson on x(t) = x, falling back to bisection
    let mut t = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, t) - x;
        if err.abs() < 1e-6 {
            return bezier(y1, y2, t);
        }
        let d = slope(x1, x2, t);
        if d.abs() < 1e-6 {
            break;
        }
        t -= err / d;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
        let value = bezier(x1, x2, t);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    bezier(y1, y2, t)
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let lower = name.to_ascii_lowercase();

        if let Some(args) = lower
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values: Vec<f32> = args
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| ParseEasingError(name.to_string()))?;
            if let [a, b, c, d] = values[..] {
                return Ok(Easing::CubicBezier(a, b, c, d));
            }
            return Err(ParseEasingError(name.to_string()));
        }

        let easing = match lower.as_str() {
            "linear" | "none" => Easing::Linear,
            "ease" | "ease-in-out" => Easing::EaseInOut,
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "power1.in" | "quad.in" => Easing::EaseInQuad,
            "power1" | "power1.out" | "quad" | "quad.out" => Easing::EaseOutQuad,
            "power1.inout" | "quad.inout" => Easing::EaseInOutQuad,
            "power2.in" | "cubic.in" => Easing::EaseInCubic,
            "power2" | "power2.out" | "cubic" | "cubic.out" => Easing::EaseOutCubic,
            "power2.inout" | "cubic.inout" => Easing::EaseInOutCubic,
            "power3.in" | "quart.in" => Easing::EaseInQuart,
            "power3" | "power3.out" | "quart" | "quart.out" => Easing::EaseOutQuart,
            "power3.inout" | "quart.inout" => Easing::EaseInOutQuart,
            "sine.in" => Easing::EaseInSine,
            "sine" | "sine.out" => Easing::EaseOutSine,
            "sine.inout" => Easing::EaseInOutSine,
            _ => return Err(ParseEasingError(name.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = ParseEasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 17] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{} at 1", easing);
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-4 >= prev, "{} not monotonic at {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_curves_lead_linear() {
        assert!(Easing::EaseOutQuart.apply(0.3) > 0.3);
        assert!(Easing::EaseInQuart.apply(0.3) < 0.3);
        assert!((Easing::EaseInOutSine.apply(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_parse_power_family() {
        assert_eq!("power3.out".parse::<Easing>(), Ok(Easing::EaseOutQuart));
        assert_eq!("power3".parse::<Easing>(), Ok(Easing::EaseOutQuart));
        assert_eq!("sine.inOut".parse::<Easing>(), Ok(Easing::EaseInOutSine));
        assert_eq!("ease-in-out".parse::<Easing>(), Ok(Easing::EaseInOut));
        assert_eq!(
            "cubic-bezier(0.4, 0, 0.2, 1)".parse::<Easing>(),
            Ok(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0))
        );
        assert!("bounce.out".parse::<Easing>().is_err());
        assert!("cubic-bezier(1, 2)".parse::<Easing>().is_err());
    }

    #[test]
    fn test_name_parses_back() {
        for easing in ALL {
            assert_eq!(easing.name().parse::<Easing>(), Ok(easing));
        }
    }
}
