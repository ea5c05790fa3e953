//! Animatable value types
//!
//! Interpolation plus the formatting used when animated values are written
//! back into inline styles.

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// Format a style number: at most three decimals, no trailing zeros
///
/// `-0` is normalised to `0` so settled values compare cleanly.
pub fn format_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
        assert_eq!((-50.0_f32).lerp(&0.0, 1.0), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-50.0), "-50");
        assert_eq!(format_number(33.33333), "33.333");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(360.0), "360");
    }
}
