//! Project card tilt
//!
//! Pointer moves over a card rotate it toward the pointer around its centre
//! and lift it slightly; leaving the card flattens it again.

use folio_animation::format_number;
use folio_core::Rect;

use crate::config::TiltConfig;

/// Transform for a pointer at `(x, y)` over `rect`, both in viewport coordinates
pub fn tilt_transform(rect: Rect, x: f32, y: f32, config: &TiltConfig) -> String {
    let local_x = x - rect.x();
    let local_y = y - rect.y();
    let center_x = rect.width() / 2.0;
    let center_y = rect.height() / 2.0;

    let rotate_y = (local_x - center_x) / config.divisor;
    let rotate_x = (center_y - local_y) / config.divisor;

    format!(
        "perspective({}px) rotateX({}deg) rotateY({}deg) translateY({}px)",
        format_number(config.perspective_px),
        format_number(rotate_x),
        format_number(rotate_y),
        format_number(-config.lift_px)
    )
}

/// Transform of a card at rest
pub fn rest_transform(config: &TiltConfig) -> String {
    format!(
        "perspective({}px) rotateX(0) rotateY(0) translateY(0)",
        format_number(config.perspective_px)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_toward_pointer() {
        let config = TiltConfig::default();
        let card = Rect::new(100.0, 200.0, 300.0, 200.0);

        // Top-right corner: tilts back and to the right
        assert_eq!(
            tilt_transform(card, 400.0, 200.0, &config),
            "perspective(1000px) rotateX(4deg) rotateY(6deg) translateY(-5px)"
        );
        assert_eq!(
            tilt_transform(card, 250.0, 300.0, &config),
            "perspective(1000px) rotateX(0deg) rotateY(0deg) translateY(-5px)"
        );
    }

    #[test]
    fn test_rest_transform() {
        assert_eq!(
            rest_transform(&TiltConfig::default()),
            "perspective(1000px) rotateX(0) rotateY(0) translateY(0)"
        );
    }
}
