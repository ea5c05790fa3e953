//! Declarative tween requests
//!
//! A [`TweenRequest`] describes what to animate (target element, property
//! deltas), how (duration, easing, delay, repeat/yoyo) and whether it starts
//! paused (scroll-scrubbed tweens are driven by `seek` instead of time).
//!
//! # Example
//!
//! ```rust
//! use folio_animation::{AnimProperty, Easing, TweenRequest};
//! # use folio_core::DisplayTree;
//! # let tree = DisplayTree::new();
//! # let item = tree.body();
//!
//! // Slide in from the left while fading in, 200ms after the previous item
//! let request = TweenRequest::new(item)
//!     .from_to(AnimProperty::X, -50.0, 0.0)
//!     .from_to(AnimProperty::Opacity, 0.0, 1.0)
//!     .duration(1000)
//!     .delay(200)
//!     .ease(Easing::EaseOutQuart);
//! assert_eq!(request.properties.len(), 2);
//! ```

use folio_core::ElementId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::easing::Easing;

/// Property a tween can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimProperty {
    Opacity,
    /// Horizontal translation (px)
    X,
    /// Vertical translation (px)
    Y,
    /// Rotation (deg)
    Rotation,
    Scale,
    /// Width as a percentage of the parent
    WidthPercent,
}

impl AnimProperty {
    /// Resting value of the property
    pub fn identity(&self) -> f32 {
        match self {
            AnimProperty::Opacity | AnimProperty::Scale => 1.0,
            AnimProperty::X | AnimProperty::Y | AnimProperty::Rotation => 0.0,
            AnimProperty::WidthPercent => 0.0,
        }
    }

    /// Whether the property is composed into the `transform` style
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            AnimProperty::X | AnimProperty::Y | AnimProperty::Rotation | AnimProperty::Scale
        )
    }
}

/// One animated property: value at progress 0 and at progress 1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyTween {
    pub property: AnimProperty,
    pub from: f32,
    pub to: f32,
}

/// How many times a tween plays after the first run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Infinite,
}

impl Repeat {
    /// Extra iterations, `None` when infinite
    pub fn count(&self) -> Option<u32> {
        match self {
            Repeat::Never => Some(0),
            Repeat::Times(n) => Some(*n),
            Repeat::Infinite => None,
        }
    }
}

/// Declarative description of a tween handed to a [`crate::TweenEngine`]
#[derive(Clone, Debug, PartialEq)]
pub struct TweenRequest {
    pub target: ElementId,
    pub properties: SmallVec<[PropertyTween; 4]>,
    /// `None` uses the engine's default duration
    pub duration_ms: Option<u32>,
    pub delay_ms: u32,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Alternate direction on every repeat
    pub yoyo: bool,
    /// Start paused; progress is driven by `seek`
    pub paused: bool,
}

impl TweenRequest {
    pub fn new(target: ElementId) -> Self {
        Self {
            target,
            properties: SmallVec::new(),
            duration_ms: None,
            delay_ms: 0,
            easing: Easing::EaseOutQuad,
            repeat: Repeat::Never,
            yoyo: false,
            paused: false,
        }
    }

    /// Animate `property` from `from` to `to`
    pub fn from_to(mut self, property: AnimProperty, from: f32, to: f32) -> Self {
        self.properties.retain(|p| p.property != property);
        self.properties.push(PropertyTween { property, from, to });
        self
    }

    /// Animate `property` from `from` to its resting value
    pub fn from(self, property: AnimProperty, from: f32) -> Self {
        let to = property.identity();
        self.from_to(property, from, to)
    }

    pub fn duration(mut self, ms: u32) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Values at progress 0
    pub fn start_values(&self) -> SmallVec<[(AnimProperty, f32); 4]> {
        self.properties.iter().map(|p| (p.property, p.from)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::DisplayTree;

    #[test]
    fn test_from_uses_identity() {
        let tree = DisplayTree::new();
        let req = TweenRequest::new(tree.body())
            .from(AnimProperty::Y, 50.0)
            .from(AnimProperty::Opacity, 0.0);

        assert_eq!(
            req.properties[0],
            PropertyTween {
                property: AnimProperty::Y,
                from: 50.0,
                to: 0.0
            }
        );
        assert_eq!(req.properties[1].to, 1.0);
        assert_eq!(
            req.start_values().to_vec(),
            vec![(AnimProperty::Y, 50.0), (AnimProperty::Opacity, 0.0)]
        );
    }

    #[test]
    fn test_property_replaced_not_duplicated() {
        let tree = DisplayTree::new();
        let req = TweenRequest::new(tree.body())
            .from_to(AnimProperty::X, 0.0, 10.0)
            .from_to(AnimProperty::X, 5.0, 20.0);
        assert_eq!(req.properties.len(), 1);
        assert_eq!(req.properties[0].from, 5.0);
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(Repeat::Never.count(), Some(0));
        assert_eq!(Repeat::Times(2).count(), Some(2));
        assert_eq!(Repeat::Infinite.count(), None);
    }
}
