//! Folio Animation
//!
//! Tweening for the Folio behavior layer:
//!
//! - **Easing**: CSS and power-family curves, parseable from their names
//! - **Tween requests**: declarative descriptions of what to animate
//! - **Triggers**: scroll positions like `"top 80%"` and the ranges they span
//! - **Scheduler**: the [`TweenEngine`] trait and a frame-ticked reference engine
//!
//! # Example
//!
//! ```rust
//! use folio_animation::{AnimProperty, AnimationScheduler, Easing, TweenEngine, TweenRequest};
//! use folio_core::{DisplayTree, Element};
//!
//! let mut tree = DisplayTree::new();
//! let body = tree.body();
//! let card = tree.append(body, Element::new("div").with_class("project-card"));
//!
//! let mut engine = AnimationScheduler::new();
//! let id = engine.play(
//!     TweenRequest::new(card)
//!         .from(AnimProperty::Y, 50.0)
//!         .from(AnimProperty::Opacity, 0.0)
//!         .duration(1000)
//!         .ease("power3.out".parse::<Easing>().unwrap()),
//! );
//! while engine.tick(16.0, &mut tree) {}
//! assert!(!engine.is_playing(id));
//! assert_eq!(tree.style(card, "opacity"), Some("1"));
//! ```

pub mod easing;
pub mod recording;
pub mod scheduler;
pub mod trigger;
pub mod tween;
pub mod values;

pub use easing::{Easing, ParseEasingError};
pub use recording::{EngineCall, RecordingEngine};
pub use scheduler::{
    AnimationScheduler, PlayDirection, Tween, TweenEngine, TweenId, DEFAULT_DURATION_MS,
};
pub use trigger::{Edge, ParseTriggerError, TriggerPosition, TriggerRange};
pub use tween::{AnimProperty, PropertyTween, Repeat, TweenRequest};
pub use values::{format_number, Interpolate};
