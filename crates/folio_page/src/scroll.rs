//! Scroll state and the widgets derived from it
//!
//! [`ScrollState`] has a single writer (the page's scroll handler) and is
//! recomputed from scratch on every scroll notification. The progress bar
//! and the back-to-top control derive their styles from it and hold no
//! state of their own.

use folio_animation::{format_number, Easing};
use folio_core::{DisplayTree, ElementId};

/// Viewport position within the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub offset: f32,
    pub document_height: f32,
    pub viewport_height: f32,
    pub viewport_width: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            document_height: 0.0,
            viewport_height: 800.0,
            viewport_width: 1280.0,
        }
    }
}

impl ScrollState {
    pub fn new(document_height: f32, viewport_height: f32) -> Self {
        Self {
            document_height,
            viewport_height,
            ..Default::default()
        }
    }

    /// Largest reachable offset
    pub fn max_offset(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Clamp a requested offset to the scrollable range
    pub fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    /// Fraction of the document scrolled, in `[0, 1]`
    ///
    /// A document that does not scroll reports 0.
    pub fn progress(&self) -> f32 {
        let scrollable = self.document_height - self.viewport_height;
        if scrollable <= 0.0 {
            return 0.0;
        }
        (self.offset / scrollable).clamp(0.0, 1.0)
    }

    /// Whether the offset is strictly past `threshold_px`
    pub fn past_threshold(&self, threshold_px: f32) -> bool {
        self.offset > threshold_px
    }
}

/// Progress bar whose width follows [`ScrollState::progress`]
#[derive(Clone, Copy, Debug)]
pub struct ScrollProgress {
    bar: ElementId,
}

impl ScrollProgress {
    pub fn new(bar: ElementId) -> Self {
        Self { bar }
    }

    pub fn bar(&self) -> ElementId {
        self.bar
    }

    pub fn apply(&self, tree: &mut DisplayTree, state: &ScrollState) {
        let width = format!("{}%", format_number(state.progress() * 100.0));
        tree.set_style(self.bar, "width", width);
    }
}

/// "Back to top" control shown once the page is scrolled past a threshold
#[derive(Clone, Copy, Debug)]
pub struct BackToTop {
    element: ElementId,
    threshold_px: f32,
}

impl BackToTop {
    pub fn new(element: ElementId, threshold_px: f32) -> Self {
        Self {
            element,
            threshold_px,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Write the visible or hidden styles; returns whether it is visible
    pub fn apply(&self, tree: &mut DisplayTree, state: &ScrollState) -> bool {
        let visible = state.past_threshold(self.threshold_px);
        let (opacity, visibility, transform) = if visible {
            ("1", "visible", "translateY(0)")
        } else {
            ("0", "hidden", "translateY(10px)")
        };
        tree.set_style(self.element, "opacity", opacity);
        tree.set_style(self.element, "visibility", visibility);
        tree.set_style(self.element, "transform", transform);
        visible
    }
}

/// An in-flight smooth scroll
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothScroll {
    from: f32,
    to: f32,
    elapsed_ms: f32,
    duration_ms: f32,
}

impl SmoothScroll {
    pub fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            elapsed_ms: 0.0,
            duration_ms: duration_ms as f32,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Advance by `dt_ms`, returning the new offset and whether it arrived
    pub fn step(&mut self, dt_ms: f32) -> (f32, bool) {
        self.elapsed_ms += dt_ms;
        if self.duration_ms <= 0.0 || self.elapsed_ms >= self.duration_ms {
            return (self.to, true);
        }
        let t = Easing::EaseInOutCubic.apply(self.elapsed_ms / self.duration_ms);
        (self.from + (self.to - self.from) * t, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Element;

    fn at(offset: f32) -> ScrollState {
        ScrollState {
            offset,
            ..ScrollState::new(2000.0, 800.0)
        }
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(at(600.0).progress(), 0.5);
        assert_eq!(at(0.0).progress(), 0.0);
        assert_eq!(at(1200.0).progress(), 1.0);
        assert_eq!(at(5000.0).progress(), 1.0);
        assert_eq!(at(-40.0).progress(), 0.0);
    }

    #[test]
    fn test_progress_without_scrollable_range() {
        let state = ScrollState {
            offset: 100.0,
            ..ScrollState::new(600.0, 800.0)
        };
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.max_offset(), 0.0);
        assert_eq!(state.clamp_offset(300.0), 0.0);
    }

    #[test]
    fn test_progress_bar_width() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let bar = tree.append(body, Element::new("div").with_class("scroll-progress"));
        let progress = ScrollProgress::new(bar);

        progress.apply(&mut tree, &at(600.0));
        assert_eq!(tree.style(bar, "width"), Some("50%"));
        progress.apply(&mut tree, &at(300.0));
        assert_eq!(tree.style(bar, "width"), Some("25%"));
    }

    #[test]
    fn test_back_to_top_threshold_is_exclusive() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let button = tree.append(body, Element::new("button").with_class("back-to-top"));
        let control = BackToTop::new(button, 500.0);

        assert!(!control.apply(&mut tree, &at(499.0)));
        assert_eq!(tree.style(button, "visibility"), Some("hidden"));
        assert!(!control.apply(&mut tree, &at(500.0)));
        assert_eq!(tree.style(button, "opacity"), Some("0"));
        assert_eq!(tree.style(button, "transform"), Some("translateY(10px)"));

        assert!(control.apply(&mut tree, &at(501.0)));
        assert_eq!(tree.style(button, "opacity"), Some("1"));
        assert_eq!(tree.style(button, "visibility"), Some("visible"));
        assert_eq!(tree.style(button, "transform"), Some("translateY(0)"));
    }

    #[test]
    fn test_smooth_scroll_arrives() {
        let mut scroll = SmoothScroll::new(1000.0, 0.0, 100);
        let (mid, done) = scroll.step(50.0);
        assert!(!done);
        assert!((mid - 500.0).abs() < 1.0);
        assert_eq!(scroll.step(60.0), (0.0, true));
        assert_eq!(SmoothScroll::new(0.0, 300.0, 0).step(16.0), (300.0, true));
    }
}
