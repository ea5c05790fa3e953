//! Custom cursor
//!
//! The cursor element trails the pointer: every animation frame it covers a
//! fixed fraction of the remaining distance. The frame loop stops once the
//! cursor has caught up and restarts on the next pointer move.

use folio_animation::format_number;
use folio_core::{DisplayTree, ElementId, Point};

/// Distance under which the cursor snaps onto the pointer
const SETTLE_PX: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct CustomCursor {
    element: ElementId,
    position: Point,
    target: Point,
    easing: f32,
    running: bool,
}

impl CustomCursor {
    pub fn new(element: ElementId, easing: f32) -> Self {
        Self {
            element,
            position: Point::ZERO,
            target: Point::ZERO,
            easing: easing.clamp(f32::EPSILON, 1.0),
            running: false,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record the pointer position; returns true if the frame loop must start
    pub fn point_to(&mut self, x: f32, y: f32) -> bool {
        self.target = Point::new(x, y);
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// One frame of easing; writes `left`/`top` and returns whether to keep going
    pub fn step(&mut self, tree: &mut DisplayTree) -> bool {
        let dx = self.target.x - self.position.x;
        let dy = self.target.y - self.position.y;
        if dx.abs() < SETTLE_PX && dy.abs() < SETTLE_PX {
            self.position = self.target;
            self.running = false;
        } else {
            self.position.x += dx * self.easing;
            self.position.y += dy * self.easing;
        }
        tree.set_style(self.element, "left", format!("{}px", format_number(self.position.x)));
        tree.set_style(self.element, "top", format!("{}px", format_number(self.position.y)));
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Element;

    #[test]
    fn test_eases_toward_pointer() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let el = tree.append(body, Element::new("div").with_class("cursor"));
        let mut cursor = CustomCursor::new(el, 0.1);

        assert!(cursor.point_to(100.0, 50.0));
        assert!(!cursor.point_to(100.0, 50.0));

        assert!(cursor.step(&mut tree));
        assert_eq!(cursor.position(), Point::new(10.0, 5.0));
        assert_eq!(tree.style(el, "left"), Some("10px"));
        assert_eq!(tree.style(el, "top"), Some("5px"));

        assert!(cursor.step(&mut tree));
        assert!((cursor.position().x - 19.0).abs() < 1e-4);

        let mut frames = 2;
        while cursor.step(&mut tree) {
            frames += 1;
        }
        assert!(frames < 200);
        assert!(!cursor.is_running());
        assert_eq!(tree.style(el, "left"), Some("100px"));
        assert_eq!(tree.style(el, "top"), Some("50px"));
    }
}
