//! Scroll trigger positions
//!
//! A trigger position pairs an edge of the trigger element with a line in the
//! viewport, written the way page authors write them: `"top 80%"` means
//! "when the element's top edge reaches 80% down the viewport". The pair
//! resolves to the scroll offset at which that happens.
//!
//! A [`TriggerRange`] is active between its `start` and `end` offsets and
//! reports linear progress across them for scrubbed tweens.

use std::fmt;
use std::str::FromStr;

use folio_core::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned for a malformed trigger position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid trigger position: {0:?}")]
pub struct ParseTriggerError(pub String);

/// Edge of the trigger element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn fraction(&self) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => 0.5,
            Edge::Bottom => 1.0,
        }
    }

    fn parse(word: &str) -> Option<Self> {
        match word {
            "top" => Some(Edge::Top),
            "center" => Some(Edge::Center),
            "bottom" => Some(Edge::Bottom),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        }
    }
}

/// `"<element edge> <viewport line>"`, e.g. `"top 80%"` or `"bottom top"`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPosition {
    pub element_edge: Edge,
    /// Viewport line as a fraction of viewport height (0 = top, 1 = bottom)
    pub viewport_fraction: f32,
}

impl TriggerPosition {
    pub const fn new(element_edge: Edge, viewport_fraction: f32) -> Self {
        Self {
            element_edge,
            viewport_fraction,
        }
    }

    /// Element top meets the viewport line at `fraction`
    pub const fn top_at(fraction: f32) -> Self {
        Self::new(Edge::Top, fraction)
    }

    /// Scroll offset at which the element edge sits on the viewport line
    pub fn scroll_offset(&self, element: Rect, viewport_height: f32) -> f32 {
        let edge_y = element.y() + element.height() * self.element_edge.fraction();
        edge_y - viewport_height * self.viewport_fraction
    }
}

impl FromStr for TriggerPosition {
    type Err = ParseTriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTriggerError(s.to_string());
        let mut words = s.split_whitespace();
        let edge = words.next().and_then(Edge::parse).ok_or_else(err)?;
        let line = words.next().ok_or_else(err)?;
        if words.next().is_some() {
            return Err(err());
        }

        let fraction = match Edge::parse(line) {
            Some(edge) => edge.fraction(),
            None => {
                let pct = line.strip_suffix('%').ok_or_else(err)?;
                pct.parse::<f32>().map_err(|_| err())? / 100.0
            }
        };
        Ok(Self::new(edge, fraction))
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = ParseTriggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPosition> for String {
    fn from(pos: TriggerPosition) -> Self {
        pos.to_string()
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}%",
            self.element_edge.name(),
            crate::values::format_number(self.viewport_fraction * 100.0)
        )
    }
}

/// Scroll range between two trigger positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerRange {
    pub start: TriggerPosition,
    pub end: TriggerPosition,
}

impl TriggerRange {
    /// Default end: element bottom passes the viewport top
    pub const DEFAULT_END: TriggerPosition = TriggerPosition::new(Edge::Bottom, 0.0);

    pub fn new(start: TriggerPosition, end: TriggerPosition) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: TriggerPosition) -> Self {
        Self::new(start, Self::DEFAULT_END)
    }

    /// Whether `scroll` lies inside `[start, end)`
    pub fn is_active(&self, element: Rect, viewport_height: f32, scroll: f32) -> bool {
        let start = self.start.scroll_offset(element, viewport_height);
        let end = self.end.scroll_offset(element, viewport_height);
        scroll >= start && scroll < end
    }

    /// Linear progress through the range, clamped to `[0, 1]`
    pub fn progress(&self, element: Rect, viewport_height: f32, scroll: f32) -> f32 {
        let start = self.start.scroll_offset(element, viewport_height);
        let end = self.end.scroll_offset(element, viewport_height);
        if end <= start {
            return if scroll >= start { 1.0 } else { 0.0 };
        }
        ((scroll - start) / (end - start)).clamp(0.0, 1.0)
    }
}
