//! Skill bars
//!
//! Each skill item carries its level as a percentage; when the item scrolls
//! into view its bar grows from empty to that width.

use folio_animation::{AnimProperty, Easing, TweenRequest};
use folio_core::{DisplayTree, ElementId};
use tracing::{debug, warn};

/// Parse a skill level, falling back to 0. Levels are clamped to `[0, 100]`.
pub fn parse_level(raw: Option<&str>) -> f32 {
    let Some(text) = raw.map(str::trim) else {
        warn!("skill bar: no level, using 0");
        return 0.0;
    };
    match text.trim_end_matches('%').parse::<f32>() {
        Ok(level) if level.is_finite() => level.clamp(0.0, 100.0),
        _ => {
            warn!("skill bar: malformed level {:?}, using 0", text);
            0.0
        }
    }
}

/// A skill item and the bar it fills
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillBar {
    pub item: ElementId,
    pub bar: ElementId,
    pub level: f32,
}

impl SkillBar {
    /// Bind `item` to its first descendant matching `bar_selector`
    pub fn bind(tree: &DisplayTree, item: ElementId, bar_selector: &str, level_attribute: &str) -> Option<Self> {
        let Some(bar) = tree.select_first_within(item, bar_selector) else {
            debug!("skill bar: item has no {:?}, skipping", bar_selector);
            return None;
        };
        Some(Self {
            item,
            bar,
            level: parse_level(tree.attr(item, level_attribute)),
        })
    }

    pub fn request(&self, duration_ms: u32, easing: Easing) -> TweenRequest {
        TweenRequest::new(self.bar)
            .from_to(AnimProperty::WidthPercent, 0.0, self.level)
            .duration(duration_ms)
            .ease(easing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Element;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("85")), 85.0);
        assert_eq!(parse_level(Some("90%")), 90.0);
        assert_eq!(parse_level(Some("150")), 100.0);
        assert_eq!(parse_level(Some("high")), 0.0);
        assert_eq!(parse_level(None), 0.0);
    }

    #[test]
    fn test_bind_and_request() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let item = tree.append(
            body,
            Element::new("div")
                .with_class("skill-item")
                .with_attr("data-level", "85"),
        );
        let track = tree.append(item, Element::new("div").with_class("skill-bar"));
        let bar = tree.append(track, Element::new("div").with_class("skill-level"));

        let skill = SkillBar::bind(&tree, item, ".skill-level", "data-level").unwrap();
        assert_eq!(skill.bar, bar);
        assert_eq!(skill.level, 85.0);

        let request = skill.request(1500, Easing::EaseOutQuart);
        assert_eq!(request.target, bar);
        assert_eq!(request.duration_ms, Some(1500));
        assert_eq!(request.properties[0].to, 85.0);

        let bare = tree.append(body, Element::new("div").with_class("skill-item"));
        assert!(SkillBar::bind(&tree, bare, ".skill-level", "data-level").is_none());
    }
}
