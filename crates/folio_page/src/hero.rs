//! Hero section: staggered entrance, floating shapes and scroll parallax

use folio_animation::{
    AnimProperty, Easing, Edge, Repeat, TriggerPosition, TriggerRange, TweenEngine, TweenId,
    TweenRequest,
};
use folio_core::{DisplayTree, ElementId};

use crate::config::HeroConfig;
use crate::reveal::stagger_delay;
use crate::scroll::ScrollState;

/// Hide the hero elements, then fade them up one after another
pub fn play_entrance(
    engine: &mut dyn TweenEngine,
    tree: &mut DisplayTree,
    elements: &[ElementId],
    config: &HeroConfig,
) -> Vec<TweenId> {
    for el in elements {
        engine.set(
            tree,
            *el,
            &[(AnimProperty::Y, config.offset_y), (AnimProperty::Opacity, 0.0)],
        );
    }
    elements
        .iter()
        .enumerate()
        .map(|(i, el)| {
            engine.play(
                TweenRequest::new(*el)
                    .from_to(AnimProperty::Y, config.offset_y, 0.0)
                    .from_to(AnimProperty::Opacity, 0.0, 1.0)
                    .duration(config.duration_ms)
                    .delay(stagger_delay(config.delay_ms, i, config.stagger_ms))
                    .ease(config.easing),
            )
        })
        .collect()
}

/// Start the endless bob-and-spin of each shape; later shapes move slower
pub fn float_shapes(engine: &mut dyn TweenEngine, shapes: &[ElementId], config: &HeroConfig) -> Vec<TweenId> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            engine.play(
                TweenRequest::new(*shape)
                    .from_to(AnimProperty::Y, 0.0, config.shape_y)
                    .from_to(AnimProperty::Rotation, 0.0, config.shape_rotation)
                    .duration(stagger_delay(config.shape_base_ms, i, config.shape_step_ms))
                    .repeat(Repeat::Infinite)
                    .yoyo(true)
                    .ease(config.shape_easing),
            )
        })
        .collect()
}

/// A paused tween whose progress follows the scroll position through a section
#[derive(Clone, Copy, Debug)]
pub struct ParallaxScrub {
    tween: TweenId,
    section: ElementId,
    range: TriggerRange,
}

impl ParallaxScrub {
    /// Scrub `layer` to `config.parallax_y` while `section` scrolls out of view
    pub fn new(
        engine: &mut dyn TweenEngine,
        layer: ElementId,
        section: ElementId,
        config: &HeroConfig,
    ) -> Self {
        let tween = engine.play(
            TweenRequest::new(layer)
                .from_to(AnimProperty::Y, 0.0, config.parallax_y)
                .duration(1000)
                .ease(Easing::Linear)
                .paused(),
        );
        Self {
            tween,
            section,
            range: TriggerRange::new(
                TriggerPosition::new(Edge::Top, 0.0),
                TriggerPosition::new(Edge::Bottom, 0.0),
            ),
        }
    }

    pub fn tween(&self) -> TweenId {
        self.tween
    }

    /// Seek to the current scroll position; returns the progress applied
    pub fn update(&self, engine: &mut dyn TweenEngine, tree: &mut DisplayTree, scroll: &ScrollState) -> Option<f32> {
        let bounds = tree.bounds(self.section)?;
        let progress = self
            .range
            .progress(bounds, scroll.viewport_height, scroll.offset);
        engine.seek(tree, self.tween, progress);
        Some(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{AnimationScheduler, RecordingEngine};
    use folio_core::{Element, Rect};

    #[test]
    fn test_entrance_staggers_after_delay() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let els: Vec<_> = ["title-line", "hero-description", "hero-buttons"]
            .iter()
            .map(|c| tree.append(body, Element::new("div").with_class(*c)))
            .collect();
        let mut engine = RecordingEngine::new();

        let ids = play_entrance(&mut engine, &mut tree, &els, &HeroConfig::default());
        assert_eq!(ids.len(), 3);
        assert_eq!(tree.style(els[2], "opacity"), Some("0"));
        assert_eq!(tree.style(els[2], "transform"), Some("translate(0px, 30px)"));

        let delays: Vec<u32> = els.iter().map(|e| engine.played_for(*e)[0].delay_ms).collect();
        assert_eq!(delays, vec![500, 700, 900]);

        while engine.tick(16.0, &mut tree) {}
        assert_eq!(tree.style(els[2], "opacity"), Some("1"));
        assert_eq!(tree.style(els[2], "transform"), Some("translate(0px, 0px)"));
    }

    #[test]
    fn test_huge_stagger_saturates() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let els: Vec<_> = (0..3)
            .map(|_| tree.append(body, Element::new("div").with_class("title-line")))
            .collect();
        let mut engine = RecordingEngine::new();
        let config = HeroConfig {
            stagger_ms: u32::MAX,
            shape_step_ms: u32::MAX,
            ..HeroConfig::default()
        };

        play_entrance(&mut engine, &mut tree, &els, &config);
        assert_eq!(engine.played_for(els[2])[0].delay_ms, u32::MAX);

        float_shapes(&mut engine, &els[..2], &config);
        assert_eq!(engine.played_for(els[1])[1].duration_ms, Some(u32::MAX));
    }

    #[test]
    fn test_shapes_loop_forever() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let shapes: Vec<_> = (0..3)
            .map(|_| tree.append(body, Element::new("div").with_class("shape")))
            .collect();
        let mut engine = RecordingEngine::new();

        let ids = float_shapes(&mut engine, &shapes, &HeroConfig::default());
        let durations: Vec<_> = shapes
            .iter()
            .map(|s| engine.played_for(*s)[0].duration_ms)
            .collect();
        assert_eq!(durations, vec![Some(4000), Some(5000), Some(6000)]);

        for _ in 0..1000 {
            engine.tick(16.0, &mut tree);
        }
        assert!(ids.iter().all(|id| engine.is_playing(*id)));
    }

    #[test]
    fn test_parallax_follows_scroll() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let section = tree.append(
            body,
            Element::new("section")
                .with_class("hero-section")
                .with_bounds(Rect::new(0.0, 0.0, 1280.0, 800.0)),
        );
        let layer = tree.append(section, Element::new("div").with_class("floating-shapes"));
        let mut engine = AnimationScheduler::new();
        let scrub = ParallaxScrub::new(&mut engine, layer, section, &HeroConfig::default());

        let at = |offset| ScrollState {
            offset,
            ..ScrollState::new(3000.0, 800.0)
        };
        assert_eq!(scrub.update(&mut engine, &mut tree, &at(400.0)), Some(0.5));
        assert_eq!(tree.style(layer, "transform"), Some("translate(0px, -50px)"));
        assert_eq!(scrub.update(&mut engine, &mut tree, &at(2000.0)), Some(1.0));
        assert_eq!(tree.style(layer, "transform"), Some("translate(0px, -100px)"));

        // Ticking does not move a scrubbed tween
        engine.tick(16.0, &mut tree);
        assert_eq!(tree.style(layer, "transform"), Some("translate(0px, -100px)"));
    }
}
