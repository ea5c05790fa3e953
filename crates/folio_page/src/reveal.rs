//! Reveal Sequencer
//!
//! Scroll-triggered entrance animations. Each registered target gets a
//! viewport subscription at its profile's start position; visibility
//! transitions delivered by the notifier drive a small per-target state
//! machine:
//!
//! ```text
//! PlayOnce:        Idle ──enter──▶ Done
//! PlayAndReverse:  Idle ──enter──▶ Active ◀──enter── Reversed
//!                                    └──────exit──────▶┘
//! ```
//!
//! `PlayOnce` subscriptions are one-shot and are also cancelled by the
//! sequencer before the tween is issued, so the entrance can never fire
//! twice. `PlayAndReverse` targets keep their tween and reverse or restart
//! it on every crossing.
//!
//! A batch registration staggers the tween start of each target by
//! `index * stagger`; the tweens are otherwise independent.

use folio_animation::{AnimProperty, Easing, TriggerPosition, TriggerRange, TweenEngine, TweenId, TweenRequest};
use folio_core::{DisplayTree, ElementId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::viewport::{IntersectionNotifier, ObserverId};

/// Replay behavior of a reveal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// Entrance runs on the first enter only
    PlayOnce,
    /// Entrance on every enter, reversed on every exit
    #[default]
    PlayAndReverse,
}

/// Per-target reveal state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Active,
    Done,
    Reversed,
}

/// What an entrance animates from, and how
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealProfile {
    /// Start offset relative to the resting position (px)
    pub offset_x: f32,
    pub offset_y: f32,
    /// Start opacity
    pub opacity: f32,
    pub duration_ms: u32,
    pub easing: Easing,
    /// Where in the viewport the reveal activates
    pub start: TriggerPosition,
    /// Delay before the tween starts; batches add their stagger on top
    pub delay_ms: u32,
}

impl Default for RevealProfile {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 50.0,
            opacity: 0.0,
            duration_ms: 1000,
            easing: Easing::EaseOutQuart,
            start: TriggerPosition::top_at(0.85),
            delay_ms: 0,
        }
    }
}

impl RevealProfile {
    /// Activate once the element's top passes `fraction` of the viewport
    pub fn with_threshold(mut self, fraction: f32) -> Self {
        self.start = TriggerPosition::top_at(fraction);
        self
    }

    pub fn threshold_fraction(&self) -> f32 {
        self.start.viewport_fraction
    }

    /// Entrance tween for `target`
    pub fn request(&self, target: ElementId) -> TweenRequest {
        let mut request = TweenRequest::new(target)
            .duration(self.duration_ms)
            .delay(self.delay_ms)
            .ease(self.easing);
        if self.offset_x != 0.0 {
            request = request.from(AnimProperty::X, self.offset_x);
        }
        if self.offset_y != 0.0 {
            request = request.from(AnimProperty::Y, self.offset_y);
        }
        request.from(AnimProperty::Opacity, self.opacity)
    }
}

/// A registered element
#[derive(Clone, Debug)]
pub struct RevealTarget {
    pub element: ElementId,
    pub profile: RevealProfile,
    pub policy: RevealPolicy,
    observer: ObserverId,
    phase: RevealPhase,
    tween: Option<TweenId>,
}

impl RevealTarget {
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn tween(&self) -> Option<TweenId> {
        self.tween
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }
}

/// Engine call issued in response to a visibility change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealAction {
    Played(TweenId),
    Restarted(TweenId),
    Reversed(TweenId),
}

/// Registry of scroll-revealed elements
#[derive(Default)]
pub struct RevealSequencer {
    targets: FxHashMap<ElementId, RevealTarget>,
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, element: ElementId) -> Option<&RevealTarget> {
        self.targets.get(&element)
    }

    pub fn phase(&self, element: ElementId) -> Option<RevealPhase> {
        self.targets.get(&element).map(|t| t.phase)
    }

    /// Register one target
    ///
    /// The element is rendered at its start values immediately. A missing
    /// element is skipped and `None` returned. Registering an element again
    /// replaces its previous registration.
    pub fn register(
        &mut self,
        notifier: &mut dyn IntersectionNotifier,
        engine: &mut dyn TweenEngine,
        tree: &mut DisplayTree,
        target: ElementId,
        profile: RevealProfile,
        policy: RevealPolicy,
    ) -> Option<ObserverId> {
        if !tree.contains(target) {
            debug!("reveal: target gone, skipping");
            return None;
        }

        if let Some(previous) = self.targets.remove(&target) {
            notifier.unobserve(previous.observer);
            if let Some(tween) = previous.tween {
                engine.kill(tween);
            }
        }

        let request = profile.request(target);
        engine.set(tree, target, &request.start_values());

        let one_shot = policy == RevealPolicy::PlayOnce;
        let observer =
            notifier.observe_range(target, TriggerRange::starting_at(profile.start), one_shot);
        self.targets.insert(
            target,
            RevealTarget {
                element: target,
                profile,
                policy,
                observer,
                phase: RevealPhase::Idle,
                tween: None,
            },
        );
        Some(observer)
    }

    /// Register a batch, delaying target `i` by `i * stagger_ms`
    ///
    /// Returns how many targets were registered.
    #[allow(clippy::too_many_arguments)]
    pub fn register_batch(
        &mut self,
        notifier: &mut dyn IntersectionNotifier,
        engine: &mut dyn TweenEngine,
        tree: &mut DisplayTree,
        targets: &[ElementId],
        profile: RevealProfile,
        policy: RevealPolicy,
        stagger_ms: u32,
    ) -> usize {
        let mut registered = 0;
        for (index, target) in targets.iter().enumerate() {
            let staggered = RevealProfile {
                delay_ms: stagger_delay(profile.delay_ms, index, stagger_ms),
                ..profile
            };
            if self
                .register(notifier, engine, tree, *target, staggered, policy)
                .is_some()
            {
                registered += 1;
            }
        }
        debug!("reveal: registered {} of {} targets", registered, targets.len());
        registered
    }

    /// React to a visibility transition of `element`
    pub fn handle_visibility(
        &mut self,
        notifier: &mut dyn IntersectionNotifier,
        engine: &mut dyn TweenEngine,
        element: ElementId,
        visible: bool,
    ) -> Option<RevealAction> {
        let target = self.targets.get_mut(&element)?;

        match (target.policy, target.phase, visible) {
            (RevealPolicy::PlayOnce, RevealPhase::Idle, true) => {
                notifier.unobserve(target.observer);
                target.phase = RevealPhase::Done;
                let id = engine.play(target.profile.request(element));
                target.tween = Some(id);
                Some(RevealAction::Played(id))
            }
            (RevealPolicy::PlayAndReverse, RevealPhase::Idle | RevealPhase::Reversed, true) => {
                target.phase = RevealPhase::Active;
                match target.tween {
                    Some(id) => {
                        engine.restart(id);
                        Some(RevealAction::Restarted(id))
                    }
                    None => {
                        let id = engine.play(target.profile.request(element));
                        target.tween = Some(id);
                        Some(RevealAction::Played(id))
                    }
                }
            }
            (RevealPolicy::PlayAndReverse, RevealPhase::Active, false) => {
                target.phase = RevealPhase::Reversed;
                let id = target.tween?;
                engine.reverse(id);
                Some(RevealAction::Reversed(id))
            }
            _ => None,
        }
    }
}

/// `base_ms + index * step_ms`, saturating at `u32::MAX`
pub fn stagger_delay(base_ms: u32, index: usize, step_ms: u32) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    base_ms.saturating_add(index.saturating_mul(step_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollState;
    use crate::viewport::ViewportObserver;
    use folio_animation::{EngineCall, RecordingEngine};
    use folio_core::{Element, Rect};

    struct Harness {
        tree: DisplayTree,
        observer: ViewportObserver,
        engine: RecordingEngine,
        reveals: RevealSequencer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                tree: DisplayTree::new(),
                observer: ViewportObserver::new(),
                engine: RecordingEngine::new(),
                reveals: RevealSequencer::new(),
            }
        }

        fn item(&mut self, y: f32) -> ElementId {
            let body = self.tree.body();
            self.tree.append(
                body,
                Element::new("div")
                    .with_class("timeline-item")
                    .with_bounds(Rect::new(0.0, y, 600.0, 200.0)),
            )
        }

        fn register(&mut self, el: ElementId, policy: RevealPolicy) -> Option<ObserverId> {
            self.reveals.register(
                &mut self.observer,
                &mut self.engine,
                &mut self.tree,
                el,
                RevealProfile::default().with_threshold(0.8),
                policy,
            )
        }

        fn scroll(&mut self, offset: f32) {
            let state = ScrollState {
                offset,
                ..ScrollState::new(5000.0, 800.0)
            };
            for change in self.observer.update(&self.tree, &state) {
                self.reveals.handle_visibility(
                    &mut self.observer,
                    &mut self.engine,
                    change.element,
                    change.visible,
                );
            }
        }
    }

    fn reverse_calls(engine: &RecordingEngine) -> usize {
        engine
            .calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::Reverse(_)))
            .count()
    }

    #[test]
    fn test_register_renders_start_values() {
        let mut h = Harness::new();
        let el = h.item(1000.0);
        h.register(el, RevealPolicy::PlayAndReverse);

        assert_eq!(h.tree.style(el, "opacity"), Some("0"));
        assert_eq!(h.tree.style(el, "transform"), Some("translate(0px, 50px)"));
        assert_eq!(h.reveals.phase(el), Some(RevealPhase::Idle));
        assert_eq!(h.reveals.len(), 1);
    }

    #[test]
    fn test_play_once_fires_at_most_once() {
        let mut h = Harness::new();
        let el = h.item(1000.0);
        let observer = h.register(el, RevealPolicy::PlayOnce).unwrap();

        // Jitter around the threshold, then leave and come back repeatedly
        for offset in [0.0, 361.0, 359.0, 361.0, 1500.0, 400.0, 0.0, 400.0] {
            h.scroll(offset);
        }

        assert_eq!(h.engine.play_count(), 1);
        assert_eq!(reverse_calls(&h.engine), 0);
        assert_eq!(h.reveals.phase(el), Some(RevealPhase::Done));
        assert!(!h.observer.is_observing(observer));
    }

    #[test]
    fn test_play_and_reverse_oscillates() {
        let mut h = Harness::new();
        let el = h.item(1000.0);
        h.register(el, RevealPolicy::PlayAndReverse);

        let oscillations = 5;
        for i in 0..oscillations {
            h.scroll(400.0);
            assert_eq!(h.reveals.phase(el), Some(RevealPhase::Active));
            // Alternate between leaving downward and upward
            h.scroll(if i % 2 == 0 { 0.0 } else { 1500.0 });
            assert_eq!(h.reveals.phase(el), Some(RevealPhase::Reversed));
        }

        let enters = h
            .engine
            .calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::Play { .. } | EngineCall::Restart(_)))
            .count();
        assert_eq!(h.engine.play_count(), 1);
        assert_eq!(enters, oscillations);
        assert_eq!(reverse_calls(&h.engine), oscillations);
    }

    #[test]
    fn test_policies_coexist() {
        let mut h = Harness::new();
        let once = h.item(1000.0);
        let replay = h.item(1000.0);
        h.register(once, RevealPolicy::PlayOnce);
        h.register(replay, RevealPolicy::PlayAndReverse);

        for _ in 0..3 {
            h.scroll(400.0);
            h.scroll(0.0);
        }

        assert_eq!(h.engine.played_for(once).len(), 1);
        assert_eq!(h.reveals.phase(once), Some(RevealPhase::Done));
        assert_eq!(h.reveals.phase(replay), Some(RevealPhase::Reversed));
        assert_eq!(reverse_calls(&h.engine), 3);
    }

    #[test]
    fn test_batch_staggers_delays() {
        let mut h = Harness::new();
        let items: Vec<_> = (0..3).map(|i| h.item(1000.0 + i as f32 * 10.0)).collect();
        let registered = h.reveals.register_batch(
            &mut h.observer,
            &mut h.engine,
            &mut h.tree,
            &items,
            RevealProfile {
                offset_x: -50.0,
                offset_y: 0.0,
                ..RevealProfile::default()
            }
            .with_threshold(0.8),
            RevealPolicy::PlayAndReverse,
            200,
        );
        assert_eq!(registered, 3);

        h.scroll(600.0);
        let delays: Vec<u32> = items
            .iter()
            .map(|el| h.engine.played_for(*el)[0].delay_ms)
            .collect();
        assert_eq!(delays, vec![0, 200, 400]);
        assert_eq!(
            h.engine.played_for(items[0])[0].properties[0].property,
            AnimProperty::X
        );
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let mut h = Harness::new();
        let el = h.item(1000.0);
        let live = h.item(1200.0);
        h.tree.remove(el);

        assert!(h.register(el, RevealPolicy::PlayOnce).is_none());
        let registered = h.reveals.register_batch(
            &mut h.observer,
            &mut h.engine,
            &mut h.tree,
            &[el, live],
            RevealProfile::default(),
            RevealPolicy::PlayOnce,
            100,
        );
        assert_eq!(registered, 1);
        assert!(h.reveals.phase(el).is_none());
        assert_eq!(h.reveals.len(), 1);
    }

    #[test]
    fn test_stagger_delay_saturates() {
        assert_eq!(stagger_delay(200, 0, 100), 200);
        assert_eq!(stagger_delay(200, 3, 100), 500);
        assert_eq!(stagger_delay(0, 2, u32::MAX), u32::MAX);
        assert_eq!(stagger_delay(u32::MAX, 1, 1), u32::MAX);
        assert_eq!(stagger_delay(10, usize::MAX, 1), u32::MAX);

        let mut h = Harness::new();
        let items = [h.item(1000.0), h.item(1200.0), h.item(1400.0)];
        let registered = h.reveals.register_batch(
            &mut h.observer,
            &mut h.engine,
            &mut h.tree,
            &items,
            RevealProfile::default(),
            RevealPolicy::PlayOnce,
            u32::MAX / 2,
        );
        assert_eq!(registered, 3);
    }

    #[test]
    fn test_exit_before_enter_is_ignored() {
        let mut h = Harness::new();
        let el = h.item(1000.0);
        h.register(el, RevealPolicy::PlayAndReverse);
        let action = h.reveals.handle_visibility(&mut h.observer, &mut h.engine, el, false);
        assert_eq!(action, None);
        assert_eq!(h.reveals.phase(el), Some(RevealPhase::Idle));
    }
}
