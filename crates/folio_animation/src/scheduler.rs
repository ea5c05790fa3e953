//! Animation scheduler
//!
//! Owns every active tween and advances them each frame, writing the
//! interpolated values back into the display tree as inline styles:
//!
//! - `Opacity` → `opacity`
//! - `X` / `Y` / `Rotation` / `Scale` → composed into one `transform`
//! - `WidthPercent` → `width`
//!
//! Transform components are cached per element so two tweens driving
//! different components of the same element do not clobber each other.
//!
//! Tweens are never removed when they finish; they are removed by `kill` or
//! when their target element disappears. This keeps finished tweens
//! reversible, which scroll reveals with a replay policy rely on.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{DisplayTree, ElementId};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::tween::{AnimProperty, PropertyTween, Repeat, TweenRequest};
use crate::values::{format_number, Interpolate};

/// Duration used when a request does not name one
pub const DEFAULT_DURATION_MS: u32 = 500;

new_key_type! {
    /// Handle to a tween owned by an engine
    pub struct TweenId;
}

/// Playback direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayDirection {
    #[default]
    Forward,
    Reverse,
}

/// The tween engine the behavior layer delegates to
///
/// Requests are fire-and-forget: callers keep the returned id only to
/// reverse, restart, seek or kill the tween later.
pub trait TweenEngine {
    /// Apply values immediately, without tweening
    fn set(&mut self, tree: &mut DisplayTree, target: ElementId, values: &[(AnimProperty, f32)]);

    /// Start a tween
    fn play(&mut self, request: TweenRequest) -> TweenId;

    /// Play forward from the current position (no-op if gone)
    fn restart(&mut self, id: TweenId);

    /// Play backward from the current position toward the start values
    fn reverse(&mut self, id: TweenId);

    /// Jump a (typically paused) tween to `progress` and render it
    fn seek(&mut self, tree: &mut DisplayTree, id: TweenId, progress: f32);

    /// Remove a tween, returning whether it existed
    fn kill(&mut self, id: TweenId) -> bool;

    fn is_playing(&self, id: TweenId) -> bool;

    /// Advance every tween by `dt_ms` and render. Returns true while any
    /// tween is still playing.
    fn tick(&mut self, dt_ms: f32, tree: &mut DisplayTree) -> bool;

    /// Duration for requests that do not name one
    fn set_default_duration(&mut self, ms: u32);
}

/// Shared handle, so an owner can keep inspecting an engine it handed out
impl<E: TweenEngine + ?Sized> TweenEngine for Rc<RefCell<E>> {
    fn set(&mut self, tree: &mut DisplayTree, target: ElementId, values: &[(AnimProperty, f32)]) {
        self.borrow_mut().set(tree, target, values);
    }

    fn play(&mut self, request: TweenRequest) -> TweenId {
        self.borrow_mut().play(request)
    }

    fn restart(&mut self, id: TweenId) {
        self.borrow_mut().restart(id);
    }

    fn reverse(&mut self, id: TweenId) {
        self.borrow_mut().reverse(id);
    }

    fn seek(&mut self, tree: &mut DisplayTree, id: TweenId, progress: f32) {
        self.borrow_mut().seek(tree, id, progress);
    }

    fn kill(&mut self, id: TweenId) -> bool {
        self.borrow_mut().kill(id)
    }

    fn is_playing(&self, id: TweenId) -> bool {
        self.borrow().is_playing(id)
    }

    fn tick(&mut self, dt_ms: f32, tree: &mut DisplayTree) -> bool {
        self.borrow_mut().tick(dt_ms, tree)
    }

    fn set_default_duration(&mut self, ms: u32) {
        self.borrow_mut().set_default_duration(ms);
    }
}

/// A running tween
#[derive(Clone, Debug)]
pub struct Tween {
    target: ElementId,
    properties: SmallVec<[PropertyTween; 4]>,
    duration_ms: f32,
    delay_left_ms: f32,
    easing: Easing,
    repeat: Repeat,
    yoyo: bool,
    /// Time into the tween, excluding delay
    time_ms: f32,
    direction: PlayDirection,
    playing: bool,
    /// Whether anything has been rendered yet
    started: bool,
}

impl Tween {
    fn from_request(request: TweenRequest, default_duration_ms: u32) -> Self {
        Self {
            target: request.target,
            properties: request.properties,
            duration_ms: request.duration_ms.unwrap_or(default_duration_ms) as f32,
            delay_left_ms: request.delay_ms as f32,
            easing: request.easing,
            repeat: request.repeat,
            yoyo: request.yoyo,
            time_ms: 0.0,
            direction: PlayDirection::Forward,
            playing: !request.paused,
            started: false,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Total length excluding delay, `None` when repeating forever
    fn total_ms(&self) -> Option<f32> {
        self.repeat
            .count()
            .map(|extra| self.duration_ms * (extra as f32 + 1.0))
    }

    /// Advance by `dt_ms`; returns true if the tween should be rendered
    fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        match self.direction {
            PlayDirection::Forward => {
                let mut dt = dt_ms;
                if self.delay_left_ms > 0.0 {
                    let consumed = dt.min(self.delay_left_ms);
                    self.delay_left_ms -= consumed;
                    dt -= consumed;
                    if self.delay_left_ms > 0.0 {
                        return false;
                    }
                }
                self.time_ms += dt;
                if let Some(total) = self.total_ms() {
                    if self.time_ms >= total {
                        self.time_ms = total;
                        self.playing = false;
                    }
                }
            }
            PlayDirection::Reverse => {
                self.time_ms -= dt_ms;
                if self.time_ms <= 0.0 {
                    self.time_ms = 0.0;
                    self.playing = false;
                }
            }
        }
        self.started = true;
        true
    }

    /// Linear progress within the current iteration (yoyo applied)
    pub fn iteration_progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return match self.direction {
                PlayDirection::Forward if self.started => 1.0,
                _ => 0.0,
            };
        }

        if let (Some(total), Some(extra)) = (self.total_ms(), self.repeat.count()) {
            if self.time_ms >= total {
                return if self.yoyo && extra % 2 == 1 { 0.0 } else { 1.0 };
            }
        }

        let cycles = self.time_ms / self.duration_ms;
        let iteration = cycles.floor();
        let frac = cycles - iteration;
        if self.yoyo && (iteration as u64) % 2 == 1 {
            1.0 - frac
        } else {
            frac
        }
    }

    /// Current property values
    pub fn values(&self) -> SmallVec<[(AnimProperty, f32); 4]> {
        let eased = self.easing.apply(self.iteration_progress());
        self.properties
            .iter()
            .map(|p| (p.property, p.from.lerp(&p.to, eased)))
            .collect()
    }

    fn seek(&mut self, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        self.delay_left_ms = 0.0;
        self.time_ms = match self.total_ms() {
            Some(total) => total * progress,
            None => self.duration_ms * progress,
        };
        self.started = true;
    }
}

/// Cached transform components for one element
#[derive(Clone, Copy, Debug, PartialEq)]
struct TransformParts {
    x: f32,
    y: f32,
    rotation: f32,
    scale: f32,
}

impl Default for TransformParts {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformParts {
    fn css(&self) -> String {
        let mut css = format!(
            "translate({}px, {}px)",
            format_number(self.x),
            format_number(self.y)
        );
        if format_number(self.rotation) != "0" {
            css.push_str(&format!(" rotate({}deg)", format_number(self.rotation)));
        }
        if format_number(self.scale) != "1" {
            css.push_str(&format!(" scale({})", format_number(self.scale)));
        }
        css
    }
}

/// Reference tween engine ticked from the page's frame loop
///
/// ```rust
/// use folio_animation::{AnimProperty, AnimationScheduler, TweenEngine, TweenRequest};
/// use folio_core::{DisplayTree, Element};
///
/// let mut tree = DisplayTree::new();
/// let body = tree.body();
/// let card = tree.append(body, Element::new("div"));
///
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.play(
///     TweenRequest::new(card)
///         .from_to(AnimProperty::Opacity, 0.0, 1.0)
///         .duration(100),
/// );
/// while scheduler.tick(16.0, &mut tree) {}
/// assert_eq!(tree.style(card, "opacity"), Some("1"));
/// ```
pub struct AnimationScheduler {
    tweens: SlotMap<TweenId, Tween>,
    transforms: FxHashMap<ElementId, TransformParts>,
    default_duration_ms: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
            transforms: FxHashMap::default(),
            default_duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn default_duration(&self) -> u32 {
        self.default_duration_ms
    }

    /// Number of tweens held (playing or finished)
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn has_active_tweens(&self) -> bool {
        self.tweens.iter().any(|(_, t)| t.playing)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id)
    }

    fn render(
        transforms: &mut FxHashMap<ElementId, TransformParts>,
        tree: &mut DisplayTree,
        target: ElementId,
        values: &[(AnimProperty, f32)],
    ) {
        let mut transform_dirty = false;
        for (property, value) in values {
            match property {
                AnimProperty::Opacity => {
                    tree.set_style(target, "opacity", format_number(*value));
                }
                AnimProperty::WidthPercent => {
                    tree.set_style(target, "width", format!("{}%", format_number(*value)));
                }
                AnimProperty::X | AnimProperty::Y | AnimProperty::Rotation | AnimProperty::Scale => {
                    let parts = transforms.entry(target).or_default();
                    match property {
                        AnimProperty::X => parts.x = *value,
                        AnimProperty::Y => parts.y = *value,
                        AnimProperty::Rotation => parts.rotation = *value,
                        _ => parts.scale = *value,
                    }
                    transform_dirty = true;
                }
            }
        }
        if transform_dirty {
            if let Some(parts) = transforms.get(&target) {
                tree.set_style(target, "transform", parts.css());
            }
        }
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenEngine for AnimationScheduler {
    fn set(&mut self, tree: &mut DisplayTree, target: ElementId, values: &[(AnimProperty, f32)]) {
        if !tree.contains(target) {
            return;
        }
        Self::render(&mut self.transforms, tree, target, values);
    }

    fn play(&mut self, request: TweenRequest) -> TweenId {
        tracing::trace!(
            "play tween: {} properties, {}ms delay",
            request.properties.len(),
            request.delay_ms
        );
        self.tweens
            .insert(Tween::from_request(request, self.default_duration_ms))
    }

    fn restart(&mut self, id: TweenId) {
        if let Some(tween) = self.tweens.get_mut(id) {
            tween.direction = PlayDirection::Forward;
            if let Some(total) = tween.total_ms() {
                if tween.time_ms >= total {
                    tween.time_ms = 0.0;
                }
            }
            tween.playing = true;
        }
    }

    fn reverse(&mut self, id: TweenId) {
        if let Some(tween) = self.tweens.get_mut(id) {
            tween.direction = PlayDirection::Reverse;
            // A tween still inside its delay has nothing to undo
            tween.delay_left_ms = 0.0;
            tween.playing = tween.time_ms > 0.0;
        }
    }

    fn seek(&mut self, tree: &mut DisplayTree, id: TweenId, progress: f32) {
        let Some(tween) = self.tweens.get_mut(id) else {
            return;
        };
        tween.seek(progress);
        let target = tween.target;
        let values = tween.values();
        Self::render(&mut self.transforms, tree, target, &values);
    }

    fn kill(&mut self, id: TweenId) -> bool {
        self.tweens.remove(id).is_some()
    }

    fn is_playing(&self, id: TweenId) -> bool {
        self.tweens.get(id).is_some_and(|t| t.playing)
    }

    fn tick(&mut self, dt_ms: f32, tree: &mut DisplayTree) -> bool {
        let mut gone: SmallVec<[TweenId; 4]> = SmallVec::new();
        for (id, tween) in self.tweens.iter_mut() {
            if !tree.contains(tween.target) {
                gone.push(id);
                continue;
            }
            if tween.tick(dt_ms) {
                let values = tween.values();
                Self::render(&mut self.transforms, tree, tween.target, &values);
            }
        }
        for id in gone {
            tracing::debug!("dropping tween for removed element");
            if let Some(tween) = self.tweens.remove(id) {
                self.transforms.remove(&tween.target);
            }
        }
        self.has_active_tweens()
    }

    fn set_default_duration(&mut self, ms: u32) {
        tracing::debug!("AnimationScheduler: default duration {}ms", ms);
        self.default_duration_ms = ms;
    }
}
