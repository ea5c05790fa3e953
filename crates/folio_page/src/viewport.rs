//! Viewport-intersection notifications
//!
//! An observer entry watches one element against a [`TriggerRange`]. On each
//! [`IntersectionNotifier::update`] the notifier recomputes every entry from
//! the current scroll state and reports the ones whose visibility flipped.
//!
//! One-shot entries report their first entry into view and are removed
//! before the change is returned, so a caller can never see them twice no
//! matter how the scroll offset jitters around the threshold.

use folio_animation::{TriggerPosition, TriggerRange};
use folio_core::{DisplayTree, ElementId};
use slotmap::{new_key_type, SlotMap};

use crate::scroll::ScrollState;

new_key_type! {
    /// Handle to an observer entry
    pub struct ObserverId;
}

/// A visibility transition reported by [`IntersectionNotifier::update`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityChange {
    pub observer: ObserverId,
    pub element: ElementId,
    pub visible: bool,
}

/// Source of `(element, is_visible)` notifications
pub trait IntersectionNotifier {
    /// Watch `element` over an explicit scroll range
    fn observe_range(&mut self, element: ElementId, range: TriggerRange, one_shot: bool) -> ObserverId;

    /// Watch `element`, visible once its top passes `threshold` of the viewport
    fn observe(&mut self, element: ElementId, threshold: f32, one_shot: bool) -> ObserverId {
        self.observe_range(
            element,
            TriggerRange::starting_at(TriggerPosition::top_at(threshold)),
            one_shot,
        )
    }

    /// Stop watching; returns whether the entry existed
    fn unobserve(&mut self, id: ObserverId) -> bool;

    fn is_observing(&self, id: ObserverId) -> bool;

    /// Recompute visibility and report transitions in registration order
    fn update(&mut self, tree: &DisplayTree, scroll: &ScrollState) -> Vec<VisibilityChange>;
}

#[derive(Clone, Debug)]
struct Entry {
    element: ElementId,
    range: TriggerRange,
    one_shot: bool,
    visible: bool,
}

/// Reference notifier computing visibility from element bounds
#[derive(Default)]
pub struct ViewportObserver {
    entries: SlotMap<ObserverId, Entry>,
    /// Registration order
    order: Vec<ObserverId>,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last reported visibility of an entry
    pub fn is_visible(&self, id: ObserverId) -> Option<bool> {
        self.entries.get(id).map(|e| e.visible)
    }
}

impl IntersectionNotifier for ViewportObserver {
    fn observe_range(&mut self, element: ElementId, range: TriggerRange, one_shot: bool) -> ObserverId {
        let id = self.entries.insert(Entry {
            element,
            range,
            one_shot,
            visible: false,
        });
        self.order.push(id);
        id
    }

    fn unobserve(&mut self, id: ObserverId) -> bool {
        let existed = self.entries.remove(id).is_some();
        if existed {
            self.order.retain(|o| *o != id);
        }
        existed
    }

    fn is_observing(&self, id: ObserverId) -> bool {
        self.entries.contains_key(id)
    }

    fn update(&mut self, tree: &DisplayTree, scroll: &ScrollState) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();
        let mut finished = Vec::new();

        for id in &self.order {
            let Some(entry) = self.entries.get_mut(*id) else {
                continue;
            };
            let Some(bounds) = tree.bounds(entry.element) else {
                tracing::debug!("observed element removed, dropping observer");
                finished.push(*id);
                continue;
            };

            let visible = entry
                .range
                .is_active(bounds, scroll.viewport_height, scroll.offset);
            if visible == entry.visible {
                continue;
            }
            entry.visible = visible;

            if entry.one_shot {
                if !visible {
                    continue;
                }
                finished.push(*id);
            }
            changes.push(VisibilityChange {
                observer: *id,
                element: entry.element,
                visible,
            });
        }

        for id in finished {
            self.unobserve(id);
        }
        changes
    }
}
