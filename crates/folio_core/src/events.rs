//! Page events and listener dispatch
//!
//! Listeners are registered per `(event type, target)` pair. Dispatch walks
//! the target's ancestor path (bubbling) and then window-level listeners, and
//! within one element listeners fire in subscription order. Pointer
//! enter/leave and focus/blur do not bubble: they reach only their target.
//!
//! The dispatcher is generic over the context `C` the listeners mutate. A
//! listener is taken out of the registry while it runs, so it can freely
//! borrow the context (including the dispatcher itself) to add or remove
//! listeners. One-shot listeners are unregistered *before* they are invoked,
//! so re-entrant dispatch can never fire them twice.

use slotmap::{new_key_type, SlotMap};

use crate::tree::ElementId;

/// Event type identifier
pub type EventType = u32;

/// Well-known event types
pub mod event_types {
    use super::EventType;

    /// Document parsed, elements available
    pub const DOM_READY: EventType = 1;
    /// All resources loaded
    pub const LOAD: EventType = 2;
    pub const SCROLL: EventType = 10;
    pub const RESIZE: EventType = 11;
    pub const CLICK: EventType = 20;
    pub const POINTER_ENTER: EventType = 21;
    pub const POINTER_LEAVE: EventType = 22;
    pub const POINTER_MOVE: EventType = 23;
    pub const FOCUS: EventType = 30;
    pub const BLUR: EventType = 31;
    pub const INPUT: EventType = 32;
    pub const SUBMIT: EventType = 33;

    /// Whether events of this type propagate past their target
    pub fn bubbles(event_type: EventType) -> bool {
        !matches!(event_type, POINTER_ENTER | POINTER_LEAVE | FOCUS | BLUR)
    }
}

/// Payload carried by an event
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventData {
    #[default]
    None,
    /// Pointer position in viewport coordinates
    Pointer { x: f32, y: f32 },
    /// New vertical scroll offset
    Scroll { offset: f32 },
    Resize { width: f32, height: f32 },
    /// New value of a form control
    Input { value: String },
}

/// A dispatched event
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event originated at; `None` for window-level events
    pub target: Option<ElementId>,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, target: Option<ElementId>, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
        }
    }

    /// Window-level event without payload
    pub fn window(event_type: EventType) -> Self {
        Self::new(event_type, None, EventData::None)
    }

    /// Element event without payload
    pub fn on(event_type: EventType, target: ElementId) -> Self {
        Self::new(event_type, Some(target), EventData::None)
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Listener callback type
pub type Listener<C> = Box<dyn FnMut(&mut C, &Event)>;

struct ListenerEntry<C> {
    event_type: EventType,
    target: Option<ElementId>,
    once: bool,
    seq: u64,
    /// `None` while the callback is running
    callback: Option<Listener<C>>,
}

/// Registry of event listeners
pub struct EventDispatcher<C> {
    listeners: SlotMap<ListenerId, ListenerEntry<C>>,
    next_seq: u64,
}

impl<C> EventDispatcher<C> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    fn insert(
        &mut self,
        event_type: EventType,
        target: Option<ElementId>,
        once: bool,
        callback: Listener<C>,
    ) -> ListenerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.listeners.insert(ListenerEntry {
            event_type,
            target,
            once,
            seq,
            callback: Some(callback),
        })
    }

    /// Register a listener; `target = None` listens at window level
    pub fn add<F>(&mut self, event_type: EventType, target: Option<ElementId>, f: F) -> ListenerId
    where
        F: FnMut(&mut C, &Event) + 'static,
    {
        self.insert(event_type, target, false, Box::new(f))
    }

    /// Register a one-shot listener
    pub fn once<F>(&mut self, event_type: EventType, target: Option<ElementId>, f: F) -> ListenerId
    where
        F: FnMut(&mut C, &Event) + 'static,
    {
        self.insert(event_type, target, true, Box::new(f))
    }

    /// Unregister a listener, returning whether it existed
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners an event reaches, in firing order
    ///
    /// `path` is the target followed by its ancestors.
    pub fn matching(&self, event_type: EventType, path: &[ElementId]) -> Vec<ListenerId> {
        let mut out = Vec::new();
        for element in path {
            out.extend(self.sorted(event_type, Some(*element)));
        }
        out.extend(self.sorted(event_type, None));
        out
    }

    fn sorted(&self, event_type: EventType, target: Option<ElementId>) -> Vec<ListenerId> {
        let mut hits: Vec<(u64, ListenerId)> = self
            .listeners
            .iter()
            .filter(|(_, l)| l.event_type == event_type && l.target == target)
            .map(|(id, l)| (l.seq, id))
            .collect();
        hits.sort_unstable_by_key(|(seq, _)| *seq);
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// Take a callback out for invocation
    ///
    /// One-shot listeners are removed from the registry here.
    pub fn take(&mut self, id: ListenerId) -> Option<Listener<C>> {
        let once = self.listeners.get(id)?.once;
        if once {
            self.listeners.remove(id).and_then(|l| l.callback)
        } else {
            self.listeners.get_mut(id)?.callback.take()
        }
    }

    /// Put a callback back after invocation (dropped if it was removed meanwhile)
    pub fn restore(&mut self, id: ListenerId, callback: Listener<C>) {
        if let Some(entry) = self.listeners.get_mut(id) {
            entry.callback = Some(callback);
        }
    }
}

impl<C> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch `event` to every matching listener registered in `ctx`
///
/// `access` projects the dispatcher out of the context. Returns the number of
/// listeners invoked.
pub fn dispatch<C>(
    ctx: &mut C,
    event: &Event,
    path: &[ElementId],
    access: impl Fn(&mut C) -> &mut EventDispatcher<C>,
) -> usize {
    let dispatcher = access(ctx);
    let ids = if event.target.is_some() && !event_types::bubbles(event.event_type) {
        path.first()
            .map(|target| dispatcher.sorted(event.event_type, Some(*target)))
            .unwrap_or_default()
    } else {
        dispatcher.matching(event.event_type, path)
    };
    let mut invoked = 0;
    for id in ids {
        let Some(mut callback) = access(ctx).take(id) else {
            continue;
        };
        callback(ctx, event);
        invoked += 1;
        access(ctx).restore(id, callback);
    }
    invoked
}

#[cfg(test)]
mod tests {
    use super::event_types::*;
    use super::*;
    use crate::tree::{DisplayTree, Element};

    #[derive(Default)]
    struct Ctx {
        events: EventDispatcher<Ctx>,
        log: Vec<&'static str>,
    }

    fn fire(ctx: &mut Ctx, event: &Event, path: &[ElementId]) -> usize {
        dispatch(ctx, event, path, |c| &mut c.events)
    }

    #[test]
    fn test_subscription_order_and_bubbling() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let link = tree.append(body, Element::new("a"));

        let mut ctx = Ctx::default();
        ctx.events.add(CLICK, None, |c, _| c.log.push("window"));
        ctx.events.add(CLICK, Some(body), |c, _| c.log.push("body"));
        ctx.events.add(CLICK, Some(link), |c, _| c.log.push("link-1"));
        ctx.events.add(CLICK, Some(link), |c, _| c.log.push("link-2"));

        let n = fire(&mut ctx, &Event::on(CLICK, link), &[link, body]);
        assert_eq!(n, 4);
        assert_eq!(ctx.log, vec!["link-1", "link-2", "body", "window"]);
    }

    #[test]
    fn test_enter_and_leave_stay_on_target() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let link = tree.append(body, Element::new("a"));
        let label = tree.append(link, Element::new("span"));

        let mut ctx = Ctx::default();
        ctx.events.add(POINTER_LEAVE, None, |c, _| c.log.push("window"));
        ctx.events.add(POINTER_LEAVE, Some(link), |c, _| c.log.push("link"));
        ctx.events.add(POINTER_LEAVE, Some(label), |c, _| c.log.push("label"));
        ctx.events.add(FOCUS, Some(body), |c, _| c.log.push("body focus"));

        assert_eq!(fire(&mut ctx, &Event::on(POINTER_LEAVE, label), &[label, link, body]), 1);
        assert_eq!(ctx.log, vec!["label"]);

        assert_eq!(fire(&mut ctx, &Event::on(FOCUS, link), &[link, body]), 0);
        // Target already removed from the tree
        assert_eq!(fire(&mut ctx, &Event::on(POINTER_LEAVE, label), &[]), 0);
        assert!(bubbles(CLICK));
        assert!(!bubbles(POINTER_ENTER));
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let mut ctx = Ctx::default();
        ctx.events.once(SCROLL, None, |c, _| c.log.push("once"));

        for _ in 0..5 {
            fire(&mut ctx, &Event::window(SCROLL), &[]);
        }
        assert_eq!(ctx.log, vec!["once"]);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_once_is_unregistered_before_reentrant_dispatch() {
        let mut ctx = Ctx::default();
        ctx.events.once(SCROLL, None, |c, e| {
            c.log.push("once");
            // Re-entrant dispatch from inside the callback must not re-fire it
            let e = e.clone();
            fire(c, &e, &[]);
        });

        fire(&mut ctx, &Event::window(SCROLL), &[]);
        assert_eq!(ctx.log, vec!["once"]);
    }

    #[test]
    fn test_listener_can_remove_itself() {
        let mut ctx = Ctx::default();
        let id = std::rc::Rc::new(std::cell::Cell::new(None));
        let id_inner = id.clone();
        let registered = ctx.events.add(RESIZE, None, move |c, _| {
            c.log.push("resize");
            if let Some(me) = id_inner.get() {
                c.events.remove(me);
            }
        });
        id.set(Some(registered));

        fire(&mut ctx, &Event::window(RESIZE), &[]);
        fire(&mut ctx, &Event::window(RESIZE), &[]);
        assert_eq!(ctx.log, vec!["resize"]);
    }

    #[test]
    fn test_other_event_types_ignored() {
        let mut ctx = Ctx::default();
        ctx.events.add(FOCUS, None, |c, _| c.log.push("focus"));
        assert_eq!(fire(&mut ctx, &Event::window(BLUR), &[]), 0);
        assert!(ctx.log.is_empty());
    }
}
