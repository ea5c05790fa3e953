//! Page context
//!
//! [`Page`] is the single context object every behavior runs against. It
//! owns the display tree, the scroll state, the host capabilities (tween
//! engine, intersection notifier, store, clipboard, navigator) and the
//! cooperative runtime: one task queue for timers and frame callbacks, one
//! event dispatcher.
//!
//! Time only moves through [`Page::advance`]. Each frame boundary first runs
//! the callbacks due at that instant, then ticks the tween engine once, so a
//! session is reproducible down to the frame.

use folio_animation::{AnimationScheduler, TweenEngine};
use folio_core::runtime::next_frame_after;
use folio_core::{
    dispatch, event_types, DisplayTree, ElementId, Event, EventData, EventDispatcher, KeyValueStore,
    MemoryStore, TaskQueue, TimerId, FRAME_MS,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::clipboard::{Clipboard, MemoryClipboard, Navigator, RecordingNavigator};
use crate::config::PageConfig;
use crate::device::DeviceProfile;
use crate::portfolio::Widgets;
use crate::scroll::{ScrollState, SmoothScroll};
use crate::viewport::{IntersectionNotifier, ObserverId, ViewportObserver, VisibilityChange};

/// Callback for visibility changes of one observer entry
pub type VisibilityHandler = Box<dyn FnMut(&mut Page, &VisibilityChange)>;

pub struct Page {
    pub tree: DisplayTree,
    pub scroll: ScrollState,
    pub engine: Box<dyn TweenEngine>,
    pub observer: Box<dyn IntersectionNotifier>,
    pub store: Box<dyn KeyValueStore>,
    pub clipboard: Box<dyn Clipboard>,
    pub navigator: Box<dyn Navigator>,
    pub timers: TaskQueue<Page>,
    pub events: EventDispatcher<Page>,
    pub config: PageConfig,
    pub device: DeviceProfile,
    pub widgets: Widgets,
    visibility_handlers: FxHashMap<ObserverId, VisibilityHandler>,
    smooth_scroll: Option<SmoothScroll>,
    smooth_scroll_frame: Option<TimerId>,
    last_frame_ms: u64,
}

impl Page {
    /// Page over `tree` with in-memory host capabilities
    ///
    /// The document height is taken from the lowest element bottom.
    pub fn new(tree: DisplayTree, config: PageConfig) -> Self {
        let mut scroll = ScrollState::default();
        scroll.document_height = document_height(&tree).max(scroll.viewport_height);
        Self {
            tree,
            scroll,
            engine: Box::new(AnimationScheduler::new()),
            observer: Box::new(ViewportObserver::new()),
            store: Box::new(MemoryStore::new()),
            clipboard: Box::new(MemoryClipboard::new()),
            navigator: Box::new(RecordingNavigator::new()),
            timers: TaskQueue::new(),
            events: EventDispatcher::new(),
            config,
            device: DeviceProfile::Desktop,
            widgets: Widgets::default(),
            visibility_handlers: FxHashMap::default(),
            smooth_scroll: None,
            smooth_scroll_frame: None,
            last_frame_ms: 0,
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn TweenEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_notifier(mut self, observer: Box<dyn IntersectionNotifier>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_navigator(mut self, navigator: Box<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.scroll.viewport_width = width;
        self.scroll.viewport_height = height;
        self.scroll.document_height = self.scroll.document_height.max(height);
        self
    }

    pub fn with_document_height(mut self, height: f32) -> Self {
        self.scroll.document_height = height;
        self
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    // =========================================================================
    // Runtime
    // =========================================================================

    pub fn set_timeout<F>(&mut self, delay_ms: u64, task: F) -> TimerId
    where
        F: FnOnce(&mut Page) + 'static,
    {
        self.timers.set_timeout(delay_ms, task)
    }

    pub fn request_frame<F>(&mut self, task: F) -> TimerId
    where
        F: FnOnce(&mut Page) + 'static,
    {
        self.timers.request_frame(task)
    }

    /// Run timers, frame callbacks and engine ticks for the next `ms`
    pub fn advance(&mut self, ms: u64) {
        let until = self.now() + ms;
        self.advance_to(until);
    }

    pub fn advance_to(&mut self, until: u64) {
        loop {
            let next_frame = next_frame_after(self.last_frame_ms);
            let horizon = next_frame.min(until);
            if let Some(task) = self.timers.pop_due(horizon) {
                task(self);
                continue;
            }
            if next_frame > until {
                break;
            }
            self.timers.advance_to(next_frame);
            let dt = (next_frame - self.last_frame_ms) as f32;
            self.last_frame_ms = next_frame;
            self.engine.tick(dt, &mut self.tree);
        }
        self.timers.advance_to(until);
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Dispatch an event along its target's ancestor path, then to the window
    ///
    /// Non-bubbling types (pointer enter/leave, focus, blur) reach only the
    /// target. Input events update the control's value before listeners run.
    pub fn dispatch(&mut self, event: Event) -> usize {
        if let (Some(target), EventData::Input { value }) = (event.target, &event.data) {
            if let Some(el) = self.tree.get_mut(target) {
                el.value = value.clone();
            }
        }
        let path = self.ancestor_path(event.target);
        trace!("dispatch event {} along {} elements", event.event_type, path.len());
        dispatch(self, &event, &path, |p| &mut p.events)
    }

    fn ancestor_path(&self, target: Option<ElementId>) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = target.filter(|t| self.tree.contains(*t));
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.tree.parent(id);
        }
        path
    }

    pub fn click(&mut self, target: ElementId) -> usize {
        self.dispatch(Event::on(event_types::CLICK, target))
    }

    pub fn pointer_enter(&mut self, target: ElementId) -> usize {
        self.dispatch(Event::on(event_types::POINTER_ENTER, target))
    }

    pub fn pointer_leave(&mut self, target: ElementId) -> usize {
        self.dispatch(Event::on(event_types::POINTER_LEAVE, target))
    }

    /// Pointer moved to viewport position `(x, y)`, over `target` if any
    pub fn pointer_move(&mut self, target: Option<ElementId>, x: f32, y: f32) -> usize {
        self.dispatch(Event::new(
            event_types::POINTER_MOVE,
            target,
            EventData::Pointer { x, y },
        ))
    }

    pub fn focus(&mut self, target: ElementId) -> usize {
        self.dispatch(Event::on(event_types::FOCUS, target))
    }

    pub fn blur(&mut self, target: ElementId) -> usize {
        self.dispatch(Event::on(event_types::BLUR, target))
    }

    pub fn input(&mut self, target: ElementId, value: impl Into<String>) -> usize {
        self.dispatch(Event::new(
            event_types::INPUT,
            Some(target),
            EventData::Input {
                value: value.into(),
            },
        ))
    }

    pub fn submit(&mut self, form: ElementId) -> usize {
        self.dispatch(Event::on(event_types::SUBMIT, form))
    }

    /// Document parsed: run ready listeners, then deliver initial visibility
    pub fn ready(&mut self) {
        self.dispatch(Event::window(event_types::DOM_READY));
        self.refresh_visibility();
    }

    /// All resources loaded
    pub fn load(&mut self) {
        self.dispatch(Event::window(event_types::LOAD));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.scroll.viewport_width = width;
        self.scroll.viewport_height = height;
        self.dispatch(Event::new(
            event_types::RESIZE,
            None,
            EventData::Resize { width, height },
        ));
        self.refresh_visibility();
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// User scroll: cancels any smooth scroll in flight
    pub fn scroll_to(&mut self, offset: f32) {
        self.cancel_smooth_scroll();
        self.set_scroll(offset);
    }

    /// Animate the scroll position to `offset` over the configured duration
    pub fn smooth_scroll_to(&mut self, offset: f32) {
        let target = self.scroll.clamp_offset(offset);
        let duration = self.config.nav.smooth_scroll_ms;
        debug!("smooth scroll {} -> {}", self.scroll.offset, target);
        self.smooth_scroll = Some(SmoothScroll::new(self.scroll.offset, target, duration));
        if self.smooth_scroll_frame.is_none() {
            self.smooth_scroll_frame = Some(self.request_frame(smooth_scroll_frame));
        }
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth_scroll.is_some()
    }

    fn cancel_smooth_scroll(&mut self) {
        self.smooth_scroll = None;
        if let Some(frame) = self.smooth_scroll_frame.take() {
            self.timers.clear(frame);
        }
    }

    /// Write the offset, notify scroll listeners, then recompute visibility
    fn set_scroll(&mut self, offset: f32) {
        self.scroll.offset = self.scroll.clamp_offset(offset);
        let offset = self.scroll.offset;
        self.dispatch(Event::new(
            event_types::SCROLL,
            None,
            EventData::Scroll { offset },
        ));
        self.refresh_visibility();
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Watch `element` and route its visibility changes to `handler`
    pub fn on_visibility<F>(&mut self, observer: ObserverId, handler: F)
    where
        F: FnMut(&mut Page, &VisibilityChange) + 'static,
    {
        self.visibility_handlers.insert(observer, Box::new(handler));
    }

    /// Pull transitions from the notifier and deliver them
    ///
    /// A handler whose observer is gone after it ran is dropped with it.
    pub fn refresh_visibility(&mut self) -> usize {
        let changes = self.observer.update(&self.tree, &self.scroll);
        let mut delivered = 0;
        for change in changes {
            let Some(mut handler) = self.visibility_handlers.remove(&change.observer) else {
                continue;
            };
            handler(self, &change);
            delivered += 1;
            if self.observer.is_observing(change.observer) {
                self.visibility_handlers.insert(change.observer, handler);
            }
        }
        self.visibility_handlers
            .retain(|id, _| self.observer.is_observing(*id));
        delivered
    }
}

fn smooth_scroll_frame(page: &mut Page) {
    page.smooth_scroll_frame = None;
    let Some(mut scroll) = page.smooth_scroll.take() else {
        return;
    };
    let (offset, done) = scroll.step(FRAME_MS as f32);
    if !done {
        page.smooth_scroll = Some(scroll);
        page.smooth_scroll_frame = Some(page.request_frame(smooth_scroll_frame));
    }
    page.set_scroll(offset);
}

/// Lowest element bottom in the tree
fn document_height(tree: &DisplayTree) -> f32 {
    tree.descendants(tree.root())
        .into_iter()
        .filter_map(|id| tree.bounds(id))
        .map(|b| b.bottom())
        .fold(0.0, f32::max)
}
