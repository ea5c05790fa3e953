//! Recording tween engine
//!
//! Wraps an [`AnimationScheduler`] and keeps a log of every call made through
//! the [`TweenEngine`] trait. Tests use it to assert what the behavior layer
//! asked for; the CLI prints the log as a session trace.

use folio_core::{DisplayTree, ElementId};

use crate::scheduler::{AnimationScheduler, TweenEngine, TweenId};
use crate::tween::{AnimProperty, TweenRequest};

/// One call made through the engine
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Set {
        target: ElementId,
        values: Vec<(AnimProperty, f32)>,
    },
    Play {
        id: TweenId,
        request: TweenRequest,
    },
    Restart(TweenId),
    Reverse(TweenId),
    Seek {
        id: TweenId,
        progress: f32,
    },
    Kill(TweenId),
}

/// [`TweenEngine`] decorator that records calls
#[derive(Default)]
pub struct RecordingEngine {
    inner: AnimationScheduler,
    calls: Vec<EngineCall>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheduler(inner: AnimationScheduler) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Drain the log
    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.inner
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler {
        &mut self.inner
    }

    /// Requests played for `target`, in order
    pub fn played_for(&self, target: ElementId) -> Vec<&TweenRequest> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Play { request, .. } if request.target == target => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Number of `Play` calls
    pub fn play_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Play { .. }))
            .count()
    }

    /// Number of `Reverse` calls for `id`
    pub fn reverse_count(&self, id: TweenId) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Reverse(r) if *r == id))
            .count()
    }
}

impl TweenEngine for RecordingEngine {
    fn set(&mut self, tree: &mut DisplayTree, target: ElementId, values: &[(AnimProperty, f32)]) {
        self.calls.push(EngineCall::Set {
            target,
            values: values.to_vec(),
        });
        self.inner.set(tree, target, values);
    }

    fn play(&mut self, request: TweenRequest) -> TweenId {
        let id = self.inner.play(request.clone());
        self.calls.push(EngineCall::Play { id, request });
        id
    }

    fn restart(&mut self, id: TweenId) {
        self.calls.push(EngineCall::Restart(id));
        self.inner.restart(id);
    }

    fn reverse(&mut self, id: TweenId) {
        self.calls.push(EngineCall::Reverse(id));
        self.inner.reverse(id);
    }

    fn seek(&mut self, tree: &mut DisplayTree, id: TweenId, progress: f32) {
        self.calls.push(EngineCall::Seek { id, progress });
        self.inner.seek(tree, id, progress);
    }

    fn kill(&mut self, id: TweenId) -> bool {
        self.calls.push(EngineCall::Kill(id));
        self.inner.kill(id)
    }

    fn is_playing(&self, id: TweenId) -> bool {
        self.inner.is_playing(id)
    }

    fn tick(&mut self, dt_ms: f32, tree: &mut DisplayTree) -> bool {
        self.inner.tick(dt_ms, tree)
    }

    fn set_default_duration(&mut self, ms: u32) {
        self.inner.set_default_duration(ms);
    }
}
