//! Cooperative task queue with a virtual clock
//!
//! Models the host's single UI event queue: nothing blocks, every delay is a
//! scheduled callback that re-enters the queue. Timers due at the same
//! instant run in the order they were scheduled. Animation-frame callbacks
//! are timers aligned to the next frame boundary.
//!
//! The clock only moves when the owner pops due tasks, which makes every
//! timing-dependent behavior reproducible in tests.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use slotmap::{new_key_type, SlotMap};

/// Frame interval in milliseconds (~60fps)
pub const FRAME_MS: u64 = 16;

new_key_type! {
    /// Handle to a scheduled timer or frame callback
    pub struct TimerId;
}

/// A scheduled callback
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Time-ordered queue of one-shot callbacks
pub struct TaskQueue<C> {
    now_ms: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
    tasks: SlotMap<TimerId, Task<C>>,
}

impl<C> TaskQueue<C> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
            tasks: SlotMap::with_key(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to run `delay_ms` from now
    pub fn set_timeout<F>(&mut self, delay_ms: u64, task: F) -> TimerId
    where
        F: FnOnce(&mut C) + 'static,
    {
        self.schedule_at(self.now_ms.saturating_add(delay_ms), Box::new(task))
    }

    /// Schedule `task` for the next animation frame
    pub fn request_frame<F>(&mut self, task: F) -> TimerId
    where
        F: FnOnce(&mut C) + 'static,
    {
        self.schedule_at(next_frame_after(self.now_ms), Box::new(task))
    }

    fn schedule_at(&mut self, due_ms: u64, task: Task<C>) -> TimerId {
        let id = self.tasks.insert(task);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((due_ms, seq, id)));
        id
    }

    /// Cancel a pending task, returning whether it was still pending
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&mut self) -> Option<u64> {
        self.discard_cancelled();
        self.heap.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pop the earliest task due at or before `until`, advancing the clock to it
    pub fn pop_due(&mut self, until: u64) -> Option<Task<C>> {
        self.discard_cancelled();
        let Reverse((due, _, _)) = *self.heap.peek()?;
        if due > until {
            return None;
        }
        let Reverse((due, _, id)) = self.heap.pop()?;
        self.now_ms = self.now_ms.max(due);
        self.tasks.remove(id)
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time_ms: u64) {
        self.now_ms = self.now_ms.max(time_ms);
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, _, id))) = self.heap.peek() {
            if self.tasks.contains_key(*id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// First frame boundary strictly after `time_ms`
pub fn next_frame_after(time_ms: u64) -> u64 {
    (time_ms / FRAME_MS + 1) * FRAME_MS
}

/// Run every task due up to `until`, then park the clock at `until`
///
/// Tasks scheduled while running are picked up if they fall inside the window.
pub fn run_until<C>(ctx: &mut C, until: u64, access: impl Fn(&mut C) -> &mut TaskQueue<C>) -> usize {
    let mut ran = 0;
    while let Some(task) = access(ctx).pop_due(until) {
        task(ctx);
        ran += 1;
    }
    access(ctx).advance_to(until);
    ran
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ctx {
        queue: TaskQueue<Ctx>,
        log: Vec<(u64, &'static str)>,
    }

    fn run(ctx: &mut Ctx, until: u64) -> usize {
        run_until(ctx, until, |c| &mut c.queue)
    }

    #[test]
    fn test_timers_run_in_due_then_schedule_order() {
        let mut ctx = Ctx::default();
        ctx.queue.set_timeout(100, |c| c.log.push((c.queue.now(), "b")));
        ctx.queue.set_timeout(50, |c| c.log.push((c.queue.now(), "a")));
        ctx.queue.set_timeout(100, |c| c.log.push((c.queue.now(), "c")));

        assert_eq!(run(&mut ctx, 99), 1);
        assert_eq!(run(&mut ctx, 100), 2);
        assert_eq!(ctx.log, vec![(50, "a"), (100, "b"), (100, "c")]);
        assert_eq!(ctx.queue.now(), 100);
    }

    #[test]
    fn test_clear_cancels() {
        let mut ctx = Ctx::default();
        let id = ctx.queue.set_timeout(10, |c| c.log.push((0, "never")));
        assert!(ctx.queue.clear(id));
        assert!(!ctx.queue.clear(id));
        assert_eq!(run(&mut ctx, 1000), 0);
        assert!(ctx.log.is_empty());
        assert_eq!(ctx.queue.next_due(), None);
    }

    #[test]
    fn test_chained_timers_reenter_queue() {
        fn tick(c: &mut Ctx) {
            c.log.push((c.queue.now(), "tick"));
            if c.log.len() < 3 {
                c.queue.set_timeout(30, tick);
            }
        }

        let mut ctx = Ctx::default();
        ctx.queue.set_timeout(30, tick);
        run(&mut ctx, 1000);

        let times: Vec<u64> = ctx.log.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![30, 60, 90]);
    }

    #[test]
    fn test_frames_align_to_boundaries() {
        let mut ctx = Ctx::default();
        ctx.queue.advance_to(5);
        ctx.queue.request_frame(|c| c.log.push((c.queue.now(), "frame")));
        run(&mut ctx, 100);
        assert_eq!(ctx.log, vec![(FRAME_MS, "frame")]);
        assert_eq!(next_frame_after(FRAME_MS), 2 * FRAME_MS);
    }
}
