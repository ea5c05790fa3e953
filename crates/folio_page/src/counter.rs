//! Incremental counter
//!
//! Counts from 0 up to a target in fixed increments of `target / steps`, one
//! increment per tick. Intermediate values show the integer part; the final
//! tick clamps to the target and appends the suffix.
//!
//! The running value is kept as a tick count so the last increment lands
//! exactly on the target.

use folio_core::ElementId;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Running,
    Done,
}

/// Parse a counter target, falling back to 0
pub fn parse_target(raw: Option<&str>) -> u64 {
    match raw.map(str::trim) {
        Some(text) => text.parse::<u64>().unwrap_or_else(|_| {
            warn!("counter: malformed target {:?}, using 0", text);
            0
        }),
        None => {
            warn!("counter: no target, using 0");
            0
        }
    }
}

/// One animated counter
#[derive(Clone, Debug)]
pub struct Counter {
    element: ElementId,
    target: u64,
    steps: u32,
    ticks: u32,
    suffix: String,
    state: CounterState,
}

impl Counter {
    pub fn new(element: ElementId, target: u64, steps: u32, suffix: impl Into<String>) -> Self {
        Self {
            element,
            target,
            steps: steps.max(1),
            ticks: 0,
            suffix: suffix.into(),
            state: CounterState::Idle,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    /// Move from `Idle` to `Running`; returns false if already started
    pub fn start(&mut self) -> bool {
        if self.state != CounterState::Idle {
            return false;
        }
        self.state = CounterState::Running;
        true
    }

    /// Advance one increment and return the text to display
    ///
    /// Returns `None` unless the counter is running.
    pub fn tick(&mut self) -> Option<String> {
        if self.state != CounterState::Running {
            return None;
        }
        self.ticks += 1;
        let current = self.target as u128 * self.ticks as u128 / self.steps as u128;
        if current >= self.target as u128 {
            self.state = CounterState::Done;
            return Some(format!("{}{}", self.target, self.suffix));
        }
        Some(current.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::DisplayTree;

    fn counter(target: u64) -> Counter {
        Counter::new(DisplayTree::new().body(), target, 50, "+")
    }

    fn run(counter: &mut Counter) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(text) = counter.tick() {
            out.push(text);
        }
        out
    }

    #[test]
    fn test_counts_to_target_with_suffix() {
        let mut c = counter(120);
        assert!(c.start());
        let frames = run(&mut c);

        assert_eq!(frames.len(), 50);
        assert_eq!(frames.last().map(String::as_str), Some("120+"));
        assert_eq!(c.state(), CounterState::Done);

        let values: Vec<u64> = frames[..frames.len() - 1]
            .iter()
            .map(|f| f.parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values[0], 2);
        assert!(values.iter().all(|v| *v < 120));
    }

    #[test]
    fn test_tick_requires_start() {
        let mut c = counter(10);
        assert_eq!(c.tick(), None);
        assert!(c.start());
        assert!(!c.start());
    }

    #[test]
    fn test_zero_target_finishes_immediately() {
        let mut c = counter(0);
        c.start();
        assert_eq!(run(&mut c), vec!["0+".to_string()]);
    }

    #[test]
    fn test_parse_target_defaults() {
        assert_eq!(parse_target(Some("120")), 120);
        assert_eq!(parse_target(Some(" 42 ")), 42);
        assert_eq!(parse_target(Some("lots")), 0);
        assert_eq!(parse_target(Some("-5")), 0);
        assert_eq!(parse_target(None), 0);
    }
}
