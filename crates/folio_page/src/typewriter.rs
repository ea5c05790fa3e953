//! Typewriter text effect
//!
//! Reveals a string one character per tick. Tick intervals are fixed or drawn
//! from a seeded generator so a session replays identically. Completion is
//! reported exactly once, on the tick that reveals the last character.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Interval between characters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpeed {
    Fixed(u32),
    /// Uniform in `[min_ms, max_ms]`
    Random { min_ms: u32, max_ms: u32 },
}

impl Default for TypeSpeed {
    fn default() -> Self {
        TypeSpeed::Fixed(100)
    }
}

/// Output of one tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeFrame {
    pub text: String,
    /// Set only on the tick that finishes the string
    pub completed: bool,
}

pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
    speed: TypeSpeed,
    rng: StdRng,
    finished: bool,
}

impl Typewriter {
    pub fn new(text: &str, speed: TypeSpeed, seed: u64) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            speed,
            rng: StdRng::seed_from_u64(seed),
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Text revealed so far
    pub fn text(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    /// Delay before the next tick
    pub fn next_delay(&mut self) -> u32 {
        match self.speed {
            TypeSpeed::Fixed(ms) => ms,
            TypeSpeed::Random { min_ms, max_ms } => {
                let (lo, hi) = (min_ms.min(max_ms), min_ms.max(max_ms));
                self.rng.gen_range(lo..=hi)
            }
        }
    }

    /// Reveal the next character
    ///
    /// Returns `None` once the completion frame has been delivered. An empty
    /// string completes on its first tick.
    pub fn tick(&mut self) -> Option<TypeFrame> {
        if self.finished {
            return None;
        }
        if self.shown < self.chars.len() {
            self.shown += 1;
        }
        let completed = self.shown == self.chars.len();
        self.finished = completed;
        Some(TypeFrame {
            text: self.text(),
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abc_completes_on_third_tick() {
        let mut tw = Typewriter::new("abc", TypeSpeed::Fixed(100), 1);

        let first = tw.tick().unwrap();
        assert_eq!(first.text, "a");
        assert!(!first.completed);
        assert!(!tw.tick().unwrap().completed);

        let third = tw.tick().unwrap();
        assert_eq!(third.text, "abc");
        assert!(third.completed);

        assert_eq!(tw.tick(), None);
        assert!(tw.is_finished());
    }

    #[test]
    fn test_unicode_scalars() {
        let mut tw = Typewriter::new("héllo ✨", TypeSpeed::Fixed(10), 1);
        let mut last = None;
        let mut ticks = 0;
        while let Some(frame) = tw.tick() {
            ticks += 1;
            last = Some(frame);
        }
        assert_eq!(ticks, 7);
        assert_eq!(last.unwrap().text, "héllo ✨");
    }

    #[test]
    fn test_empty_text() {
        let mut tw = Typewriter::new("", TypeSpeed::Fixed(10), 1);
        assert_eq!(
            tw.tick(),
            Some(TypeFrame {
                text: String::new(),
                completed: true
            })
        );
        assert_eq!(tw.tick(), None);
    }

    #[test]
    fn test_random_delays_are_bounded_and_seeded() {
        let speed = TypeSpeed::Random {
            min_ms: 50,
            max_ms: 150,
        };
        let mut a = Typewriter::new("x", speed, 42);
        let mut b = Typewriter::new("x", speed, 42);
        for _ in 0..100 {
            let delay = a.next_delay();
            assert!((50..=150).contains(&delay));
            assert_eq!(delay, b.next_delay());
        }
        assert_eq!(Typewriter::new("x", TypeSpeed::Fixed(80), 0).next_delay(), 80);
    }
}
