//! Counter sampling and normalization.
//!
//! Everything in here is synchronous and free of rendering concerns: sources
//! produce raw snapshots, samplers turn consecutive snapshots into [`Percent`]s.

pub mod cpu;
pub mod error;
pub mod history;
pub mod io;
pub mod memory;
pub mod snapshot;
pub mod source;

use std::fmt;

use serde::Serialize;

/// A utilization level clamped to `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    /// Clamps `value` into range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// `numerator * 100 / denominator`, clamped. A zero denominator counts as one.
    pub fn ratio(numerator: i64, denominator: i64) -> Self {
        Self::new(numerator.saturating_mul(100) / denominator.max(1))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Two consecutive readings of the same counter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Generations<T> {
    pub previous: T,
    pub current: T,
}

impl<T: Copy> Generations<T> {
    pub fn new(initial: T) -> Self {
        Self {
            previous: initial,
            current: initial,
        }
    }

    /// Retires `current` into `previous`, then installs `next`.
    pub fn advance(&mut self, next: T) {
        self.previous = self.current;
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_clamps() {
        assert_eq!(Percent::new(-5), Percent::ZERO);
        assert_eq!(Percent::new(250), Percent::FULL);
        assert_eq!(Percent::new(42).get(), 42);
    }

    #[test]
    fn ratio_floors_denominator() {
        assert_eq!(Percent::ratio(0, 0), Percent::ZERO);
        assert_eq!(Percent::ratio(1, 0), Percent::FULL);
        assert_eq!(Percent::ratio(1, 3), Percent::new(33));
        assert_eq!(Percent::ratio(i64::MAX, 1), Percent::FULL);
    }

    #[test]
    fn advance_copies_before_overwrite() {
        let mut g = Generations::new(1u32);
        g.advance(2);
        assert_eq!((g.previous, g.current), (1, 2));
        g.advance(3);
        assert_eq!((g.previous, g.current), (2, 3));
    }
}
