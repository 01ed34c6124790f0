use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(52).unwrap();
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Graph scale never drops below this, so a quiet machine still draws at a
/// readable height.
pub const MIN_SCALE: f64 = 1.0;

/// Fixed-capacity ring of load-average samples, appended at most once per
/// `interval`.
#[derive(Debug, Clone)]
pub struct LoadHistory {
    buffer: Vec<f64>,
    write_index: usize,
    has_wrapped: bool,
    last_sample: Option<Instant>,
    interval: Duration,
}

impl Default for LoadHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_INTERVAL)
    }
}

impl LoadHistory {
    pub fn new(capacity: NonZeroUsize, interval: Duration) -> Self {
        Self {
            buffer: vec![0.0; capacity.get()],
            write_index: 0,
            has_wrapped: false,
            last_sample: None,
            interval,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn has_wrapped(&self) -> bool {
        self.has_wrapped
    }

    pub fn len(&self) -> usize {
        if self.has_wrapped {
            self.buffer.len()
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a sample taken at `now` would be recorded.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_sample {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.interval,
        }
    }

    /// Records `value` if the interval has elapsed since the last recorded
    /// sample. Returns whether it was recorded.
    pub fn tick(&mut self, value: f64, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_sample = Some(now);
        self.push(value);
        true
    }

    fn push(&mut self, value: f64) {
        self.buffer[self.write_index] = value;
        self.write_index += 1;
        if self.write_index == self.buffer.len() {
            self.write_index = 0;
            self.has_wrapped = true;
        }
    }

    /// Samples in chronological order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (older, newer) = if self.has_wrapped {
            (&self.buffer[self.write_index..], &self.buffer[..self.write_index])
        } else {
            (&self.buffer[..self.write_index], &self.buffer[..0])
        };
        older.iter().chain(newer).copied()
    }

    pub fn window_view(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Vertical scale for the trend graph: the largest sample in view, but at
    /// least [`MIN_SCALE`].
    pub fn scale_hint(&self) -> f64 {
        self.iter().fold(MIN_SCALE, f64::max)
    }
}
