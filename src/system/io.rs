use super::Percent;

/// Disk activity at one point in time plus the scale used to normalize it.
///
/// `running_max` is the largest per-tick delta seen so far. `None` means no
/// reading exists yet; `Some(0)` means a baseline was read but no delta has been
/// measured. The scale only ever grows: one large burst keeps the meter less
/// sensitive for the rest of the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoCounters {
    pub weighted: u64,
    pub running_max: Option<i64>,
}

impl Default for IoCounters {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}

impl IoCounters {
    /// Startup state: nothing read yet, no scale.
    pub const UNINITIALIZED: IoCounters = IoCounters {
        weighted: 0,
        running_max: None,
    };

    /// A fresh reading with no scale of its own. [`io_percent`] fills it in.
    pub fn observed(weighted: u64) -> Self {
        Self {
            weighted,
            running_max: Some(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.running_max.is_some()
    }
}

/// Normalizes the weighted I/O delta between two readings against the running
/// maximum, updating `current.running_max` on the way.
///
/// Returns `None` while either generation is uninitialized, and on the tick
/// that measures the first delta: that delta only seeds the scale. The caller
/// should skip rendering those ticks.
pub fn io_percent(previous: &IoCounters, current: &mut IoCounters) -> Option<Percent> {
    let delta = current.weighted.wrapping_sub(previous.weighted) as i64;
    let (Some(previous_max), Some(_)) = (previous.running_max, current.running_max) else {
        return None;
    };

    let scale = delta.max(previous_max).max(1);
    current.running_max = Some(scale);
    (previous_max > 0).then(|| Percent::ratio(delta, scale))
}
