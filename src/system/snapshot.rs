/// Aggregate CPU time, in ticks since boot.
///
/// `total` is always `active + idle`; the fields are private so that cannot drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuCounters {
    active: u64,
    idle: u64,
    total: u64,
}

impl CpuCounters {
    pub fn new(active: u64, idle: u64) -> Self {
        Self {
            active,
            idle,
            total: active.saturating_add(idle),
        }
    }

    pub fn active(&self) -> u64 {
        self.active
    }

    pub fn idle(&self) -> u64 {
        self.idle
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// One pass over the memory table, in the table's own unit (kB on Linux).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
}

impl MemorySnapshot {
    /// Memory not accounted for by free, buffer or page-cache pages. Floors at zero.
    pub fn active(&self) -> u64 {
        self.total
            .saturating_sub(self.free.saturating_add(self.buffers).saturating_add(self.cached))
    }
}

/// Weighted I/O time summed over the base block devices of one disk-stats read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiskTotals {
    pub weighted: u64,
    pub devices: usize,
}
