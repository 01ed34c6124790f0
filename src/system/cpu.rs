use super::Percent;
use super::snapshot::CpuCounters;

/// Share of elapsed CPU ticks spent outside the idle task between two readings.
///
/// Elapsed ticks are floored at one and busy ticks at zero, so a stalled or
/// reset counter reads as idle instead of dividing by zero. The very first call
/// against an all-zero `previous` reports the since-boot average.
pub fn cpu_percent(previous: &CpuCounters, current: &CpuCounters) -> Percent {
    let dt = current.total().saturating_sub(previous.total()).max(1);
    let da = current.active().saturating_sub(previous.active());
    Percent::new((da.saturating_mul(100) / dt).min(100) as i64)
}
