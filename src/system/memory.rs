use super::Percent;
use super::snapshot::MemorySnapshot;

/// Memory in use as a share of total. Needs no history.
pub fn memory_percent(snapshot: &MemorySnapshot) -> Percent {
    let total = snapshot.total.max(1);
    Percent::new((snapshot.active().saturating_mul(100) / total).min(100) as i64)
}
