use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use sysmeter::system::Percent;
use sysmeter::system::cpu::cpu_percent;
use sysmeter::system::history::LoadHistory;
use sysmeter::system::io::{IoCounters, io_percent};
use sysmeter::system::memory::memory_percent;
use sysmeter::system::snapshot::{CpuCounters, MemorySnapshot};

fn appended(capacity: usize, values: &[f64]) -> LoadHistory {
    let mut history = LoadHistory::new(NonZeroUsize::new(capacity).unwrap(), Duration::ZERO);
    let start = Instant::now();
    for (i, &v) in values.iter().enumerate() {
        assert!(history.tick(v, start + Duration::from_millis(i as u64 + 1)));
    }
    history
}

proptest! {
    #[test]
    fn cpu_within_bounds(
        active in 0u64..1 << 40,
        idle in 0u64..1 << 40,
        d_active in 0u64..1 << 20,
        d_idle in 0u64..1 << 20,
    ) {
        let previous = CpuCounters::new(active, idle);
        let current = CpuCounters::new(active + d_active, idle + d_idle);
        let level = cpu_percent(&previous, &current).get();
        prop_assert!(level <= 100);
    }

    #[test]
    fn cpu_active_going_backwards_reads_zero(
        active in 1u64..1 << 40,
        idle in 0u64..1 << 40,
        d_down in 1u64..1 << 20,
        d_extra in 0u64..1 << 20,
    ) {
        let d_down = d_down.min(active);
        let previous = CpuCounters::new(active, idle);
        let current = CpuCounters::new(active - d_down, idle + d_down + d_extra);
        prop_assert!(current.total() >= previous.total());
        prop_assert_eq!(cpu_percent(&previous, &current), Percent::ZERO);
    }

    #[test]
    fn cpu_unchanged_is_zero(active in any::<u32>(), idle in any::<u32>()) {
        let c = CpuCounters::new(u64::from(active), u64::from(idle));
        prop_assert_eq!(cpu_percent(&c, &c), Percent::ZERO);
    }

    #[test]
    fn memory_monotonic_in_active(
        total in 1u64..1 << 40,
        buffers in 0u64..1 << 20,
        cached in 0u64..1 << 20,
        free_a in 0u64..1 << 40,
        free_b in 0u64..1 << 40,
    ) {
        let snap = |free| MemorySnapshot { total, free, buffers, cached };
        let (a, b) = (snap(free_a), snap(free_b));
        prop_assert_eq!(memory_percent(&a), memory_percent(&a));
        if a.active() <= b.active() {
            prop_assert!(memory_percent(&a) <= memory_percent(&b));
        } else {
            prop_assert!(memory_percent(&a) >= memory_percent(&b));
        }
    }

    #[test]
    fn io_scale_never_decreases(deltas in prop::collection::vec(0u64..1_000_000, 1..64)) {
        let mut previous = IoCounters::observed(0);
        let mut last_max = 0;
        for (i, delta) in deltas.into_iter().enumerate() {
            let mut current = IoCounters::observed(previous.weighted + delta);
            let level = io_percent(&previous, &mut current);
            // the first measured delta only seeds the scale
            prop_assert_eq!(level.is_some(), i > 0);
            let max = current.running_max.unwrap();
            prop_assert!(max >= last_max);
            prop_assert!(max >= 1);
            last_max = max;
            previous = current;
        }
    }

    #[test]
    fn io_delta_at_scale_is_full(weighted in 0u64..1 << 40, max in 1i64..1 << 30) {
        let previous = IoCounters { weighted, running_max: Some(max) };
        let mut current = IoCounters::observed(weighted + max as u64);
        prop_assert_eq!(io_percent(&previous, &mut current), Some(Percent::FULL));
        prop_assert_eq!(current.running_max, Some(max));
    }

    #[test]
    fn history_keeps_latest_n_in_order(
        capacity in 1usize..64,
        extra in 1usize..64,
    ) {
        let values: Vec<f64> = (0..capacity + extra).map(|i| i as f64).collect();
        let history = appended(capacity, &values);
        prop_assert!(history.has_wrapped());
        prop_assert_eq!(history.window_view(), values[extra..].to_vec());
    }

    #[test]
    fn scale_hint_is_peak_or_floor(values in prop::collection::vec(0.0f64..64.0, 0..40)) {
        let history = appended(40, &values);
        let peak = values.iter().copied().fold(1.0, f64::max);
        prop_assert_eq!(history.scale_hint(), peak);
    }
}

#[test]
fn uninitialized_io_has_no_output() {
    let mut current = IoCounters::observed(10);
    assert_eq!(io_percent(&IoCounters::UNINITIALIZED, &mut current), None);

    let mut also_uninitialized = IoCounters::UNINITIALIZED;
    assert_eq!(io_percent(&IoCounters::observed(0), &mut also_uninitialized), None);
}

#[test]
fn three_samples_into_five_slots() {
    let history = appended(5, &[1.0, 2.0, 3.0]);
    assert_eq!(history.window_view(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn cpu_scenario_fully_busy() {
    let previous = CpuCounters::new(100, 100);
    let current = CpuCounters::new(150, 100);
    assert_eq!(previous.total(), 200);
    assert_eq!(current.total(), 250);
    assert_eq!(cpu_percent(&previous, &current).get(), 100);
}

#[test]
fn memory_scenario_thirty_percent() {
    let snap = MemorySnapshot {
        total: 1000,
        free: 500,
        buffers: 100,
        cached: 100,
    };
    assert_eq!(snap.active(), 300);
    assert_eq!(memory_percent(&snap).get(), 30);
}
