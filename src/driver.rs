use std::time::Instant;

use crate::sink::{GraphSink, Meter, MeterSink};
use crate::system::cpu::cpu_percent;
use crate::system::error::SourceError;
use crate::system::history::LoadHistory;
use crate::system::io::{IoCounters, io_percent};
use crate::system::memory::memory_percent;
use crate::system::snapshot::CpuCounters;
use crate::system::source::CounterSource;
use crate::system::{Generations, Percent};

#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("renderer failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub cpu: Percent,
    pub memory: Percent,
    /// `None` until a disk scale exists, which takes three readings.
    pub io: Option<Percent>,
    /// The load sample recorded this tick, if the history interval had elapsed.
    pub load: Option<f64>,
}

/// Owns every piece of sampling state and drives one tick at a time.
pub struct Sampler<S> {
    source: S,
    cpu: Generations<CpuCounters>,
    io: Generations<IoCounters>,
    load: LoadHistory,
    ticks: u64,
}

impl<S: CounterSource> Sampler<S> {
    pub fn new(source: S, load: LoadHistory) -> Self {
        Self {
            source,
            cpu: Generations::default(),
            io: Generations::new(IoCounters::UNINITIALIZED),
            load,
            ticks: 0,
        }
    }

    pub fn load_history(&self) -> &LoadHistory {
        &self.load
    }

    pub fn io_counters(&self) -> &Generations<IoCounters> {
        &self.io
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reads every source, normalizes, and hands the results to `sink`.
    ///
    /// All reads happen before any state is advanced, so a failed read leaves
    /// the previous generations intact.
    pub fn tick<K>(&mut self, now: Instant, sink: &mut K) -> Result<TickReport, TickError>
    where
        K: MeterSink + GraphSink + ?Sized,
    {
        let _span = tracing::debug_span!("sampler.tick", tick = self.ticks).entered();

        let cpu_raw = self.source.read_cpu()?;
        let memory_raw = self.source.read_memory()?;
        let disk_raw = self.source.read_disk()?;
        let load_raw = if self.load.is_due(now) {
            Some(self.source.read_load()?)
        } else {
            None
        };

        self.cpu.advance(cpu_raw);
        let cpu = cpu_percent(&self.cpu.previous, &self.cpu.current);

        let memory = memory_percent(&memory_raw);

        self.io.advance(IoCounters::observed(disk_raw.weighted));
        let Generations { previous, current } = &mut self.io;
        let io = io_percent(previous, current);

        let mut load = None;
        if let Some(value) = load_raw
            && self.load.tick(value, now)
        {
            load = Some(value);
        }

        tracing::debug!(
            cpu = cpu.get(),
            memory = memory.get(),
            io = io.map(Percent::get),
            disks = disk_raw.devices,
            "sampled"
        );

        sink.set_level(Meter::Cpu, cpu)?;
        sink.set_level(Meter::Memory, memory)?;
        match io {
            Some(level) => sink.set_level(Meter::Io, level)?,
            None => tracing::trace!("io scale not initialized, meter skipped"),
        }
        if let Some(value) = load {
            tracing::debug!(load = value, samples = self.load.len(), "load history updated");
            sink.set_history(&self.load.window_view(), self.load.scale_hint())?;
        }
        sink.end_tick()?;

        self.ticks += 1;
        Ok(TickReport {
            cpu,
            memory,
            io,
            load,
        })
    }
}
