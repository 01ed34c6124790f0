//! Raw counter sources.
//!
//! Parsing is kept in free functions over `&str` so it can be exercised without
//! a live proc tree; [`ProcSource`] only adds the file reads.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::{SourceError, SourceKind};
use super::snapshot::{CpuCounters, DiskTotals, MemorySnapshot};

/// Label of the aggregate line in the CPU table.
const AGGREGATE_CPU_LABEL: &str = "cpu";

/// Position of weighted I/O time among the numeric fields that follow the device name.
const WEIGHTED_IO_FIELD: usize = 12;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Where the samplers get their raw counters from.
pub trait CounterSource {
    fn read_cpu(&mut self) -> Result<CpuCounters, SourceError>;
    fn read_memory(&mut self) -> Result<MemorySnapshot, SourceError>;
    fn read_disk(&mut self) -> Result<DiskTotals, SourceError>;
    fn read_load(&mut self) -> Result<f64, SourceError>;
}

/// Reads the Linux proc pseudo-files under a configurable root.
#[derive(Clone, Debug)]
pub struct ProcSource {
    root: PathBuf,
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        let file = match kind {
            SourceKind::Cpu => "stat",
            SourceKind::Memory => "meminfo",
            SourceKind::Disk => "diskstats",
            SourceKind::Load => "loadavg",
        };
        self.root.join(file)
    }

    fn read(&self, kind: SourceKind) -> Result<String, SourceError> {
        let _span = tracing::trace_span!("source.read", source = kind.label()).entered();
        let path = self.path_for(kind);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::InvalidData => {
                SourceError::malformed(kind, format!("{}: {source}", path.display()))
            }
            _ => SourceError::Unavailable { kind, path, source },
        })
    }
}

impl CounterSource for ProcSource {
    fn read_cpu(&mut self) -> Result<CpuCounters, SourceError> {
        parse_cpu(&self.read(SourceKind::Cpu)?)
    }

    fn read_memory(&mut self) -> Result<MemorySnapshot, SourceError> {
        parse_meminfo(&self.read(SourceKind::Memory)?)
    }

    fn read_disk(&mut self) -> Result<DiskTotals, SourceError> {
        parse_diskstats(&self.read(SourceKind::Disk)?)
    }

    fn read_load(&mut self) -> Result<f64, SourceError> {
        parse_loadavg(&self.read(SourceKind::Load)?)
    }
}

fn parse_u64(kind: SourceKind, field: &str, raw: Option<&str>) -> Result<u64, SourceError> {
    let raw = raw.ok_or_else(|| SourceError::malformed(kind, format!("missing field `{field}`")))?;
    raw.parse()
        .map_err(|_| SourceError::malformed(kind, format!("field `{field}` is not an integer: {raw:?}")))
}

/// Parses the aggregate line of the CPU table: `cpu user nice system idle ...`.
pub fn parse_cpu(contents: &str) -> Result<CpuCounters, SourceError> {
    let kind = SourceKind::Cpu;
    let mut fields = contents
        .lines()
        .map(str::split_whitespace)
        .find_map(|mut fields| (fields.next() == Some(AGGREGATE_CPU_LABEL)).then_some(fields))
        .ok_or_else(|| SourceError::malformed(kind, "no aggregate `cpu` line"))?;

    let user = parse_u64(kind, "user", fields.next())?;
    let nice = parse_u64(kind, "nice", fields.next())?;
    let system = parse_u64(kind, "system", fields.next())?;
    let idle = parse_u64(kind, "idle", fields.next())?;

    let active = user.saturating_add(nice).saturating_add(system);
    Ok(CpuCounters::new(active, idle))
}

/// Parses `MemTotal`, `MemFree`, `Buffers` and `Cached` out of the memory table.
pub fn parse_meminfo(contents: &str) -> Result<MemorySnapshot, SourceError> {
    let kind = SourceKind::Memory;
    let mut total = None;
    let mut free = None;
    let mut buffers = None;
    let mut cached = None;

    for line in contents.lines() {
        let (slot, field, rest) = if let Some(rest) = line.strip_prefix("MemTotal:") {
            (&mut total, "MemTotal", rest)
        } else if let Some(rest) = line.strip_prefix("MemFree:") {
            (&mut free, "MemFree", rest)
        } else if let Some(rest) = line.strip_prefix("Buffers:") {
            (&mut buffers, "Buffers", rest)
        } else if let Some(rest) = line.strip_prefix("Cached:") {
            (&mut cached, "Cached", rest)
        } else {
            continue;
        };
        *slot = Some(parse_u64(kind, field, rest.split_whitespace().next())?);
    }

    let require = |value: Option<u64>, field: &str| {
        value.ok_or_else(|| SourceError::malformed(kind, format!("`{field}` not found")))
    };

    Ok(MemorySnapshot {
        total: require(total, "MemTotal")?,
        free: require(free, "MemFree")?,
        buffers: require(buffers, "Buffers")?,
        cached: require(cached, "Cached")?,
    })
}

/// Whole spinning-style disks only: `sda`, `hdb`, `vdc`. Partitions (`sda1`) and
/// everything with a longer name are skipped.
pub fn is_base_disk(name: &str) -> bool {
    matches!(
        name.as_bytes(),
        [b'h' | b's' | b'v', b'd', unit] if unit.is_ascii_lowercase()
    )
}

/// Sums weighted I/O time across the base disks of the disk-stats table.
pub fn parse_diskstats(contents: &str) -> Result<DiskTotals, SourceError> {
    let kind = SourceKind::Disk;
    let mut totals = DiskTotals::default();

    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        // major, minor, then the device name
        let Some(name) = fields.nth(2) else {
            continue;
        };
        if !is_base_disk(name) {
            continue;
        }

        let weighted = parse_u64(
            kind,
            &format!("{name} weighted io time"),
            fields.nth(WEIGHTED_IO_FIELD - 1),
        )?;
        totals.weighted = totals.weighted.wrapping_add(weighted);
        totals.devices += 1;
    }

    tracing::trace!(devices = totals.devices, weighted = totals.weighted, "disk stats parsed");
    Ok(totals)
}

/// The leading field of the load-average source is the one-minute average.
pub fn parse_loadavg(contents: &str) -> Result<f64, SourceError> {
    let kind = SourceKind::Load;
    let raw = contents
        .split_whitespace()
        .next()
        .ok_or_else(|| SourceError::malformed(kind, "empty load average"))?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SourceError::malformed(
            kind,
            format!("one-minute load is not a number: {raw:?}"),
        )),
    }
}
