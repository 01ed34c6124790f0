//! Render collaborators fed by the sampling loop.
//!
//! The loop only knows the two traits; the bundled implementations draw plain
//! text meters or emit one JSON object per tick.

use std::io::{self, Write};

use serde::Serialize;

use crate::format::{format_load, meter_bar, trend_line};
use crate::system::Percent;

pub const DEFAULT_METER_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meter {
    Cpu,
    Memory,
    Io,
}

impl Meter {
    pub const ALL: [Meter; 3] = [Meter::Cpu, Meter::Memory, Meter::Io];

    pub fn label(self) -> &'static str {
        match self {
            Meter::Cpu => "cpu",
            Meter::Memory => "mem",
            Meter::Io => "io",
        }
    }

    fn index(self) -> usize {
        match self {
            Meter::Cpu => 0,
            Meter::Memory => 1,
            Meter::Io => 2,
        }
    }
}

pub trait MeterSink {
    /// Called at most once per meter per tick.
    fn set_level(&mut self, meter: Meter, level: Percent) -> io::Result<()>;

    /// Called once after every tick, whether or not any level was set.
    fn end_tick(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub trait GraphSink {
    /// Called whenever the load history gained a sample. `samples` is oldest first.
    fn set_history(&mut self, samples: &[f64], scale_hint: f64) -> io::Result<()>;
}

/// Anything the sampling loop can draw into.
pub trait Renderer: MeterSink + GraphSink {}

impl<T: MeterSink + GraphSink> Renderer for T {}

/// One line of ASCII meters per tick, plus a trend line when the load history moves.
pub struct TextSink<W: Write> {
    out: W,
    width: usize,
    levels: [Option<Percent>; 3],
    trend: Option<(String, f64, f64)>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self::with_width(out, DEFAULT_METER_WIDTH)
    }

    pub fn with_width(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            levels: [None; 3],
            trend: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MeterSink for TextSink<W> {
    fn set_level(&mut self, meter: Meter, level: Percent) -> io::Result<()> {
        self.levels[meter.index()] = Some(level);
        Ok(())
    }

    fn end_tick(&mut self) -> io::Result<()> {
        let mut line = String::new();
        for meter in Meter::ALL {
            if !line.is_empty() {
                line.push_str("  ");
            }
            match self.levels[meter.index()].take() {
                Some(level) => line.push_str(&format!(
                    "{:<3} {} {:>4}",
                    meter.label(),
                    meter_bar(level, self.width),
                    level.to_string()
                )),
                None => line.push_str(&format!(
                    "{:<3} [{}] {:>4}",
                    meter.label(),
                    " ".repeat(self.width),
                    "--"
                )),
            }
        }
        writeln!(self.out, "{line}")?;

        if let Some((trend, latest, scale)) = self.trend.take() {
            writeln!(
                self.out,
                "load {} {} (scale {})",
                trend,
                format_load(latest),
                format_load(scale)
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> GraphSink for TextSink<W> {
    fn set_history(&mut self, samples: &[f64], scale_hint: f64) -> io::Result<()> {
        let latest = samples.last().copied().unwrap_or(0.0);
        self.trend = Some((trend_line(samples, scale_hint), latest, scale_hint));
        Ok(())
    }
}

#[derive(Debug, Default, Serialize)]
struct TickRecord {
    cpu: Option<Percent>,
    memory: Option<Percent>,
    io: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    load: Option<LoadRecord>,
}

#[derive(Debug, Serialize)]
struct LoadRecord {
    samples: Vec<f64>,
    scale: f64,
}

/// One JSON object per tick, newline separated.
pub struct JsonSink<W: Write> {
    out: W,
    pending: TickRecord,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: TickRecord::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MeterSink for JsonSink<W> {
    fn set_level(&mut self, meter: Meter, level: Percent) -> io::Result<()> {
        let slot = match meter {
            Meter::Cpu => &mut self.pending.cpu,
            Meter::Memory => &mut self.pending.memory,
            Meter::Io => &mut self.pending.io,
        };
        *slot = Some(level);
        Ok(())
    }

    fn end_tick(&mut self) -> io::Result<()> {
        let record = std::mem::take(&mut self.pending);
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> GraphSink for JsonSink<W> {
    fn set_history(&mut self, samples: &[f64], scale_hint: f64) -> io::Result<()> {
        self.pending.load = Some(LoadRecord {
            samples: samples.to_vec(),
            scale: scale_hint,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sink_renders_levels_and_placeholder() {
        let mut sink = TextSink::with_width(Vec::new(), 4);
        sink.set_level(Meter::Cpu, Percent::new(50)).unwrap();
        sink.set_level(Meter::Memory, Percent::FULL).unwrap();
        sink.end_tick().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "cpu [##..]  50%  mem [####] 100%  io  [    ]   --\n");
    }

    #[test]
    fn text_sink_levels_reset_each_tick() {
        let mut sink = TextSink::with_width(Vec::new(), 2);
        sink.set_level(Meter::Io, Percent::FULL).unwrap();
        sink.end_tick().unwrap();
        sink.end_tick().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("io  [##] 100%"));
        assert!(lines[1].ends_with("io  [  ]   --"));
    }

    #[test]
    fn text_sink_writes_trend_after_meters() {
        let mut sink = TextSink::with_width(Vec::new(), 2);
        sink.set_history(&[0.0, 1.0], 1.0).unwrap();
        sink.end_tick().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().nth(1), Some("load _# 1.00 (scale 1.00)"));
    }

    #[test]
    fn json_sink_emits_one_object_per_tick() {
        let mut sink = JsonSink::new(Vec::new());
        sink.set_level(Meter::Cpu, Percent::new(12)).unwrap();
        sink.set_history(&[0.5], 1.0).unwrap();
        sink.end_tick().unwrap();
        sink.set_level(Meter::Io, Percent::new(3)).unwrap();
        sink.end_tick().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"cpu":12,"memory":null,"io":null,"load":{"samples":[0.5],"scale":1.0}}"#
        );
        assert_eq!(lines[1], r#"{"cpu":null,"memory":null,"io":3}"#);
    }
}
