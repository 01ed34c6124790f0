use std::io::stdout;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use sysmeter::config::{self, OutputFormat, load_config, load_config_from_path};
use sysmeter::driver::Sampler;
use sysmeter::event::{Event, EventHandler};
use sysmeter::logging::init_tracing;
use sysmeter::sink::{JsonSink, Renderer, TextSink};
use sysmeter::system::history::LoadHistory;
use sysmeter::system::source::ProcSource;

#[derive(Parser)]
#[command(
    name = "sysmeter",
    about = "CPU, memory, disk I/O and load-average meters sampled from /proc"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Renderer output format
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,

    /// Directory holding stat, meminfo, diskstats and loadavg
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Number of load-average samples kept for the trend line
    #[arg(long)]
    history_len: Option<usize>,

    /// Minimum seconds between load-average samples
    #[arg(long)]
    load_interval: Option<u64>,

    /// Stop after this many ticks instead of running until Ctrl-C
    #[arg(long)]
    iterations: Option<u64>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json)?;

    let config = load_config_for_cli(&cli);
    let settings = Settings::resolve(&config, cli.iterations)?;
    tracing::info!(
        tick_ms = settings.tick.as_millis() as u64,
        history_len = settings.history_len.get(),
        proc_root = %settings.proc_root.display(),
        "starting sampler"
    );

    let mut sink: Box<dyn Renderer> = match config.general.output {
        OutputFormat::Text => Box::new(TextSink::with_width(stdout(), config.general.meter_width)),
        OutputFormat::Json => Box::new(JsonSink::new(stdout())),
    };

    run(settings, sink.as_mut()).await
}

/// Validated runtime parameters.
struct Settings {
    tick: Duration,
    proc_root: PathBuf,
    history_len: NonZeroUsize,
    load_interval: Duration,
    iterations: Option<u64>,
}

impl Settings {
    fn resolve(config: &config::Config, iterations: Option<u64>) -> Result<Self> {
        if config.general.tick_ms == 0 {
            return Err(eyre!("tick_ms must be greater than 0"));
        }
        if iterations == Some(0) {
            return Err(eyre!("--iterations must be greater than 0"));
        }
        let history_len = NonZeroUsize::new(config.load.history_len)
            .ok_or_else(|| eyre!("history_len must be greater than 0"))?;

        Ok(Settings {
            tick: Duration::from_millis(config.general.tick_ms),
            proc_root: config.sources.proc_root.clone(),
            history_len,
            load_interval: Duration::from_secs(config.load.interval_secs),
            iterations,
        })
    }
}

async fn run(settings: Settings, sink: &mut dyn Renderer) -> Result<()> {
    let history = LoadHistory::new(settings.history_len, settings.load_interval);
    let mut sampler = Sampler::new(ProcSource::new(&settings.proc_root), history);
    let mut events = EventHandler::new(settings.tick);

    while let Some(event) = events.next().await {
        match event {
            Event::Tick(now) => {
                sampler
                    .tick(now, &mut *sink)
                    .wrap_err("sampling stopped")?;
                if settings.iterations.is_some_and(|limit| sampler.ticks() >= limit) {
                    break;
                }
            }
            Event::Shutdown => {
                tracing::info!(ticks = sampler.ticks(), "interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(tick_ms) = cli.tick_ms {
        config.general.tick_ms = tick_ms;
    }
    if let Some(output) = cli.output {
        config.general.output = output;
    }
    if let Some(ref root) = cli.proc_root {
        config.sources.proc_root = root.clone();
    }
    if let Some(len) = cli.history_len {
        config.load.history_len = len;
    }
    if let Some(secs) = cli.load_interval {
        config.load.interval_secs = secs;
    }

    config
}
