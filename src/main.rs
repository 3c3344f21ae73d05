use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;

use rtbuffer::audio::{AudioSource, DeviceSource, SyntheticSource};
use rtbuffer::buffer::{OverrunEvent, OverrunObserver, UnderrunEvent, UnderrunObserver};
use rtbuffer::config::{AppConfig, SourceKind};
use rtbuffer::output::{OutputFormat, create_formatter};
use rtbuffer::{BufferPipeline, RealtimeBufferManager};

#[derive(Parser, Debug)]
#[command(name = "rtbuffer")]
#[command(about = "Stream audio through a real-time ring buffer and report its health", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Per-channel buffer capacity in samples (512-65536)
    #[arg(short = 'b', long)]
    buffer_size: Option<usize>,

    /// Number of channels
    #[arg(long)]
    channels: Option<usize>,

    /// Sample rate in Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<u32>,

    /// Producer block size in frames
    #[arg(long)]
    block_size: Option<usize>,

    /// Consumer block size in frames
    #[arg(long)]
    consumer_block: Option<usize>,

    /// Sample source: device, synthetic
    #[arg(short = 's', long, value_enum)]
    source: Option<SourceKind>,

    /// Stop the synthetic source after this many seconds
    #[arg(short = 'd', long, default_value = "5")]
    duration: f32,

    /// Status output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Interval between status lines in milliseconds
    #[arg(long, default_value = "500")]
    status_interval_ms: u64,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(size) = args.buffer_size {
        config.buffer.buffer_size = size;
    }
    if let Some(channels) = args.channels {
        config.buffer.channels = channels;
    }
    if let Some(rate) = args.sample_rate {
        config.buffer.sample_rate = rate;
    }
    if let Some(block) = args.block_size {
        config.audio.block_size = block;
    }
    if let Some(block) = args.consumer_block {
        config.audio.consumer_block = block;
    }
    if let Some(source) = args.source {
        config.audio.source = source;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&args)?;

    let mut manager = RealtimeBufferManager::from_config(&config.buffer)?;

    let on_overrun: OverrunObserver = Arc::new(|e: &OverrunEvent| {
        log::debug!(
            "Overrun on channel {}: dropped {} samples",
            e.channel,
            e.excess_samples
        );
    });
    let on_underrun: UnderrunObserver = Arc::new(|e: &UnderrunEvent| {
        log::debug!(
            "Underrun on channel {}: wanted {}, had {}",
            e.channel,
            e.requested,
            e.latency_samples
        );
    });
    manager.on_overrun(&on_overrun);
    manager.on_underrun(&on_underrun);

    let mut source: Box<dyn AudioSource> = match config.audio.source {
        SourceKind::Device => Box::new(DeviceSource::new(&config.buffer, &config.audio)?),
        SourceKind::Synthetic => Box::new(
            SyntheticSource::new(&config.buffer, &config.audio)
                .with_duration(args.duration)
                .paced(true),
        ),
    };

    eprintln!("=== rtbuffer ===");
    eprintln!(
        "Buffer: {} samples x {} channels",
        config.buffer.buffer_size, config.buffer.channels
    );
    eprintln!("Sample rate: {} Hz", config.buffer.sample_rate);
    eprintln!(
        "Blocks: producer {} / consumer {} frames ({:.2} ms)",
        config.audio.block_size,
        config.audio.consumer_block,
        config.consumer_block_ms()
    );
    eprintln!();

    let (status_tx, status_rx) = bounded(16);
    let formatter = create_formatter(args.format, args.verbose > 0);
    let printer = thread::spawn(move || {
        if let Some(header) = formatter.header() {
            println!("{}", header);
        }
        for report in status_rx {
            println!("{}", formatter.format(&report));
        }
    });

    let mut pipeline = BufferPipeline::new(manager, &config.audio)?;
    let report = pipeline.run(
        source.as_mut(),
        Some(&status_tx),
        Duration::from_millis(args.status_interval_ms),
    )?;

    drop(status_tx);
    if printer.join().is_err() {
        log::warn!("Status printer panicked");
    }

    eprintln!();
    eprintln!("Overruns:  {}", report.overruns);
    eprintln!("Underruns: {}", report.underruns);

    pipeline.into_manager().dispose();
    Ok(())
}
