// # linkmond - Link Status Watch Daemon
//
// This is a thin integration layer: all detection and monitoring logic
// lives in linkmon-core and linkmon-ioctl.
//
// The linkmond daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the ioctl probe and procfs counters into a monitor
// 4. Printing every sample until SIGINT/SIGTERM
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `LINKMON_INTERFACES`: Comma-separated interfaces to watch (required)
// - `LINKMON_POLL_MS`: Poll period in milliseconds (default 2000)
// - `LINKMON_DELTA`: Received bytes per poll period above which an
//   interface without a carrier signal counts as up (0 disables)
// - `LINKMON_OUTPUT`: `text` (default) or `json`
// - `LINKMON_PROC_NET_DEV`: Counter file (default /proc/net/dev)
// - `LINKMON_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export LINKMON_INTERFACES=eth0,wlan0,tap0
// export LINKMON_DELTA=4096
// linkmond
// ```

use anyhow::{Context, Result};
use linkmon_core::{
    HeuristicConfig, LinkStatusMonitor, LinkStatusSample, MonitorConfig, SampleReceiver,
};
use linkmon_ioctl::{DEFAULT_PROC_NET_DEV, IoctlProbe, ProcNetDevCounters};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

const DEFAULT_POLL_MS: u64 = 2000;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum LinkmonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<LinkmonExitCode> for ExitCode {
    fn from(code: LinkmonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// How samples are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// Application configuration
struct Config {
    interfaces: Vec<String>,
    poll_ms: u64,
    delta: u64,
    output: String,
    proc_net_dev: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            interfaces: env::var("LINKMON_INTERFACES")
                .context("LINKMON_INTERFACES is required")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            poll_ms: parse_var("LINKMON_POLL_MS")?.unwrap_or(DEFAULT_POLL_MS),
            delta: parse_var("LINKMON_DELTA")?.unwrap_or(0),
            output: env::var("LINKMON_OUTPUT").unwrap_or_else(|_| "text".to_string()),
            proc_net_dev: env::var("LINKMON_PROC_NET_DEV")
                .unwrap_or_else(|_| DEFAULT_PROC_NET_DEV.to_string()),
            log_level: env::var("LINKMON_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.interfaces.is_empty() {
            anyhow::bail!(
                "LINKMON_INTERFACES must name at least one interface. \
                Set it via: export LINKMON_INTERFACES=eth0,wlan0"
            );
        }

        if !(100..=3_600_000).contains(&self.poll_ms) {
            anyhow::bail!(
                "LINKMON_POLL_MS must be between 100 and 3600000. Got: {}",
                self.poll_ms
            );
        }

        self.output_format()?;

        if self.proc_net_dev.is_empty() {
            anyhow::bail!("LINKMON_PROC_NET_DEV cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "LINKMON_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        // Name rules live with the monitor configuration
        self.monitor_config().validate()?;

        Ok(())
    }

    fn output_format(&self) -> Result<OutputFormat> {
        match self.output.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!(
                "LINKMON_OUTPUT '{}' is not supported. Supported formats: text, json",
                self.output
            ),
        }
    }

    fn monitor_config(&self) -> MonitorConfig {
        let heuristic = if self.delta > 0 {
            HeuristicConfig::with_threshold(self.delta)
        } else {
            HeuristicConfig::disabled()
        };

        MonitorConfig::new(&self.interfaces)
            .with_poll_interval(Duration::from_millis(self.poll_ms))
            .with_heuristic(heuristic)
    }
}

/// Parse an optional numeric environment variable
fn parse_var(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer. Got: {}", name, value)),
        Err(_) => Ok(None),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return LinkmonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return LinkmonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return LinkmonExitCode::ConfigError.into();
    }

    info!("Starting linkmond");
    info!(
        "Watching {} interface(s): {}",
        config.interfaces.len(),
        config.interfaces.join(", ")
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return LinkmonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            LinkmonExitCode::RuntimeError
        } else {
            LinkmonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: Config) -> Result<()> {
    let format = config.output_format()?;
    let monitor_config = config.monitor_config();

    if monitor_config.heuristic.enabled {
        info!(
            "Traffic heuristic enabled: threshold {} bytes per {} ms, counters from {}",
            config.delta, config.poll_ms, config.proc_net_dev
        );
    }

    let (mut monitor, rx) = LinkStatusMonitor::new(
        monitor_config,
        Box::new(IoctlProbe::new()),
        Box::new(ProcNetDevCounters::with_path(&config.proc_net_dev)),
    )?;

    let shutdown = shutdown_signal()?;
    let mut stdout = std::io::stdout();

    watch(&mut monitor, rx, shutdown, format, &mut stdout).await
}

/// Run `monitor` and write its samples to `out` until `shutdown` fires
///
/// The monitor is stopped on every exit path, including output errors.
async fn watch<F, W>(
    monitor: &mut LinkStatusMonitor,
    rx: SampleReceiver,
    shutdown: F,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    F: Future<Output = &'static str>,
    W: Write,
{
    tokio::pin!(shutdown);

    monitor.run()?;
    info!("Monitor running");

    let mut samples = rx.into_stream();

    let outcome = loop {
        tokio::select! {
            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal);
                break Ok(());
            }
            sample = samples.next() => match sample {
                Some(sample) => {
                    if let Err(e) = write_sample(out, &sample, format) {
                        break Err(e);
                    }
                }
                None => break Err(anyhow::anyhow!("Monitor stopped unexpectedly")),
            }
        }
    };

    info!("Shutting down daemon");
    monitor.stop().await?;

    outcome
}

fn write_sample<W: Write>(out: &mut W, sample: &LinkStatusSample, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (name, status) in sample.iter() {
                writeln!(out, "{}: {}", name, status).context("Failed to write sample")?;
            }
        }
        OutputFormat::Json => {
            let line = serde_json::to_string(sample).context("Failed to serialize sample")?;
            writeln!(out, "{}", line).context("Failed to write sample")?;
        }
    }

    out.flush().context("Failed to write sample")
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Handlers are installed before the returned future is first polled, so a
/// signal arriving while the monitor starts is not lost.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(_) => "ctrl-c handler failure",
        }
    })
}
