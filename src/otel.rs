//! Logging setup for binaries embedding the router.
//!
//! The library only emits `tracing` events; nothing here runs unless a
//! binary calls [`init_logging_with_config`]. Output goes to stderr so the
//! CLI's stdout stays machine-readable.
//!
//! Registration events (route added, resource generated) are rare and always
//! kept. Dispatch events fire on every request, so [`SamplingMode`] applies to
//! them only: events whose target lives under `chainrouter::dispatcher`.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CHAINROUTER_LOG_LEVEL` | `warn` |
//! | `CHAINROUTER_LOG_FORMAT` | `pretty` (`json`, `compact`) |
//! | `CHAINROUTER_LOG_SAMPLING_MODE` | `all` (`error-only`, `sampled`) |
//! | `CHAINROUTER_LOG_SAMPLING_RATE` | `0.1` |
//! | `CHAINROUTER_LOG_ASYNC` | `false` |
//! | `CHAINROUTER_LOG_TARGET_FILTER` | unset |
//!
//! `RUST_LOG`, when set, replaces the level.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use tracing::subscriber::Interest;
use tracing::{Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Target prefix of the per-request dispatch events
const DISPATCH_TARGET: &str = "chainrouter::dispatcher";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    /// One line per event
    Compact,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Which dispatch events get through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    All,
    /// Dispatch warnings and errors only
    ErrorOnly,
    /// Every n-th dispatch event (n = 1 / rate), plus warnings and errors
    Sampled,
}

impl SamplingMode {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error-only" | "error_only" => SamplingMode::ErrorOnly,
            "sampled" => SamplingMode::Sampled,
            _ => SamplingMode::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub sampling_mode: SamplingMode,
    /// 0.0 to 1.0, used by [`SamplingMode::Sampled`]
    pub sampling_rate: f64,
    /// Write through a background thread
    pub async_logging: bool,
    /// Extra comma-separated `EnvFilter` directives, e.g. `chainrouter::router=debug`
    pub target_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: LogFormat::Pretty,
            sampling_mode: SamplingMode::All,
            sampling_rate: 0.1,
            async_logging: false,
            target_filter: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

impl LogConfig {
    /// Read `CHAINROUTER_LOG_*`, falling back to [`LogConfig::default`]
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("CHAINROUTER_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("CHAINROUTER_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            sampling_mode: env::var("CHAINROUTER_LOG_SAMPLING_MODE")
                .map(|s| SamplingMode::parse(&s))
                .unwrap_or(defaults.sampling_mode),
            sampling_rate: env_parse("CHAINROUTER_LOG_SAMPLING_RATE")
                .unwrap_or(defaults.sampling_rate),
            async_logging: env_parse("CHAINROUTER_LOG_ASYNC").unwrap_or(defaults.async_logging),
            target_filter: env::var("CHAINROUTER_LOG_TARGET_FILTER").ok(),
        }
    }

    fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        let directives = self.target_filter.as_deref().unwrap_or_default();
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("Ignoring log filter directive '{directive}': {e}"),
            }
        }
        filter
    }
}

/// Thins out dispatch events; everything else passes
pub struct DispatchSampler {
    mode: SamplingMode,
    interval: u64,
    seen: AtomicU64,
}

impl DispatchSampler {
    #[must_use]
    pub fn new(mode: SamplingMode, sampling_rate: f64) -> Self {
        let rate = sampling_rate.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let interval = if rate > 0.0 { (1.0 / rate).round() as u64 } else { 0 };
        Self {
            mode,
            interval,
            seen: AtomicU64::new(0),
        }
    }

    fn is_dispatch(metadata: &Metadata<'_>) -> bool {
        metadata.target().starts_with(DISPATCH_TARGET)
    }

    fn is_severe(metadata: &Metadata<'_>) -> bool {
        *metadata.level() <= Level::WARN
    }

    fn keep(&self, metadata: &Metadata<'_>) -> bool {
        if !Self::is_dispatch(metadata) {
            return true;
        }
        let severe = Self::is_severe(metadata);
        match self.mode {
            SamplingMode::All => true,
            SamplingMode::ErrorOnly => severe,
            SamplingMode::Sampled => {
                severe
                    || (self.interval > 0
                        && self.seen.fetch_add(1, Ordering::Relaxed) % self.interval == 0)
            }
        }
    }
}

impl<S> Layer<S> for DispatchSampler
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    // Sampled dispatch callsites must be asked per event, so their interest
    // is never cached as always/never.
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        let counted = self.mode == SamplingMode::Sampled
            && Self::is_dispatch(metadata)
            && !Self::is_severe(metadata);
        if counted {
            Interest::sometimes()
        } else if self.keep(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: LayerContext<'_, S>) -> bool {
        self.keep(metadata)
    }
}

/// [`init_logging_with_config`] with the level overridden
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(log_level: &str) -> Result<Option<WorkerGuard>> {
    let config = LogConfig {
        log_level: log_level.to_string(),
        ..LogConfig::from_env()
    };
    init_logging_with_config(&config)
}

/// Install the global subscriber
///
/// With `async_logging` the returned guard flushes on drop; keep it alive
/// until the program exits.
///
/// ```no_run
/// use chainrouter::otel::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        (BoxMakeWriter::new(writer), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(DispatchSampler::new(config.sampling_mode, config.sampling_rate))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(guard)
}
