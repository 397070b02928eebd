use anyhow::{Result, anyhow, bail};
use chrono::Local;
use std::{
    fmt,
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::{Mutex, OnceLock},
};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        format::{DefaultFields, Format, Full, Writer},
        time::FormatTime,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Default filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LEVEL: &str = "info";

/// Local wall-clock timestamps, millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

type FileLayer<S> =
    tracing_subscriber::fmt::Layer<S, DefaultFields, Format<Full, LocalTime>, Mutex<File>>;

fn file_layer<S>(file: File) -> FileLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_timer(LocalTime)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}

type SetStrFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
type SetFileFn = Box<dyn Fn(File) -> Result<()> + Send + Sync>;

static SET_LOG_LEVEL: OnceLock<SetStrFn> = OnceLock::new();
static SET_LOG_FILE: OnceLock<SetFileFn> = OnceLock::new();

fn env_overrides_level() -> bool {
    std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
}

fn make_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

fn store_level_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_LOG_LEVEL.set(Box::new(move |level_str: &str| {
        let filter = EnvFilter::try_new(level_str)
            .map_err(|e| anyhow!("invalid log level '{level_str}': {e}"))?;
        handle
            .reload(filter)
            .map_err(|e| anyhow!("filter reload failed: {e}"))
    }));
}

fn store_file_handle<S>(handle: reload::Handle<Option<FileLayer<S>>, S>)
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync + 'static,
{
    let _ = SET_LOG_FILE.set(Box::new(move |file: File| {
        handle
            .reload(Some(file_layer(file)))
            .map_err(|e| anyhow!("file layer reload failed: {e}"))
    }));
}

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive. Does nothing when `RUST_LOG` is set,
/// so the environment always wins.
pub fn set_log_level(level: &str) -> Result<()> {
    if env_overrides_level() {
        return Ok(());
    }
    match SET_LOG_LEVEL.get() {
        Some(f) => f(level),
        None => bail!("logging not yet initialized"),
    }
}

/// Starts appending log output to `path`, replacing any earlier file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let Some(set_file) = SET_LOG_FILE.get() else {
        bail!("logging not yet initialized");
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;
    set_file(file)
}

/// Initializes logging. Call once at startup, before the config is read.
///
/// Events go to stderr so reports written to stdout stay clean. Colors are
/// only used when stderr is a terminal. No file is written until
/// `enable_file_logging()` is called. The level is `RUST_LOG` when set,
/// else `default_level`, and can be changed later with `set_log_level()`.
pub fn init_logging(default_level: &str) {
    let (level_filter, level_handle) = reload::Layer::new(make_filter(default_level));
    let (file_slot, file_handle) = reload::Layer::new(None);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTime)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(file_slot)
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        store_level_handle(level_handle);
        store_file_handle(file_handle);
    }
}
