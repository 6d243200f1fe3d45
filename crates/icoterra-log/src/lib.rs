//! Tracing subscriber setup for planet generation.
//!
//! Console output carries uptime timestamps and worker thread names, so the
//! per-stage spans of a generation run can be told apart. Debug builds can
//! additionally write JSON lines to a file.

use std::fs::File;
use std::path::Path;

use icoterra_config::Config;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Name of the JSON log file inside the log directory.
pub const LOG_FILE: &str = "icoterra.log";

const DEFAULT_FILTER: &str = "info";

/// Filter directive to use when `RUST_LOG` is unset.
fn filter_directive(config: Option<&Config>) -> &str {
    match config {
        Some(config) if !config.runtime.log_level.is_empty() => &config.runtime.log_level,
        _ => DEFAULT_FILTER,
    }
}

/// JSON-lines layer writing to `file`.
fn json_layer<S>(file: File) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.runtime.log_level`, which wins over `"info"`.
/// With `debug_build` and a `log_dir`, events are also written as JSON to
/// [`LOG_FILE`]; if the directory or file cannot be created, console logging
/// still starts.
///
/// # Examples
///
/// ```no_run
/// use icoterra_config::Config;
/// use icoterra_log::init_logging;
///
/// init_logging(None, false, None);
///
/// let config = Config::standard();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = File::create(log_dir.join(LOG_FILE))
    {
        subscriber.with(json_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// The filter used when neither `RUST_LOG` nor a config level is set.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// A registry with only the JSON file layer, for capturing logs in tests and tools.
pub fn json_file_subscriber(file: File) -> impl tracing::Subscriber + Send + Sync {
    Registry::default().with(json_layer(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert_eq!(format!("{filter}"), "info");
    }

    #[test]
    fn test_config_level_overrides_default() {
        let mut config = Config::standard();
        config.runtime.log_level = "debug,icoterra_mesh=trace".to_string();
        assert_eq!(filter_directive(Some(&config)), "debug,icoterra_mesh=trace");

        config.runtime.log_level.clear();
        assert_eq!(filter_directive(Some(&config)), "info");
        assert_eq!(filter_directive(None), "info");
    }

    #[test]
    fn test_stage_filters_parse() {
        for directive in [
            "info",
            "warn,icoterra_mesh=debug",
            "info,icoterra_terrain[displace]=trace",
            "error",
        ] {
            assert!(
                EnvFilter::try_new(directive).is_ok(),
                "failed to parse filter: {directive}"
            );
        }
    }

    #[test]
    fn test_json_file_layer_writes_structured_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = File::create(&path).unwrap();

        tracing::subscriber::with_default(json_file_subscriber(file), || {
            let _span = tracing::info_span!("stitch").entered();
            tracing::info!(seams = 30, "patches stitched");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().expect("one event logged");
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "patches stitched");
        assert_eq!(event["fields"]["seams"], 30);
        assert_eq!(event["span"]["name"], "stitch");
    }
}
