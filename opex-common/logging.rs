use anyhow::Result;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Returns the default directory for log files: `HOME/.{app_name}/logs`.
pub fn default_logs_dir(app_name: &str) -> PathBuf {
    match std::env::home_dir() {
        Some(path) => path.join(format!(".{app_name}")).join("logs"),
        None => PathBuf::from("logs"),
    }
}

/// Initializes new logging to a daily rolling file and returns worker guard that will flush logs on drop.\
/// **Note** that `RUST_LOG` takes precedence over the built-in filter.
pub fn initialize(app_name: &str, logs_dir: Option<PathBuf>) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = logs_dir.unwrap_or_else(|| default_logs_dir(app_name));
    let appender = tracing_appender::rolling::daily(logs_dir, format!("{app_name}.log"));
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);

    let timer = time::format_description::parse("[year]-[month padding:zero]-[day padding:zero] [hour]:[minute]:[second]")?;
    let time_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(time_offset, timer);

    #[cfg(debug_assertions)]
    let env = format!("warn,{app_name}=debug");

    #[cfg(not(debug_assertions))]
    let env = format!("warn,{app_name}=info");

    let env_filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(env));

    #[cfg(debug_assertions)]
    let file_subscriber = tracing_subscriber::fmt::layer()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_timer(timer)
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .with_filter(env_filter);

    #[cfg(not(debug_assertions))]
    let file_subscriber = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_timer(timer)
        .with_ansi(false)
        .with_writer(non_blocking_appender)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(guard)
}
