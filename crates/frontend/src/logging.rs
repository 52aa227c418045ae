use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};
use tracing_web::MakeWebConsoleWriter;

/// Route `tracing` output to the browser console
///
/// Unknown levels fall back to `info`. Calling this twice keeps the first
/// subscriber.
pub fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);

    let console = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    if tracing_subscriber::registry().with(console).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}
