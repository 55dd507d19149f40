use hevy_stats_domain::ProgressReporter;
use log::{LevelFilter, SetLoggerError, info};

/// Log level selected by the number of `-v` flags.
#[must_use]
pub fn level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level(verbosity))
        .format_target(false)
        .parse_default_env()
        .try_init()
}

/// Reports pagination progress as log messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn page_fetched(&mut self, endpoint: &str, page: u32, page_count: u32) {
        info!("Fetching paginated data from {endpoint} (Page {page} of {page_count}) ...");
    }

    fn finished(&mut self, endpoint: &str) {
        info!("Done fetching paginated data from {endpoint}");
    }
}
