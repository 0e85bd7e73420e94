// src/logging/facade.rs
//! `log` crate backend that forwards records into a [`LogSink`](super::LogSink).
//!
//! Filtering follows `RUST_LOG` with `env_logger`'s directive syntax, parsed
//! by `env_filter`, and defaults to `info`.

use env_filter::{Builder, Filter};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::LogHandle;

/// Environment variable holding the filter directives.
pub const FILTER_ENV: &str = "RUST_LOG";

struct SinkLogger {
    handle: LogHandle,
    filter: Filter,
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.filter.matches(record) {
            self.handle.log(format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{:<5} {}] {}", record.level(), record.target(), record.args())
}

/// Build a filter from `RUST_LOG`-style directives, `info` when absent.
pub fn filter_from_directives(directives: Option<&str>) -> Filter {
    let mut builder = Builder::new();
    match directives {
        Some(directives) => builder.parse(directives),
        None => builder.filter_level(LevelFilter::Info),
    };
    builder.build()
}

/// Install the sink as the global `log` backend.
///
/// Can only succeed once per process.
pub fn install(handle: LogHandle) -> Result<(), SetLoggerError> {
    let directives = std::env::var(FILTER_ENV).ok();
    let filter = filter_from_directives(directives.as_deref());
    let max_level = filter.filter();

    log::set_boxed_logger(Box::new(SinkLogger { handle, filter }))?;
    log::set_max_level(max_level);
    Ok(())
}
