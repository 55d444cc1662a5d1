use std::io::Write;

use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::PROGRESS_BAR;

/// Logger printing above the progress bar, or straight to the standard error
/// when the bar is hidden.
struct ProgressBarLogger;

fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl log::Log for ProgressBarLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format_record(record);
        if PROGRESS_BAR.is_hidden() {
            eprintln!("{}", msg);
        } else {
            PROGRESS_BAR.println(msg);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: ProgressBarLogger = ProgressBarLogger;

pub fn init_logging(filter: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(filter);

    Ok(())
}

#[cfg(test)]
mod tests {
    use log::{Level, Record};

    use crate::logging::format_record;

    #[test]
    fn record_format() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("Computing consensus of {} reads", 3))
                .level(Level::Info)
                .target("texlca::lca")
                .build(),
        );

        assert!(
            line.ends_with(" [INFO] [texlca::lca] Computing consensus of 3 reads"),
            "unexpected line: {}",
            line
        );
    }
}
