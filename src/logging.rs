use std::path::Path;

use crate::{Error, Result};

/// Routes the `log` facade into an append-only log file.
///
/// Lines look like `2024-05-01 06:00:00 - INFO - Added 2 tracks ...`. Console
/// output is handled separately by [`crate::report::ConsoleReporter`], so the
/// dispatch only writes to the file.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level)
        // keep HTTP internals out of the file unless asked for
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(fern::log_file(log_file)?)
        .apply()
        .map_err(|e| Error::Config(format!("Cannot initialise logging: {e}")))
}
