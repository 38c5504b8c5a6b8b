//! Reporting handle shared by every component of a run.
//!
//! Each notable event is written to the persistent log through the `log`
//! facade and echoed to the console with a severity tag. Components receive a
//! `&dyn Reporter` instead of reaching for a global handle, which also lets
//! tests capture what a run reported.

use std::{fmt, sync::Mutex, time::Duration};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

impl Severity {
    fn log_level(self) -> log::Level {
        match self {
            Severity::Info | Severity::Success => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Critical => log::Level::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Severity::Info => "INFO",
            Severity::Success => "✓",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(tag)
    }
}

pub trait Reporter: Send + Sync {
    /// Records a single event.
    fn report(&self, severity: Severity, message: &str);

    /// Announces the phase a run is currently in. Purely cosmetic.
    fn phase(&self, _message: &str) {}

    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(Severity::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }

    fn critical(&self, message: &str) {
        self.report(Severity::Critical, message);
    }
}

/// Reporter used by the binary: log file plus colored console lines.
///
/// While a phase is active a spinner shows it on terminals; console lines are
/// printed around the spinner so they stay readable. When stdout is not a
/// terminal (cron, systemd) the spinner stays hidden and only lines are printed.
pub struct ConsoleReporter {
    spinner: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        Self { spinner }
    }

    /// Clears the spinner once a run is over.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn tag(severity: Severity) -> colored::ColoredString {
        let tag = severity.to_string();
        match severity {
            Severity::Info => tag.blue().bold(),
            Severity::Success => tag.green().bold(),
            Severity::Warning => tag.yellow().bold(),
            Severity::Error => tag.red().bold(),
            Severity::Critical => tag.red().bold().underline(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, severity: Severity, message: &str) {
        log::log!(severity.log_level(), "{}", message);
        let line = format!("[{}] {}", Self::tag(severity), message);
        self.spinner.suspend(|| match severity {
            Severity::Error | Severity::Critical => eprintln!("{line}"),
            _ => println!("{line}"),
        });
    }

    fn phase(&self, message: &str) {
        log::debug!("{}", message);
        self.spinner.set_message(message.to_string());
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn events(&self) -> Vec<(Severity, String)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, message: &str) {
        log::log!(severity.log_level(), "{}", message);
        if let Ok(mut events) = self.events.lock() {
            events.push((severity, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_tags_match_console_format() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn severities_map_to_log_levels() {
        assert_eq!(Severity::Success.log_level(), log::Level::Info);
        assert_eq!(Severity::Warning.log_level(), log::Level::Warn);
        assert_eq!(Severity::Critical.log_level(), log::Level::Error);
    }
}
