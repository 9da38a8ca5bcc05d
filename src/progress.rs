//! Progress and status display
//!
//! A scoped status capability with two implementations chosen by a single
//! boolean: styled console output for interactive runs, tracing events
//! otherwise. Created at the start of an operation and released when
//! dropped, on every exit path.

use crossterm::style::Stylize;

/// Status reporting contract shared by both variants.
pub trait ProgressBar: Send + Sync {
    /// Announce the start of a long-running step.
    fn start(&self, message: &str);

    /// Emit an informational message.
    fn info(&self, message: &str);
}

/// Select the console or logging variant.
pub fn create(interactive: bool) -> Box<dyn ProgressBar> {
    if interactive {
        Box::new(ConsoleProgressBar)
    } else {
        Box::new(LoggerProgressBar)
    }
}

/// Styled stderr output for interactive sessions.
struct ConsoleProgressBar;

impl ProgressBar for ConsoleProgressBar {
    fn start(&self, message: &str) {
        eprintln!("{}", message.to_string().cyan().bold());
    }

    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Log-only output for non-interactive sessions (CI, build tools).
struct LoggerProgressBar;

impl ProgressBar for LoggerProgressBar {
    fn start(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}
