//! Terminal decoration for the `jenkinshash` binary.
//!
//! Hash values are written by the caller, never through [`Ui`], so piping
//! stdout always yields bare numbers. Status lines and the spinner go to
//! stderr; `config show` listings go to stdout in a TOML-shaped layout.

use indicatif::{ProgressBar, ProgressStyle};
use nu_ansi_term::{Color, Style};
use std::fmt::Display;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorMode {
    /// Colour when the target stream is a terminal.
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Note,
    Done,
    Caution,
}

pub struct Ui {
    quiet: bool,
    color_stdout: bool,
    color_stderr: bool,
    spinner: bool,
}

impl Ui {
    pub fn new(color: ColorMode, quiet: bool) -> Self {
        let stderr_tty = std::io::stderr().is_terminal();
        let color_stdout = color.enabled(std::io::stdout().is_terminal());
        let color_stderr = color.enabled(stderr_tty);

        #[cfg(windows)]
        if color_stdout || color_stderr {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            quiet,
            color_stdout,
            color_stderr,
            spinner: stderr_tty && !quiet,
        }
    }

    /// Prints a `[table]` header and aligned `key = value` lines, the same
    /// shape the config file uses. Empty tables print nothing.
    pub fn table<K, V>(&self, header: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Display,
        V: Display,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if entries.is_empty() {
            return;
        }
        let header = format!("[{header}]");
        if self.color_stdout {
            println!("{}", Style::new().fg(Color::Cyan).bold().paint(header));
        } else {
            println!("{header}");
        }
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in entries {
            let key = format!("{key:<width$}");
            if self.color_stdout {
                println!("{} = {}", Style::new().bold().paint(key), value);
            } else {
                println!("{key} = {value}");
            }
        }
        println!();
    }

    pub fn info(&self, message: &str) {
        self.status(Status::Note, message);
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Done, message);
    }

    /// Shown even with `--quiet`.
    pub fn warn(&self, message: &str) {
        self.status(Status::Caution, message);
    }

    fn status(&self, status: Status, message: &str) {
        if self.quiet && status != Status::Caution {
            return;
        }
        let (label, color) = match status {
            Status::Note => ("note", Color::Blue),
            Status::Done => ("done", Color::Green),
            Status::Caution => ("warning", Color::Yellow),
        };
        if self.color_stderr {
            eprintln!("{}: {message}", Style::new().fg(color).bold().paint(label));
        } else {
            eprintln!("{label}: {message}");
        }
    }

    /// Spinner on stderr while rows are read and hashed. Only drawn when
    /// stderr is a terminal and `--quiet` is off.
    pub fn task(&self, label: impl Into<String>) -> TaskGuard {
        let label = label.into();
        let pb = self.spinner.then(|| {
            let style = ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/ ");
            let pb = ProgressBar::new_spinner().with_style(style);
            pb.set_message(label.clone());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        TaskGuard {
            label,
            start: Instant::now(),
            finished: false,
            pb,
        }
    }
}

/// Clears the spinner on [`finish`](TaskGuard::finish); on early drop
/// (an error path) it leaves a failure line behind.
pub struct TaskGuard {
    label: String,
    start: Instant,
    finished: bool,
    pb: Option<ProgressBar>,
}

impl TaskGuard {
    pub fn finish(mut self) -> Duration {
        self.finished = true;
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
        self.start.elapsed()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        match self.pb.take() {
            Some(pb) => pb.abandon_with_message(format!(
                "{} failed after {}",
                self.label,
                format_duration(self.start.elapsed())
            )),
            None => tracing::debug!(label = %self.label, "task ended without finishing"),
        }
    }
}

/// Short human form; hashing small inputs usually takes microseconds.
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{:.1}ms", duration.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pick_a_readable_unit() {
        assert_eq!(format_duration(Duration::from_micros(42)), "42µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_millis(2_500)), "2.50s");
    }

    #[test]
    fn color_mode_follows_terminal_only_in_auto() {
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
    }
}
