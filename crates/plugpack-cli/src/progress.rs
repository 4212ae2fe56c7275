//! Progress bar for the copy and compress phases of a build.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use plugpack_core::ProgressCallback;
use std::fmt::Write;
use std::path::Path;

const PHASES: [&str; 2] = ["Copying", "Compressing"];

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// A build reports two phases through the same callback: staging the plugin
/// files, then writing them into the archive. Each phase restarts the bar
/// with its own file count and label.
pub struct CliProgress {
    bar: ProgressBar,
    phase: usize,
    phase_started: bool,
    bytes_written: u64,
}

impl CliProgress {
    /// Creates a new CLI progress bar. The length is set by the first entry
    /// of each phase.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);

        // Template: "    Copying [████████░░░░] 42/100 files (15.2 MB, 12s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:>11} [{bar:40.cyan/blue}] {pos}/{len} files ({prefix}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        Self {
            bar,
            phase: 0,
            phase_started: false,
            bytes_written: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn phase_label(&self) -> &'static str {
        PHASES[self.phase.min(PHASES.len() - 1)]
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, _path: &Path, total: usize, _current: usize) {
        if !self.phase_started {
            self.phase_started = true;
            self.bytes_written = 0;
            self.bar.reset();
            self.bar.set_length(total as u64);
            self.bar.set_message(self.phase_label());
            self.bar.set_prefix(humanize_bytes(0));
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.bar.set_prefix(humanize_bytes(self.bytes_written));
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.phase += 1;
        self.phase_started = false;
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(humanize_bytes(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(std::time::Duration::from_secs(7)), "7s");
        assert_eq!(
            humanize_duration(std::time::Duration::from_secs(125)),
            "2m5s"
        );
    }

    #[test]
    fn test_phases_restart_counters() {
        let mut progress = CliProgress::new();

        progress.on_entry_start(Path::new("acme.php"), 2, 1);
        progress.on_bytes_written(100);
        progress.on_entry_complete(Path::new("acme.php"));
        progress.on_entry_start(Path::new("readme.txt"), 2, 2);
        progress.on_bytes_written(50);
        progress.on_entry_complete(Path::new("readme.txt"));
        assert_eq!(progress.bytes_written, 150);
        assert_eq!(progress.phase_label(), "Copying");
        progress.on_complete();

        progress.on_entry_start(Path::new("acme/acme.php"), 2, 1);
        assert_eq!(progress.bytes_written, 0);
        assert_eq!(progress.phase_label(), "Compressing");
        assert_eq!(progress.bar.length(), Some(2));
        assert_eq!(progress.bar.position(), 0);
        progress.on_complete();

        // Extra phases keep the last label.
        assert_eq!(progress.phase_label(), "Compressing");
    }
}
