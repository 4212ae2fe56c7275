//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use plugpack_core::ArchiveManifest;
use plugpack_core::AuditReport;
use plugpack_core::PackageReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
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

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn success_line(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn heading(&self, text: &str) {
        if self.use_colors {
            let _ = self.term.write_line(&format!("{}", style(text).bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn warnings_block(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_package_result(&self, report: &PackageReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.success_line("Plugin archive created with correct structure");
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("  File:      {}", report.archive_name()));
        let _ = self
            .term
            .write_line(&format!("  Size:      {:.2} MB", report.archive_size_mb()));
        let _ = self.term.write_line(&format!(
            "  Files:     {}",
            Self::format_number(report.archive_entries)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Path:      {}",
                report.archive_path.display()
            ));
            let _ = self.term.write_line(&format!(
                "  Excluded:  {}",
                Self::format_number(report.entries_excluded)
            ));
            let _ = self.term.write_line(&format!(
                "  Content:   {}",
                Self::format_size(report.bytes_written)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:  {:?}", report.duration));
        }

        let _ = self.term.write_line("");
        self.heading("WordPress update identifiers:");
        let _ = self
            .term
            .write_line(&format!("  1. Folder name: {}", report.plugin_folder));
        let _ = self
            .term
            .write_line(&format!("  2. Main file:   {}", report.main_file));
        let header_state = if report.header_verified {
            ""
        } else {
            " (header not verified)"
        };
        let _ = self.term.write_line(&format!(
            "  3. Plugin Name: {}{header_state}",
            report.plugin_name
        ));

        let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
        self.warnings_block(&warnings);

        Ok(())
    }

    fn format_verification(
        &self,
        archive: &Path,
        expected: &str,
        manifest: &ArchiveManifest,
        audit: Option<&AuditReport>,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.success_line(&format!("Correct structure verified: {expected}"));
        let _ = self
            .term
            .write_line(&format!("  Archive:   {}", archive.display()));
        let _ = self.term.write_line(&format!(
            "  Entries:   {}",
            Self::format_number(manifest.total_entries)
        ));
        let _ = self.term.write_line(&format!(
            "  Content:   {}",
            Self::format_size(manifest.total_size)
        ));

        if let Some(audit) = audit {
            let _ = self.term.write_line(&format!(
                "  Audited:   {} entries",
                Self::format_number(audit.entries_checked)
            ));
            if audit.is_clean() {
                self.success_line("Archive contents match source");
            } else {
                let issues: Vec<String> = audit.issues.iter().map(ToString::to_string).collect();
                self.warnings_block(&issues);
            }
        }

        Ok(())
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let _ = self.term.write_line(&entry.name);
        }

        Ok(())
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };

            let mode_str = entry
                .mode
                .map_or_else(|| "-".to_string(), |m| format!("{:o}", m & 0o7777));

            let type_char = if entry.is_dir { "d" } else { "-" };

            let _ = self.term.write_line(&format!(
                "{type_char}{mode_str:<6} {size_str:>10}  {}",
                entry.name
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} files, {}",
            Self::format_number(manifest.total_entries),
            Self::format_size(manifest.total_size)
        ));

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
