//! Progress reporting for the CLI walker
//!
//! Spinner while the walk runs, plus a styled header and summary.

use crate::walker::WalkProgress;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that displays live walk counters
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &WalkProgress) {
        let msg = format!(
            "Dirs: {} | Leaves: {} | Size: {} | Rate: {:.0}/s | Pending: {}",
            format_number(progress.dirs),
            format_number(progress.leaves),
            format_size(progress.bytes, BINARY),
            progress.entries_per_second(),
            progress.outstanding,
        );

        self.bar.set_message(msg);
    }

    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Print a summary of the walk results
///
/// `outcome` is `None` for a successful walk, or the failure message.
pub fn print_summary(progress: &WalkProgress, outcome: Option<&str>) {
    let duration_secs = progress.elapsed.as_secs_f64();

    println!();
    match outcome {
        None => println!("{}", style("Walk Complete").green().bold()),
        Some(_) => println!("{}", style("Walk Failed").red().bold()),
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(progress.dirs)
    );
    println!("  {} {}", style("Leaves:").bold(), format_number(progress.leaves));
    println!(
        "  {} {}",
        style("Total Size:").bold(),
        format_size(progress.bytes, BINARY)
    );
    println!(
        "  {} {:.1}s ({:.0} entries/sec)",
        style("Duration:").bold(),
        duration_secs,
        progress.entries_per_second()
    );
    if progress.failures > 0 {
        println!(
            "  {} {}",
            style("Failed tasks:").yellow().bold(),
            format_number(progress.failures)
        );
    }
    if let Some(message) = outcome {
        println!("  {} {}", style("Error:").red().bold(), message);
    }
    println!();
}

/// Print a header at the start of the walk
pub fn print_header(root: &str, workers: usize, executor: &str) {
    println!();
    println!(
        "{} {}",
        style("tree-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Executor:").bold(), executor);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }
}
