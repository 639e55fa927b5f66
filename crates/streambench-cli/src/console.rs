//! CLI console utilities

use colored::*;
use streambench_core::EndpointStatus;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!(
            "{}",
            "=".repeat(console::measure_text_width(title)).dimmed()
        );
    }

    /// Print a key/value line
    pub fn print_field(&self, key: &str, value: &str) {
        println!("  {:<14} {}", format!("{}:", key).dimmed(), value);
    }
}

/// Status word colored by outcome
pub fn status_label(status: EndpointStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        EndpointStatus::Idle => label.dimmed(),
        EndpointStatus::Waiting => label.yellow(),
        EndpointStatus::Streaming => label.cyan(),
        EndpointStatus::Done => label.green().bold(),
        EndpointStatus::Error => label.red().bold(),
    }
}
