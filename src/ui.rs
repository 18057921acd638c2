//! Terminal output helpers.
//!
//! Status chatter goes to stderr so command output (tag lists, commit hashes)
//! stays clean on stdout.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("!").red().bold(), message);
}

/// Format and print a status message with a blue marker.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("*").blue().bold(), message);
}

/// Format and print a success message with a green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), message);
}

/// Status message that respects `--quiet`.
pub fn status(quiet: bool, message: &str) {
    if !quiet {
        display_status(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_status_quiet_suppresses() {
        // Should print nothing; just exercising the quiet path
        status(true, "hidden");
        status(false, "shown");
    }
}
