//! Terminal output helpers for the `bhook` binary

use colored::*;
use std::collections::BTreeMap;

/// Displays a success message with a green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Displays an error message with a red X mark
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints environment entries as `KEY=value` lines, keys highlighted
pub fn print_env(env: &BTreeMap<String, String>) {
    for (key, value) in env {
        println!("{}={}", key.bright_cyan(), value);
    }
}
