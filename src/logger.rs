//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - timestamped event lines for watch mode
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "rendered {} pages", count);
//! ```

use chrono::Local;
use colored::{ColoredString, Colorize};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
pub fn log(module: &str, message: &str) {
    println!("{} {message}", colorize_prefix(module));
}

/// Log an event line with a dimmed `[HH:MM:SS]` timestamp.
///
/// Used for watch mode, where knowing *when* a change fired matters:
/// `[12:03:55] [watch] modified index.yaml`
pub fn log_timestamped(module: &str, message: &str) {
    let timestamp = format!("[{}]", Local::now().format("%H:%M:%S")).dimmed();
    println!("{timestamp} {} {message}", colorize_prefix(module));
}

/// Apply color to a module prefix based on module type.
fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module {
        "watch" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_wraps_module_in_brackets() {
        assert!(colorize_prefix("build").to_string().contains("[build]"));
        assert!(colorize_prefix("watch").to_string().contains("[watch]"));
        assert!(colorize_prefix("error").to_string().contains("[error]"));
    }

    #[test]
    fn timestamp_format_is_fixed_width() {
        let stamp = Local::now().format("%H:%M:%S").to_string();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }
}
