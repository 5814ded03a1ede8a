//! Operator-facing output
//!
//! Every line is timestamped and tagged with a marker so a long deployment can be
//! followed at a glance. Structured logs go through `tracing` separately.

use chrono::Local;
use colored::{ColoredString, Colorize};
use std::time::Duration;

fn print_message(marker: &str, msg: ColoredString, detail: &str, duration: Option<Duration>) {
    let time = Local::now().format("%H:%M:%S%.6f");
    let elapsed = duration.map(format_elapsed).unwrap_or_default();

    println!("{} {} {} {}", marker, msg, elapsed, format!("⌚ {}", time).dimmed());
    if !detail.trim().is_empty() {
        println!("{}", detail.trim_end());
    }
}

pub fn print_ok(msg: &str, duration: Option<Duration>) {
    print_message("✅", msg.green(), "", duration);
}

pub fn print_info(msg: &str) {
    print_message("👉🏽", msg.blue(), "", None);
}

pub fn print_warning(msg: &str) {
    print_message("⚠️", msg.yellow(), "", None);
}

pub fn print_error(msg: &str, detail: &str, duration: Option<Duration>) {
    print_message("❌", msg.red(), detail, duration);
}

pub fn print_command(command: &str) {
    print_message("⚙️", format!("Running: {}", command).bright_black(), "", None);
}

/// Render elapsed time as `[Xm:Ys]`
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("[{}m:{}s]", secs / 60, secs % 60)
}

/// Mask a secret for display, keeping only the last 4 characters
///
/// Example: "0123456789abcdef" -> "****cdef"
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("0123456789abcdef"), "****cdef");
        assert_eq!(mask_secret("abc"), "****abc");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_mask_secret_multibyte() {
        assert_eq!(mask_secret("ключ-секрет"), "****крет");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "[0m:0s]");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "[0m:59s]");
        assert_eq!(format_elapsed(Duration::from_millis(125_900)), "[2m:5s]");
    }
}
