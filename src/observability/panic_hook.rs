//! Custom panic hook for structured crash reports.
//!
//! The hook runs for every panic, including ones the shape-test harness later
//! catches; those reports show the `shape_testing` phase.

use super::context::{get_current_context, OperationContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the custom panic hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();

    eprintln!();
    print_header();
    print_panic_details(info);
    print_context_section(&context);
    print_backtrace_section();
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(WIDTH), right)
}

fn line(text: &str) -> String {
    format!("║  {:<width$}║", truncate(text, WIDTH - 2), width = WIDTH - 2)
}

fn print_header() {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    eprintln!("{}", rule('╔', '╗'));
    eprintln!("{}", line("APPSEED CRASH REPORT"));
    eprintln!("{}", rule('╠', '╣'));
    eprintln!("{}", line(&format!("Version: {}", VERSION)));
    eprintln!("{}", line(&format!("Platform: {}", std::env::consts::OS)));
    eprintln!("{}", line(&format!("Time: {}", timestamp)));
    eprintln!("{}", rule('╠', '╣'));
}

fn print_panic_details(info: &PanicHookInfo<'_>) {
    eprintln!("{}", line(&format!("PANIC: {}", extract_panic_message(info))));

    if let Some(location) = info.location() {
        eprintln!(
            "{}",
            line(&format!(
                "Location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ))
        );
    }
}

fn print_context_section(context: &OperationContext) {
    eprintln!("{}", rule('╠', '╣'));
    eprintln!("{}", line("OPERATION CONTEXT:"));

    match &context.phase {
        Some(phase) => eprintln!("{}", line(&format!("  Phase: {}", phase))),
        None => eprintln!("{}", line("  Phase: (not set)")),
    }

    let current_span = Span::current();
    if let Some(metadata) = current_span.metadata() {
        eprintln!("{}", line(&format!("  Span: {}", metadata.name())));
    }

    if let Some(file) = &context.current_file {
        eprintln!("{}", line(&format!("  File: {}", file.display())));
    }
}

fn print_backtrace_section() {
    eprintln!("{}", rule('╠', '╣'));
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!("{}", line("STACK TRACE:"));
        eprintln!("{}", rule('╚', '╝'));
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("{}", line("Run with RUST_BACKTRACE=1 for stack trace"));
        eprintln!("{}", rule('╚', '╝'));
    }
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("this is a long string that needs truncation", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("ééé", 3), "ééé");
    }

    #[test]
    fn test_line_is_fixed_width() {
        assert_eq!(line("x").chars().count(), WIDTH + 2);
        assert_eq!(rule('╔', '╗').chars().count(), WIDTH + 2);
    }
}
