use std::sync::OnceLock;

use colored::Colorize;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Silence everything except errors. Set once at startup.
pub fn set_quiet(quiet: bool) {
    let _ = QUIET.set(quiet);
}

fn quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !quiet() {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !quiet() {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message. Shown even in quiet mode.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !quiet() {
        println!("\n{}", msg.bold());
    }
}
