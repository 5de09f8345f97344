use crate::errors::AppResult;
use std::fmt;
use std::io::{self, BufRead, Write};

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_KICK: &str = "👶";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Big counter line shown after `add` and by `status`.
pub fn counter<T: fmt::Display>(label: T, value: i64) {
    println!("{} {}{}{}{} {}", ICON_KICK, BOLD, FG_GREEN, value, RESET, label);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}{}====================== {}\n{}",
        FG_BLUE, BOLD, msg, RESET
    );
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no,
/// including a closed stdin.
pub fn confirm<T: fmt::Display>(question: T) -> AppResult<bool> {
    print!("{}{}{} {}{} [y/N]: ", FG_YELLOW, BOLD, ICON_WARN, RESET, question);
    io::stdout().flush()?;

    let answer = read_line(&mut io::stdin().lock())?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Read one trimmed line of input. Used for the PIN prompt.
pub fn prompt<T: fmt::Display>(label: T) -> AppResult<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

fn read_line(input: &mut impl BufRead) -> AppResult<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
