//! Time formatting helpers for console output.

/// Fractional hours as `HHh MMm`, e.g. 2.5 → "02h 30m".
pub fn format_hours(hours: f64) -> String {
    let total = (hours * 60.0).round().max(0.0) as i64;
    format!("{:02}h {:02}m", total / 60, total % 60)
}
