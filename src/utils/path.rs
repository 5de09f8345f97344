//! Path utilities: expand ~ and anchor relative output paths.

use std::env;
use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Absolute form of a user-supplied output path (relative to the cwd).
pub fn resolve_output(path: &str) -> PathBuf {
    let p = expand_tilde(path);
    if p.is_absolute() {
        return p;
    }
    env::current_dir().map(|cwd| cwd.join(&p)).unwrap_or(p)
}
