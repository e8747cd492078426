//! Small helpers shared by the binary and printers.

use owo_colors::OwoColorize;
use std::path::Path;

pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if use_colors("human") {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Display `p` relative to the working directory when it lies below it.
pub fn rel_to_wd(p: &Path) -> String {
    let rel = std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(p, wd))
        .filter(|r| !r.starts_with(".."));
    match rel {
        Some(r) if p.is_absolute() => r.to_string_lossy().to_string(),
        _ => p.to_string_lossy().to_string(),
    }
}
