//! Output rendering for check results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form lists one
//! record per finding plus a top-level summary.

use crate::models::{CheckResult, Severity};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Print check results in the requested format.
pub fn print_check(res: &CheckResult, output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_check_json(res)) {
            Ok(s) => println!("{s}"),
            Err(e) => tracing::error!("serialize results: {e}"),
        },
        _ => {
            let color = use_colors(output);
            for f in &res.findings {
                let (icon, sev) = match f.severity {
                    Severity::Error => ("✖", "⟦error⟧"),
                    Severity::Warning => ("▲", "⟦warn⟧"),
                };
                let (icon, sev, file) = if color {
                    match f.severity {
                        Severity::Error => (
                            icon.red().to_string(),
                            sev.red().bold().to_string(),
                            f.path.bold().to_string(),
                        ),
                        Severity::Warning => (
                            icon.yellow().to_string(),
                            sev.yellow().bold().to_string(),
                            f.path.bold().to_string(),
                        ),
                    }
                } else {
                    (icon.to_string(), sev.to_string(), f.path.clone())
                };
                let text = if f.text.is_empty() {
                    String::new()
                } else {
                    format!(" {:?}", f.text)
                };
                let mut lines = f.message.lines();
                let first = lines.next().unwrap_or_default();
                println!("{} {} {} ❲{}❳{} — {}", icon, sev, file, f.rule, text, first);
                for rest in lines {
                    println!("    {}", rest);
                }
            }
            let summary = format!(
                "— Summary — errors={} warnings={} files={} fixed={}",
                res.summary.errors, res.summary.warnings, res.summary.files, res.summary.fixed
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose check JSON object (pure) for testing/snapshot purposes.
pub fn compose_check_json(res: &CheckResult) -> JsonVal {
    json!({
        "findings": res.records(),
        "summary": res.summary,
    })
}
