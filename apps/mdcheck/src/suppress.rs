//! Inline rule suppression via HTML comment directives.
//!
//! ```markdown
//! <!-- markdownlint-disable MD404 -->
//! [ignored](missing.md)
//! <!-- markdownlint-enable MD404 -->
//! ```
//!
//! A directive without rule ids applies to every rule. Regions do not nest:
//! a second `disable` for the same id before its `enable` is a no-op.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<!--\s*markdownlint-(disable|enable)((?:\s+[A-Za-z0-9_-]+)*)\s*-->\s*$")
        .expect("directive pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Rule ids to disable; empty means all rules.
    Disable(Vec<String>),
    /// Rule ids to re-enable; empty means all rules.
    Enable(Vec<String>),
}

/// Parse a suppression directive occupying the whole line.
pub fn parse_directive(line: &str) -> Option<Directive> {
    let cap = DIRECTIVE_RE.captures(line)?;
    let ids: Vec<String> = cap[2].split_whitespace().map(|s| s.to_ascii_uppercase()).collect();
    Some(match &cap[1] {
        "disable" => Directive::Disable(ids),
        _ => Directive::Enable(ids),
    })
}

#[derive(Debug, Default, Clone)]
/// Per-file suppression state: rule id -> disabled, plus a catch-all flag
/// for id-less directives. Explicit entries win over the catch-all.
pub struct Suppressions {
    regions: HashMap<String, bool>,
    all: bool,
}

impl Suppressions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::Disable(ids) if ids.is_empty() => {
                self.regions.clear();
                self.all = true;
            }
            Directive::Enable(ids) if ids.is_empty() => {
                self.regions.clear();
                self.all = false;
            }
            Directive::Disable(ids) => {
                for id in ids {
                    self.regions.insert(id.clone(), true);
                }
            }
            Directive::Enable(ids) => {
                for id in ids {
                    self.regions.insert(id.clone(), false);
                }
            }
        }
    }

    pub fn is_suppressed(&self, rule_id: &str) -> bool {
        self.regions.get(rule_id).copied().unwrap_or(self.all)
    }
}
