//! Shared data models for findings, rules, and front-matter metadata.

pub mod meta;
pub mod schema;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Finding severity. Only `Error` contributes to a failing exit code.
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Structural rules applied by the markdown scanner.
pub enum Rule {
    /// Heading level jumps by more than one.
    HeadingIncrement,
    /// Heading needs an explicit `{#id}` anchor.
    HeadingAnchor,
    /// Explicit anchor is empty or already used.
    DuplicateAnchor,
    /// Internal link points at a missing file or anchor.
    BrokenLink,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::HeadingIncrement,
        Rule::HeadingAnchor,
        Rule::DuplicateAnchor,
        Rule::BrokenLink,
    ];

    /// Identifier used in suppression directives and config.
    pub fn id(self) -> &'static str {
        match self {
            Rule::HeadingIncrement => "MD001",
            Rule::HeadingAnchor => "MD401",
            Rule::DuplicateAnchor => "MD402",
            Rule::BrokenLink => "MD404",
        }
    }

    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::ALL
            .into_iter()
            .find(|r| r.id().eq_ignore_ascii_case(id.trim()))
    }

    pub fn severity(self) -> Severity {
        match self {
            Rule::HeadingIncrement | Rule::HeadingAnchor => Severity::Warning,
            Rule::DuplicateAnchor | Rule::BrokenLink => Severity::Error,
        }
    }
}

/// Rule label attached to findings produced by front-matter validation.
pub const META_RULE: &str = "meta";
/// Rule label attached to findings for unreadable or unwritable files.
pub const IO_RULE: &str = "io";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One reported issue, immutable once created.
pub struct Finding {
    pub path: String,
    pub text: String,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(
        path: impl Into<String>,
        text: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Finding {
            path: path.into(),
            text: text.into(),
            rule: rule.into(),
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
/// Public result shape: exactly one of `warn`/`err` is populated.
pub struct FindingRecord {
    pub path: String,
    pub text: String,
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl From<&Finding> for FindingRecord {
    fn from(f: &Finding) -> Self {
        let (warn, err) = match f.severity {
            Severity::Warning => (Some(f.message.clone()), None),
            Severity::Error => (None, Some(f.message.clone())),
        };
        FindingRecord {
            path: f.path.clone(),
            text: f.text.clone(),
            rule: f.rule.clone(),
            warn,
            err,
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
/// Aggregated run summary used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
    pub fixed: usize,
}

#[derive(Debug, Default)]
/// Check results container.
pub struct CheckResult {
    pub findings: Vec<Finding>,
    pub summary: Summary,
}

impl CheckResult {
    pub fn records(&self) -> Vec<FindingRecord> {
        self.findings.iter().map(FindingRecord::from).collect()
    }
}
