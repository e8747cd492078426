//! Inline link extraction: `[text](target)` references on a single line.

use regex::Regex;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `http://` or `https://` URL, kept verbatim.
    External { url: String },
    /// Relative document path (empty means the current document) and an
    /// optional section anchor.
    Internal { path: String, anchor: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub target: LinkTarget,
}

/// Extract every inline link on `line`, left to right, without deduplication.
///
/// A trailing attribute block such as `{:target="_blank"}` stays outside the
/// match. An empty fragment (`doc.md#`) yields no anchor.
pub fn extract(line: &str) -> Vec<LinkRef> {
    LINK_RE
        .captures_iter(line)
        .map(|cap| {
            let text = cap[1].to_string();
            let target = &cap[2];
            let target = if target.starts_with("http://") || target.starts_with("https://") {
                LinkTarget::External {
                    url: target.to_string(),
                }
            } else {
                match target.split_once('#') {
                    Some((path, anchor)) => LinkTarget::Internal {
                        path: path.to_string(),
                        anchor: (!anchor.is_empty()).then(|| anchor.to_string()),
                    },
                    None => LinkTarget::Internal {
                        path: target.to_string(),
                        anchor: None,
                    },
                }
            };
            LinkRef { text, target }
        })
        .collect()
}
