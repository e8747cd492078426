//! Line-oriented structural scanner for markdown documents.
//!
//! Each line is classified (front matter, code fence, admonition, callout,
//! suppression directive, heading, text) and headings are checked against
//! the heading rules:
//! - `MD001`: a heading may go at most one level deeper than the previous one.
//! - `MD401`: headings at `anchor_depth` or deeper need an explicit `{#id}`
//!   when the implied id is empty, drops non-ASCII text, or collides.
//! - `MD402`: explicit anchors must be non-empty and unique.
//!
//! Lines carrying prose are also checked for internal links (`MD404`).
//!
//! With `autofix`, `MD001` and `MD401` violations are rewritten in an output
//! buffer. The fixed text re-scans clean for those rules: the corrected level
//! feeds the next heading's check, and generated anchors avoid every id the
//! document already uses.
//!
//! Anchor lookups for links go through a [`RunAnchors`] snapshot when one is
//! given, so every file of a run sees linked documents as they read after
//! fixes, whatever order files are scanned or written in.

use crate::error::ScanError;
use crate::links::{self, LinkTarget};
use crate::models::{Finding, Rule};
use crate::suppress::{parse_directive, Directive, Suppressions};
use crate::utils;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*?)[ \t]*$").expect("heading pattern"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)[ \t]*\{#([^}]*)\}$").expect("anchor pattern"));
static CLOSING_HASHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[ \t]+)#+$").expect("closing hashes pattern"));
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{.*\}\}$").expect("placeholder pattern"));
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("fence pattern"));
static ADMONITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:!!!|\?\?\?\+?)[ \t]+\S").expect("admonition pattern"));
static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("code span pattern"));

#[derive(Debug, Clone)]
/// Scanner settings.
pub struct ScanOptions {
    pub autofix: bool,
    /// Headings at this level or deeper are subject to `MD401`.
    pub anchor_depth: usize,
    pub check_links: bool,
    /// Rule ids never reported.
    pub disabled: HashSet<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            autofix: false,
            anchor_depth: 2,
            check_links: true,
            disabled: HashSet::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Findings in order of first occurrence.
    pub findings: Vec<Finding>,
    /// Rewritten document; `None` when autofix was off or nothing changed.
    pub fixed: Option<String>,
}

pub fn read_source(path: &Path) -> Result<String, ScanError> {
    fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and scan one markdown file.
///
/// Linked documents found in `run` (the file itself included) are resolved
/// from it; any other linked document is read from disk.
pub fn scan(
    path: &Path,
    opts: &ScanOptions,
    run: &RunAnchors,
) -> Result<ScanOutcome, ScanError> {
    let source = read_source(path)?;
    let label = utils::rel_to_wd(path);
    Ok(scan_with(&label, path.parent(), &source, opts, run.get(path), run))
}

/// Scan markdown `source`. `label` names the file in findings and
/// `base_dir` resolves relative link targets (link files are not checked
/// when it is `None`).
pub fn scan_source(
    label: &str,
    base_dir: Option<&Path>,
    source: &str,
    opts: &ScanOptions,
) -> ScanOutcome {
    scan_with(label, base_dir, source, opts, None, &RunAnchors::default())
}

/// Heading ids `source` defines once `opts` fixes are applied.
pub fn final_anchors(source: &str, opts: &ScanOptions) -> AnchorIndex {
    if !opts.autofix {
        return AnchorIndex::collect(source);
    }
    let headings_only = ScanOptions {
        check_links: false,
        ..opts.clone()
    };
    match scan_source("", None, source, &headings_only).fixed {
        Some(fixed) => AnchorIndex::collect(&fixed),
        None => AnchorIndex::collect(source),
    }
}

fn scan_with(
    label: &str,
    base_dir: Option<&Path>,
    source: &str,
    opts: &ScanOptions,
    own: Option<&AnchorIndex>,
    run: &RunAnchors,
) -> ScanOutcome {
    let lines = classify(source);
    let index = AnchorIndex::from_lines(&lines);
    let mut scanner = Scanner {
        label,
        base_dir,
        opts,
        index: &index,
        own: own.unwrap_or(&index),
        run,
        findings: Vec::new(),
        suppress: Suppressions::new(),
        prev_level: None,
        taken: HashSet::new(),
        explicit_seen: HashSet::new(),
        targets: HashMap::new(),
    };

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut changed = false;
    for line in &lines {
        match &line.kind {
            LineKind::Directive(d) => {
                scanner.suppress.apply(d);
                out.push(line.raw.to_string());
                continue;
            }
            LineKind::Heading(h) => match scanner.heading(line.text, h) {
                Some(fixed) => {
                    changed = true;
                    out.push(format!("{}{}", fixed, &line.raw[line.text.len()..]));
                }
                None => out.push(line.raw.to_string()),
            },
            _ => out.push(line.raw.to_string()),
        }
        if opts.check_links && line.kind.carries_links() {
            scanner.links(line.text);
        }
    }

    debug!(file = label, findings = scanner.findings.len(), changed, "scanned");
    ScanOutcome {
        findings: scanner.findings,
        fixed: (opts.autofix && changed).then(|| out.join("\n")),
    }
}

/// Implied heading id: ASCII alphanumerics, `_` and `-`, lowercased, with
/// whitespace folded into single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if (ch == '-' || ch.is_whitespace()) && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[derive(Debug, Default, Clone)]
/// Heading ids defined by one document.
pub struct AnchorIndex {
    /// Ids written as `{#id}`.
    pub explicit: HashSet<String>,
    /// Explicit ids plus non-empty implied ids.
    pub all: HashSet<String>,
}

impl AnchorIndex {
    pub fn collect(source: &str) -> Self {
        Self::from_lines(&classify(source))
    }

    fn from_lines(lines: &[Line<'_>]) -> Self {
        let mut index = AnchorIndex::default();
        for line in lines {
            let LineKind::Heading(h) = &line.kind else {
                continue;
            };
            if h.is_placeholder() {
                continue;
            }
            match h.anchor {
                Some(a) if !a.is_empty() => {
                    index.explicit.insert(a.to_string());
                    index.all.insert(a.to_string());
                }
                Some(_) => {}
                None => {
                    let slug = slugify(h.title);
                    if !slug.is_empty() {
                        index.all.insert(slug);
                    }
                }
            }
        }
        index
    }

    pub fn contains(&self, id: &str) -> bool {
        self.all.contains(id)
    }
}

/// Read-only anchor indexes for the documents of one run, keyed by
/// lexically normalized path.
#[derive(Debug, Default)]
pub struct RunAnchors {
    docs: HashMap<PathBuf, AnchorIndex>,
}

impl RunAnchors {
    pub fn insert(&mut self, path: &Path, index: AnchorIndex) {
        self.docs.insert(normalize(path), index);
    }

    pub fn get(&self, path: &Path) -> Option<&AnchorIndex> {
        self.docs.get(&normalize(path))
    }
}

impl FromIterator<(PathBuf, AnchorIndex)> for RunAnchors {
    fn from_iter<I: IntoIterator<Item = (PathBuf, AnchorIndex)>>(iter: I) -> Self {
        let mut run = RunAnchors::default();
        for (path, index) in iter {
            run.insert(&path, index);
        }
        run
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading<'a> {
    level: usize,
    /// Byte range of the opening `#` run within the line.
    hashes: Range<usize>,
    title: &'a str,
    anchor: Option<&'a str>,
}

impl Heading<'_> {
    fn is_placeholder(&self) -> bool {
        PLACEHOLDER_RE.is_match(self.title)
    }
}

fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let cap = HEADING_RE.captures(line)?;
    let hashes = cap.get(1)?;
    let rest = cap.get(2)?.as_str();
    let (title, anchor) = match ANCHOR_RE.captures(rest) {
        Some(a) => (a.get(1)?.as_str(), Some(a.get(2)?.as_str())),
        None => (rest, None),
    };
    let title = match CLOSING_HASHES_RE.find(title) {
        Some(m) => &title[..m.start()],
        None => title,
    };
    Some(Heading {
        level: hashes.len(),
        hashes: hashes.range(),
        title,
        anchor,
    })
}

#[derive(Debug)]
enum LineKind<'a> {
    FrontMatter,
    Fence,
    Code,
    Admonition,
    Callout,
    Directive(Directive),
    Heading(Heading<'a>),
    Text,
}

impl LineKind<'_> {
    fn carries_links(&self) -> bool {
        matches!(
            self,
            LineKind::Admonition | LineKind::Callout | LineKind::Heading(_) | LineKind::Text
        )
    }
}

struct Line<'a> {
    /// Line as split from the source, including any `\r`.
    raw: &'a str,
    text: &'a str,
    kind: LineKind<'a>,
}

/// Closing line index of a leading `---` front-matter block.
fn front_matter_end(texts: &[&str]) -> Option<usize> {
    if texts.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }
    texts
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| matches!(l.trim_end(), "---" | "..."))
        .map(|(i, _)| i)
}

fn classify(source: &str) -> Vec<Line<'_>> {
    let raws: Vec<&str> = source.split('\n').collect();
    let texts: Vec<&str> = raws
        .iter()
        .map(|&l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let fm_end = front_matter_end(&texts);

    let mut fence: Option<(char, usize)> = None;
    let mut in_admonition = false;
    let mut lines = Vec::with_capacity(raws.len());
    for (i, (&raw, &text)) in raws.iter().zip(texts.iter()).enumerate() {
        let kind = if fm_end.is_some_and(|end| i <= end) {
            LineKind::FrontMatter
        } else if let Some((ch, len)) = fence {
            let t = text.trim();
            let run = t.chars().take_while(|c| *c == ch).count();
            if run >= len && run == t.chars().count() {
                fence = None;
                LineKind::Fence
            } else {
                LineKind::Code
            }
        } else if let Some(m) = FENCE_RE.captures(text).and_then(|c| c.get(1)) {
            let marker = m.as_str();
            fence = marker.chars().next().map(|c| (c, marker.len()));
            in_admonition = false;
            LineKind::Fence
        } else if in_admonition && is_indented_or_blank(text) {
            LineKind::Admonition
        } else if ADMONITION_RE.is_match(text) {
            in_admonition = true;
            LineKind::Admonition
        } else {
            in_admonition = false;
            let lead = text.trim_start();
            if let Some(d) = parse_directive(text) {
                LineKind::Directive(d)
            } else if lead.starts_with("***") || lead.starts_with('>') {
                LineKind::Callout
            } else if let Some(h) = parse_heading(text) {
                LineKind::Heading(h)
            } else {
                LineKind::Text
            }
        };
        lines.push(Line { raw, text, kind });
    }
    lines
}

fn is_indented_or_blank(text: &str) -> bool {
    text.trim().is_empty() || text.starts_with("    ") || text.starts_with('\t')
}

/// Per-call scan state; nothing here outlives one document.
struct Scanner<'a> {
    label: &'a str,
    base_dir: Option<&'a Path>,
    opts: &'a ScanOptions,
    /// Ids as written in the source; drives the heading rules.
    index: &'a AnchorIndex,
    /// Ids same-document links resolve against.
    own: &'a AnchorIndex,
    run: &'a RunAnchors,
    findings: Vec<Finding>,
    suppress: Suppressions,
    prev_level: Option<usize>,
    /// Ids assigned so far (explicit, implied, generated).
    taken: HashSet<String>,
    /// Explicit or generated ids seen so far.
    explicit_seen: HashSet<String>,
    /// Linked documents outside `run`; `None` when unreadable.
    targets: HashMap<PathBuf, Option<AnchorIndex>>,
}

impl Scanner<'_> {
    /// Record a finding unless the rule is disabled or suppressed. Returns
    /// whether it was recorded; fixes apply only to recorded findings.
    fn report(&mut self, rule: Rule, text: &str, message: String) -> bool {
        let id = rule.id();
        if self.opts.disabled.contains(id) || self.suppress.is_suppressed(id) {
            return false;
        }
        self.findings.push(Finding::new(
            self.label,
            text.trim(),
            id,
            rule.severity(),
            message,
        ));
        true
    }

    /// Check one heading; returns the rewritten line when a fix applies.
    fn heading(&mut self, text: &str, h: &Heading<'_>) -> Option<String> {
        if h.is_placeholder() {
            return None;
        }
        let autofix = self.opts.autofix;

        let mut level = h.level;
        if let Some(prev) = self.prev_level {
            if level > prev + 1 {
                let msg = format!(
                    "heading level skipped: h{} after h{}, expect at most h{}",
                    level,
                    prev,
                    prev + 1
                );
                if self.report(Rule::HeadingIncrement, text, msg) && autofix {
                    level = prev + 1;
                }
            }
        }
        self.prev_level = Some(level);

        let mut new_anchor: Option<String> = None;
        match h.anchor {
            Some(a) => {
                if a.trim().is_empty() {
                    self.report(Rule::DuplicateAnchor, text, "empty anchor id".to_string());
                } else if !self.explicit_seen.insert(a.to_string()) {
                    self.report(Rule::DuplicateAnchor, text, format!("duplicate anchor id `{a}`"));
                }
                self.taken.insert(a.to_string());
            }
            None => {
                let slug = slugify(h.title);
                let reason = if level < self.opts.anchor_depth {
                    None
                } else if slug.is_empty() {
                    Some("implied id is empty".to_string())
                } else if !h.title.is_ascii() {
                    Some(format!("implied id `{slug}` drops non-ASCII text"))
                } else if self.taken.contains(&slug) || self.index.explicit.contains(&slug) {
                    Some(format!("implied id `{slug}` collides with another heading"))
                } else {
                    None
                };
                let mut fixed = false;
                if let Some(reason) = reason {
                    let msg = format!("section without anchor id ({reason}), add `{{#some-id}}`");
                    if self.report(Rule::HeadingAnchor, text, msg) && autofix {
                        let id = unique_id(&slug, &self.taken, &self.index.explicit);
                        self.taken.insert(id.clone());
                        self.explicit_seen.insert(id.clone());
                        new_anchor = Some(id);
                        fixed = true;
                    }
                }
                if !fixed && !slug.is_empty() {
                    self.taken.insert(slug);
                }
            }
        }

        if level == h.level && new_anchor.is_none() {
            return None;
        }
        let mut line = String::with_capacity(text.len() + 16);
        line.push_str(&text[..h.hashes.start]);
        line.push_str(&"#".repeat(level));
        line.push_str(&text[h.hashes.end..]);
        if let Some(id) = new_anchor {
            let trimmed = line.trim_end().len();
            line.truncate(trimmed);
            line.push_str(&format!(" {{#{id}}}"));
        }
        Some(line)
    }

    /// Validate internal links on one line.
    fn links(&mut self, text: &str) {
        let stripped = CODE_SPAN_RE.replace_all(text, "");
        for link in links::extract(&stripped) {
            let LinkTarget::Internal { path, anchor } = &link.target else {
                continue;
            };
            let path = path.split_whitespace().next().unwrap_or("");
            if path.contains([':', '?']) || path.starts_with(['/', '<']) {
                continue;
            }
            if path.is_empty() {
                if let Some(a) = anchor {
                    if !self.own.contains(a) {
                        let msg = format!("anchor `#{a}` not found in current document");
                        self.report(Rule::BrokenLink, text, msg);
                    }
                }
                continue;
            }
            let Some(base) = self.base_dir else {
                continue;
            };
            let target = base.join(path);
            if !target.exists() {
                self.report(Rule::BrokenLink, text, format!("broken link `{path}`: file not found"));
                continue;
            }
            let Some(a) = anchor else {
                continue;
            };
            let is_md = target.is_file()
                && target
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("md"));
            if !is_md {
                continue;
            }
            let found = match self.run.get(&target) {
                Some(idx) => Some(idx.contains(a)),
                None => self
                    .targets
                    .entry(target.clone())
                    .or_insert_with(|| fs::read_to_string(&target).ok().map(|s| AnchorIndex::collect(&s)))
                    .as_ref()
                    .map(|idx| idx.contains(a)),
            };
            if found == Some(false) {
                self.report(Rule::BrokenLink, text, format!("anchor `#{a}` not found in `{path}`"));
            }
        }
    }
}

/// First id derived from `slug` that no heading uses yet.
fn unique_id(slug: &str, taken: &HashSet<String>, explicit: &HashSet<String>) -> String {
    let base = if slug.is_empty() { "section" } else { slug };
    let free = |id: &str| !taken.contains(id) && !explicit.contains(id);
    if free(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| free(id))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn run(src: &str) -> ScanOutcome {
        scan_source("doc.md", None, src, &ScanOptions::default())
    }

    fn run_fix(src: &str) -> ScanOutcome {
        let opts = ScanOptions {
            autofix: true,
            ..ScanOptions::default()
        };
        scan_source("doc.md", None, src, &opts)
    }

    fn rules(out: &ScanOutcome) -> Vec<&str> {
        out.findings.iter().map(|f| f.rule.as_str()).collect()
    }

    #[test]
    fn test_sections_without_anchor_in_sample_document() {
        let txt = r#"
### 前提条件

- [x] 安装 nginx (>=1.9.13)

***该模块只支持 linux 操作系统***

### 安装 Nginx OpenTracing 插件 {#install-plugin}

Nginx OpenTracing 插件是 OpenTracing 开源的链路追踪插件，基于 C++ 编写，可以工作于

- 配置插件

### 安装 DDAgent Nginx OpenTracing 插件

### {{some-template-name}}
"#;
        let dir = tempdir().unwrap();
        let f = dir.path().join("some.md");
        fs::write(&f, txt).unwrap();

        let out = scan(&f, &ScanOptions::default(), &RunAnchors::default()).unwrap();
        assert_eq!(out.findings.len(), 2);
        assert_eq!(rules(&out), ["MD401", "MD401"]);
        assert_eq!(out.findings[0].text, "### 前提条件");
        assert_eq!(out.findings[1].text, "### 安装 DDAgent Nginx OpenTracing 插件");
        assert!(out.findings.iter().all(|f| f.severity == Severity::Warning));
        assert!(out.fixed.is_none());
    }

    #[test]
    fn test_level_skip_and_missing_anchor() {
        let out = run("# Guide\n\n### Install {#install}\n\n## 配置\n");
        assert_eq!(rules(&out), ["MD001", "MD401"]);
        assert_eq!(out.findings[0].text, "### Install {#install}");
        assert!(out.findings[0].message.contains("h3 after h1"));
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let out = run("# Guide\n\n## Install\n\nText.\n\n### Linux\n\n## Usage\n\n# Appendix\n");
        assert!(out.findings.is_empty(), "{:?}", out.findings);
    }

    #[test]
    fn test_suppression_region_discards_only_inner_findings() {
        let src = "# A\n<!-- markdownlint-disable MD001 -->\n### B\n<!-- markdownlint-enable MD001 -->\n# C\n### D\n";
        let out = run(src);
        assert_eq!(rules(&out), ["MD001"]);
        assert_eq!(out.findings[0].text, "### D");
    }

    #[test]
    fn test_disabled_rule_is_never_reported() {
        let opts = ScanOptions {
            disabled: ["MD401".to_string()].into_iter().collect(),
            ..ScanOptions::default()
        };
        let out = scan_source("doc.md", None, "# A\n\n## 中文\n", &opts);
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_code_fences_callouts_and_front_matter_are_not_headings() {
        let src = "---\ntitle: x\n# yaml comment\n---\n# A\n```bash\n### not a heading\n```\n> ### quoted\n***bold note***\n!!! note \"Tip\"\n\n    ### inside\n## B\n";
        let out = run(src);
        assert!(out.findings.is_empty(), "{:?}", out.findings);
    }

    #[test]
    fn test_tilde_fences_and_longer_closing_fence() {
        let src = "# A\n~~~\n### in tilde\n```\n### still inside\n~~~~\n## B\n````md\n### in backticks\n```\n### unclosed by shorter run\n`````\n## C\n";
        let out = run(src);
        assert!(out.findings.is_empty(), "{:?}", out.findings);

        let out = run("# A\n~~~\n~~~ trailing text\n### code\n~~~\n### real\n");
        assert_eq!(rules(&out), ["MD001"]);
        assert_eq!(out.findings[0].text, "### real");
    }

    #[test]
    fn test_placeholder_heading_is_exempt() {
        let out = run("# A\n### {{tpl-name}}\n## B\n");
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_duplicate_and_empty_anchor() {
        let out = run("# T\n## A {#x}\n## B {#x}\n## C {#}\n");
        assert_eq!(rules(&out), ["MD402", "MD402"]);
        assert_eq!(out.findings[0].severity, Severity::Error);
        assert!(out.findings[0].message.contains("`x`"));
        assert_eq!(out.findings[1].message, "empty anchor id");
    }

    #[test]
    fn test_autofix_rewrites_levels_and_anchors() {
        let src = "# Guide\n\n### Install\n\n#### Linux\n\n## 配置\n";
        let report_only = run(src);
        assert_eq!(rules(&report_only), ["MD001", "MD401"]);

        let out = run_fix(src);
        assert_eq!(rules(&out), ["MD001", "MD001", "MD401"]);
        assert_eq!(
            out.fixed.as_deref(),
            Some("# Guide\n\n## Install\n\n### Linux\n\n## 配置 {#section}\n")
        );
    }

    #[test]
    fn test_autofix_output_is_stable() {
        let src = "# Guide\r\n### Intro\r\n## Intro\r\n## 安装 Nginx 插件\r\n##### Deep ##\r\n";
        let first = run_fix(src);
        let fixed = first.fixed.expect("fixes applied");
        assert_eq!(
            fixed,
            "# Guide\r\n## Intro\r\n## Intro {#intro-1}\r\n## 安装 Nginx 插件 {#nginx}\r\n### Deep ##\r\n"
        );
        let second = run_fix(&fixed);
        assert!(second.findings.is_empty(), "{:?}", second.findings);
        assert!(second.fixed.is_none());
    }

    #[test]
    fn test_no_fixed_text_when_nothing_changes() {
        let out = run_fix("# A\n\n## B\n");
        assert!(out.findings.is_empty());
        assert!(out.fixed.is_none());
    }

    #[test]
    fn test_suppressed_findings_are_not_fixed() {
        let src = "# A\n<!-- markdownlint-disable -->\n### B\n<!-- markdownlint-enable -->\n";
        let out = run_fix(src);
        assert!(out.findings.is_empty());
        assert!(out.fixed.is_none());
    }

    #[test]
    fn test_internal_links_checked_against_files_and_anchors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# A\n\n## Setup {#setup}\n").unwrap();
        let src = "# Doc\n\
[ok](a.md#setup) [bad](a.md#nope) [gone](missing.md) [ext](https://x.y/z)\n\
[self](#here) [nowhere](#nowhere) `[code](skip.md)`\n\
<!-- markdownlint-disable MD404 -->\n\
[ignored](missing-too.md)\n\
<!-- markdownlint-enable -->\n\
## Here\n";
        let out = scan_source("doc.md", Some(dir.path()), src, &ScanOptions::default());
        let msgs: Vec<&str> = out.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            msgs,
            [
                "anchor `#nope` not found in `a.md`",
                "broken link `missing.md`: file not found",
                "anchor `#nowhere` not found in current document",
            ]
        );
        assert!(out.findings.iter().all(|f| f.rule == "MD404"));
    }

    #[test]
    fn test_run_anchors_take_precedence_over_disk() {
        let dir = tempdir().unwrap();
        let z_src = "# Z\n\n## 中文\n";
        let a_src = "# A\n\n## 中文\n\n[t](./z.md#section) [self](#section)\n";
        let z = dir.path().join("z.md");
        let a = dir.path().join("a.md");
        fs::write(&z, z_src).unwrap();
        fs::write(&a, a_src).unwrap();

        let out = scan(&a, &ScanOptions::default(), &RunAnchors::default()).unwrap();
        assert_eq!(rules(&out), ["MD401", "MD404", "MD404"]);

        let fix = ScanOptions {
            autofix: true,
            ..ScanOptions::default()
        };
        let run: RunAnchors = [
            (dir.path().join("sub/../z.md"), final_anchors(z_src, &fix)),
            (a.clone(), final_anchors(a_src, &fix)),
        ]
        .into_iter()
        .collect();
        let out = scan(&a, &ScanOptions::default(), &run).unwrap();
        assert_eq!(rules(&out), ["MD401"]);
    }

    #[test]
    fn test_final_anchors_without_autofix_reads_source() {
        let idx = final_anchors("# Z\n\n## 中文\n## Setup {#setup}\n", &ScanOptions::default());
        assert!(idx.contains("z") && idx.contains("setup"));
        assert!(!idx.contains("section"));
    }

    #[test]
    fn test_normalize_resolves_dots_lexically() {
        assert_eq!(normalize(Path::new("./docs/a/../b.md")), PathBuf::from("docs/b.md"));
        assert_eq!(normalize(Path::new("../x/./y.md")), PathBuf::from("../x/y.md"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_unreadable_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.md");
        let err = scan(&missing, &ScanOptions::default(), &RunAnchors::default()).unwrap_err();
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("安装 DDAgent Nginx OpenTracing 插件"), "ddagent-nginx-opentracing");
        assert_eq!(slugify("前提条件"), "");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("Foo_bar 2.0"), "foo_bar-20");
    }

    #[test]
    fn test_parse_heading_parts() {
        let h = parse_heading("## Title {#my-id}").unwrap();
        assert_eq!((h.level, h.title, h.anchor), (2, "Title", Some("my-id")));
        let h = parse_heading("### Closed ###").unwrap();
        assert_eq!((h.level, h.title, h.anchor), (3, "Closed", None));
        assert!(parse_heading("#hashtag").is_none());
        assert!(parse_heading("####### seven").is_none());
    }
}
