//! Check runner: structural scan and metadata validation per markdown file.
//!
//! A run has three stages. Every file is read and its anchors indexed as they
//! will read once fixes are applied; every file is then scanned in parallel
//! against that read-only index; fixed text is written back last, one file at
//! a time. No file observes another file's write, so results do not depend
//! on file names or scheduling. Results are concatenated in sorted path
//! order, while findings inside a file keep their discovery order.

use crate::error::CheckError;
use crate::meta;
use crate::models::{CheckResult, Finding, Severity, Summary, IO_RULE, META_RULE};
use crate::scan::{self, AnchorIndex, RunAnchors, ScanOptions};
use crate::utils;
use glob::glob;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub md_dir: PathBuf,
    /// Enables front-matter validation with assets resolved here.
    pub meta_dir: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub scan: ScanOptions,
}

/// First-stage outcome for one file.
struct Indexed {
    path: PathBuf,
    label: String,
    /// `None` when the file could not be read.
    anchors: Option<AnchorIndex>,
    /// Read or metadata failures, reported after the scan findings.
    findings: Vec<Finding>,
}

/// Per-file outcome before write-back and aggregation.
struct FileReport {
    path: PathBuf,
    label: String,
    findings: Vec<Finding>,
    fixed: Option<String>,
}

/// Run every check across markdown files under `opts.md_dir`.
///
/// Only setup failures (missing directory, bad pattern) are errors; problems
/// with individual files are reported as findings.
pub fn run_check(opts: &CheckOptions) -> Result<CheckResult, CheckError> {
    if !opts.md_dir.is_dir() {
        return Err(CheckError::MissingDir(opts.md_dir.clone()));
    }
    let (targets, skipped) = collect_targets(&opts.md_dir, &opts.patterns)?;
    debug!(files = targets.len(), dir = %opts.md_dir.display(), "collected markdown files");

    let mut indexed: Vec<Indexed> = targets.par_iter().map(|p| index_file(p, opts)).collect();
    let run: RunAnchors = indexed
        .iter_mut()
        .filter_map(|f| f.anchors.take().map(|a| (f.path.clone(), a)))
        .collect();

    let reports: Vec<FileReport> = indexed
        .into_par_iter()
        .map(|f| scan_file(f, opts, &run))
        .collect();

    let mut result = CheckResult::default();
    let mut summary = Summary {
        files: reports.len(),
        ..Summary::default()
    };
    result.findings.extend(skipped);
    for mut report in reports {
        if let Some(text) = report.fixed.take() {
            match fs::write(&report.path, text) {
                Ok(()) => {
                    info!(file = %report.label, "applied fixes");
                    summary.fixed += 1;
                }
                Err(e) => {
                    let msg = format!("write {}: {e}", report.label);
                    report.findings.push(io_finding(&report.label, msg));
                }
            }
        }
        result.findings.extend(report.findings);
    }
    for f in &result.findings {
        if f.is_error() {
            summary.errors += 1;
        } else {
            summary.warnings += 1;
        }
    }
    result.summary = summary;
    Ok(result)
}

/// Expand glob patterns under `root` into a sorted, de-duplicated file list.
///
/// Entries the walk could not read become `io` findings.
fn collect_targets(
    root: &Path,
    patterns: &[String],
) -> Result<(Vec<PathBuf>, Vec<Finding>), CheckError> {
    let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
    let mut skipped = Vec::new();
    for pat in patterns {
        let abs_glob = root.join(pat);
        let pattern = abs_glob.to_string_lossy().to_string();
        let entries = glob(&pattern).map_err(|source| CheckError::Pattern {
            pattern: pat.clone(),
            source,
        })?;
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => {
                    targets.insert(p);
                }
                Ok(_) => {}
                Err(e) => {
                    let label = utils::rel_to_wd(e.path());
                    warn!(path = %label, "skipped unreadable entry: {}", e.error());
                    skipped.push(io_finding(&label, format!("read {label}: {}", e.error())));
                }
            }
        }
    }
    Ok((targets.into_iter().collect(), skipped))
}

fn io_finding(label: &str, message: String) -> Finding {
    Finding::new(label, "", IO_RULE, Severity::Error, message)
}

fn index_file(path: &Path, opts: &CheckOptions) -> Indexed {
    let label = utils::rel_to_wd(path);
    let _span = info_span!("file", path = %label).entered();
    let mut findings = Vec::new();
    let source = match scan::read_source(path) {
        Ok(s) => s,
        Err(e) => {
            findings.push(io_finding(&label, e.to_string()));
            return Indexed {
                path: path.to_path_buf(),
                label,
                anchors: None,
                findings,
            };
        }
    };

    if let Some(meta_dir) = opts.meta_dir.as_ref() {
        if let Err(e) = meta::check_markdown_meta(&source, meta_dir) {
            findings.push(Finding::new(
                &label,
                "",
                META_RULE,
                Severity::Error,
                e.to_string(),
            ));
        }
    }

    Indexed {
        path: path.to_path_buf(),
        anchors: Some(scan::final_anchors(&source, &opts.scan)),
        label,
        findings,
    }
}

fn scan_file(file: Indexed, opts: &CheckOptions, run: &RunAnchors) -> FileReport {
    let Indexed {
        path,
        label,
        findings: tail,
        ..
    } = file;
    let _span = info_span!("file", path = %label).entered();
    let mut report = FileReport {
        path,
        label,
        findings: Vec::new(),
        fixed: None,
    };
    // Unreadable in the first stage: its read error is already in `tail`.
    if run.get(&report.path).is_some() {
        match scan::scan(&report.path, &opts.scan, run) {
            Ok(outcome) => {
                report.findings = outcome.findings;
                report.fixed = outcome.fixed;
            }
            Err(e) => report.findings.push(io_finding(&report.label, e.to_string())),
        }
    }
    report.findings.extend(tail);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn opts(md_dir: &Path) -> CheckOptions {
        CheckOptions {
            md_dir: md_dir.to_path_buf(),
            meta_dir: None,
            patterns: vec!["**/*.md".to_string()],
            scan: ScanOptions::default(),
        }
    }

    #[test]
    fn test_run_check_orders_by_file_and_counts() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.md"), "# B\n\n### Skip\n\n## 中文\n").unwrap();
        fs::write(root.join("a.md"), "# A\n\n## Fine\n").unwrap();
        fs::write(root.join("sub/c.md"), "# C\n\n[x](nope.md)\n").unwrap();
        fs::write(root.join("notes.txt"), "### ignored").unwrap();

        let res = run_check(&opts(root)).unwrap();
        assert_eq!(res.summary.files, 3);
        assert_eq!(res.summary.warnings, 2);
        assert_eq!(res.summary.errors, 1);
        let rules: Vec<&str> = res.findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(rules, ["MD001", "MD401", "MD404"]);
        assert!(res.findings[0].path.ends_with("b.md"));
        assert!(res.findings[2].path.ends_with("c.md"));
    }

    #[test]
    fn test_autofix_writes_back() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("doc.md");
        fs::write(&file, "# T\n### Deep\n").unwrap();
        let mut o = opts(tmp.path());
        o.scan.autofix = true;

        let res = run_check(&o).unwrap();
        assert_eq!(res.summary.fixed, 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "# T\n## Deep\n");

        let again = run_check(&o).unwrap();
        assert!(again.findings.is_empty());
        assert_eq!(again.summary.fixed, 0);
    }

    /// `linker` points at an anchor autofix generates in `target`.
    fn autofix_cross_file(linker: &str, target: &str) -> (CheckResult, String) {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(target), "# T\n\n## 中文\n").unwrap();
        let link = format!("# L\n\n[t]({target}#section)\n");
        for n in 0..8 {
            fs::write(root.join(format!("{linker}{n}.md")), &link).unwrap();
        }
        let mut o = opts(root);
        o.scan.autofix = true;
        let res = run_check(&o).unwrap();
        let fixed = fs::read_to_string(root.join(target)).unwrap();
        (res, fixed)
    }

    #[test]
    fn test_links_see_fixed_anchors_regardless_of_file_order() {
        for (linker, target) in [("b", "a.md"), ("b", "z.md")] {
            let (res, fixed) = autofix_cross_file(linker, target);
            assert_eq!(fixed, "# T\n\n## 中文 {#section}\n");
            let rules: Vec<&str> = res.findings.iter().map(|f| f.rule.as_str()).collect();
            assert_eq!(rules, ["MD401"], "target {target}");
            assert_eq!(res.summary.fixed, 1);
            assert_eq!(res.summary.files, 9);
        }
    }

    #[test]
    fn test_links_to_unfixed_anchor_are_broken_without_autofix() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("z.md"), "# T\n\n## 中文\n").unwrap();
        fs::write(tmp.path().join("a.md"), "# A\n\n[t](z.md#section)\n").unwrap();
        let res = run_check(&opts(tmp.path())).unwrap();
        let rules: Vec<&str> = res.findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(rules, ["MD404", "MD401"]);
        assert_eq!(res.summary.fixed, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("x.md"), "# X\n").unwrap();
        fs::write(tmp.path().join("a.md"), "# A\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users read through the mode bits; nothing to observe then.
        let readable = fs::read_dir(&locked).is_ok();

        let res = run_check(&opts(tmp.path()));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }
        let res = res.unwrap();
        assert_eq!(res.summary.files, 1);
        assert_eq!(res.summary.errors, 1);
        assert_eq!(res.findings[0].rule, IO_RULE);
        assert!(res.findings[0].path.ends_with("locked"));
    }

    #[test]
    fn test_meta_errors_become_findings() {
        let tmp = tempdir().unwrap();
        let docs = tmp.path().join("docs");
        let meta_dir = tmp.path().join("meta");
        fs::create_dir_all(&docs).unwrap();
        fs::create_dir_all(&meta_dir).unwrap();
        fs::write(docs.join("a.md"), "---\nsummary: s\n---\n# A\n").unwrap();
        fs::write(docs.join("b.md"), "# No meta\n").unwrap();
        let mut o = opts(&docs);
        o.meta_dir = Some(meta_dir);

        let res = run_check(&o).unwrap();
        assert_eq!(res.findings.len(), 1);
        let f = &res.findings[0];
        assert_eq!(f.rule, META_RULE);
        assert!(f.is_error());
        assert!(f.message.contains("missing meta \"title\""));
        assert!(f.message.contains("missing meta \"dashboard\""));
    }

    #[test]
    fn test_missing_dir_and_bad_pattern() {
        let tmp = tempdir().unwrap();
        let missing = opts(&tmp.path().join("nope"));
        assert!(matches!(run_check(&missing), Err(CheckError::MissingDir(_))));

        let mut bad = opts(tmp.path());
        bad.patterns = vec!["[".to_string()];
        assert!(matches!(run_check(&bad), Err(CheckError::Pattern { .. })));
    }
}
