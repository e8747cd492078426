//! Configuration discovery and effective settings resolution.
//!
//! mdcheck reads `mdcheck.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `md_dir`: unset (required)
//! - `meta_dir`: unset (front-matter checks disabled)
//! - `autofix`: false
//! - `output`: `human`
//! - `patterns`: `["**/*.md"]`
//! - `rules.anchor_depth`: 2, `rules.check_links`: true, `rules.disable`: empty
//!
//! Overrides precedence: CLI > config file > defaults. Paths given on the
//! command line are used as-is; paths from the file resolve against the
//! directory holding it.

use crate::error::ConfigError;
use crate::models::Rule;
use crate::scan::ScanOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILES: [&str; 3] = ["mdcheck.toml", "mdcheck.yaml", "mdcheck.yml"];
pub const DEFAULT_PATTERN: &str = "**/*.md";

#[derive(Debug, Default, Deserialize, Clone)]
/// Scanner rule settings under `[rules]`.
pub struct RulesCfg {
    #[serde(default)]
    pub disable: Vec<String>,
    pub anchor_depth: Option<usize>,
    pub check_links: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `mdcheck.toml|yaml`.
pub struct MdcheckConfig {
    pub md_dir: Option<String>,
    pub meta_dir: Option<String>,
    pub autofix: Option<bool>,
    pub output: Option<String>,
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_file: Option<PathBuf>,
    pub md_dir: Option<PathBuf>,
    pub meta_dir: Option<PathBuf>,
    pub output: String,
    pub patterns: Vec<String>,
    pub scan: ScanOptions,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `mdcheck.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) if !p.as_os_str().is_empty() => cur = p,
            _ => return start.to_path_buf(),
        }
    }
}

/// Path of the first config file present in `root`.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES.iter().map(|f| root.join(f)).find(|p| p.is_file())
}

/// Load `MdcheckConfig` from `root`; `Ok(None)` when no file exists.
pub fn load_config(root: &Path) -> Result<Option<MdcheckConfig>, ConfigError> {
    let Some(path) = find_config(root) else {
        return Ok(None);
    };
    let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let is_toml = path.extension().is_some_and(|e| e == "toml");
    let cfg = if is_toml {
        toml::from_str(&s).map_err(|source| ConfigError::Toml { path, source })?
    } else {
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml { path, source })?
    };
    Ok(Some(cfg))
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_md_dir: Option<&str>,
    cli_meta_dir: Option<&str>,
    cli_autofix: Option<bool>,
    cli_output: Option<&str>,
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let config_file = find_config(&repo_root);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let md_dir = cli_md_dir
        .map(PathBuf::from)
        .or_else(|| cfg.md_dir.as_ref().map(|d| repo_root.join(d)));
    let meta_dir = cli_meta_dir
        .map(PathBuf::from)
        .or_else(|| cfg.meta_dir.as_ref().map(|d| repo_root.join(d)));

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let patterns = cfg
        .patterns
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_PATTERN.to_string()]);

    let rules = cfg.rules.unwrap_or_default();
    let mut disabled = std::collections::HashSet::new();
    for id in &rules.disable {
        match Rule::from_id(id) {
            Some(rule) => {
                disabled.insert(rule.id().to_string());
            }
            None => warn!(rule = id.as_str(), "unknown rule id in config, ignored"),
        }
    }
    let defaults = ScanOptions::default();
    let scan = ScanOptions {
        autofix: cli_autofix.or(cfg.autofix).unwrap_or(false),
        anchor_depth: rules.anchor_depth.unwrap_or(defaults.anchor_depth),
        check_links: rules.check_links.unwrap_or(defaults.check_links),
        disabled,
    };

    Ok(Effective {
        repo_root,
        config_file,
        md_dir,
        meta_dir,
        output,
        patterns,
        scan,
    })
}
