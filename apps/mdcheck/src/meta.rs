//! Front-matter extraction and metadata validation.
//!
//! Every violation in a document is collected and returned as one
//! `MetaError::Invalid`. Two cases only warn and never fail: a document
//! without metadata, and a dashboard/monitor entry whose path is `-`.

use crate::assets;
use crate::error::MetaError;
use crate::models::meta::{FrontMatter, MetaValue};
use crate::models::schema::{
    self, KeyRule, ASSET_DESC_KEY, ASSET_META_FILE, ASSET_PATH_KEY, ICON_FILES, SIDEBAR_ICON_KEY,
    UNSET_PATH,
};
use serde_yaml::Value as Yaml;
use std::path::Path;
use tracing::warn;

/// Split a leading `---` delimited block from the body.
///
/// Returns `(yaml, body)`; `None` when the document has no closed block.
pub fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\r\n")
        .or_else(|| source.strip_prefix("---\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parse the front matter of `source`. A document without a block yields
/// an empty `FrontMatter`; a block that is not a YAML mapping is an error.
pub fn parse_front_matter(source: &str) -> Result<FrontMatter, MetaError> {
    let Some((yaml, _)) = split_front_matter(source) else {
        return Ok(FrontMatter::new());
    };
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }
    match MetaValue::from(serde_yaml::from_str::<Yaml>(yaml)?) {
        MetaValue::Map(entries) => Ok(FrontMatter::from_entries(entries)),
        MetaValue::Null => Ok(FrontMatter::new()),
        other => Err(MetaError::NotMapping(other.kind())),
    }
}

/// Parse and validate the metadata of one markdown document.
///
/// The sidebar `icon` key belongs to the site theme and is dropped first.
pub fn check_markdown_meta(source: &str, meta_dir: &Path) -> Result<(), MetaError> {
    let mut doc = parse_front_matter(source)?;
    doc.remove(SIDEBAR_ICON_KEY);
    validate(&doc, meta_dir)
}

/// Validate `doc` against the fixed schema, resolving assets under `meta_dir`.
pub fn validate(doc: &FrontMatter, meta_dir: &Path) -> Result<(), MetaError> {
    if doc.is_empty() {
        warn!("no meta specified");
        return Ok(());
    }

    let mut errs: Vec<String> = Vec::new();
    for (key, value) in doc.iter() {
        let Some(desc) = schema::lookup(key) else {
            continue;
        };
        match desc.rule {
            KeyRule::Text => {
                if value.as_non_empty_str().is_none() {
                    errs.push(format!(
                        "invalid {key}: expect non-empty string, got {}",
                        describe(value)
                    ));
                }
            }
            KeyRule::IconDir => check_icon(value, meta_dir, &mut errs),
            KeyRule::AssetList => check_asset_list(key, value, meta_dir, &mut errs),
        }
    }

    for key in schema::required_keys() {
        if !doc.contains_key(key) {
            errs.push(format!("missing meta {key:?}"));
        }
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(MetaError::Invalid(errs))
    }
}

fn describe(value: &MetaValue) -> &'static str {
    match value {
        MetaValue::String(s) if s.is_empty() => "empty string",
        other => other.kind(),
    }
}

fn check_icon(value: &MetaValue, meta_dir: &Path, errs: &mut Vec<String>) {
    let Some(dir) = value.as_non_empty_str() else {
        errs.push(format!("invalid icon: expect non-empty string, got {}", describe(value)));
        return;
    };
    let files: Vec<_> = ICON_FILES.iter().map(|f| meta_dir.join(dir).join(f)).collect();
    if let Err(e) = assets::exists(&files) {
        errs.push(format!("icon: {e}"));
    }
}

fn check_asset_list(key: &str, value: &MetaValue, meta_dir: &Path, errs: &mut Vec<String>) {
    let items = match value {
        MetaValue::List(items) if !items.is_empty() => items,
        other => {
            errs.push(format!(
                "{key} not found: expect non-empty list, got {}",
                match other {
                    MetaValue::List(_) => "empty list",
                    v => v.kind(),
                }
            ));
            return;
        }
    };

    for elem in items {
        let MetaValue::Map(entries) = elem else {
            errs.push(format!("invalid {key}, expect map, got {}", elem.kind()));
            continue;
        };

        let mut path: Option<&str> = None;
        let mut path_invalid = false;
        for (sub, v) in entries {
            match sub.as_str() {
                ASSET_DESC_KEY => {}
                ASSET_PATH_KEY => match v.as_non_empty_str() {
                    Some(p) => path = Some(p),
                    None => {
                        path_invalid = true;
                        errs.push(format!(
                            "invalid {key} path: expect non-empty string, got {}",
                            describe(v)
                        ));
                    }
                },
                other => errs.push(format!("invalid {key} key {other:?}")),
            }
        }

        let Some(path) = path else {
            if !path_invalid {
                errs.push(format!("invalid {key}: missing {ASSET_PATH_KEY:?}"));
            }
            continue;
        };
        if path == UNSET_PATH {
            warn!(key, "{key} not set");
            continue;
        }
        let json = meta_dir.join(path).join(ASSET_META_FILE);
        if let Err(e) = assets::json_asset(&json) {
            errs.push(format!("invalid {key} json: {e}"));
        }
    }
}
