//! Existence checks for files referenced from front matter.

use crate::error::AssetError;
use serde::de::IgnoredAny;
use std::fs;
use std::path::Path;

/// Verify every path exists and is not a directory.
///
/// Stops at the first failure; callers check each reference group separately.
pub fn exists<P: AsRef<Path>>(paths: &[P]) -> Result<(), AssetError> {
    for p in paths {
        let p = p.as_ref();
        match fs::metadata(p) {
            Err(_) => return Err(AssetError::Missing { path: p.to_path_buf() }),
            Ok(md) if md.is_dir() => return Err(AssetError::IsDir { path: p.to_path_buf() }),
            Ok(_) => {}
        }
    }
    Ok(())
}

/// Verify the file holds syntactically valid JSON.
fn json_ok(path: &Path) -> Result<(), AssetError> {
    let data = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice::<IgnoredAny>(&data).map_err(|source| AssetError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// `exists` followed by `json_ok` for one JSON asset.
pub fn json_asset(path: &Path) -> Result<(), AssetError> {
    exists(&[path])?;
    json_ok(path)
}
