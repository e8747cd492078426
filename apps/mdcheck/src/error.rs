//! Error types shared by the scanner, the metadata validator, and the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to scan one markdown file.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A referenced asset that is missing or unusable.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("file {:?} not exist", path.display().to_string())]
    Missing { path: PathBuf },

    #[error("invalid file {:?}, expect file, got dir", path.display().to_string())]
    IsDir { path: PathBuf },

    #[error("read {:?}: {source}", path.display().to_string())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json {:?}: {source}", path.display().to_string())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
impl AssetError {
    /// Path of the asset that failed the check.
    pub fn path(&self) -> &std::path::Path {
        match self {
            AssetError::Missing { path }
            | AssetError::IsDir { path }
            | AssetError::Read { path, .. }
            | AssetError::Json { path, .. } => path,
        }
    }
}

/// Front-matter validation failure.
///
/// `Invalid` aggregates every violation found in one document; its display
/// form is the messages joined with newlines.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("{}", .0.join("\n"))]
    Invalid(Vec<String>),

    #[error("malformed front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed front matter: expect mapping, got {0}")]
    NotMapping(&'static str),
}

#[cfg(test)]
impl MetaError {
    /// Individual messages carried by this error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            MetaError::Invalid(msgs) => msgs.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid TOML: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Fatal failure of a whole check run.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("markdown directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("bad glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
