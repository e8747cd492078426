//! mdcheck core library.
//!
//! This crate exposes programmatic APIs for checking markdown documentation
//! trees: heading structure and anchors, internal links, and integration
//! front-matter with the assets it references.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `scan`: Line-oriented heading/link scanner with autofix.
//! - `links`: Inline link reference extraction.
//! - `suppress`: `markdownlint-disable/enable` suppression regions.
//! - `meta`: Front-matter parsing and schema validation.
//! - `assets`: Existence and JSON checks for referenced files.
//! - `lint`: Per-file check runner over a markdown directory.
//! - `models`: Findings, rules, and front-matter data models.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
//! - `error`: Error types.
pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod links;
pub mod lint;
pub mod meta;
pub mod models;
pub mod output;
pub mod scan;
pub mod suppress;
pub mod utils;
