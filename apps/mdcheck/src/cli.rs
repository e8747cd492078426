//! CLI argument parsing via `clap`.

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mdcheck",
    version,
    about = "Markdown documentation checker",
    long_about = "mdcheck — check markdown docs for heading structure, section anchors, internal links, and integration front-matter.\n\nConfiguration precedence: CLI > mdcheck.toml > defaults.",
    after_help = "Examples:\n  mdcheck check --md-dir docs\n  mdcheck check --md-dir docs --meta-dir meta --json\n  mdcheck check --md-dir docs --autofix",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current mdcheck version.")]
    Version,
    /// Check markdown files
    #[command(
        about = "Run markdown checks",
        long_about = "Scan markdown files for heading and link issues. With a meta dir, also validate front-matter and the icon/dashboard/monitor assets it references. Error findings make the exit code non-zero.",
        after_help = "Examples:\n  mdcheck check --md-dir docs\n  mdcheck check --md-dir docs --meta-dir meta --output json"
    )]
    Check {
        #[arg(long, help = "Repository root used to find mdcheck.toml (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Markdown directory to check")]
        md_dir: Option<String>,
        #[arg(long, help = "Metadata asset directory; enables front-matter checks")]
        meta_dir: Option<String>,
        #[arg(long, action = ArgAction::SetTrue, help = "Rewrite fixable heading issues in place")]
        autofix: bool,
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "output", help = "Shorthand for --output json")]
        json: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "mdcheck", "-vv", "check", "--md-dir", "docs", "--meta-dir", "meta", "--autofix", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Commands::Check {
                md_dir,
                meta_dir,
                autofix,
                json,
                output,
                ..
            } => {
                assert_eq!(md_dir.as_deref(), Some("docs"));
                assert_eq!(meta_dir.as_deref(), Some("meta"));
                assert!(autofix && json);
                assert!(output.is_none());
            }
            Commands::Version => panic!("expected check"),
        }
    }

    #[test]
    fn test_json_conflicts_with_output() {
        assert!(Cli::try_parse_from(["mdcheck", "check", "--json", "--output", "human"]).is_err());
    }
}
