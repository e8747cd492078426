//! mdcheck CLI binary entry point.
//! Resolves configuration, runs the checks, and prints results.

use clap::Parser;
use mdcheck::cli::{Cli, Commands};
use mdcheck::utils::{error_prefix, info_prefix, note_prefix};
use mdcheck::{config, lint, output};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            repo_root,
            md_dir,
            meta_dir,
            autofix,
            json,
            output,
        } => {
            let output = if json { Some("json".to_string()) } else { output };
            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                md_dir.as_deref(),
                meta_dir.as_deref(),
                if autofix { Some(true) } else { None },
                output.as_deref(),
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            // Require a markdown dir (no default)
            let Some(md_dir) = eff.md_dir.clone() else {
                eprintln!(
                    "{} Markdown directory is not configured. Pass --md-dir or add mdcheck.toml.",
                    error_prefix()
                );
                std::process::exit(2);
            };
            if eff.config_file.is_none() && eff.output != "json" {
                eprintln!(
                    "{} No mdcheck.toml found under {}; using defaults.",
                    note_prefix(),
                    eff.repo_root.display()
                );
            }
            let opts = lint::CheckOptions {
                md_dir,
                meta_dir: eff.meta_dir.clone(),
                patterns: eff.patterns.clone(),
                scan: eff.scan.clone(),
            };
            let result = match lint::run_check(&opts) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            output::print_check(&result, &eff.output);
            if result.summary.fixed > 0 && eff.output != "json" {
                eprintln!("{} Fixed {} file(s) in place.", info_prefix(), result.summary.fixed);
            }
            if result.summary.errors > 0 {
                std::process::exit(1);
            }
        }
    }
}
