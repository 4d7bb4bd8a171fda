//! recx - reflected parameter scanner CLI

use clap::Parser;
use recx::config::{self, CliOverrides};
use recx::error::RecxError;
use recx::models::ScanConfig;
use recx::report::{LineReporter, OutputFormat};
use recx::scanner::ScanEngine;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const USAGE: &str = r#"usage: recx [options]

crawler for finding reflected parameters!
version: v1.0

options:
  -h, -help          show help message
  -v                 show version
  -c, --config FILE  load scan settings from a TOML file
  --strict           skip reflections inside attributes, scripts and comments
  --json             print findings as JSON lines
  --timeout SECS     per-request timeout
  --scan-timeout SECS  per-target scan budget
  --workers N        parameter-testing workers per target
  --depth N          maximum crawl depth
  --debug            debug logging on stderr

use cases:
  echo "example.com" | recx
  cat urls.txt | recx
  subfinder -d example.com | recx | nuclei -t xss-reflected.yaml
"#;

#[derive(Parser, Debug)]
#[command(name = "recx", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Show help message
    #[arg(short = 'h', long = "help")]
    help: bool,

    /// Show version
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reject reflections in non-exploitable contexts
    #[arg(long)]
    strict: bool,

    /// Print findings as JSON lines
    #[arg(long)]
    json: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Per-target scan timeout in seconds
    #[arg(long)]
    scan_timeout: Option<u64>,

    /// Number of parameter-testing workers
    #[arg(long)]
    workers: Option<usize>,

    /// Maximum crawl depth
    #[arg(long)]
    depth: Option<u32>,

    /// Debug output
    #[arg(long)]
    debug: bool,
}

/// Go-style single-dash long flags (`-help`) are accepted alongside `--help`
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-help" => "--help".to_string(),
            "-version" => "--version".to_string(),
            _ => arg,
        })
        .collect()
}

fn show_usage_and_exit(err: &str) -> ! {
    eprintln!("error: {err}\n");
    println!("{USAGE}");
    std::process::exit(1);
}

fn build_config(cli: &Cli) -> Result<ScanConfig, RecxError> {
    let mut scan_config = match cli.config {
        Some(ref path) => config::load_config(path)?,
        None => ScanConfig::default(),
    };

    config::merge_cli_args(
        &mut scan_config,
        CliOverrides {
            workers: cli.workers,
            timeout_secs: cli.timeout,
            scan_timeout_secs: cli.scan_timeout,
            max_depth: cli.depth,
            strict: cli.strict,
            json: cli.json,
        },
    )?;
    Ok(scan_config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    if cli.help {
        println!("{USAGE}");
        return;
    }
    if cli.version {
        println!("recx version 1.0");
        return;
    }

    let filter = if cli.debug { "recx=debug" } else { "recx=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if std::io::stdin().is_terminal() {
        show_usage_and_exit(&RecxError::NoInput.to_string());
    }

    let scan_config = build_config(&cli).unwrap_or_else(|e| show_usage_and_exit(&e.to_string()));
    let format = if scan_config.json_output {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Text
    };

    let engine = ScanEngine::new(scan_config, Arc::new(LineReporter::stdout(format)))
        .unwrap_or_else(|e| show_usage_and_exit(&e.to_string()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut url_count = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => show_usage_and_exit(&format!("error reading input: {e}")),
        };

        let target = line.trim();
        if target.is_empty() {
            continue;
        }
        url_count += 1;

        match engine.scan(target).await {
            Ok(outcome) if outcome.timed_out => {
                eprintln!("timeout reached for: {}", outcome.target);
            }
            Ok(_) => {}
            Err(e) => show_usage_and_exit(&e.to_string()),
        }
    }

    if url_count == 0 {
        show_usage_and_exit(&RecxError::NoValidUrls.to_string());
    }
}
