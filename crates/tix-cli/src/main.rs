#![forbid(unsafe_code)]

mod cmd;
mod output;
mod shell;
#[cfg(test)]
mod testutil;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tix_core::config;
use tix_rpc::RpcGateway;

use crate::output::{classify, render_error};
use crate::shell::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "tix",
    author,
    version,
    about = "tix: an interactive shell for remote ticket trackers",
    long_about = None
)]
struct Cli {
    /// Site to connect to (defaults to `default_site` from the config).
    #[arg(short, long)]
    site: Option<String>,

    /// Path to the config file (default: ~/.config/tix/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gateway round-trip timeout in seconds (overrides the config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Run a single shell line and exit instead of starting the loop.
    #[arg(short = 'c', long, value_name = "LINE")]
    command: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TIX_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if std::env::var("DEBUG").is_ok() {
            "tix=debug,info"
        } else {
            "tix=info,warn"
        })
    });

    let format = std::env::var("TIX_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

/// Render a startup failure with its code and hint, then fail the process.
fn or_exit<T, E: Into<anyhow::Error>>(json: bool, result: Result<T, E>) -> anyhow::Result<T> {
    result.map_err(|err| {
        let err = err.into();
        render_error(json, &classify(&err));
        anyhow::anyhow!("startup failed")
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("verbose mode enabled");
    }

    let config = or_exit(cli.json, config::load(cli.config.as_deref()))?;
    let (site_name, site) = or_exit(cli.json, config.resolve_site(cli.site.as_deref()))?;

    let timeout = Duration::from_secs(cli.timeout.unwrap_or(config.timeout_secs));
    info!(site = site_name, url = %site.url, "connecting");
    let gateway = or_exit(cli.json, RpcGateway::connect(site, timeout))?;

    let editor = config.resolve_editor();
    if editor.is_none() {
        eprintln!(
            "warning: no editor found; `edit` and `create` need one \
             (set `editor` in your config or $EDITOR)"
        );
    }

    let stdout = io::stdout();
    let interactive = stdout.is_terminal() && cli.command.is_none();
    if interactive && !cli.json {
        println!("connected to {site_name}; type `help` for commands, `quit` to leave");
    }

    let mut out = stdout.lock();
    let paging = interactive && !cli.json;
    let mut shell = or_exit(
        cli.json,
        Shell::new(&config, &gateway, editor, cli.json, paging, &mut out),
    )?;

    match cli.command {
        Some(line) => {
            if let Err(err) = shell.run_line(&line) {
                render_error(cli.json, &classify(&err));
                anyhow::bail!("command failed");
            }
        }
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            shell.repl(&mut input)?;
        }
    }

    Ok(())
}
