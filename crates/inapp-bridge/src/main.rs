//! In-app message bridge replay tool: entry point.
//!
//! `inapp-replay` runs a JSON-lines script of host and template traffic
//! through the real bridge controller, using in-memory stand-ins for the
//! content surface and the host app, and prints what happened as JSON.
//!
//! # Why a replay tool?
//!
//! The bridge normally lives inside a mobile app where the content surface
//! is a platform web view.  Reproducing "the template posted X while the
//! queue held Y and the network failed on Z" on a device is slow.  A replay
//! script states the sequence directly and the summary shows every script
//! sent to the template and every callback made to the host.
//!
//! # Usage
//!
//! ```text
//! inapp-replay [OPTIONS] <SCRIPT>
//!
//! Options:
//!   --config <PATH>       TOML settings file
//!   --log-level <FILTER>  tracing filter when RUST_LOG is unset
//!   --cache <BOOL>        keep surfaces for reuse on close
//!   --opt-out             drop tracked events
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.  Both take precedence
//! over the config file.
//!
//! | Variable              | Description                     |
//! |-----------------------|---------------------------------|
//! | `INAPP_REPLAY_CONFIG` | Path to the TOML settings file  |
//! | `INAPP_LOG_LEVEL`     | Log filter                      |
//! | `INAPP_CACHE`         | `true` / `false`                |
//!
//! Logs go to stderr so the JSON summary on stdout can be piped.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inapp_bridge::infrastructure::{parse_script, ReplayConfig, ReplaySession};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays bridge traffic against in-memory host doubles.
#[derive(Debug, Parser)]
#[command(
    name = "inapp-replay",
    about = "Replay in-app message bridge traffic and print what the host would see",
    version
)]
struct Cli {
    /// JSON-lines replay script.
    script: PathBuf,

    /// TOML settings file.
    #[arg(long, env = "INAPP_REPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[arg(long, env = "INAPP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Reset surfaces on close instead of destroying them.
    #[arg(long, env = "INAPP_CACHE")]
    cache: Option<bool>,

    /// Start with tracking opted out.
    #[arg(long)]
    opt_out: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    fn resolve_config(&self) -> anyhow::Result<ReplayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config '{}'", path.display()))?;
                ReplayConfig::from_toml_str(&text)
                    .with_context(|| format!("invalid config '{}'", path.display()))?
            }
            None => ReplayConfig::default(),
        };

        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(cache) = self.cache {
            config.bridge.cache_enabled = cache;
        }
        if self.opt_out {
            config.opt_out = true;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the resolved `log_level` applies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .with_writer(std::io::stderr)
        .init();

    let text = fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script '{}'", cli.script.display()))?;
    let steps = parse_script(&text)
        .with_context(|| format!("invalid script '{}'", cli.script.display()))?;

    info!(
        steps = steps.len(),
        cache_enabled = config.bridge.cache_enabled,
        opt_out = config.opt_out,
        "replay starting"
    );

    let mut session = ReplaySession::new(&config);
    session.run(&steps);
    let summary = session.summary();

    info!(final_state = %summary.final_state, scripts = summary.scripts.len(), "replay finished");
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
    );
    Ok(())
}
