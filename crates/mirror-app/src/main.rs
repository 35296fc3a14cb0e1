//! MirrorBox entry point.
//!
//! Mirrors the mouse and keyboard input of one window to other windows by
//! posting window messages to them.
//!
//! # Usage
//!
//! ```text
//! mirrorbox --source Notepad --target "Untitled - Notepad" --target Scratch
//! mirrorbox --list-targets --target Notepad --json
//! mirrorbox --show-target-summary
//! mirrorbox --diagnose
//! mirrorbox --source Notepad --target Scratch --save-config
//! ```
//!
//! # Startup sequence
//!
//! 1. The config file is loaded (`--config` or the platform default) and the
//!    command-line flags are applied on top.
//! 2. `tracing` is initialised; `RUST_LOG` overrides the configured level.
//! 3. `--save-config` writes the merged settings back and exits, a listing
//!    mode prints and exits, or the mirroring session runs until Ctrl-C
//!    cancels it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror_app::application::mirror_session::{self, SessionConfig};
use mirror_app::application::resolve_windows::{Diagnostics, WindowResolver};
use mirror_app::infrastructure::input_capture::{CaptureError, InputSource};
use mirror_app::infrastructure::storage::config::{
    config_file_path, load_config, save_config, AppConfig,
};
use mirror_app::infrastructure::windowing::{WindowError, WindowSystem};

/// Command-line arguments.  Every flag overrides the config file.
#[derive(Debug, Parser)]
#[command(
    name = "mirrorbox",
    about = "Mirror one window's mouse and keyboard input to other windows",
    version
)]
struct Cli {
    /// Path to a config file instead of the platform default.
    #[arg(long, env = "MIRRORBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Title substring identifying the source window (repeatable).
    #[arg(long = "source", env = "MIRRORBOX_SOURCE", value_delimiter = ',')]
    source: Vec<String>,

    /// Title substring identifying target windows (repeatable).
    #[arg(long = "target", env = "MIRRORBOX_TARGETS", value_delimiter = ',')]
    targets: Vec<String>,

    /// Foreground sampling interval in milliseconds.
    #[arg(long, env = "MIRRORBOX_FOREGROUND_POLL_MS")]
    foreground_poll_ms: Option<u64>,

    /// How long a resolved target set is reused, in milliseconds.
    #[arg(long, env = "MIRRORBOX_TARGET_REFRESH_MS")]
    target_refresh_ms: Option<u64>,

    /// Log level when `RUST_LOG` is not set.
    #[arg(long, env = "MIRRORBOX_LOG_LEVEL")]
    log_level: Option<String>,

    /// List every visible titled window, marking the ones that match.
    #[arg(long, conflicts_with_all = ["show_target_summary", "diagnose"])]
    list_targets: bool,

    /// Print the source window and the current target matches, then exit.
    #[arg(long, conflicts_with = "diagnose")]
    show_target_summary: bool,

    /// Print the state of the source and every matched target, then exit.
    #[arg(long)]
    diagnose: bool,

    /// Print listings as JSON.
    #[arg(long)]
    json: bool,

    /// Write the effective settings to the config file, then exit.
    #[arg(long, conflicts_with_all = ["list_targets", "show_target_summary", "diagnose"])]
    save_config: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if !self.source.is_empty() {
            config.session.source = self.source.clone();
        }
        if !self.targets.is_empty() {
            config.session.targets = self.targets.clone();
        }
        if let Some(ms) = self.foreground_poll_ms {
            config.timing.foreground_poll_ms = ms;
        }
        if let Some(ms) = self.target_refresh_ms {
            config.timing.target_refresh_ms = ms;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = load_config(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut app_config);

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.logging.level)),
        )
        .init();

    if cli.save_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => config_file_path().context("locating the config file")?,
        };
        save_config(&app_config, &path).context("saving configuration")?;
        println!("configuration written to {}", path.display());
        return Ok(());
    }

    let session = app_config
        .to_session_config()
        .context("invalid configuration")?;
    let windows = native_windows()?;
    let resolver = WindowResolver::new(windows.clone());

    if cli.list_targets {
        return list_targets(&resolver, &session, cli.json);
    }
    if cli.show_target_summary {
        return show_summary(&resolver, &session, cli.json);
    }
    if cli.diagnose {
        return diagnose(&resolver, Diagnostics::new(windows), &session, cli.json);
    }

    if session.source.is_empty() || session.targets.is_empty() {
        bail!("both a source (--source) and at least one target (--target) are required");
    }
    show_summary(&resolver, &session, false)?;

    let input = native_input()?;
    let cancel = CancellationToken::new();

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            on_signal.cancel();
        }
    });

    info!("MirrorBox running.  Press Ctrl-C to exit.");
    let report = mirror_session::run(session, windows, input.as_ref(), cancel).await?;
    println!(
        "mirrored {} event(s): {} post(s) delivered, {} failed, {} discarded while idle",
        report.events_received - report.events_discarded,
        report.posts_delivered,
        report.posts_failed,
        report.events_discarded,
    );
    Ok(())
}

fn list_targets(resolver: &WindowResolver, session: &SessionConfig, json: bool) -> anyhow::Result<()> {
    let source = (!session.source.is_empty()).then_some(&session.source);
    let listing = resolver.list_targets(&session.targets, source)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }
    for row in &listing {
        let mark = if row.matched { "[MATCH]" } else { "       " };
        println!("{mark} {:>12}  {}", row.handle.to_string(), row.title);
    }
    println!("{} window(s), {} matched", listing.len(), listing.iter().filter(|r| r.matched).count());
    Ok(())
}

fn show_summary(resolver: &WindowResolver, session: &SessionConfig, json: bool) -> anyhow::Result<()> {
    let source = resolver.find_source(&session.source, &session.targets);
    let matches = resolver.current_matches(&session.targets, Some(&session.source));
    if json {
        let summary = serde_json::json!({ "source": source, "targets": matches });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    match &source {
        Some(w) => println!("source: {}  {}", w.handle, w.title),
        None => println!("source: (no window matches unambiguously)"),
    }
    if matches.is_empty() {
        println!("targets: (no window matches)");
    }
    for target in &matches {
        println!("target: {}  {}  (matched \"{}\")", target.handle, target.title, target.matched_by);
    }
    Ok(())
}

fn diagnose(
    resolver: &WindowResolver,
    diagnostics: Diagnostics,
    session: &SessionConfig,
    json: bool,
) -> anyhow::Result<()> {
    let source = resolver
        .find_source(&session.source, &session.targets)
        .map(|w| diagnostics.inspect(w.handle));
    let targets = diagnostics.inspect_all(&resolver.current_matches(&session.targets, Some(&session.source)));
    if json {
        let report = serde_json::json!({ "source": source, "targets": targets });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    let rows = source.iter().map(|d| ("source", d)).chain(targets.iter().map(|d| ("target", d)));
    for (role, d) in rows {
        let bounds = match (&d.client_bounds, &d.bounds_error) {
            (Some(r), _) => r.to_string(),
            (None, Some(e)) => format!("unmeasurable ({e})"),
            (None, None) => "unknown".to_string(),
        };
        let owner = match d.owner {
            Some(o) => format!("thread={} process={}", o.thread_id, o.process_id),
            None => "owner=unknown".to_string(),
        };
        println!(
            "{role}: {}  {:?}  client={bounds}  {owner}  foreground={}  fullscreen={}  degenerate={}  alive={}",
            d.handle,
            d.title.as_deref().unwrap_or(""),
            d.is_foreground,
            d.fullscreen,
            d.degenerate,
            d.exists,
        );
        if d.fullscreen {
            println!("  covers the whole screen; it may read input exclusively and ignore posted messages");
        }
    }
    Ok(())
}

// ── Platform adapters ─────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
fn native_windows() -> Result<Arc<dyn WindowSystem>, WindowError> {
    use mirror_app::infrastructure::windowing::NativeWindowSystem;
    Ok(Arc::new(NativeWindowSystem::new()))
}

#[cfg(not(target_os = "windows"))]
fn native_windows() -> Result<Arc<dyn WindowSystem>, WindowError> {
    Err(WindowError::Unsupported)
}

#[cfg(target_os = "windows")]
fn native_input() -> Result<Arc<dyn InputSource>, CaptureError> {
    use mirror_app::infrastructure::input_capture::NativeInputSource;
    Ok(Arc::new(NativeInputSource::new()))
}

#[cfg(not(target_os = "windows"))]
fn native_input() -> Result<Arc<dyn InputSource>, CaptureError> {
    Err(CaptureError::UnsupportedPlatform(std::env::consts::OS.to_string()))
}
