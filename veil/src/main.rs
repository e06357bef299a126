//! Applies transparency rules to X11 windows.
//!
//! Rules come from the command line or a config file. By default veil makes
//! one pass over the window tree, applies opacity to every match and exits;
//! with `--monitor` it stays connected and keeps the rules applied as
//! windows come, go and change focus.

use clap::Parser;
use std::path::PathBuf;
use veil_core::Manager;
use xlib_display_server::{XlibDisplayServer, XlibWindowHandle};

mod config;
mod logging;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Read rules from this file.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub rules_file: Option<PathBuf>,

    /// Inline rule text, e.g. 'WM_CLASS(xterm){focus:0.8;normal:0.5;}'.
    #[arg(short = 'r', long = "rule", value_name = "RULES")]
    pub rule: Option<String>,

    /// Keep monitoring window events and apply rules as they happen,
    /// instead of applying once and exiting.
    #[arg(short, long)]
    pub monitor: bool,
}

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let cli = Cli::parse();
    let config = config::load(&cli)?;

    let rt = tokio::runtime::Runtime::new().expect("ERROR: couldn't init Tokio runtime");
    let _rt_guard = rt.enter();

    let mut manager = Manager::<XlibWindowHandle, config::Config, XlibDisplayServer>::new(config);

    // A rule that doesn't parse means nothing gets applied; refuse to start.
    let rule_count = manager.load_rules()?;
    tracing::info!(rule_count, "rules loaded");

    manager.scan_windows();

    if manager.config.monitor {
        manager.apply_all(true);
        tracing::info!("entering monitor mode");
        rt.block_on(manager.event_loop());
    } else {
        manager.apply_all(false);
    }

    Ok(())
}
