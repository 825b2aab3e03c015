//! CLI surface for the vdm downloader.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use vdm_core::config;
use vdm_core::version::VersionSpec;
use vdm_core::workflow::{self, WorkflowOptions};

use crate::driver::WebDriverDom;
use crate::term::TermConsole;

/// vdm: automated downloader for versioned vendor-portal binaries.
#[derive(Debug, Parser)]
#[command(name = "vdm")]
#[command(about = "Automated downloader for versioned vendor-portal binaries", long_about = None)]
pub struct Cli {
    /// Target version, e.g. 2024.1 or 2021.2.1
    #[arg(short = 'v', long, value_name = "VERSION")]
    pub version_target: String,

    /// Download output directory (default: home directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Per-wait timeout in seconds (overrides config)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// WebDriver endpoint (overrides config)
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub no_headless: bool,
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    // Malformed version strings are fatal before any navigation.
    let target = VersionSpec::parse(&cli.version_target)?;

    let download_dir = match cli.output {
        Some(dir) => dir,
        None => dirs::home_dir().context("could not determine the home directory")?,
    };

    let mut opts = WorkflowOptions::new(download_dir);
    opts.portal_url = cfg.portal_url.clone();
    opts.policy = cfg.wait_policy();
    if let Some(secs) = cli.timeout {
        opts.policy.timeout = Duration::from_secs_f64(secs);
    }
    opts.monitor_interval = cfg.monitor_interval();
    opts.temp_suffix = cfg.temp_suffix.clone();

    let webdriver_url = cli.webdriver_url.unwrap_or_else(|| cfg.webdriver_url.clone());
    let dom = WebDriverDom::connect(&webdriver_url, &opts.download_dir, !cli.no_headless).await?;
    let mut console = TermConsole;

    let path = workflow::run(&dom, &mut console, &target, &opts).await?;
    tracing::info!(path = %path.display(), "workflow finished");

    // Session teardown happens on the normal exit path only; a fatal
    // timeout propagates without releasing the session.
    dom.quit().await?;
    Ok(())
}
