use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reaper::adapters::ports_from_config;
use reaper::runtime::{Runtime, run_scheduler_loop, shutdown_signal};
use reaper_application::ReaperSettings;
use reaper_domain::ReaperConfig;

/// Kills database operations that run past the configured threshold.
#[derive(Debug, Parser)]
#[command(name = "reaper-service", version)]
struct Args {
    /// YAML config file.
    #[arg(long, env = "REAPER_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Run a single invocation and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(default_config_path);
    let config = match ReaperConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fatal: failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.debug);

    info!(
        config = %config_path.display(),
        threshold_secs = config.scan.max_running_secs,
        notifications = config.notifications.enabled,
        "starting"
    );

    let ports = match ports_from_config(&config) {
        Ok(ports) => ports,
        Err(e) => {
            error!(error = %format!("{e:#}"), "fatal: failed to set up ports");
            return ExitCode::FAILURE;
        }
    };
    let mut runtime = Runtime::new(ports, ReaperSettings::from(&config));

    if args.once {
        return match runtime.invoke().await {
            Ok(_) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    let period = Duration::from_secs(config.schedule.interval_secs.max(1));
    run_scheduler_loop(&mut runtime, period, shutdown_signal()).await;

    let totals = runtime.totals();
    info!(
        invocations = totals.invocations,
        failed_invocations = totals.failed_invocations,
        killed = totals.killed,
        kill_failures = totals.kill_failures,
        "shutdown complete"
    );
    ExitCode::SUCCESS
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = env::var("HOME") {
        let path = Path::new(&home).join(".reaper").join("config.yaml");
        if path.exists() {
            return path;
        }
    }

    PathBuf::from("reaper-config.yaml")
}
