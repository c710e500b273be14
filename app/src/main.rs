//! handpoint - gesture-driven pointer control
//!
//! Reads hand landmark frames and turns them into pointer moves and clicks,
//! locally and/or on a remote backend.

mod cli;
mod logging;
mod runner;

use anyhow::bail;
use cli::{Cli, Commands, ConfigAction, RunArgs};
use handpoint_core::{config_path, load_or_default, save_yaml, EngineConfig, GestureMode};
use runner::RunOptions;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    logging::setup(cli.verbose, cli.log_dir.as_deref());

    let path = cli.config.clone().unwrap_or_else(config_path);

    match cli.command {
        Commands::Run(args) => {
            let config = apply_run_overrides(load_or_default(&path), &args);
            info!(
                mode = ?config.gesture.mode,
                backend = config.backend.enabled,
                "Starting handpoint"
            );
            let opts = RunOptions {
                input: args.input.clone(),
                pointer: args.pointer,
                frame_interval: args.frame_interval(),
                run_for: args.run_for,
                print_events: args.events,
            };
            runner::run(config, opts)?;
        }
        Commands::Config { action } => run_config(action, &path)?,
        Commands::Health { backend_url } => {
            let mut config = load_or_default(&path);
            if let Some(url) = backend_url {
                config.backend.base_url = url;
            }
            runner::check_health(&config.backend)?;
        }
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_run_overrides(mut config: EngineConfig, args: &RunArgs) -> EngineConfig {
    if args.desk {
        config.gesture.mode = GestureMode::Desk;
    }
    if args.backend {
        config.backend.enabled = true;
    }
    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    config
}

fn run_config(action: ConfigAction, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            save_yaml(path, &EngineConfig::default())?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let config = load_or_default(path);
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}
