//! Command-line interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// handpoint - drive the pointer with hand gestures
#[derive(Parser, Debug)]
#[command(name = "handpoint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write daily-rotated log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gesture engine on a landmark stream
    Run(RunArgs),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check that the remote backend answers
    Health {
        /// Backend base URL (overrides config)
        #[arg(long)]
        backend_url: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON-lines landmark file (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Start in desk mode (index tip steers, thumb clicks)
    #[arg(long)]
    pub desk: bool,

    /// Forward moves and clicks to the remote backend
    #[arg(long)]
    pub backend: bool,

    /// Backend base URL (overrides config)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Where local pointer events go
    #[arg(long, value_enum, default_value_t = PointerKind::Noop)]
    pub pointer: PointerKind,

    /// Replay pacing in frames per second (for recorded files)
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<f64>,

    /// Stop after this long, e.g. "30s" or "2m"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub run_for: Option<Duration>,

    /// Print engine events as JSON lines on stdout
    #[arg(long)]
    pub events: bool,
}

impl RunArgs {
    /// Delay between replayed frames, if pacing was requested.
    pub fn frame_interval(&self) -> Option<Duration> {
        self.fps
            .and_then(|fps| Duration::try_from_secs_f64(1.0 / fps).ok())
    }
}

/// Accept a positive rate whose frame interval is representable.
fn parse_fps(value: &str) -> Result<f64, String> {
    let fps: f64 = value
        .parse()
        .map_err(|e| format!("invalid frame rate '{value}': {e}"))?;
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("frame rate must be positive, got {value}"));
    }
    Duration::try_from_secs_f64(1.0 / fps)
        .map_err(|_| format!("frame rate {value} is too small"))?;
    Ok(fps)
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Inject into the OS pointer
    Enigo,
    /// Log only
    Noop,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
