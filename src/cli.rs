use clap::Parser;
use std::path::PathBuf;

use crate::entities::{ControlMode, DataOrigin};

// Build version with data-layout info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Data:   <root>/<origin>/<mode>/{stats.json, <id>.json}\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Robot episode replay viewer
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Local episode data root directory - optional if --url is given
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Fetch episode data from an HTTP(S) base URL instead of a directory
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with = "data_dir")]
    pub url: Option<String>,

    /// Initial control mode (open-loop, closed-loop)
    #[arg(short = 'm', long = "mode", value_name = "MODE", default_value = "open-loop")]
    pub mode: ControlMode,

    /// Initial data origin (simulation, hardware)
    #[arg(short = 'd', long = "origin", value_name = "ORIGIN", default_value = "simulation")]
    pub origin: DataOrigin,

    /// Frame interval in milliseconds (replay tick rate)
    #[arg(short = 'i', long = "interval", value_name = "MS", default_value = "33")]
    pub interval_ms: u64,

    /// Auto-play the first episode on startup
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Enable debug logging to file (default: episcope.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
