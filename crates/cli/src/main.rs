//! foldersync CLI - periodic folder scanning daemon

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::{cmd_check, cmd_config_init, cmd_config_show, cmd_daemon, cmd_folders, cmd_scan};
use logging::init_cli_logging;

#[derive(Parser)]
#[command(name = "foldersync")]
#[command(about = "Keep synchronized folders scanned on a schedule")]
#[command(after_help = "\
QUICK START:
  foldersync config init          # Write the default config
  foldersync folders              # List configured folders and their health
  foldersync daemon               # Scan every folder on its schedule

CONFIG LOCATION:
  ~/.config/foldersync/config.toml (override with CONFIG_DIR)")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `foldersync config`
#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Write the default config to the user config path
  Init {
    /// Overwrite an existing config
    #[arg(long)]
    force: bool,
  },
  /// Print the effective configuration
  Show {
    /// Config file (default: user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

#[derive(Subcommand)]
enum Commands {
  /// Run the folder daemon until Ctrl-C
  Daemon {
    /// Config file (default: user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Scan a folder once and print what changed
  Scan {
    /// Folder id
    folder: String,
    /// Restrict the scan to these folder-relative paths
    #[arg(short, long = "subdir", value_name = "PATH")]
    subdirs: Vec<String>,
    /// Config file (default: user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Run the health check of a folder
  Check {
    /// Folder id
    folder: String,
    /// Config file (default: user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// List configured folders
  Folders {
    /// Config file (default: user config)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // The daemon sets up its own logging once its config is loaded
  if !matches!(cli.command, Commands::Daemon { .. }) {
    init_cli_logging();
  }

  match cli.command {
    Commands::Daemon { config } => cmd_daemon(config.as_deref()).await,
    Commands::Scan {
      folder,
      subdirs,
      config,
    } => cmd_scan(&folder, subdirs, config.as_deref()).await,
    Commands::Check { folder, config } => cmd_check(&folder, config.as_deref()).await,
    Commands::Folders { config } => cmd_folders(config.as_deref()).await,
    Commands::Config { command } => match command {
      ConfigCommand::Init { force } => cmd_config_init(force).await,
      ConfigCommand::Show { config } => cmd_config_show(config.as_deref()).await,
    },
  }
}
