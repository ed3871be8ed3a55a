//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::capture::{Duration, VideoFormat};

/// SignScribe - record ASL videos and keep them in a local library
#[derive(Parser, Debug)]
#[command(name = "signscribe")]
#[command(version = "1.0.0")]
#[command(about = "Record sign language videos, translate them and manage a local library")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording duration (e.g., 10s, 1m, 2m30s); Ctrl-C stops earlier
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Display name for the saved recording
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: Option<String>,

    /// Submit the recording for recognition and translation
    #[arg(short = 't', long)]
    pub translate: bool,

    /// Container format (webm, mp4)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Camera device node
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Library file path
    #[arg(short = 'l', long, value_name = "PATH", env = "SIGNSCRIBE_LIBRARY")]
    pub library: Option<String>,

    /// Translation service endpoint
    #[arg(short = 'e', long, value_name = "URL", env = "SIGNSCRIBE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Subcommand; recording is the default action
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved recordings, newest first
    List,
    /// Delete a recording from the library
    Delete {
        /// Recording id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Export a recording's media to a file
    Export {
        /// Recording id
        id: String,
        /// Output file path
        #[arg(short = 'o', long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub name: Option<String>,
    pub translate: bool,
    pub format: Option<VideoFormat>,
    pub device: String,
    pub library: Option<String>,
    pub endpoint: String,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "endpoint",
    "library_path",
    "device",
    "format",
    "translate",
    "max_duration",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["signscribe"]);
        assert!(cli.duration.is_none());
        assert!(cli.name.is_none());
        assert!(!cli.translate);
        assert!(cli.format.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_record_options() {
        let cli = Cli::parse_from([
            "signscribe",
            "-d",
            "30s",
            "-n",
            "Greeting",
            "--translate",
            "-f",
            "mp4",
        ]);
        assert_eq!(cli.duration, Some("30s".to_string()));
        assert_eq!(cli.name, Some("Greeting".to_string()));
        assert!(cli.translate);
        assert_eq!(cli.format, Some("mp4".to_string()));
    }

    #[test]
    fn cli_parses_list() {
        let cli = Cli::parse_from(["signscribe", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn cli_parses_delete_with_yes() {
        let cli = Cli::parse_from(["signscribe", "delete", "abc-1", "--yes"]);
        if let Some(Commands::Delete { id, yes }) = cli.command {
            assert_eq!(id, "abc-1");
            assert!(yes);
        } else {
            panic!("Expected Delete command");
        }
    }

    #[test]
    fn cli_parses_export() {
        let cli = Cli::parse_from(["signscribe", "export", "abc-1", "-o", "out.webm"]);
        if let Some(Commands::Export { id, output }) = cli.command {
            assert_eq!(id, "abc-1");
            assert_eq!(output, PathBuf::from("out.webm"));
        } else {
            panic!("Expected Export command");
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["signscribe", "config", "set", "format", "webm"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "format");
            assert_eq!(value, "webm");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("endpoint"));
        assert!(is_valid_config_key("max_duration"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
