use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};

use crate::config_file::ConfigFile;
use crate::investor_service::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

#[derive(Serialize, Deserialize, ValueEnum, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One investor per line, tab separated
    Table,
    /// Pretty printed JSON array
    Json,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// List all investors (default)
    List,
    /// Show a single investor
    Get {
        /// Investor id
        id: i64,
    },
    /// Store a token for the selected server. Asks for it when not given
    Login {
        /// Bearer token. Omit it to type it in without echo
        token: Option<String>,
    },
    /// Show the user claims of the stored token
    Whoami,
    /// Forget the token stored for the selected server
    Logout,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Profile from ~/.kaia/config.toml
    #[arg(long, env = "KAIA_PROFILE")]
    pub profile: Option<String>,

    /// Alternative location of the config file
    #[arg(long, env = "KAIA_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Base url of the investors API [default: https://kaia.loophole.site]
    #[arg(long, env = "KAIA_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token. Takes precedence over the stored one
    #[arg(long, env = "KAIA_TOKEN")]
    pub token: Option<String>,

    /// Alternative location of the session state file [default: ~/.kaia.json]
    #[arg(long, env = "KAIA_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Request timeout in milliseconds [default: 15000]
    #[arg(long, env = "KAIA_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Output format [default: table]
    #[arg(long, value_enum, env = "KAIA_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Enable debug logs
    #[arg(short, long)]
    pub debug: bool,
}

impl Arguments {
    pub fn command(&self) -> Command {
        self.command.to_owned().unwrap_or(Command::List)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Key under which the session of the selected API is stored
    pub fn server(&self) -> String {
        self.base_url().trim_end_matches('/').to_owned()
    }

    pub fn timeout(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn output(&self) -> OutputFormat {
        self.output.to_owned().unwrap_or(OutputFormat::Table)
    }
}

pub struct Args;

impl Args {
    pub async fn parse() -> Result<Arguments> {
        if dotenv().is_ok() {
            log::debug!("Loaded variables from .env");
        }

        let mut args = Arguments::parse();

        let config_file = match &args.config_file {
            Some(path) => ConfigFile::from(path.to_owned()),
            None => ConfigFile::new()?,
        };
        config_file.apply_profile(&mut args).await?;

        Ok(args)
    }
}
