//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ticketsafi_client::config::{default_config_path, ClientConfig};
use ticketsafi_client::StaffRole;

/// Payment confirmation and gate scanning client for TicketSafi.
#[derive(Parser, Debug)]
#[command(name = "ticketsafi-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, short, env = "TICKETSAFI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the TicketSafi API.
    #[arg(long, env = "TICKETSAFI_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for API requests.
    #[arg(long, env = "TICKETSAFI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Delay between payment status checks, in milliseconds.
    #[arg(long, env = "TICKETSAFI_POLL_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Maximum number of payment status checks.
    #[arg(long, env = "TICKETSAFI_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Log level.
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll a payment reference until it settles, fails or times out.
    VerifyPayment {
        /// Payment reference returned by the gateway callback.
        reference: String,
    },

    /// Verify a decoded ticket QR payload.
    Scan {
        /// Decoded QR text.
        qr_hash: String,

        /// Role of the operator.
        #[arg(long, value_enum, default_value = "scanner", env = "TICKETSAFI_ROLE")]
        role: CliRole,
    },

    /// Show an organizer's storefront and its upcoming events.
    Store {
        /// Store slug.
        slug: String,
    },
}

/// Operator role CLI enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliRole {
    /// Event organizer.
    Organizer,
    /// Gate staff.
    Scanner,
    /// Ticket buyer.
    Attendee,
}

impl Cli {
    /// Convert CLI arguments into a ClientConfig.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded,
    /// or if the resulting polling policy is invalid.
    pub fn to_config(&self) -> color_eyre::Result<ClientConfig> {
        // Explicit path, then the platform default if present
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.is_file() {
                    ClientConfig::from_file(&path)?
                } else {
                    ClientConfig::default()
                }
            }
        };

        if let Some(api_url) = &self.api_url {
            config.api_base_url.clone_from(api_url);
        }
        if let Some(token) = &self.token {
            config.api_token = Some(token.clone());
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll.interval_ms = interval_ms;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.poll.max_attempts = max_attempts;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level.clone_from(log_level);
        }

        config.poll.validate()?;
        Ok(config)
    }
}

impl From<CliRole> for StaffRole {
    fn from(r: CliRole) -> Self {
        match r {
            CliRole::Organizer => StaffRole::Organizer,
            CliRole::Scanner => StaffRole::Scanner,
            CliRole::Attendee => StaffRole::Attendee,
        }
    }
}
