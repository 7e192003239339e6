use lc_config::Config;
use lc_core::ServerStatus;

use clap::Parser;

/// Environment variable consulted for the token when `--token` is absent
pub const TOKEN_ENV: &str = "LC_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "lc")]
#[command(about = "Attach to the live console of a remote server")]
#[command(version)]
pub struct Cli {
    /// Identifier of the server whose console to attach to
    #[arg(long)]
    pub server_key: String,

    /// Bearer token (falls back to the LC_TOKEN environment variable)
    #[arg(long)]
    pub token: Option<String>,

    /// Status the server is known to be in at startup
    #[arg(long, default_value = "running")]
    pub status: ServerStatus,

    /// REST base URL (overrides config)
    #[arg(long)]
    pub api_url: Option<String>,

    /// WebSocket base URL (overrides config)
    #[arg(long)]
    pub ws_url: Option<String>,

    /// Skip loading log history on connect
    #[arg(long)]
    pub no_history: bool,
}

impl Cli {
    /// Fold command-line overrides into loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref api_url) = self.api_url {
            config.server.api_url = api_url.clone();
        }
        if let Some(ref ws_url) = self.ws_url {
            config.server.ws_url = Some(ws_url.clone());
        }
        if self.no_history {
            config.history.enabled = false;
        }
    }
}
