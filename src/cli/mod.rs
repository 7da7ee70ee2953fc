use clap::Parser;

use crate::config::endpoints::DEFAULT_API_BASE;

pub const DEFAULT_CONTACT_LINK: &str =
    "https://wa.me/6287871656326?text=Halo%20Hibiscus%20Efsya%2C%20saya%20butuh%20bantuan";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the websocket chat server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional port for the JSON HTTP API. Disabled when unset.
    #[arg(long, env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    // --- Catalog Args ---
    /// Base URL of the catalog backend (the directory holding products.php etc).
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_API_BASE)]
    pub catalog_api_url: String,

    /// Request timeout in seconds for catalog backend calls.
    #[arg(long, env = "CATALOG_TIMEOUT_SECS", default_value = "10")]
    pub catalog_timeout_secs: u64,

    /// Optional JSON file replacing the bundled fallback catalog.
    #[arg(long, env = "FALLBACK_DATA_PATH")]
    pub fallback_data_path: Option<String>,

    /// Serve only the fallback catalog and never contact the backend.
    #[arg(long, env = "SKIP_REMOTE_FETCH", default_value = "false")]
    pub skip_remote_fetch: bool,

    // --- Chat Args ---
    /// Lower bound of the randomised pause before a bot reply, in milliseconds.
    #[arg(long, env = "REPLY_DELAY_MIN_MS", default_value = "800")]
    pub reply_delay_min_ms: u64,

    /// Upper bound of the randomised pause before a bot reply, in milliseconds.
    #[arg(long, env = "REPLY_DELAY_MAX_MS", default_value = "1500")]
    pub reply_delay_max_ms: u64,

    /// Link offered by the widget for talking to a human.
    #[arg(long, env = "CONTACT_LINK", default_value = DEFAULT_CONTACT_LINK)]
    pub contact_link: String,
}
