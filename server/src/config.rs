//! Server configuration from environment variables.

use std::path::PathBuf;

use secrecy::SecretString;

/// Runtime configuration for the HTTP server.
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    /// Directory uploaded media is stored in.
    pub upload_dir: PathBuf,
    /// HeyGen API key; the stub provider is used when absent.
    pub heygen_api_key: Option<SecretString>,
}

impl ServerConfig {
    /// Reads configuration from the environment, falling back to defaults
    /// under `~/.lingoclip/`.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("LINGOCLIP_DATA_DIR")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".lingoclip")))
            .unwrap_or_else(|| PathBuf::from("."));

        let bind_addr =
            std::env::var("LINGOCLIP_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        let upload_dir = std::env::var("LINGOCLIP_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("uploads"));

        let heygen_api_key = std::env::var("HEYGEN_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        Self {
            bind_addr,
            database_path: data_dir.join("data").join("lingoclip.db"),
            upload_dir,
            heygen_api_key,
        }
    }
}
