use serde::Deserialize;

/// Which persistence gateway backs the stores.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

/// Configuration options for the promptbook server.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// SQLite database path, used by the `sqlite` backend.
    pub database_url: String,
    #[serde(default)]
    pub storage: StorageBackend,
    /// Document file path, used by the `json` backend.
    pub json_path: String,
    /// Cookie signing key; at least 64 bytes. A random key is generated when empty.
    #[serde(default)]
    pub secret_key: String,
}
