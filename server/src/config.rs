//! Server configuration
//!
//! Configuration is loaded once from environment variables at startup.

use std::env;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Realtime broadcast configuration
    pub realtime: RealtimeConfig,
}

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Database holding the overlay collection
    pub database: String,
    /// Collection name for overlay documents
    pub collection: String,
}

/// Realtime broadcast configuration
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Whether the WebSocket endpoint and mutation events are enabled
    pub enabled: bool,
    /// Outbound queue length per connected session
    pub outbound_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            storage: StorageConfig::default(),
            realtime: RealtimeConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "rtsp_overlay_db".to_string(),
            collection: "overlays".to_string(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            outbound_buffer: 32,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server config
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Storage config
        if let Ok(uri) = env::var("MONGODB_URI")
            && !uri.is_empty()
        {
            config.storage.uri = uri;
        }
        if let Ok(db) = env::var("MONGODB_DATABASE")
            && !db.is_empty()
        {
            config.storage.database = db;
        }
        if let Ok(coll) = env::var("MONGODB_COLLECTION")
            && !coll.is_empty()
        {
            config.storage.collection = coll;
        }

        // Realtime config
        if let Ok(val) = env::var("REALTIME_ENABLED") {
            config.realtime.enabled = parse_flag(&val);
        }
        if let Ok(val) = env::var("WS_OUTBOUND_BUFFER")
            && let Ok(n) = val.parse::<usize>()
            && n > 0
        {
            config.realtime.outbound_buffer = n;
        }

        config
    }
}
