//! Server state and configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assets::ImageCache;
use crate::error::EtiquetaError;
use crate::registry::{RegistryClient, RegistryConfig};
use crate::surface::Surface;

/// How long a finished export stays downloadable before its handle is
/// released. Long enough that an in-flight download is never interrupted.
pub const DOWNLOAD_EXPIRATION_SECS: u64 = 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Registry endpoint URL; None disables registry sync.
    pub registry_url: Option<String>,
    /// Logo image composited onto QR codes; None renders plain QR codes.
    pub logo_path: Option<PathBuf>,
}

/// A finished export held for download until it expires.
pub struct DownloadEntry {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub created: Instant,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    /// Registry client, present when a registry URL is configured.
    pub registry: Option<RegistryClient>,
    /// Memoized image loads (the QR logo).
    pub images: ImageCache,
    /// Primary generation surface.
    pub generate: RwLock<Surface>,
    /// Secondary lookup/preview surface; starts empty, so its export
    /// actions refuse until the first successful preview.
    pub lookup: RwLock<Surface>,
    /// Finished exports awaiting download, keyed by handle.
    pub downloads: RwLock<HashMap<Uuid, DownloadEntry>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, EtiquetaError> {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        // Validate the registry URL once, up front.
        let registry = match &config.registry_url {
            Some(url) => Some(RegistryClient::new(&RegistryConfig {
                base_url: url.clone(),
            })?),
            None => None,
        };

        Ok(Self {
            config,
            boot_time,
            registry,
            images: ImageCache::new(),
            generate: RwLock::new(Surface::new("etiquetas")),
            lookup: RwLock::new(Surface::new("consulta")),
            downloads: RwLock::new(HashMap::new()),
        })
    }
}
