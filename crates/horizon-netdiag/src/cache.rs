//! Cached network configuration.
//!
//! [`ConfigCache`] owns one discovery implementation and the last snapshot it
//! produced. A single async mutex guards both the read and the rebuild, so
//! callers racing on a cold cache wait for one discovery instead of each
//! running their own.
//!
//! # Example
//!
//! ```ignore
//! use horizon_netdiag::ConfigCache;
//!
//! let cache = ConfigCache::system();
//! let config = cache.get().await?;
//! println!("gateway: {:?}", config.default_gateway);
//!
//! // After a network change:
//! let fresh = cache.refresh().await?;
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::discovery::{ConfigDiscovery, NetworkConfig, PlatformDiscovery};
use crate::error::Result;
use crate::logging::targets;

/// A caller-owned cache of the active network configuration.
pub struct ConfigCache<D: ConfigDiscovery = PlatformDiscovery> {
    discovery: D,
    snapshot: Mutex<Option<Arc<NetworkConfig>>>,
}

impl ConfigCache {
    /// Cache backed by discovery on the running platform.
    pub fn system() -> Self {
        Self::new(PlatformDiscovery::system())
    }
}

impl<D: ConfigDiscovery> ConfigCache<D> {
    /// Create an empty cache over `discovery`.
    pub fn new(discovery: D) -> Self {
        Self {
            discovery,
            snapshot: Mutex::new(None),
        }
    }

    /// The discovery implementation behind this cache.
    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    /// Return the cached snapshot, discovering it on first use.
    ///
    /// A failed discovery caches nothing; the next call tries again.
    #[tracing::instrument(skip(self), target = "horizon_netdiag::cache", level = "debug")]
    pub async fn get(&self) -> Result<Arc<NetworkConfig>> {
        let mut snapshot = self.snapshot.lock().await;
        if let Some(config) = snapshot.as_ref() {
            tracing::trace!(target: targets::CACHE, "cache hit");
            return Ok(Arc::clone(config));
        }

        tracing::debug!(target: targets::CACHE, "cache miss, discovering");
        let config = Arc::new(self.discovery.discover().await?);
        *snapshot = Some(Arc::clone(&config));
        Ok(config)
    }

    /// Rebuild the snapshot unconditionally.
    ///
    /// On success the new snapshot replaces the old one and is returned. On
    /// failure the previous snapshot stays published and the error is
    /// returned.
    #[tracing::instrument(skip(self), target = "horizon_netdiag::cache", level = "debug")]
    pub async fn refresh(&self) -> Result<Arc<NetworkConfig>> {
        let mut snapshot = self.snapshot.lock().await;
        match self.discovery.discover().await {
            Ok(config) => {
                let config = Arc::new(config);
                *snapshot = Some(Arc::clone(&config));
                tracing::debug!(
                    target: targets::CACHE,
                    interface = %config.interface_name,
                    "snapshot refreshed"
                );
                Ok(config)
            }
            Err(e) => {
                tracing::warn!(
                    target: targets::CACHE,
                    error = %e,
                    kept_previous = snapshot.is_some(),
                    "refresh failed"
                );
                Err(e)
            }
        }
    }

    /// Drop the snapshot; the next [`get`](Self::get) discovers again.
    pub async fn invalidate(&self) {
        let mut snapshot = self.snapshot.lock().await;
        if snapshot.take().is_some() {
            tracing::debug!(target: targets::CACHE, "snapshot invalidated");
        }
    }

    /// The current snapshot without triggering discovery.
    pub async fn cached(&self) -> Option<Arc<NetworkConfig>> {
        self.snapshot.lock().await.clone()
    }
}
