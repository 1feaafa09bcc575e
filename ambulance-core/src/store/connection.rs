//! Lazily established, shared connection handle
//!
//! The handle is built on first use and reused by every caller until
//! `disconnect`. Construction happens under an exclusive lock with a re-check,
//! so concurrent first use still builds exactly one connection. Failures are
//! never cached: the next caller tries again.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Builds and tears down the physical connection behind a handle
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Cheap-to-clone shared handle (e.g. a pooled client)
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> StoreResult<Self::Handle>;

    async fn disconnect(&self, handle: Self::Handle) -> StoreResult<()>;
}

/// Owns the single cached handle produced by a [`Connector`]
pub struct ConnectionManager<C: Connector> {
    connector: C,
    setup_timeout: Duration,
    /// Current handle; readers only take the shared lock
    handle: RwLock<Option<C::Handle>>,
    /// Serializes construction and teardown
    lifecycle: Mutex<()>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, setup_timeout: Duration) -> Self {
        Self {
            connector,
            setup_timeout,
            handle: RwLock::new(None),
            lifecycle: Mutex::new(()),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Return the cached handle, establishing it on first use
    pub async fn connect(&self) -> StoreResult<C::Handle> {
        if let Some(handle) = self.cached().await {
            return Ok(handle);
        }

        let _guard = self.lifecycle.lock().await;

        // another caller may have connected while we waited
        if let Some(handle) = self.cached().await {
            return Ok(handle);
        }

        debug!("establishing document store connection");
        let handle = tokio::time::timeout(self.setup_timeout, self.connector.connect())
            .await
            .map_err(|_| StoreError::Timeout {
                after: self.setup_timeout,
            })??;

        *self.handle.write().await = Some(handle.clone());
        info!("document store connection established");
        Ok(handle)
    }

    /// Tear down and forget the cached handle. No-op when not connected.
    pub async fn disconnect(&self) -> StoreResult<()> {
        let _guard = self.lifecycle.lock().await;

        let Some(handle) = self.handle.write().await.take() else {
            return Ok(());
        };

        self.connector.disconnect(handle).await?;
        info!("document store connection closed");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.handle.read().await.is_some()
    }

    async fn cached(&self) -> Option<C::Handle> {
        self.handle.read().await.clone()
    }
}
