//! Document store layer - generic CRUD over string-keyed documents
//!
//! # Design Principles
//!
//! - One trait, many document shapes: `DocumentStore<D>` is generic over `D`
//! - NotFound / Conflict / Timeout are reported distinctly, never swallowed
//! - Every call is a bounded unit of work (see [`with_deadline`])
//! - Implementations are shared across tasks behind an `Arc`

pub mod connection;
pub mod memory;
pub mod mongo;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

pub use connection::{ConnectionManager, Connector};
pub use memory::MemoryDocumentStore;
pub use mongo::{MongoConnector, MongoDocumentStore};

/// Anything that can be stored as a document
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {}

/// CRUD access to documents of type `D`, keyed by an opaque string id
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Insert a new document. `Conflict` if the id is taken.
    async fn create(&self, id: &str, document: &D) -> StoreResult<()>;

    /// Load a document. `NotFound` if absent.
    async fn find(&self, id: &str) -> StoreResult<D>;

    /// Replace a document as a whole. `NotFound` if absent.
    async fn update(&self, id: &str, document: &D) -> StoreResult<()>;

    /// Remove a document. `NotFound` if absent.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Release the underlying connection, if any
    async fn disconnect(&self) -> StoreResult<()>;

    /// Whether a live connection is held right now. Never connects.
    async fn is_connected(&self) -> bool {
        true
    }
}

/// Run `work` with a deadline, turning expiry into `StoreError::Timeout`
pub async fn with_deadline<T, F>(deadline: Duration, work: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| StoreError::Timeout { after: deadline })?
}
