//! MongoDB document store
//!
//! One collection, documents located by their `id` field (not `_id`). A unique
//! index on `id` is ensured when the connection is established, so concurrent
//! duplicate creates still surface as `Conflict`.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info, instrument};

use super::connection::{ConnectionManager, Connector};
use super::{with_deadline, Document, DocumentStore};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

const APP_NAME: &str = "ambulance-wl";
const DUPLICATE_KEY: i32 = 11000;

/// Builds a verified `mongodb::Client` from a [`StoreConfig`]
pub struct MongoConnector {
    config: StoreConfig,
}

impl MongoConnector {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Client;

    async fn connect(&self) -> StoreResult<Client> {
        debug!(uri = %self.config.redacted(), "connecting to MongoDB");

        let mut options = ClientOptions::parse(self.config.connection_uri())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(self.config.timeout);
        options.server_selection_timeout = Some(self.config.timeout);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;

        // the driver connects lazily; make failures visible here
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        client
            .database(&self.config.database)
            .collection::<BsonDocument>(&self.config.collection)
            .create_index(index)
            .await
            .map_err(StoreError::transport)?;

        Ok(client)
    }

    async fn disconnect(&self, client: Client) -> StoreResult<()> {
        client.shutdown().await;
        Ok(())
    }
}

/// Document store over one MongoDB collection
pub struct MongoDocumentStore<D> {
    database: String,
    collection: String,
    timeout: Duration,
    connections: ConnectionManager<MongoConnector>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> MongoDocumentStore<D> {
    pub fn new(config: StoreConfig) -> Self {
        info!(config = %config.redacted(), "MongoDB config");
        Self {
            database: config.database.clone(),
            collection: config.collection.clone(),
            timeout: config.timeout,
            connections: ConnectionManager::new(MongoConnector::new(config.clone()), config.timeout),
            _document: PhantomData,
        }
    }

    async fn collection(&self) -> StoreResult<Collection<D>> {
        let client = self.connections.connect().await?;
        Ok(client
            .database(&self.database)
            .collection::<D>(&self.collection))
    }
}

fn by_id(id: &str) -> BsonDocument {
    doc! { "id": id }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MongoDocumentStore<D> {
    #[instrument(skip(self, document))]
    async fn create(&self, id: &str, document: &D) -> StoreResult<()> {
        with_deadline(self.timeout, async {
            let collection = self.collection().await?;

            let existing = collection
                .count_documents(by_id(id))
                .await
                .map_err(StoreError::transport)?;
            if existing > 0 {
                return Err(StoreError::Conflict { id: id.to_owned() });
            }

            match collection.insert_one(document).await {
                Ok(_) => Ok(()),
                Err(e) if is_duplicate_key(&e) => {
                    debug!("lost create race on unique index");
                    Err(StoreError::Conflict { id: id.to_owned() })
                }
                Err(e) => Err(StoreError::transport(e)),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find(&self, id: &str) -> StoreResult<D> {
        with_deadline(self.timeout, async {
            self.collection()
                .await?
                .find_one(by_id(id))
                .await
                .map_err(StoreError::transport)?
                .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
        })
        .await
    }

    #[instrument(skip(self, document))]
    async fn update(&self, id: &str, document: &D) -> StoreResult<()> {
        with_deadline(self.timeout, async {
            let result = self
                .collection()
                .await?
                .replace_one(by_id(id), document)
                .await
                .map_err(StoreError::transport)?;

            if result.matched_count == 0 {
                return Err(StoreError::NotFound { id: id.to_owned() });
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> StoreResult<()> {
        with_deadline(self.timeout, async {
            let result = self
                .collection()
                .await?
                .delete_one(by_id(id))
                .await
                .map_err(StoreError::transport)?;

            if result.deleted_count == 0 {
                return Err(StoreError::NotFound { id: id.to_owned() });
            }
            Ok(())
        })
        .await
    }

    async fn disconnect(&self) -> StoreResult<()> {
        self.connections.disconnect().await
    }

    async fn is_connected(&self) -> bool {
        self.connections.is_connected().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ambulance;

    // Integration tests require a running MongoDB
    // Run with: AMBULANCE_API_MONGODB_HOST=... cargo test -p ambulance-core -- --ignored

    fn test_store() -> MongoDocumentStore<Ambulance> {
        let mut config = StoreConfig::from_env();
        config.collection = format!("ambulance-test-{}", uuid::Uuid::new_v4());
        MongoDocumentStore::new(config)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn crud_against_mongodb() {
        let store = test_store();
        let mut ambulance = Ambulance::new("a1", "Ambulance 1");

        store.create("a1", &ambulance).await.expect("create failed");
        assert!(matches!(
            store.create("a1", &ambulance).await,
            Err(StoreError::Conflict { .. })
        ));

        ambulance.name = "Renamed".into();
        store.update("a1", &ambulance).await.expect("update failed");
        assert_eq!(store.find("a1").await.expect("find failed").name, "Renamed");

        store.delete("a1").await.expect("delete failed");
        assert!(matches!(
            store.find("a1").await,
            Err(StoreError::NotFound { .. })
        ));

        store.disconnect().await.expect("disconnect failed");
        store.disconnect().await.expect("second disconnect failed");
    }

    #[tokio::test]
    async fn unreachable_server_fails_without_caching() {
        let store: MongoDocumentStore<Ambulance> = MongoDocumentStore::new(StoreConfig {
            host: "unreachable.invalid".into(),
            timeout: Duration::from_millis(50),
            ..StoreConfig::default()
        });

        let err = store.find("a1").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Timeout { .. } | StoreError::Connection(_)
        ));
        assert!(!store.is_connected().await);
    }
}
