//! In-process document store with the same semantics as the MongoDB one.
//!
//! Backs the test suites and `serve --memory` for local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, DocumentStore};
use crate::error::{StoreError, StoreResult};

pub struct MemoryDocumentStore<D> {
    documents: RwLock<HashMap<String, D>>,
}

impl<D: Document> MemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl<D: Document> Default for MemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MemoryDocumentStore<D> {
    async fn create(&self, id: &str, document: &D) -> StoreResult<()> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(id) {
            return Err(StoreError::Conflict { id: id.to_owned() });
        }
        documents.insert(id.to_owned(), document.clone());
        Ok(())
    }

    async fn find(&self, id: &str) -> StoreResult<D> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
    }

    async fn update(&self, id: &str, document: &D) -> StoreResult<()> {
        match self.documents.write().await.get_mut(id) {
            Some(stored) => {
                *stored = document.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_owned() }),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
    }

    async fn disconnect(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ambulance;
    use std::sync::Arc;

    #[tokio::test]
    async fn crud_round() {
        let store = MemoryDocumentStore::<Ambulance>::new();
        let mut ambulance = Ambulance::new("a1", "Ambulance 1");

        store.create("a1", &ambulance).await.unwrap();
        assert_eq!(store.find("a1").await.unwrap(), ambulance);

        ambulance.name = "Renamed".into();
        store.update("a1", &ambulance).await.unwrap();
        assert_eq!(store.find("a1").await.unwrap().name, "Renamed");

        store.delete("a1").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let store = MemoryDocumentStore::<Ambulance>::new();
        let ambulance = Ambulance::new("a1", "Ambulance 1");
        store.create("a1", &ambulance).await.unwrap();

        let err = store.create("a1", &ambulance).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { id } if id == "a1"));
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let store = MemoryDocumentStore::<Ambulance>::new();
        let ambulance = Ambulance::new("a1", "Ambulance 1");

        assert!(matches!(
            store.find("a1").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update("a1", &ambulance).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("a1").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.is_empty().await, "update must not upsert");
    }

    #[tokio::test]
    async fn concurrent_duplicate_creates_yield_one_winner() {
        let store = Arc::new(MemoryDocumentStore::<Ambulance>::new());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let ambulance = Ambulance::new("a1", format!("attempt {}", i));
                    store.create("a1", &ambulance).await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.expect("task panicked") {
                Ok(()) => created += 1,
                Err(StoreError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
    }
}
