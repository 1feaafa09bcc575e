//! Ambulance provisioning: create, look up and remove whole aggregates

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::WaitingListResult;
use crate::models::{Ambulance, NewAmbulance};
use crate::store::DocumentStore;
use crate::waiting_list::operations::ambulance_error;

#[derive(Clone)]
pub struct AmbulanceService {
    store: Arc<dyn DocumentStore<Ambulance>>,
}

impl AmbulanceService {
    pub fn new(store: Arc<dyn DocumentStore<Ambulance>>) -> Self {
        Self { store }
    }

    /// Store a new ambulance with an empty waiting list. `Conflict` if the id is taken.
    #[instrument(skip(self, ambulance))]
    pub async fn create(&self, ambulance: NewAmbulance) -> WaitingListResult<Ambulance> {
        let ambulance = ambulance.into_ambulance()?;
        self.store
            .create(&ambulance.id, &ambulance)
            .await
            .map_err(ambulance_error)?;

        info!(ambulance_id = %ambulance.id, "ambulance created");
        Ok(ambulance)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, ambulance_id: &str) -> WaitingListResult<Ambulance> {
        self.store
            .find(ambulance_id)
            .await
            .map_err(ambulance_error)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, ambulance_id: &str) -> WaitingListResult<()> {
        self.store
            .delete(ambulance_id)
            .await
            .map_err(ambulance_error)?;

        info!("ambulance deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryDocumentStore;

    fn service() -> AmbulanceService {
        AmbulanceService::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn named(id: &str, name: &str) -> NewAmbulance {
        NewAmbulance {
            id: Some(id.into()),
            name: Some(name.into()),
            room_number: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let service = service();
        let created = service.create(named("a1", "Ambulance 1")).await.unwrap();
        assert!(created.waiting_list.is_empty());
        assert_eq!(service.get("a1").await.unwrap(), created);
    }

    #[tokio::test]
    async fn duplicate_ambulance_conflicts() {
        let service = service();
        service.create(named("a1", "Ambulance 1")).await.unwrap();

        let err = service.create(named("a1", "Other")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "ambulance 'a1' already exists");
        assert_eq!(service.get("a1").await.unwrap().name, "Ambulance 1");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let err = service().delete("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "ambulance 'nope' not found");
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_storing() {
        let service = service();
        let err = service.create(named("a1", " ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(service.get("a1").await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
