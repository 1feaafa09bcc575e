//! ambulance-core: document store access and waiting list domain logic
//!
//! Layers, leaves first:
//! - [`store::ConnectionManager`]: one lazily built, shared connection handle
//! - [`store::DocumentStore`]: generic CRUD with NotFound / Conflict / Timeout
//! - [`waiting_list::reconcile`]: pure ordering of an ambulance's waiting list
//! - [`WaitingListService`] / [`AmbulanceService`]: request-level operations

pub mod ambulances;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod waiting_list;

pub use ambulances::AmbulanceService;
pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError, StoreResult, WaitingListError, WaitingListResult};
pub use models::{
    Ambulance, EntryPatch, NewAmbulance, NewEntry, ValidationError, WaitingListEntry,
};
pub use store::{DocumentStore, MemoryDocumentStore, MongoDocumentStore};
pub use waiting_list::{Clock, WaitingListService};
