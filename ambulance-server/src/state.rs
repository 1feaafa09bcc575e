//! Application state shared across handlers

use std::sync::Arc;

use ambulance_core::waiting_list::{system_clock, Clock};
use ambulance_core::{Ambulance, AmbulanceService, DocumentStore, WaitingListService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn DocumentStore<Ambulance>>,
    waiting_list: WaitingListService,
    ambulances: AmbulanceService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore<Ambulance>>) -> Self {
        Self::with_clock(store, system_clock())
    }

    pub fn with_clock(store: Arc<dyn DocumentStore<Ambulance>>, clock: Clock) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                waiting_list: WaitingListService::new(Arc::clone(&store)).with_clock(clock),
                ambulances: AmbulanceService::new(Arc::clone(&store)),
                store,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore<Ambulance>> {
        &self.inner.store
    }

    pub fn waiting_list(&self) -> &WaitingListService {
        &self.inner.waiting_list
    }

    pub fn ambulances(&self) -> &AmbulanceService {
        &self.inner.ambulances
    }
}
