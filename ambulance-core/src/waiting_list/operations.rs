//! Waiting list operations
//!
//! Every mutating operation has the same shape: load the ambulance, mutate an
//! in-memory copy, reconcile, replace the stored document. Nothing is
//! persisted when a rule fails, and a persistence failure is returned as is.
//!
//! Concurrent mutations of the same ambulance are not serialized here; the
//! last replace wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use super::{system_clock, Clock};
use crate::error::{StoreError, WaitingListError, WaitingListResult};
use crate::models::{Ambulance, EntryPatch, NewEntry, ValidationError, WaitingListEntry};
use crate::store::DocumentStore;

const ENTRY: &str = "waiting list entry";
const PATIENT_ENTRY: &str = "waiting list entry for patient";

#[derive(Clone)]
pub struct WaitingListService {
    store: Arc<dyn DocumentStore<Ambulance>>,
    clock: Clock,
}

impl WaitingListService {
    pub fn new(store: Arc<dyn DocumentStore<Ambulance>>) -> Self {
        Self {
            store,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Add an entry and return it as stored after reconciliation
    #[instrument(skip(self, entry))]
    pub async fn create_entry(
        &self,
        ambulance_id: &str,
        entry: NewEntry,
    ) -> WaitingListResult<WaitingListEntry> {
        let created = self
            .update_ambulance(ambulance_id, |ambulance, now| {
                let entry = entry.into_entry(now)?;

                if ambulance.waiting_list.iter().any(|w| w.id == entry.id) {
                    return Err(conflict(ENTRY, &entry.id));
                }
                if ambulance
                    .waiting_list
                    .iter()
                    .any(|w| w.patient_id == entry.patient_id)
                {
                    return Err(conflict(PATIENT_ENTRY, &entry.patient_id));
                }

                let id = entry.id.clone();
                ambulance.waiting_list.push(entry);
                ambulance.reconcile_waiting_list(now);
                reconciled(ambulance, &id)
            })
            .await?;

        info!(entry_id = %created.id, "waiting list entry created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn entries(&self, ambulance_id: &str) -> WaitingListResult<Vec<WaitingListEntry>> {
        Ok(self.load(ambulance_id).await?.waiting_list)
    }

    #[instrument(skip(self))]
    pub async fn entry(
        &self,
        ambulance_id: &str,
        entry_id: &str,
    ) -> WaitingListResult<WaitingListEntry> {
        let ambulance = self.load(ambulance_id).await?;
        let entry_id = required_entry_id(entry_id)?;

        ambulance
            .entry(entry_id)
            .cloned()
            .ok_or_else(|| not_found(ENTRY, entry_id))
    }

    /// Apply a partial update; omitted or meaningless fields keep their values
    #[instrument(skip(self, patch))]
    pub async fn update_entry(
        &self,
        ambulance_id: &str,
        entry_id: &str,
        patch: EntryPatch,
    ) -> WaitingListResult<WaitingListEntry> {
        self.update_ambulance(ambulance_id, |ambulance, now| {
            let entry_id = required_entry_id(entry_id)?;
            let index = ambulance
                .position(entry_id)
                .ok_or_else(|| not_found(ENTRY, entry_id))?;

            let list = &ambulance.waiting_list;
            if let Some(new_id) = patch.id() {
                if taken_by_other(list, index, |e| e.id == new_id) {
                    return Err(conflict(ENTRY, &new_id));
                }
            }
            if let Some(new_patient) = patch.patient_id() {
                if taken_by_other(list, index, |e| e.patient_id == new_patient) {
                    return Err(conflict(PATIENT_ENTRY, &new_patient));
                }
            }

            patch.apply(&mut ambulance.waiting_list[index]);
            let id = ambulance.waiting_list[index].id.clone();
            ambulance.reconcile_waiting_list(now);
            reconciled(ambulance, &id)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, ambulance_id: &str, entry_id: &str) -> WaitingListResult<()> {
        self.update_ambulance(ambulance_id, |ambulance, now| {
            let entry_id = required_entry_id(entry_id)?;
            let index = ambulance
                .position(entry_id)
                .ok_or_else(|| not_found(ENTRY, entry_id))?;

            ambulance.waiting_list.remove(index);
            ambulance.reconcile_waiting_list(now);
            Ok(())
        })
        .await?;

        info!("waiting list entry deleted");
        Ok(())
    }

    async fn load(&self, ambulance_id: &str) -> WaitingListResult<Ambulance> {
        self.store
            .find(ambulance_id)
            .await
            .map_err(ambulance_error)
    }

    /// Load, mutate, then replace the ambulance document.
    ///
    /// `mutate` is responsible for reconciling; when it fails nothing is written.
    async fn update_ambulance<T, F>(&self, ambulance_id: &str, mutate: F) -> WaitingListResult<T>
    where
        F: FnOnce(&mut Ambulance, DateTime<Utc>) -> WaitingListResult<T>,
    {
        let mut ambulance = self.load(ambulance_id).await?;
        let output = mutate(&mut ambulance, (self.clock)())?;

        self.store
            .update(ambulance_id, &ambulance)
            .await
            .map_err(ambulance_error)?;
        Ok(output)
    }
}

/// Store errors keyed by ambulance id
pub(crate) fn ambulance_error(err: StoreError) -> WaitingListError {
    match err {
        StoreError::NotFound { id } => not_found("ambulance", &id),
        StoreError::Conflict { id } => conflict("ambulance", &id),
        other => other.into(),
    }
}

fn required_entry_id(entry_id: &str) -> Result<&str, ValidationError> {
    let trimmed = entry_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "entryId" });
    }
    Ok(trimmed)
}

/// Whether any entry other than the one at `skip` matches
fn taken_by_other(
    list: &[WaitingListEntry],
    skip: usize,
    matches: impl Fn(&WaitingListEntry) -> bool,
) -> bool {
    list.iter()
        .enumerate()
        .any(|(i, e)| i != skip && matches(e))
}

fn reconciled(ambulance: &Ambulance, entry_id: &str) -> WaitingListResult<WaitingListEntry> {
    ambulance.entry(entry_id).cloned().ok_or_else(|| {
        WaitingListError::Internal(format!(
            "entry '{}' missing after reconciliation",
            entry_id
        ))
    })
}

fn not_found(resource: &'static str, id: &str) -> WaitingListError {
    WaitingListError::NotFound {
        resource,
        id: id.to_owned(),
    }
}

fn conflict(resource: &'static str, id: &str) -> WaitingListError {
    WaitingListError::Conflict {
        resource,
        id: id.to_owned(),
    }
}
