//! The ambulance aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::{WaitingListEntry, NEW_ID_PLACEHOLDER};
use super::validation::{required, ValidationError};
use crate::waiting_list::reconcile;

/// Aggregate root: one stored document per ambulance.
///
/// The whole document is read, modified and replaced as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub waiting_list: Vec<WaitingListEntry>,
}

impl Ambulance {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room_number: None,
            waiting_list: Vec::new(),
        }
    }

    pub fn entry(&self, entry_id: &str) -> Option<&WaitingListEntry> {
        self.waiting_list.iter().find(|e| e.id == entry_id)
    }

    pub fn position(&self, entry_id: &str) -> Option<usize> {
        self.waiting_list.iter().position(|e| e.id == entry_id)
    }

    /// Re-sort the list and recompute estimated starts relative to `now`
    pub fn reconcile_waiting_list(&mut self, now: DateTime<Utc>) {
        let entries = std::mem::take(&mut self.waiting_list);
        self.waiting_list = reconcile(entries, now);
    }
}

/// Payload for provisioning a new ambulance
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAmbulance {
    pub id: Option<String>,
    pub name: Option<String>,
    pub room_number: Option<String>,
}

impl NewAmbulance {
    /// Validate into an ambulance with an empty waiting list.
    ///
    /// A missing, blank or `@new` id becomes a fresh UUID.
    pub fn into_ambulance(self) -> Result<Ambulance, ValidationError> {
        let name = required("name", self.name.as_deref())?;
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && id != NEW_ID_PLACEHOLDER => id.to_owned(),
            _ => Uuid::new_v4().to_string(),
        };

        Ok(Ambulance {
            id,
            name,
            room_number: self
                .room_number
                .map(|r| r.trim().to_owned())
                .filter(|r| !r.is_empty()),
            waiting_list: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_waiting_list_deserializes_empty() {
        let ambulance: Ambulance =
            serde_json::from_str(r#"{"id": "a1", "name": "Ambulance 1"}"#).unwrap();
        assert!(ambulance.waiting_list.is_empty());

        let json = serde_json::to_value(&ambulance).unwrap();
        assert_eq!(json["waitingList"], serde_json::json!([]));
    }

    #[test]
    fn new_ambulance_requires_name() {
        let err = NewAmbulance {
            id: Some("a1".into()),
            ..Default::default()
        }
        .into_ambulance()
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn new_ambulance_generates_id() {
        let ambulance = NewAmbulance {
            id: Some(NEW_ID_PLACEHOLDER.into()),
            name: Some("Downtown".into()),
            room_number: Some(" ".into()),
        }
        .into_ambulance()
        .unwrap();

        assert!(Uuid::parse_str(&ambulance.id).is_ok());
        assert_eq!(ambulance.room_number, None);
    }
}
