//! Waiting list entries and the inputs that create or patch them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{required, ValidationError};

/// Duration assumed when the caller gives none (or a non-positive one)
pub const DEFAULT_DURATION_MINUTES: u32 = 15;

/// Client-side placeholder meaning "assign an id for me"
pub const NEW_ID_PLACEHOLDER: &str = "@new";

/// One patient waiting in an ambulance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingListEntry {
    pub id: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub waiting_since: DateTime<Utc>,
    pub estimated_duration_minutes: u32,
    /// Derived by reconciliation, never taken from input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_start: Option<DateTime<Utc>>,
}

/// Payload for creating an entry.
///
/// Everything except `patient_id` is optional and normalized by
/// [`NewEntry::into_entry`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub id: Option<String>,
    pub patient_id: Option<String>,
    pub name: Option<String>,
    /// Accepted on the wire but replaced by server time
    pub waiting_since: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<i64>,
}

impl NewEntry {
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            ..Default::default()
        }
    }

    /// Validate and normalize into a storable entry.
    ///
    /// - `patient_id` must be non-blank
    /// - a missing, blank or `@new` id becomes a fresh UUID
    /// - `waiting_since` is always stamped with `now`; arrival is server time
    /// - a missing or non-positive duration becomes 15 minutes
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<WaitingListEntry, ValidationError> {
        let patient_id = required("patientId", self.patient_id.as_deref())?;

        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && id != NEW_ID_PLACEHOLDER => id.to_owned(),
            _ => Uuid::new_v4().to_string(),
        };

        let estimated_duration_minutes = match self.estimated_duration_minutes {
            Some(minutes) if minutes > 0 => {
                u32::try_from(minutes).map_err(|_| ValidationError::InvalidFormat {
                    field: "estimatedDurationMinutes",
                    reason: format!("{} is out of range", minutes),
                })?
            }
            _ => DEFAULT_DURATION_MINUTES,
        };

        Ok(WaitingListEntry {
            id,
            patient_id,
            name: non_blank(self.name.as_deref()),
            waiting_since: now,
            estimated_duration_minutes,
            estimated_start: None,
        })
    }
}

/// Partial update of an entry.
///
/// `None` means the field was omitted. A present field only takes effect when
/// it carries a meaningful value (non-blank text, positive duration, instant
/// after the Unix epoch), so a patch can never clear a field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub id: Option<String>,
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub waiting_since: Option<DateTime<Utc>>,
    pub estimated_duration_minutes: Option<i64>,
}

impl EntryPatch {
    /// New id this patch would assign, if any
    pub fn id(&self) -> Option<String> {
        non_blank(self.id.as_deref())
    }

    /// New patient id this patch would assign, if any
    pub fn patient_id(&self) -> Option<String> {
        non_blank(self.patient_id.as_deref())
    }

    /// Overwrite the fields this patch supplies meaningful values for
    pub fn apply(&self, entry: &mut WaitingListEntry) {
        if let Some(patient_id) = self.patient_id() {
            entry.patient_id = patient_id;
        }

        if let Some(id) = self.id() {
            entry.id = id;
        }

        if let Some(name) = non_blank(self.name.as_deref()) {
            entry.name = Some(name);
        }

        if let Some(since) = self.waiting_since.filter(|s| *s > DateTime::<Utc>::UNIX_EPOCH) {
            entry.waiting_since = since;
        }

        if let Some(minutes) = self
            .estimated_duration_minutes
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| *m > 0)
        {
            entry.estimated_duration_minutes = minutes;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
