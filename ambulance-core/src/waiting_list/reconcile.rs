//! Waiting list reconciliation
//!
//! Pure re-derivation of list order and estimated start times. Runs after
//! every structural mutation and before the aggregate is persisted.

use chrono::{DateTime, Duration, Utc};

use crate::models::WaitingListEntry;

/// Order entries by arrival and recompute each `estimated_start`.
///
/// Entries are sorted by `(waiting_since, id)`. The first patient starts at
/// `max(waiting_since, now)`; every later patient starts when the previous one
/// is expected to finish, but never before their own arrival.
///
/// Previously stored `estimated_start` values are ignored, so for a fixed
/// `now` the result is idempotent. Only order and `estimated_start` change.
/// Starts beyond the representable range saturate at `DateTime::MAX_UTC`.
pub fn reconcile(mut entries: Vec<WaitingListEntry>, now: DateTime<Utc>) -> Vec<WaitingListEntry> {
    entries.sort_by(|a, b| {
        a.waiting_since
            .cmp(&b.waiting_since)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut next_free = now;
    for entry in &mut entries {
        let start = entry.waiting_since.max(next_free);
        entry.estimated_start = Some(start);
        next_free = finish(start, entry.estimated_duration_minutes);
    }

    entries
}

fn finish(start: DateTime<Utc>, duration_minutes: u32) -> DateTime<Utc> {
    start
        .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
