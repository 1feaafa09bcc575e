//! Waiting list domain logic
//!
//! - [`reconcile`]: pure ordering / estimated start derivation
//! - [`WaitingListService`]: request-level operations on one ambulance

pub mod operations;
pub mod reconcile;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use operations::WaitingListService;
pub use reconcile::reconcile;

/// Source of "now" for normalization and reconciliation
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}
