//! Domain models with validation at construction
//!
//! Client input arrives as `New*` / `*Patch` payloads and is validated and
//! normalized into the stored types. Invalid input returns ValidationError,
//! not panic.

pub mod ambulance;
pub mod entry;
pub mod validation;

pub use ambulance::{Ambulance, NewAmbulance};
pub use entry::{
    EntryPatch, NewEntry, WaitingListEntry, DEFAULT_DURATION_MINUTES, NEW_ID_PLACEHOLDER,
};
pub use validation::ValidationError;
