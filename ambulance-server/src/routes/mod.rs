//! Route handlers organized by resource

pub mod ambulances;
pub mod health;
pub mod waiting_list;
