//! Fleetwatch domain logic.
//!
//! Pure code only: no database, no network. The `db`, `events` and `api`
//! crates build on these types.

pub mod alert;
pub mod conversion;
pub mod data_type;
pub mod error;
pub mod paging;
pub mod telemetry;
pub mod thresholds;
pub mod types;
