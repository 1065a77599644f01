//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod device_data_repo;
pub mod device_repo;

pub use device_data_repo::DeviceDataRepo;
pub use device_repo::DeviceRepo;
