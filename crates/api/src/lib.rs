//! Fleetwatch API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! alerting) so integration tests and the binary entrypoint can both use them.

pub mod alerting;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
