//! Utility bill tracking service.
//!
//! A small REST-over-JSON service recording two monthly household charges,
//! EMBASA (water) and COELBA (electricity), in a MySQL table keyed by
//! UUIDs stored as `BINARY(16)`.
//!
//! # Endpoints
//!
//! ```text
//! POST   /bills                          create, server-generated id
//! GET    /bills?start=YYYY-MM-DD&end=..  created_at in [start, end + 1 day), newest first
//! GET    /bills/all                      everything
//! PUT    /bills/{id}                     replace embasa / coelba
//! DELETE /bills/{id}                     delete (unknown ids are not an error)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`billing`]: Identifier codec, date-range filter, bill types
//! - [`catalog`]: Legacy item types
//! - [`store`]: Store traits with MySQL and in-memory implementations
//! - [`db`]: Connection bootstrap and schema creation
//! - [`api`]: HTTP handlers and routes
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod billing;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
