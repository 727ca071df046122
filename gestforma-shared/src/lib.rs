//! # GestForma Shared Library
//!
//! Shared types and business logic for the GestForma training-management
//! backend. The API server depends on this crate; nothing here knows about
//! HTTP.
//!
//! ## Module Organization
//!
//! - `models`: Database models and entity stores
//! - `services`: Domain services holding the business rules
//! - `auth`: Password hashing, JWT issuing/validation, request guard
//! - `db`: Pool construction, migrations, referential-integrity registry
//! - `seed`: Idempotent demo dataset bootstrap
//! - `error`: Domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;
pub mod services;

/// Current version of the GestForma shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
