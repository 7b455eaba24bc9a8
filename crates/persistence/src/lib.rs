//! Persistence layer for the creator platform backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The Postgres-backed record store consumed by the access resolver

pub mod db;
pub mod entities;
pub mod repositories;
pub mod store;
