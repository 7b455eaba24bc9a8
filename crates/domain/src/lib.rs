//! Domain layer for the Creator Platform backend.
//!
//! This crate contains:
//! - Domain models (Project, ProjectShare, Course, Enrollment, Subscription)
//! - Business logic services (authorization resolver, subscription lifecycle)
//! - Domain error types

pub mod models;
pub mod services;
