//! Shared utilities and common types for the Creator Platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token validation (RS256)
//! - Common validation logic
//! - Offset pagination types

pub mod jwt;
pub mod pagination;
pub mod validation;
