//! HTTP route handlers.

pub mod courses;
pub mod enrollments;
pub mod health;
pub mod projects;
pub mod shares;
pub mod users;
