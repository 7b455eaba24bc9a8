//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod course;
pub mod enrollment;
pub mod project;
pub mod project_share;
pub mod subscription;
pub mod user;

pub use course::CourseEntity;
pub use enrollment::EnrollmentEntity;
pub use project::ProjectEntity;
pub use project_share::{ProjectRoleDb, ProjectShareEntity, ShareStatusDb};
pub use subscription::SubscriptionEntity;
pub use user::UserEntity;
