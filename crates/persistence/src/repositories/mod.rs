//! Repository implementations for database operations.

pub mod course;
pub mod enrollment;
pub mod project;
pub mod project_share;
pub mod subscription;
pub mod user;

pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use project::ProjectRepository;
pub use project_share::{ProjectShareRepository, ShareSummaryCounts};
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
