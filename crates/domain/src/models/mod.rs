//! Domain models for the Creator Platform.

pub mod course;
pub mod enrollment;
pub mod project;
pub mod role;
pub mod share;
pub mod subscription;

pub use course::{Course, CreateCourseRequest, UpdateCourseRequest};
pub use enrollment::Enrollment;
pub use project::{CreateProjectRequest, Project, ProjectResponse, UpdateProjectRequest};
pub use role::ProjectRole;
pub use share::{
    CreateShareRequest, ListSharesQuery, ListSharesResponse, ProjectShare, ShareResponse,
    ShareStatus, ShareSummary,
};
pub use subscription::{
    CreateSubscriptionRequest, Subscription, SubscriptionStatus, SubscriptionStatusResponse,
};
