pub mod access;
pub mod sharing;
pub mod subscription_lifecycle;

pub use access::{AccessResolver, AccessStore, StoreError};
pub use sharing::{validate_invitation, ShareError};
pub use subscription_lifecycle::{evaluate_status, is_active, select_current};
