//! Authorization resolver for project access.
//!
//! Decides a user's effective role on a project and answers capability
//! checks. Read-path checks never fail open: a record-store error degrades to
//! "no access" rather than propagating. Every call re-reads current state so
//! permissions are always correct as of the call; nothing is cached.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::role::{ProjectRole, CONVERSATION_ROLES};
use crate::models::subscription::Subscription;
use crate::services::subscription_lifecycle::select_current;

/// Error raised by the record store behind the resolver.
#[derive(Debug, Error)]
#[error("record store error: {0}")]
pub struct StoreError(pub String);

/// Read-side record store the resolver consumes.
///
/// Implemented by the persistence layer for Postgres and by in-memory mocks
/// in tests.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Owner of the project, or None if the project does not exist.
    async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Role from any accepted share for (project, user).
    ///
    /// Duplicate accepted shares are legal (concurrent invites may race);
    /// any one of them is sufficient, so this is an existence check.
    async fn accepted_share_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError>;

    /// Project owning the course, or None if the course does not exist.
    async fn course_project(&self, course_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// All subscription rows for the user's enrollment in the course,
    /// ordered by creation time.
    async fn course_subscriptions(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<Subscription>, StoreError>;
}

/// Resolves effective roles and capability checks against an [`AccessStore`].
pub struct AccessResolver<S> {
    store: S,
}

impl<S: AccessStore> AccessResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The user's effective role on the project, or None.
    ///
    /// Ownership is checked first and independently of the share table, so an
    /// owner keeps access even with missing or corrupted share records.
    /// Absence of access and store failures both resolve to None.
    pub async fn resolve_role(&self, user_id: Uuid, project_id: Uuid) -> Option<ProjectRole> {
        match self.try_resolve_role(user_id, project_id).await {
            Ok(role) => role,
            Err(e) => {
                warn!(%user_id, %project_id, error = %e, "role resolution failed, denying access");
                None
            }
        }
    }

    async fn try_resolve_role(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError> {
        match self.store.project_owner(project_id).await? {
            Some(owner_id) if owner_id == user_id => return Ok(Some(ProjectRole::Owner)),
            Some(_) => {}
            None => return Ok(None),
        }

        self.store.accepted_share_role(project_id, user_id).await
    }

    /// Single choke point for role-based capability checks.
    ///
    /// True iff the resolved role is Owner (owner bypasses every matrix) or a
    /// member of `required`. A user with no role always gets false.
    pub async fn has_capability(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        required: &[ProjectRole],
    ) -> bool {
        match self.resolve_role(user_id, project_id).await {
            Some(ProjectRole::Owner) => true,
            Some(role) => required.contains(&role),
            None => false,
        }
    }

    /// Whether the user may read the course's conversation history.
    ///
    /// Project-level roles grant access; otherwise an active paid
    /// subscription to this specific course does. Missing course or any
    /// store failure resolves to false.
    pub async fn can_access_conversations(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        now: DateTime<Utc>,
    ) -> bool {
        let project_id = match self.store.course_project(course_id).await {
            Ok(Some(project_id)) => project_id,
            Ok(None) => return false,
            Err(e) => {
                warn!(%user_id, %course_id, error = %e, "course lookup failed, denying access");
                return false;
            }
        };

        if self
            .has_capability(user_id, project_id, CONVERSATION_ROLES)
            .await
        {
            return true;
        }

        match self.store.course_subscriptions(user_id, course_id).await {
            Ok(subscriptions) => select_current(&subscriptions, now)
                .map_or(false, |current| current.is_active_at(now)),
            Err(e) => {
                warn!(%user_id, %course_id, error = %e, "subscription lookup failed, denying access");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::{EDIT_COURSE_ROLES, VIEW_COURSE_ROLES};
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for resolver tests.
    #[derive(Default)]
    struct MockStore {
        owners: HashMap<Uuid, Uuid>,
        shares: HashMap<(Uuid, Uuid), ProjectRole>,
        courses: HashMap<Uuid, Uuid>,
        subscriptions: HashMap<(Uuid, Uuid), Vec<Subscription>>,
        fail_all: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl AccessStore for MockStore {
        async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, StoreError> {
            self.calls.lock().unwrap().push("project_owner");
            if self.fail_all {
                return Err(StoreError("connection reset".into()));
            }
            Ok(self.owners.get(&project_id).copied())
        }

        async fn accepted_share_role(
            &self,
            project_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<ProjectRole>, StoreError> {
            self.calls.lock().unwrap().push("accepted_share_role");
            if self.fail_all {
                return Err(StoreError("connection reset".into()));
            }
            Ok(self.shares.get(&(project_id, user_id)).copied())
        }

        async fn course_project(&self, course_id: Uuid) -> Result<Option<Uuid>, StoreError> {
            if self.fail_all {
                return Err(StoreError("connection reset".into()));
            }
            Ok(self.courses.get(&course_id).copied())
        }

        async fn course_subscriptions(
            &self,
            user_id: Uuid,
            course_id: Uuid,
        ) -> Result<Vec<Subscription>, StoreError> {
            if self.fail_all {
                return Err(StoreError("connection reset".into()));
            }
            Ok(self
                .subscriptions
                .get(&(user_id, course_id))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn active_subscription(enrollment_id: Uuid) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            enrollment_id,
            begins_at: Some(Utc::now() - Duration::days(1)),
            ends_at: None,
            is_paid: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_owner_resolves_regardless_of_shares() {
        let owner = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        // Conflicting share record must not demote the owner
        store.shares.insert((project, owner), ProjectRole::ReadOnly);

        let resolver = AccessResolver::new(store);
        assert_eq!(
            resolver.resolve_role(owner, project).await,
            Some(ProjectRole::Owner)
        );
    }

    #[tokio::test]
    async fn test_ownership_check_skips_share_table() {
        let owner = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);

        let resolver = AccessResolver::new(store);
        resolver.resolve_role(owner, project).await;

        let calls = resolver.store.calls.lock().unwrap();
        assert!(!calls.contains(&"accepted_share_role"));
    }

    #[tokio::test]
    async fn test_no_relationship_resolves_none() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);

        let resolver = AccessResolver::new(store);
        assert_eq!(resolver.resolve_role(stranger, project).await, None);
        assert!(!resolver.has_capability(stranger, project, EDIT_COURSE_ROLES).await);
        assert!(!resolver.has_capability(stranger, project, VIEW_COURSE_ROLES).await);
        assert!(!resolver.has_capability(stranger, project, &[]).await);
    }

    #[tokio::test]
    async fn test_missing_project_resolves_none() {
        let resolver = AccessResolver::new(MockStore::default());
        assert_eq!(
            resolver.resolve_role(Uuid::new_v4(), Uuid::new_v4()).await,
            None
        );
    }

    #[tokio::test]
    async fn test_accepted_share_grants_role() {
        let owner = Uuid::new_v4();
        let collaborator = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        store
            .shares
            .insert((project, collaborator), ProjectRole::Contributor);

        let resolver = AccessResolver::new(store);
        assert_eq!(
            resolver.resolve_role(collaborator, project).await,
            Some(ProjectRole::Contributor)
        );
        assert!(
            resolver
                .has_capability(collaborator, project, EDIT_COURSE_ROLES)
                .await
        );
    }

    #[tokio::test]
    async fn test_owner_bypasses_required_set() {
        let owner = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);

        let resolver = AccessResolver::new(store);
        // Owner passes even when the required set is empty
        assert!(resolver.has_capability(owner, project, &[]).await);
        assert!(
            resolver
                .has_capability(owner, project, &[ProjectRole::ReadOnly])
                .await
        );
    }

    #[tokio::test]
    async fn test_read_only_cannot_edit_courses() {
        let owner = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let project = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        store.shares.insert((project, viewer), ProjectRole::ReadOnly);

        let resolver = AccessResolver::new(store);
        assert!(!resolver.has_capability(viewer, project, EDIT_COURSE_ROLES).await);
        assert!(resolver.has_capability(viewer, project, VIEW_COURSE_ROLES).await);
    }

    #[tokio::test]
    async fn test_store_error_resolves_to_none_not_panic() {
        let store = MockStore {
            fail_all: true,
            ..Default::default()
        };
        let resolver = AccessResolver::new(store);
        assert_eq!(
            resolver.resolve_role(Uuid::new_v4(), Uuid::new_v4()).await,
            None
        );
        assert!(
            !resolver
                .has_capability(Uuid::new_v4(), Uuid::new_v4(), VIEW_COURSE_ROLES)
                .await
        );
    }

    #[tokio::test]
    async fn test_conversations_project_role_grants_access() {
        let owner = Uuid::new_v4();
        let manager = Uuid::new_v4();
        let project = Uuid::new_v4();
        let course = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        store
            .shares
            .insert((project, manager), ProjectRole::KnowledgeManager);
        store.courses.insert(course, project);

        let resolver = AccessResolver::new(store);
        assert!(
            resolver
                .can_access_conversations(manager, course, Utc::now())
                .await
        );
    }

    #[tokio::test]
    async fn test_conversations_subscriber_without_role() {
        // A customer with no project role but an active paid subscription
        // to this specific course.
        let owner = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let project = Uuid::new_v4();
        let course = Uuid::new_v4();
        let enrollment = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        store.courses.insert(course, project);
        store
            .subscriptions
            .insert((customer, course), vec![active_subscription(enrollment)]);

        let resolver = AccessResolver::new(store);
        assert!(
            resolver
                .can_access_conversations(customer, course, Utc::now())
                .await
        );
    }

    #[tokio::test]
    async fn test_conversations_expired_subscription_denied() {
        let owner = Uuid::new_v4();
        let customer = Uuid::new_v4();
        let project = Uuid::new_v4();
        let course = Uuid::new_v4();
        let mut store = MockStore::default();
        store.owners.insert(project, owner);
        store.courses.insert(course, project);
        let expired = Subscription {
            ends_at: Some(Utc::now() - Duration::days(1)),
            ..active_subscription(Uuid::new_v4())
        };
        store.subscriptions.insert((customer, course), vec![expired]);

        let resolver = AccessResolver::new(store);
        assert!(
            !resolver
                .can_access_conversations(customer, course, Utc::now())
                .await
        );
    }

    #[tokio::test]
    async fn test_conversations_missing_course_fails_closed() {
        let resolver = AccessResolver::new(MockStore::default());
        assert!(
            !resolver
                .can_access_conversations(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
                .await
        );
    }

    #[tokio::test]
    async fn test_conversations_store_error_fails_closed() {
        let store = MockStore {
            fail_all: true,
            ..Default::default()
        };
        let resolver = AccessResolver::new(store);
        assert!(
            !resolver
                .can_access_conversations(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
                .await
        );
    }
}
