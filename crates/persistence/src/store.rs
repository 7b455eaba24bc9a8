//! Postgres-backed record store for the access resolver.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{ProjectRole, Subscription};
use domain::services::{AccessStore, StoreError};

use crate::repositories::{
    CourseRepository, ProjectRepository, ProjectShareRepository, SubscriptionRepository,
};

/// [`AccessStore`] implementation over the live database.
///
/// Every method issues a fresh query; the resolver's guarantee that access
/// checks see current state depends on nothing being cached here.
#[derive(Clone)]
pub struct PgAccessStore {
    projects: ProjectRepository,
    shares: ProjectShareRepository,
    courses: CourseRepository,
    subscriptions: SubscriptionRepository,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            shares: ProjectShareRepository::new(pool.clone()),
            courses: CourseRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool),
        }
    }
}

fn store_err(e: sqlx::Error) -> StoreError {
    StoreError(e.to_string())
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        self.projects.owner_of(project_id).await.map_err(store_err)
    }

    async fn accepted_share_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError> {
        let role = self
            .shares
            .accepted_role(project_id, user_id)
            .await
            .map_err(store_err)?;
        Ok(role.map(Into::into))
    }

    async fn course_project(&self, course_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        self.courses.project_of(course_id).await.map_err(store_err)
    }

    async fn course_subscriptions(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<Subscription>, StoreError> {
        let rows = self
            .subscriptions
            .list_for_user_course(user_id, course_id)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
