//! User directory: listing, reading and updating users through the
//! authorization engine.

use std::sync::Arc;

use chrono::Utc;

use casework_auth::{ActorContext, UserPatch, UserView, is_visible, resolve};
use casework_core::UserId;

use crate::error::{ServiceError, ServiceResult};
use crate::retry::RetryPolicy;
use crate::store::UserStore;

#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserStore>,
    retry: RetryPolicy,
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserStore>, retry: RetryPolicy) -> Self {
        Self { users, retry }
    }

    /// Every user the actor may read, the actor included, ordered by id.
    pub async fn list(&self, actor: &ActorContext) -> ServiceResult<Vec<UserView>> {
        let visible = self
            .retry
            .run("users.query", || self.users.query(&|u| is_visible(actor, &u.snapshot())))
            .await?;

        Ok(visible
            .iter()
            .filter_map(|u| UserView::project(u, &resolve(actor, &u.snapshot())))
            .collect())
    }

    /// `NotFound` for unknown ids, `Forbidden` for users the actor may not read.
    pub async fn get(&self, actor: &ActorContext, id: UserId) -> ServiceResult<UserView> {
        let user = self
            .retry
            .run("users.get", || self.users.get(id))
            .await?
            .ok_or(ServiceError::NotFound)?;

        UserView::project(&user, &resolve(actor, &user.snapshot())).ok_or_else(|| {
            tracing::warn!(user_id = %actor.user_id, target_id = %id, "read denied");
            ServiceError::Forbidden
        })
    }

    pub async fn me(&self, actor: &ActorContext) -> ServiceResult<UserView> {
        self.get(actor, actor.user_id).await
    }

    /// Apply `patch` to user `id` on behalf of `actor`.
    ///
    /// The grant is resolved against the state found under the store's write
    /// lock, and uniqueness and the merged role/department pair are validated
    /// there too, so a concurrent update can never leave an inconsistent pair
    /// behind.
    pub async fn update(&self, actor: &ActorContext, id: UserId, patch: &UserPatch) -> ServiceResult<UserView> {
        let mut previous = None;
        let updated = self
            .retry
            .run("users.update", || {
                self.users.update_with(id, &mut |current, taken| {
                    previous = Some(current.assignment());
                    current.apply_patch(actor, patch, taken, Utc::now()).map_err(ServiceError::from)
                })
            })
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::Forbidden) {
                    tracing::warn!(user_id = %actor.user_id, target_id = %id, "update denied");
                }
            })?;

        if previous.is_some_and(|before| before != updated.assignment()) {
            tracing::info!(
                user_id = %actor.user_id,
                target_id = %id,
                role = %updated.role(),
                department = %updated.department(),
                "role/department changed"
            );
        }

        UserView::project(&updated, &resolve(actor, &updated.snapshot())).ok_or(ServiceError::Forbidden)
    }
}
