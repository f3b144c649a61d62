//! Aid desk: public intake of aid requests and their review by OAC staff.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use casework_aid::{AidRequest, AidRequestInput, RequestStatus, TransitionPolicy, default_catalog};
use casework_auth::{ActorContext, Department, Role};
use casework_core::AidRequestId;

use crate::error::{ServiceError, ServiceResult};
use crate::retry::RetryPolicy;
use crate::store::{AidRequestStore, AidTypeStore};

/// Outcome of seeding the aid-type catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
}

#[derive(Clone)]
pub struct AidDesk {
    requests: Arc<dyn AidRequestStore>,
    aid_types: Arc<dyn AidTypeStore>,
    policy: TransitionPolicy,
    retry: RetryPolicy,
}

/// Reviewing requests is reserved to `superAdmin` and the OAC department.
fn ensure_desk_access(actor: &ActorContext) -> ServiceResult<()> {
    if actor.role == Role::SuperAdmin || actor.department == Department::Oac {
        Ok(())
    } else {
        tracing::warn!(user_id = %actor.user_id, "aid desk access denied");
        Err(ServiceError::Forbidden)
    }
}

impl AidDesk {
    pub fn new(
        requests: Arc<dyn AidRequestStore>,
        aid_types: Arc<dyn AidTypeStore>,
        policy: TransitionPolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            requests,
            aid_types,
            policy,
            retry,
        }
    }

    /// Validate and store an intake with all of its line items, or nothing.
    pub async fn create(&self, input: &AidRequestInput) -> ServiceResult<AidRequest> {
        let catalog: HashMap<String, _> = self
            .retry
            .run("aid_types.list", || self.aid_types.list())
            .await?
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();

        let new = input.validate(|name| catalog.get(name).cloned())?;
        let request = self
            .retry
            .run("aid_requests.insert", || self.requests.insert(new.clone(), Utc::now()))
            .await?;

        tracing::info!(
            aid_request_id = %request.request_id(),
            items = request.items().len(),
            "aid request received"
        );
        Ok(request)
    }

    /// Newest first.
    pub async fn list(&self, actor: &ActorContext) -> ServiceResult<Vec<AidRequest>> {
        ensure_desk_access(actor)?;
        let mut requests = self.retry.run("aid_requests.list", || self.requests.list()).await?;
        requests.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.request_id().cmp(&a.request_id()))
        });
        Ok(requests)
    }

    pub async fn get(&self, actor: &ActorContext, id: AidRequestId) -> ServiceResult<AidRequest> {
        ensure_desk_access(actor)?;
        self.retry
            .run("aid_requests.get", || self.requests.get(id))
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn update_status(
        &self,
        actor: &ActorContext,
        id: AidRequestId,
        status: RequestStatus,
    ) -> ServiceResult<AidRequest> {
        ensure_desk_access(actor)?;
        let policy = self.policy;

        let updated = self
            .retry
            .run("aid_requests.update_status", || {
                self.requests.update_with(id, &mut |current| {
                    Ok(current.with_status(status, policy, Utc::now())?)
                })
            })
            .await?;

        tracing::info!(
            user_id = %actor.user_id,
            aid_request_id = %id,
            status = %status,
            "aid request status updated"
        );
        Ok(updated)
    }

    /// Catalog names, sorted.
    pub async fn list_aid_types(&self) -> ServiceResult<Vec<String>> {
        let mut names: Vec<String> = self
            .retry
            .run("aid_types.list", || self.aid_types.list())
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Idempotently add the default catalog.
    pub async fn seed_default_catalog(&self) -> ServiceResult<SeedReport> {
        let mut report = SeedReport::default();
        for name in default_catalog() {
            let added = self
                .retry
                .run("aid_types.insert", || self.aid_types.insert_if_absent(&name))
                .await?;
            if added {
                report.created += 1;
            } else {
                report.existing += 1;
            }
        }

        tracing::info!(created = report.created, existing = report.existing, "aid-type catalog seeded");
        Ok(report)
    }
}
