use std::sync::Arc;

use casework_auth::SaltedSha256Hasher;
use casework_infra::services::{AccountService, AidDesk, InventoryService, UserDirectory};
use casework_infra::store::{
    InMemoryAidRequestStore, InMemoryAidTypeStore, InMemoryCredentialStore, InMemoryInventoryStore, InMemoryUserStore,
};
use casework_infra::{AppConfig, ServiceResult};

/// Every application service a handler may need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService,
    pub directory: UserDirectory,
    pub desk: AidDesk,
    pub inventory: InventoryService,
}

/// Wire the services over the in-memory adapters.
pub fn build_services(config: &AppConfig) -> AppServices {
    let users = Arc::new(InMemoryUserStore::new());
    let sessions = Arc::new(InMemoryCredentialStore::new(config.session_ttl));

    AppServices {
        accounts: AccountService::new(users.clone(), sessions, Arc::new(SaltedSha256Hasher), config.retry),
        directory: UserDirectory::new(users, config.retry),
        desk: AidDesk::new(
            Arc::new(InMemoryAidRequestStore::new()),
            Arc::new(InMemoryAidTypeStore::new()),
            config.aid_status_policy,
            config.retry,
        ),
        inventory: InventoryService::new(Arc::new(InMemoryInventoryStore::new()), config.retry),
    }
}

/// Startup seeding: the aid-type catalog and the bootstrap `superAdmin`.
pub async fn prepare(services: &AppServices, config: &AppConfig) -> ServiceResult<()> {
    if config.seed_aid_types {
        services.desk.seed_default_catalog().await?;
    }

    if let Some(account) = &config.bootstrap {
        if !services.accounts.bootstrap_super_admin(account).await? {
            tracing::info!("bootstrap superAdmin already present");
        }
    }

    Ok(())
}
