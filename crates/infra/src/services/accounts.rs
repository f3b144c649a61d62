//! Account lifecycle: registration, login, logout, elevated creation and
//! resolution of session credentials into actors.

use std::sync::Arc;

use chrono::Utc;

use casework_auth::{
    AccountInput, ActorContext, CredentialStore, LoginInput, PasswordHasher, Role, SessionToken, User, UserView,
    can_create, resolve, validate_account, validate_registration, verify_login,
};

use casework_core::FieldErrors;

use crate::config::BootstrapAccount;
use crate::error::{ServiceError, ServiceResult};
use crate::retry::RetryPolicy;
use crate::store::UserStore;

/// A freshly authenticated session.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub user: UserView,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    retry: RetryPolicy,
}

fn own_view(user: &User) -> ServiceResult<UserView> {
    UserView::project(user, &resolve(&user.actor(), &user.snapshot())).ok_or(ServiceError::Forbidden)
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            retry,
        }
    }

    /// Self-service sign-up. The account is always `basic` and is logged in
    /// right away.
    pub async fn register(&self, input: &AccountInput) -> ServiceResult<SessionGrant> {
        let clashes = self.clashes(input).await?;
        let new = validate_registration(input, clashes, self.hasher.as_ref())?;
        let user = self
            .retry
            .run("users.insert", || self.users.insert(new.clone(), Utc::now()))
            .await?;
        tracing::info!(user_id = %user.user_id(), department = %user.department(), "account registered");

        self.open_session(&user).await
    }

    pub async fn login(&self, input: &LoginInput) -> ServiceResult<SessionGrant> {
        let found = match input.lookup_key() {
            Ok(cedula) => {
                self.retry
                    .run("users.find_by_cedula", || self.users.find_by_cedula(&cedula))
                    .await?
            }
            Err(_) => None,
        };

        if let Err(e) = verify_login(found.as_ref(), &input.password, self.hasher.as_ref()) {
            tracing::warn!("login rejected");
            return Err(e.into());
        }

        let user = found.ok_or(ServiceError::InvalidCredentials)?;
        tracing::info!(user_id = %user.user_id(), "login succeeded");
        self.open_session(&user).await
    }

    async fn clashes(&self, input: &AccountInput) -> ServiceResult<FieldErrors> {
        let keys = input.unique_keys();
        Ok(self
            .retry
            .run("users.clashes", || self.users.clashes(&keys, None))
            .await?)
    }

    async fn open_session(&self, user: &User) -> ServiceResult<SessionGrant> {
        let token = self
            .retry
            .run("sessions.issue", || {
                self.sessions.issue(user.user_id(), Utc::now()).map_err(ServiceError::from)
            })
            .await?;

        Ok(SessionGrant {
            token,
            user: own_view(user)?,
        })
    }

    /// Revoke a session credential. Unknown tokens are fine.
    pub async fn logout(&self, token: &SessionToken) -> ServiceResult<()> {
        self.retry
            .run("sessions.invalidate", || self.sessions.invalidate(token).map_err(ServiceError::from))
            .await
    }

    /// Turn a session credential into the acting user, loaded fresh.
    pub async fn authenticate(&self, token: &SessionToken) -> ServiceResult<User> {
        let user_id = self
            .retry
            .run("sessions.resolve", || {
                self.sessions.resolve(token, Utc::now()).map_err(ServiceError::from)
            })
            .await?;

        self.retry
            .run("users.get", || self.users.get(user_id))
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Account creation by a privileged actor, with role and department
    /// chosen by the caller.
    pub async fn create_user(&self, actor: &ActorContext, input: &AccountInput) -> ServiceResult<UserView> {
        if !matches!(actor.role, Role::SuperAdmin | Role::Admin) {
            tracing::warn!(user_id = %actor.user_id, "account creation denied");
            return Err(ServiceError::Forbidden);
        }

        let clashes = self.clashes(input).await?;
        let new = validate_account(input, clashes, self.hasher.as_ref())?;
        if !can_create(actor, new.assignment) {
            tracing::warn!(user_id = %actor.user_id, "account creation denied");
            return Err(ServiceError::Forbidden);
        }

        let user = self
            .retry
            .run("users.insert", || self.users.insert(new.clone(), Utc::now()))
            .await?;
        tracing::info!(
            user_id = %actor.user_id,
            target_id = %user.user_id(),
            role = %user.role(),
            department = %user.department(),
            "account created"
        );

        UserView::project(&user, &resolve(actor, &user.snapshot())).ok_or(ServiceError::Forbidden)
    }

    /// Create the configured `superAdmin` unless an account with that cédula
    /// exists. Returns whether an account was created.
    pub async fn bootstrap_super_admin(&self, account: &BootstrapAccount) -> ServiceResult<bool> {
        let input = AccountInput {
            cedula: account.cedula.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            password: account.password.clone(),
            confirm_password: account.password.clone(),
            role: Some(Role::SuperAdmin.as_str().to_string()),
            ..AccountInput::default()
        };
        let new = validate_account(&input, FieldErrors::new(), self.hasher.as_ref())?;

        let existing = self
            .retry
            .run("users.find_by_cedula", || self.users.find_by_cedula(&new.profile.cedula))
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let user = self
            .retry
            .run("users.insert", || self.users.insert(new.clone(), Utc::now()))
            .await?;
        tracing::info!(user_id = %user.user_id(), "bootstrap superAdmin created");
        Ok(true)
    }
}
