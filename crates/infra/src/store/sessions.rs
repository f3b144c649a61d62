//! Opaque session credentials kept in memory.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use casework_auth::{CredentialStore, SessionClaims, SessionError, SessionToken, validate_claims};
use casework_core::UserId;

/// Token → claims map with a fixed lifetime per issued token.
#[derive(Debug)]
pub struct InMemoryCredentialStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionClaims>>,
}

impl InMemoryCredentialStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<SessionToken, SessionError> {
        let token = SessionToken::generate();
        let claims = SessionClaims {
            user_id,
            issued_at: now,
            expires_at: now + self.ttl,
        };

        // Expired sessions are dropped whenever a new one is issued.
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Unavailable)?;
        sessions.retain(|_, c| validate_claims(c, now).is_ok());
        sessions.insert(token.as_str().to_string(), claims);
        Ok(token)
    }

    fn resolve(&self, token: &SessionToken, now: DateTime<Utc>) -> Result<UserId, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Unavailable)?;
        let claims = sessions.get(token.as_str()).ok_or(SessionError::Invalid)?;
        validate_claims(claims, now).map_err(|_| SessionError::Invalid)?;
        Ok(claims.user_id)
    }

    fn invalidate(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.sessions
            .write()
            .map_err(|_| SessionError::Unavailable)?
            .remove(token.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_resolve_until_they_expire() {
        let store = InMemoryCredentialStore::new(Duration::minutes(30));
        let now = Utc::now();
        let token = store.issue(UserId::new(3), now).unwrap();

        assert_eq!(store.resolve(&token, now + Duration::minutes(29)), Ok(UserId::new(3)));
        assert_eq!(store.resolve(&token, now + Duration::minutes(30)), Err(SessionError::Invalid));
    }

    #[test]
    fn invalidate_is_idempotent() {
        let store = InMemoryCredentialStore::new(Duration::minutes(30));
        let now = Utc::now();
        let token = store.issue(UserId::new(1), now).unwrap();

        store.invalidate(&token).unwrap();
        assert_eq!(store.resolve(&token, now), Err(SessionError::Invalid));
        assert!(store.invalidate(&token).is_ok());
        assert!(store.invalidate(&SessionToken::from_raw("never-issued")).is_ok());
    }

    #[test]
    fn every_login_gets_a_fresh_token() {
        let store = InMemoryCredentialStore::new(Duration::minutes(30));
        let now = Utc::now();
        let a = store.issue(UserId::new(1), now).unwrap();
        let b = store.issue(UserId::new(1), now).unwrap();
        assert_ne!(a, b);
        store.invalidate(&a).unwrap();
        assert_eq!(store.resolve(&b, now), Ok(UserId::new(1)));
    }

    #[test]
    fn issuing_drops_expired_sessions() {
        let store = InMemoryCredentialStore::new(Duration::minutes(30));
        let now = Utc::now();
        let stale = store.issue(UserId::new(1), now).unwrap();
        let fresh = store.issue(UserId::new(2), now + Duration::hours(2)).unwrap();

        let sessions = store.sessions.read().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(fresh.as_str()));
        assert!(!sessions.contains_key(stale.as_str()));
    }
}
