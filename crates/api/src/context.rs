use casework_auth::SessionToken;

/// Session context for a request: the credential it was authenticated with.
///
/// Inserted by the auth middleware next to the [`ActorContext`]; only the
/// logout route needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: SessionToken,
}

impl SessionContext {
    pub fn new(token: SessionToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

