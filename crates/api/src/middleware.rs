use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use casework_auth::SessionToken;
use casework_infra::services::AccountService;

use crate::app::errors;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub accounts: AccountService,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(req.headers()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required");
    };

    let user = match state.accounts.authenticate(&token).await {
        Ok(user) => user,
        Err(e) => return errors::service_error_to_response(e),
    };

    req.extensions_mut().insert(user.actor());
    req.extensions_mut().insert(SessionContext::new(token));

    next.run(req).await
}

/// Accepts `Authorization: Bearer <t>` and `Authorization: Token <t>`.
fn extract_token(headers: &HeaderMap) -> Option<SessionToken> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("Token "))?
        .trim();
    if token.is_empty() {
        return None;
    }

    Some(SessionToken::from_raw(token))
}
