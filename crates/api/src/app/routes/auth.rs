use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use casework_auth::{AccountInput, LoginInput};

use crate::app::dto::SessionResponse;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<AccountInput>,
) -> axum::response::Response {
    match services.accounts.register(&body).await {
        Ok(grant) => (StatusCode::CREATED, Json(SessionResponse::from(grant))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginInput>,
) -> axum::response::Response {
    match services.accounts.login(&body).await {
        Ok(grant) => Json(SessionResponse::from(grant)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.accounts.logout(session.token()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
