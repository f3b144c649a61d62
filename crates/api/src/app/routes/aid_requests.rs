use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use casework_aid::AidRequestInput;
use casework_auth::ActorContext;
use casework_core::AidRequestId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

fn parse_id(raw: &str) -> Result<AidRequestId, axum::response::Response> {
    raw.parse().map_err(|_| errors::invalid_id())
}

/// Public intake form.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<AidRequestInput>,
) -> axum::response::Response {
    match services.desk.create(&body).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_aid_types(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.desk.list_aid_types().await {
        Ok(names) => Json(names).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.desk.list(&actor).await {
        Ok(requests) => Json(requests).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.desk.get(&actor, id).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let status = match body.parse() {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.desk.update_status(&actor, id, status).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
