use axum::{
    routing::{get, patch, post},
    Router,
};

pub mod aid_requests;
pub mod auth;
pub mod inventory;
pub mod system;
pub mod users;

/// Endpoints open to anonymous callers: sign-up, login, the public intake
/// form and the aid-type catalog it offers.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/aid-requests", post(aid_requests::create))
        .route("/aid-types", get(aid_requests::list_aid_types))
}

/// Endpoints that require a session credential.
pub fn protected_router() -> Router {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/users/me", get(users::me))
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).patch(users::update))
        .route("/aid-requests", get(aid_requests::list))
        .route("/aid-requests/:id", get(aid_requests::get))
        .route("/aid-requests/:id/status", patch(aid_requests::update_status))
        .route("/inventory", get(inventory::list).post(inventory::create))
        .route("/inventory/totals", get(inventory::totals))
        .route(
            "/inventory/:id",
            get(inventory::get).patch(inventory::update).delete(inventory::remove),
        )
}
