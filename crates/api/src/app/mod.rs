//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and service wiring, startup seeding
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use casework_infra::{AppConfig, ServiceResult};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Seeds the aid-type catalog and the bootstrap account before returning.
pub async fn build_app(config: &AppConfig) -> ServiceResult<Router> {
    let services = services::build_services(config);
    services::prepare(&services, config).await?;

    let auth_state = middleware::AuthState {
        accounts: services.accounts.clone(),
    };

    // Protected routes: require a session credential.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services)))))
}
