//! Route table

use crate::{
    api::AppState,
    auth::{api as auth_api, auth_middleware},
    middleware::{cors, request_logging},
    waitlist::api as waitlist_api,
};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the full application router.
///
/// `getWaitlist` and `deleteWaitlist` sit behind the token gate; signup, signin and
/// admin creation are public.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/getWaitlist", get(waitlist_api::get_waitlist))
        .route(
            "/api/deleteWaitlist",
            delete(waitlist_api::delete_missing_email),
        )
        .route(
            "/api/deleteWaitlist/",
            delete(waitlist_api::delete_missing_email),
        )
        .route(
            "/api/deleteWaitlist/:email",
            delete(waitlist_api::delete_from_waitlist),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt_handler.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/addWaitlist", post(waitlist_api::add_to_waitlist))
        .route("/api/signin", post(auth_api::signin))
        .route("/api/create", post(auth_api::create_admin));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging))
                .layer(middleware::from_fn(cors)),
        )
}

async fn health_check() -> &'static str {
    "ok"
}
