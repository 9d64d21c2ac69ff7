use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod coffee_options;
pub mod error;
pub mod middleware;
pub mod reservations;
pub mod state;
pub mod time_slots;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Staff routes sit behind the session gate; login/logout do not.
    let admin_routes = Router::new()
        .route("/api/admin/reservations", get(admin::list_reservations))
        .route(
            "/api/admin/reservations/{id}",
            put(admin::update_reservation_status).delete(admin::delete_reservation),
        )
        .route(
            "/api/admin/coffee-options",
            get(admin::list_coffee_options)
                .post(admin::create_coffee_option)
                .put(admin::update_coffee_option)
                .delete(admin::delete_coffee_option),
        )
        .route("/api/admin/auth/me", get(auth::me))
        .route("/api/admin/auth/change-password", post(auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    Router::new()
        .merge(reservations::routes())
        .merge(time_slots::routes())
        .merge(coffee_options::routes())
        .route("/api/admin/auth/login", post(auth::login))
        .route("/api/admin/auth/logout", post(auth::logout))
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
