use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{auth, order_lines, orders, products, root, users};
use crate::middleware::{login_gate, security_headers_middleware, signup_gate, token_auth_middleware};
use crate::state::AppState;

/// Build the full router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        // Public
        .route("/", get(root::index))
        .route("/health", get(root::health))
        .merge(auth_routes(&state))
        .merge(user_routes(&state))
        .merge(product_routes(&state))
        .merge(order_routes(&state))
        .merge(order_line_routes(&state))
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/login",
        post(auth::login).route_layer(from_fn_with_state(state.clone(), login_gate)),
    )
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Token required
        .route("/users", get(users::list))
        .route("/changepassword/:id", patch(users::change_password))
        .route_layer(from_fn_with_state(state.clone(), token_auth_middleware))
        // Signup
        .route(
            "/user",
            post(users::create).route_layer(from_fn_with_state(state.clone(), signup_gate)),
        )
}

fn product_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/product", post(products::create))
        .route(
            "/product/:id",
            put(products::update).merge(
                delete(products::delete)
                    .route_layer(from_fn_with_state(state.clone(), token_auth_middleware)),
            ),
        )
}

fn order_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list))
        .route("/order", post(orders::create))
        .route("/order/:id", delete(orders::delete))
        .route_layer(from_fn_with_state(state.clone(), token_auth_middleware))
}

fn order_line_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/detailOrders/:idOrder", get(order_lines::list))
        .route("/detailOrder", post(order_lines::create))
        .route("/detailOrder/:id", delete(order_lines::delete))
        .route_layer(from_fn_with_state(state.clone(), token_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}
