use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{SecurityConfig, ServerConfig};
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{human_gate, require_admin, require_session};
use crate::state::AppState;

/// Full application router: three auth tiers, SPA fallback, global layers
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .merge(elevated_routes(&state));

    with_fallback(router, &config.server)
        .layer(from_fn(human_gate))
        .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, health, verify};

    Router::new()
        .route("/health", get(health::health))
        .route("/api/verify-turnstile", post(verify::verify_turnstile))
        .route("/api/auth/login", get(auth::login))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use protected::{analyze, logs, stats};

    Router::new()
        .route("/api/logs/create", post(logs::create::create_log))
        .route("/api/logs/list", get(logs::list::list_logs))
        .route("/api/logs/delete", post(logs::delete::delete_log))
        .route("/api/logs/batch_create", post(logs::batch_create::batch_create_logs))
        .route("/api/stats/summary", get(stats::summary))
        .route("/api/analyze", post(analyze::analyze))
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

fn elevated_routes(state: &AppState) -> Router<AppState> {
    use elevated::admin;

    // Layers run bottom-up: the session check wraps the role check
    Router::new()
        .route("/api/admin/summary", get(admin::summary))
        .route("/api/admin/status", get(admin::status))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_session))
}

fn with_fallback(router: Router<AppState>, server: &ServerConfig) -> Router<AppState> {
    match &server.static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => router.fallback(|| async { ApiError::not_found("Not found") }),
    }
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
