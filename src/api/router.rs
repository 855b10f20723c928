use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Events (operator)
        .route("/api/events", get(handlers::events::list).post(handlers::events::create))
        .route("/api/events/:id", get(handlers::events::detail))
        .route("/api/events/:id/schedule", put(handlers::events::schedule))
        .route("/api/events/:id/open", post(handlers::events::open))
        .route("/api/events/:id/close", post(handlers::events::close))
        .route("/api/events/:id/reopen", post(handlers::events::reopen))
        .route("/api/events/:id/result/open", post(handlers::events::declare_open_result))
        .route("/api/events/:id/result/close", post(handlers::events::declare_close_result))
        // Bets (player)
        .route("/api/bets", post(handlers::bets::place))
        .route("/api/coinflip/play", post(handlers::bets::play_coinflip))
        // Accounts
        .route("/api/accounts", post(handlers::accounts::create))
        .route("/api/accounts/:id", get(handlers::accounts::detail))
        .route("/api/accounts/:id/bets", get(handlers::bets::history))
        .route("/api/accounts/:id/transactions", get(handlers::accounts::transactions))
        .route("/api/accounts/:id/adjust", post(handlers::accounts::adjust))
        .route("/api/accounts/:id/block", post(handlers::accounts::block))
        // Wallet requests
        .route("/api/wallet/requests", get(handlers::wallet::list_pending).post(handlers::wallet::create))
        .route("/api/wallet/requests/:id/approve", post(handlers::wallet::approve))
        .route("/api/wallet/requests/:id/reject", post(handlers::wallet::reject))
        .layer(middleware::from_fn(require_auth));

    // CORS: dashboards are served from another origin; the bearer token
    // still gates every protected route.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
