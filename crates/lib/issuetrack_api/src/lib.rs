//! # issuetrack_api
//!
//! HTTP API library for Issuetrack.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use issuetrack_core::auth::{AuthError, TokenAuthority, UserDirectory};
use issuetrack_core::store::IssueStore;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, issues, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// File-backed issue store.
    pub store: Arc<IssueStore>,
    /// Credential & token authority.
    pub authority: Arc<TokenAuthority>,
}

impl AppState {
    /// Wire the store and authority described by `config` around `directory`.
    pub fn new(config: &ApiConfig, directory: Arc<dyn UserDirectory>) -> Result<Self, AuthError> {
        let authority = TokenAuthority::new(config.jwt_secret.as_bytes(), directory)?
            .with_default_ttl(config.token_ttl());
        Ok(Self {
            store: Arc::new(IssueStore::open(config.issues_file.clone())),
            authority: Arc::new(authority),
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new().route(routes::POST_AUTH_TOKEN, post(auth::login_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_USERS_ME, get(users::me_handler))
        .route(
            routes::ISSUES,
            get(issues::list_issues_handler).post(issues::create_issue_handler),
        )
        .route(
            routes::ISSUES_ID,
            get(issues::get_issue_handler)
                .put(issues::update_issue_handler)
                .delete(issues::delete_issue_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::timing::process_time))
        .with_state(state)
}
