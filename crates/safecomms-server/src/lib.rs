//! SafeComms Server - HTTP API server.
//!
//! This crate provides the HTTP API over the term corpus and match
//! engine.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `POST /check/text` - Evaluate text against the term corpus
//! - `POST /check/audio` - Evaluate an audio transcript
//! - `POST /check/image` - Evaluate an image description
//! - `POST /check/text-ai` - Evaluate text with the secondary toxicity model
//! - `GET /corpus/stats` - Realized corpus size counters
//! - `POST /admin/login` - Open an operator session
//! - `POST /admin/logout` - Close an operator session
//! - `POST /admin/errors` - Record a collaborator failure
//! - `GET /admin/errors` - List error reports (requires session)
//! - `POST /admin/errors/{id}/resolve` - Mark a report resolved (requires session)
//! - `DELETE /admin/errors/{id}` - Delete a report (requires session)
//!
//! ## Example
//!
//! ```no_run
//! use safecomms_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod auth;
pub mod error;
mod handlers;
pub mod models;
pub mod ratelimit;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use safecomms_core::{Corpus, MatchEngine, SeedCatalog};
use safecomms_storage::Database;

use crate::auth::AdminAuth;
use crate::ratelimit::RateLimiter;
use crate::state::{DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW};

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8900;

/// Default server host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 8900).
    pub port: u16,
    /// Database path (None = in-memory).
    pub db_path: Option<String>,
    /// Argon2 hash of the operator password (None = admin surface locked).
    pub admin_password_hash: Option<String>,
    /// Requests admitted per rate-limit window.
    pub rate_limit: usize,
    /// Rate-limit window.
    pub rate_window: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
            admin_password_hash: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: DEFAULT_RATE_WINDOW,
        }
    }
}

impl ServerConfig {
    /// Creates a config with a specific database path.
    pub fn with_db_path(path: impl Into<String>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the operator password hash.
    pub fn with_admin_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.admin_password_hash = Some(hash.into());
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// The seed catalog failed validation.
    #[error("catalog error: {0}")]
    Catalog(#[from] safecomms_core::CatalogError),

    /// The corpus failed to compile into an automaton.
    #[error("engine error: {0}")]
    Engine(#[from] safecomms_core::EngineError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] safecomms_storage::StorageError),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/check/text", post(handlers::check_text))
        .route("/check/audio", post(handlers::check_audio))
        .route("/check/image", post(handlers::check_image))
        .route("/check/text-ai", post(handlers::check_text_ai))
        .route("/corpus/stats", get(handlers::corpus_stats))
        .route("/admin/login", post(handlers::admin_login))
        .route("/admin/logout", post(handlers::admin_logout))
        .route(
            "/admin/errors",
            post(handlers::report_error).get(handlers::list_errors),
        )
        .route("/admin/errors/{id}/resolve", post(handlers::resolve_error))
        .route("/admin/errors/{id}", delete(handlers::delete_error))
        .layer(cors)
        .with_state(state)
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    ///
    /// Builds the term corpus and compiles the match engine up front;
    /// both are immutable for the lifetime of the server.
    pub fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let catalog = SeedCatalog::builtin();
        let corpus = Corpus::build(&catalog)?;
        let engine = MatchEngine::new(&corpus)?;

        let db = if let Some(ref path) = config.db_path {
            Database::with_path(path)?
        } else {
            Database::in_memory()?
        };

        let state = AppState::new(db, &corpus, engine)
            .with_auth(AdminAuth::new(config.admin_password_hash.clone()))
            .with_limiter(RateLimiter::new(config.rate_limit, config.rate_window));

        Self::with_state(config, state)
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        info!(
            terms = state.corpus_stats.total_terms,
            base = state.corpus_stats.base_terms,
            obfuscated = state.corpus_stats.obfuscated_terms,
            "Match engine ready"
        );

        let router = build_router(state);

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self { router, addr })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting SafeComms API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, OnceLock};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use safecomms_core::{ToxicityClassifier, ToxicityScore};

    use crate::state::CorpusStats;

    // The corpus takes a moment to build, so it is compiled once and
    // shared across tests. The engine is read-only after construction.
    fn shared_engine() -> (Arc<MatchEngine>, CorpusStats) {
        static ENGINE: OnceLock<(Arc<MatchEngine>, CorpusStats)> = OnceLock::new();
        ENGINE
            .get_or_init(|| {
                let corpus = Corpus::build(&SeedCatalog::builtin()).unwrap();
                let engine = MatchEngine::new(&corpus).unwrap();
                (Arc::new(engine), CorpusStats::of(&corpus))
            })
            .clone()
    }

    fn test_state() -> AppState {
        let (engine, stats) = shared_engine();
        AppState {
            db: Arc::new(Database::in_memory().unwrap()),
            engine,
            corpus_stats: stats,
            auth: Arc::new(AdminAuth::new(None)),
            limiter: Arc::new(RateLimiter::new(1000, Duration::from_secs(60))),
            toxicity: None,
        }
    }

    fn test_app() -> Router {
        build_router(test_state())
    }

    struct FixedClassifier {
        label: &'static str,
        score: f32,
    }

    impl ToxicityClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> anyhow::Result<ToxicityScore> {
            Ok(ToxicityScore {
                label: self.label.to_string(),
                score: self.score,
            })
        }
    }

    struct FailingClassifier;

    impl ToxicityClassifier for FailingClassifier {
        fn classify(&self, _text: &str) -> anyhow::Result<ToxicityScore> {
            Err(anyhow::anyhow!("model not loaded"))
        }
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_loaded_terms() {
        let app = test_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["terms_loaded"].as_u64().unwrap() >= 20_000);
    }

    #[tokio::test]
    async fn test_check_violent_text() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/check/text",
                json!({"text": "I will kill and bomb this."}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], false);
        assert_eq!(json["category"], "violence");
        let matched: Vec<String> = json["matched_terms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(matched.contains(&"kill".to_string()));
        assert!(matched.contains(&"bomb".to_string()));
    }

    #[tokio::test]
    async fn test_check_clean_text() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/check/text",
                json!({"text": "hello team, have a nice day"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], true);
        assert_eq!(json["category"], "clean");
        assert_eq!(json["matched_terms"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_check_obfuscated_text() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/check/text",
                json!({"text": "you are a p.u.s.s.y"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], false);
    }

    #[tokio::test]
    async fn test_check_audio_transcript() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/check/audio",
                json!({"transcript": "that nigga is crazy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], false);
        assert_eq!(json["category"], "hate");
    }

    #[tokio::test]
    async fn test_check_image_description() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/check/image",
                json!({"description": "A nude scene with explicit content"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], false);
        assert_eq!(json["category"], "sexual");

        let response = app
            .oneshot(post_json(
                "/check/image",
                json!({"description": "a meadow full of flowers"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], true);
    }

    #[tokio::test]
    async fn test_check_empty_text_rejected() {
        let app = test_app();

        let response = app
            .oneshot(post_json("/check/text", json!({"text": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_oversized_text_rejected() {
        let app = test_app();
        let long = "a".repeat(models::MAX_TEXT_LEN + 1);

        let response = app
            .oneshot(post_json("/check/text", json!({"text": long})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rate_limit_returns_429() {
        let state = test_state().with_limiter(RateLimiter::new(1, Duration::from_secs(60)));
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post_json("/check/text", json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_json("/check/text", json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_corpus_stats() {
        let app = test_app();

        let request = Request::builder()
            .uri("/corpus/stats")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["base_terms"].as_u64().unwrap() >= 10_000);
        assert!(json["obfuscated_terms"].as_u64().unwrap() >= 10_000);
        assert_eq!(
            json["total_terms"].as_u64().unwrap(),
            json["base_terms"].as_u64().unwrap() + json["obfuscated_terms"].as_u64().unwrap()
        );
    }

    #[tokio::test]
    async fn test_ai_check_without_classifier_is_unavailable() {
        let app = test_app();

        let response = app
            .oneshot(post_json("/check/text-ai", json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ai_check_toxic_text() {
        let state = test_state().with_toxicity(Arc::new(FixedClassifier {
            label: "TOXIC",
            score: 0.97,
        }));
        let app = build_router(state);

        let response = app
            .oneshot(post_json("/check/text-ai", json!({"text": "some text"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], false);
        assert_eq!(json["category"], "toxicity_ai");
    }

    #[tokio::test]
    async fn test_ai_check_benign_text() {
        let state = test_state().with_toxicity(Arc::new(FixedClassifier {
            label: "TOXIC",
            score: 0.12,
        }));
        let app = build_router(state);

        let response = app
            .oneshot(post_json("/check/text-ai", json!({"text": "some text"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["safe"], true);
    }

    #[tokio::test]
    async fn test_ai_check_invalid_threshold_rejected() {
        let app = test_app();

        let response = app
            .oneshot(post_json(
                "/check/text-ai?threshold=1.5",
                json!({"text": "hello"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ai_check_failure_is_recorded() {
        let state = test_state().with_toxicity(Arc::new(FailingClassifier));
        let db = Arc::clone(&state.db);
        let app = build_router(state);

        let response = app
            .oneshot(post_json("/check/text-ai", json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(db.count_error_reports().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_admin_login_without_setup() {
        let app = test_app();

        let response = app
            .oneshot(post_json("/admin/login", json!({"password": "anything"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_login_wrong_password() {
        let hash = AdminAuth::hash_password("correct-horse").unwrap();
        let state = test_state().with_auth(AdminAuth::new(Some(hash)));
        let app = build_router(state);

        let response = app
            .oneshot(post_json("/admin/login", json!({"password": "wrong"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_error_report_lifecycle() {
        let hash = AdminAuth::hash_password("correct-horse").unwrap();
        let state = test_state().with_auth(AdminAuth::new(Some(hash)));
        let app = build_router(state);

        // Record a failure (no credentials required)
        let response = app
            .clone()
            .oneshot(post_json(
                "/admin/errors",
                json!({
                    "source": "classifier",
                    "path": "/check/text-ai",
                    "message": "model not loaded"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        let id = report["id"].as_i64().unwrap();

        // Listing without a session is rejected
        let request = Request::builder()
            .uri("/admin/errors?session_token=bogus")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Log in and list
        let response = app
            .clone()
            .oneshot(post_json(
                "/admin/login",
                json!({"password": "correct-horse"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = body_json(response).await;
        let token = login["session_token"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/admin/errors?session_token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list["total"], 1);
        assert_eq!(list["reports"][0]["source"], "classifier");

        // Resolve it
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/admin/errors/{id}/resolve"),
                json!({"session_token": token, "resolved_by": "ops"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Resolving again is a 404 (already resolved)
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/admin/errors/{id}/resolve"),
                json!({"session_token": token, "resolved_by": "ops"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Delete it
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/admin/errors/{id}?session_token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri(format!("/admin/errors?session_token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let list = body_json(response).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_logout_closes_session() {
        let hash = AdminAuth::hash_password("correct-horse").unwrap();
        let state = test_state().with_auth(AdminAuth::new(Some(hash)));
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/admin/login",
                json!({"password": "correct-horse"}),
            ))
            .await
            .unwrap();
        let login = body_json(response).await;
        let token = login["session_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/admin/logout",
                json!({"session_token": token}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri(format!("/admin/errors?session_token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
