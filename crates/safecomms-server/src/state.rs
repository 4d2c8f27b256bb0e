//! Application state for the API server.

use std::sync::Arc;
use std::time::Duration;

use safecomms_core::{Corpus, MatchEngine, ToxicityClassifier};
use safecomms_storage::Database;

use crate::auth::AdminAuth;
use crate::ratelimit::RateLimiter;

/// Default requests admitted per rate-limit window.
pub const DEFAULT_RATE_LIMIT: usize = 120;

/// Default rate-limit window.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Realized corpus size counters, captured at startup.
#[derive(Debug, Clone, Copy)]
pub struct CorpusStats {
    pub base_terms: usize,
    pub obfuscated_terms: usize,
    pub total_terms: usize,
}

impl CorpusStats {
    /// Capture the counters from a built corpus.
    pub fn of(corpus: &Corpus) -> Self {
        Self {
            base_terms: corpus.base_term_count(),
            obfuscated_terms: corpus.obfuscated_term_count(),
            total_terms: corpus.total_terms(),
        }
    }
}

/// Shared application state.
///
/// The match engine is immutable once built, so it is shared read-only
/// behind an `Arc` with no locking.
#[derive(Clone)]
pub struct AppState {
    /// Error-report database.
    pub db: Arc<Database>,
    /// The compiled match engine.
    pub engine: Arc<MatchEngine>,
    /// Corpus provenance counters.
    pub corpus_stats: CorpusStats,
    /// Operator authentication.
    pub auth: Arc<AdminAuth>,
    /// Rate limiter for the check endpoints.
    pub limiter: Arc<RateLimiter>,
    /// Optional secondary toxicity classifier.
    pub toxicity: Option<Arc<dyn ToxicityClassifier>>,
}

impl AppState {
    /// Creates application state from prebuilt components.
    pub fn new(db: Database, corpus: &Corpus, engine: MatchEngine) -> Self {
        Self {
            db: Arc::new(db),
            engine: Arc::new(engine),
            corpus_stats: CorpusStats::of(corpus),
            auth: Arc::new(AdminAuth::new(None)),
            limiter: Arc::new(RateLimiter::new(DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW)),
            toxicity: None,
        }
    }

    /// Sets the operator authentication manager.
    pub fn with_auth(mut self, auth: AdminAuth) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Sets the rate limiter.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Arc::new(limiter);
        self
    }

    /// Wires in a secondary toxicity classifier.
    pub fn with_toxicity(mut self, classifier: Arc<dyn ToxicityClassifier>) -> Self {
        self.toxicity = Some(classifier);
        self
    }
}
