//! SafeComms - deterministic text safety screening service.
//!
//! This binary wires the pieces together:
//! - builds the term corpus and compiles the match engine at startup
//! - opens the error-report database
//! - runs the HTTP API server
//! - keeps a periodic health probe running in the background

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use safecomms_core::{Corpus, MatchEngine, SeedCatalog};
use safecomms_server::auth::AdminAuth;
use safecomms_server::ratelimit::RateLimiter;
use safecomms_server::{AppState, Server, ServerConfig};
use safecomms_storage::Database;

/// SafeComms - deterministic text safety screening service
#[derive(Parser, Debug)]
#[command(name = "safecomms", version, about)]
struct Args {
    /// Host to bind the API server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the API server to
    #[arg(long, default_value_t = safecomms_server::DEFAULT_PORT)]
    port: u16,

    /// Path to the error-report database (omit for in-memory)
    #[arg(long)]
    db: Option<String>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Requests admitted per rate-limit window on the check endpoints
    #[arg(long, default_value_t = 120)]
    rate_limit: usize,

    /// Rate-limit window in seconds
    #[arg(long, default_value_t = 60)]
    rate_window_secs: u64,

    /// Argon2 hash of the operator password (omit to lock the admin surface)
    #[arg(long)]
    admin_password_hash: Option<String>,

    /// Seconds between health probe heartbeats
    #[arg(long, default_value_t = 60)]
    health_interval_secs: u64,

    /// Print corpus size counters and exit
    #[arg(long)]
    corpus_stats: bool,

    /// Hash a password for --admin-password-hash and exit
    #[arg(long, value_name = "PASSWORD")]
    hash_password: Option<String>,
}

fn init_logging(args: &Args) {
    // Crate names use underscores as tracing targets
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let l = &args.log_level;
        EnvFilter::new(format!(
            "safecomms={l},safecomms_core={l},safecomms_storage={l},safecomms_server={l},warn"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Heartbeat task: logs liveness and probes the database.
fn spawn_health_probe(db: Arc<Database>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            match db.count_error_reports() {
                Ok(open) => {
                    tracing::info!(error_reports = open, "Health probe ok");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Health probe: database unreachable");
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args);

    if let Some(ref password) = args.hash_password {
        let hash = AdminAuth::hash_password(password)
            .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
        println!("{hash}");
        return Ok(());
    }

    // Catalog problems are fatal; a partial corpus is never served.
    let catalog = SeedCatalog::builtin();
    catalog
        .validate()
        .context("built-in seed catalog failed validation")?;

    let corpus = Corpus::build(&catalog).context("failed to build term corpus")?;
    tracing::info!(
        base = corpus.base_term_count(),
        obfuscated = corpus.obfuscated_term_count(),
        total = corpus.total_terms(),
        "Term corpus built"
    );

    if args.corpus_stats {
        println!("base terms:       {}", corpus.base_term_count());
        println!("obfuscated terms: {}", corpus.obfuscated_term_count());
        println!("total terms:      {}", corpus.total_terms());
        return Ok(());
    }

    let engine = MatchEngine::new(&corpus).context("failed to compile match engine")?;

    let db = match args.db {
        Some(ref path) => {
            Database::with_path(path).with_context(|| format!("failed to open database {path}"))?
        }
        None => {
            tracing::warn!("No --db path given; error reports are kept in memory only");
            Database::in_memory().context("failed to open in-memory database")?
        }
    };

    if args.admin_password_hash.is_none() {
        tracing::warn!("No admin password configured; the admin surface is locked");
    }

    let state = AppState::new(db, &corpus, engine)
        .with_auth(AdminAuth::new(args.admin_password_hash.clone()))
        .with_limiter(RateLimiter::new(
            args.rate_limit,
            Duration::from_secs(args.rate_window_secs),
        ));

    spawn_health_probe(
        Arc::clone(&state.db),
        Duration::from_secs(args.health_interval_secs),
    );

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        db_path: args.db,
        admin_password_hash: args.admin_password_hash,
        rate_limit: args.rate_limit,
        rate_window: Duration::from_secs(args.rate_window_secs),
    };

    let server = Server::with_state(config, state).context("failed to configure server")?;
    tracing::info!("Listening on {}", server.addr());
    server.run().await.context("server exited with error")?;

    Ok(())
}
