//! Operator authentication.
//!
//! Password-gated admin sessions for the error-report surface. The
//! password hash is supplied through configuration; sessions are held in
//! memory and expire after fifteen minutes of inactivity.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session timeout duration (15 minutes).
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No admin password is configured.
    #[error("admin password not configured")]
    NotSetup,

    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    /// Stored hash could not be parsed.
    #[error("failed to verify password: {0}")]
    VerificationFailed(String),
}

/// A session token representing an authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new random session token.
    pub fn new() -> Self {
        let salt = SaltString::generate(&mut OsRng);
        Self(salt.to_string())
    }

    /// Reconstruct a token from an API request.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the token as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct SessionData {
    last_used: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            last_used: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_used.elapsed() > SESSION_TIMEOUT
    }

    fn touch(&mut self) {
        self.last_used = Instant::now();
    }
}

/// Password verification plus in-memory session management.
#[derive(Debug)]
pub struct AdminAuth {
    password_hash: Option<String>,
    sessions: RwLock<HashMap<SessionToken, SessionData>>,
}

impl AdminAuth {
    /// Create an auth manager with an optional configured password hash.
    ///
    /// Without a hash the admin surface stays locked: every login fails
    /// with [`AuthError::NotSetup`].
    pub fn new(password_hash: Option<String>) -> Self {
        Self {
            password_hash,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Hash a password for configuration.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify the password and open a new session.
    pub fn login(&self, password: &str) -> Result<SessionToken, AuthError> {
        let hash = self.password_hash.as_deref().ok_or(AuthError::NotSetup)?;

        let parsed =
            PasswordHash::new(hash).map_err(|e| AuthError::VerificationFailed(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let token = SessionToken::new();
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(token.clone(), SessionData::new());

        // Clean up expired sessions while we have the lock
        sessions.retain(|_, data| !data.is_expired());

        Ok(token)
    }

    /// Validate a session token and refresh its expiry if valid.
    pub fn validate(&self, token: &SessionToken) -> bool {
        let mut sessions = self.sessions.write().unwrap();

        if let Some(data) = sessions.get_mut(token) {
            if data.is_expired() {
                sessions.remove(token);
                return false;
            }
            data.touch();
            return true;
        }

        false
    }

    /// Invalidate (logout) a session.
    pub fn logout(&self, token: &SessionToken) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(token);
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.values().filter(|d| !d.is_expired()).count()
    }
}
