//! Access gate — bearer token issuance and validation
//!
//! Provides:
//! - Login issuing opaque bearer tokens (development semantics: every
//!   login succeeds and grants the admin role)
//! - Token validation and revocation
//! - Constant-time token comparison
//!
//! Tokens are stored as SHA-256 hashes; the raw token is returned once at
//! login and never kept. Revoked sessions stay in the map as tombstones so
//! a logged-out token keeps reporting `TokenRevoked` instead of
//! `InvalidCredentials`; the map lives in process memory and is never
//! pruned, so it grows with the number of logins over the process
//! lifetime.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("authentication required")]
    MissingCredentials,

    /// Unknown or malformed token
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token has been revoked (logout)
    #[error("token revoked")]
    TokenRevoked,

    /// Internal error
    #[error("auth internal error: {0}")]
    Internal(String),
}

/// Auth result type
pub type Result<T> = std::result::Result<T, AuthError>;

// ============================================================================
// Auth Context
// ============================================================================

/// Authenticated context attached to each request
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// Username the session was issued for
    pub username: String,
    /// Role granted at login
    pub role: String,
}

// ============================================================================
// Stored Session
// ============================================================================

/// Internal representation of an issued session
#[derive(Debug, Clone)]
struct StoredSession {
    /// SHA-256 hash of the token (the raw token is never stored)
    token_hash: [u8; 32],
    /// Username the token belongs to
    username: String,
    /// Granted role
    role: String,
    /// When the session was created
    created_at: DateTime<Utc>,
    /// Whether the session has been revoked
    revoked: bool,
}

// ============================================================================
// Access Gate
// ============================================================================

/// Token storage and validation
pub struct AccessGate {
    /// token_hash_hex → StoredSession
    sessions: RwLock<HashMap<String, StoredSession>>,
    /// Whether authentication is enforced
    enabled: bool,
}

impl AccessGate {
    /// Create a new access gate
    pub fn new(enabled: bool) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            enabled,
        }
    }

    /// Check if authentication is enforced
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hash a token using SHA-256
    fn hash_token(token: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Convert hash to hex string for map lookup
    fn hash_to_hex(hash: &[u8; 32]) -> String {
        hash.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Issue a session token for a user.
    ///
    /// Development semantics carried over from the original system: any
    /// username/password pair is accepted and granted the admin role. The
    /// raw token is only returned here.
    pub fn login(&self, username: &str) -> Result<String> {
        let raw_token = format!("tm_{}", Uuid::new_v4().as_simple());
        let token_hash = Self::hash_token(&raw_token);
        let token_hash_hex = Self::hash_to_hex(&token_hash);

        let stored = StoredSession {
            token_hash,
            username: username.to_string(),
            role: "admin".to_string(),
            created_at: Utc::now(),
            revoked: false,
        };

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| AuthError::Internal(format!("lock poisoned: {e}")))?;
        sessions.insert(token_hash_hex, stored);

        info!(
            username = %username,
            token_prefix = %&raw_token[..8],
            "session token issued"
        );

        Ok(raw_token)
    }

    /// Validate a token and return the auth context
    pub fn validate_token(&self, token: &str) -> Result<AuthContext> {
        if !self.enabled {
            // When auth is disabled, every caller is an anonymous admin
            return Ok(AuthContext {
                username: "anonymous".to_string(),
                role: "admin".to_string(),
            });
        }

        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let token_hash = Self::hash_token(token);
        let token_hash_hex = Self::hash_to_hex(&token_hash);

        let sessions = self
            .sessions
            .read()
            .map_err(|e| AuthError::Internal(format!("lock poisoned: {e}")))?;

        if let Some(stored) = sessions.get(&token_hash_hex) {
            // Constant-time comparison of the hash
            let hashes_match: bool = stored.token_hash.ct_eq(&token_hash).into();
            if !hashes_match {
                return Err(AuthError::InvalidCredentials);
            }

            if stored.revoked {
                return Err(AuthError::TokenRevoked);
            }

            debug!(username = %stored.username, "token validated");

            Ok(AuthContext {
                username: stored.username.clone(),
                role: stored.role.clone(),
            })
        } else {
            warn!("invalid token attempt");
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Revoke a token (logout). Unknown tokens are rejected.
    pub fn revoke_token(&self, token: &str) -> Result<()> {
        let token_hash = Self::hash_token(token);
        let token_hash_hex = Self::hash_to_hex(&token_hash);

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| AuthError::Internal(format!("lock poisoned: {e}")))?;

        if let Some(stored) = sessions.get_mut(&token_hash_hex) {
            stored.revoked = true;
            info!(username = %stored.username, "session token revoked");
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Count of active (non-revoked) sessions
    pub fn active_session_count(&self) -> usize {
        self.sessions
            .read()
            .map(|sessions| sessions.values().filter(|s| !s.revoked).count())
            .unwrap_or(0)
    }

    /// Age of the oldest active session, if any (diagnostics)
    pub fn oldest_active_session(&self) -> Option<DateTime<Utc>> {
        self.sessions
            .read()
            .ok()?
            .values()
            .filter(|s| !s.revoked)
            .map(|s| s.created_at)
            .min()
    }
}

// ============================================================================
// Tests
// ============================================================================
