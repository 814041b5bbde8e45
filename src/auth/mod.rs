pub mod middleware;

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    generator::CredentialGenerator,
    store::{MemoryStore, models::User},
};

/// Identity of the user behind an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
}

/// Issues session tokens and resolves them back to users
#[derive(Clone)]
pub struct Sessions {
    store: Arc<MemoryStore>,
    generator: Arc<dyn CredentialGenerator>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(
        store: Arc<MemoryStore>,
        generator: Arc<dyn CredentialGenerator>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            ttl,
        }
    }

    /// Check credentials and bind a fresh token to the user.
    ///
    /// The secret comparison is plain equality. Any token previously issued to
    /// the user stops resolving. Returns the user snapshot carrying the new
    /// token and its expiry.
    pub fn login(&self, user_id: &str, password: &str) -> ApiResult<User> {
        let user = self
            .store
            .get::<User>(user_id)
            .filter(|user| user.password == password)
            .ok_or(ApiError::InvalidCredentials)?;

        let token = self.generator.session_token();
        let expires_at = Utc::now() + self.ttl;
        self.store
            .bind_session(&user.user_id, &token, expires_at)
            .ok_or(ApiError::InvalidCredentials)
    }

    /// Resolve a bearer token to its caller.
    ///
    /// The expiry stamped at login is not checked here: a token stays valid
    /// until the same user logs in again.
    pub fn resolve(&self, token: &str) -> ApiResult<Caller> {
        self.store
            .user_by_token(token)
            .map(|user| Caller {
                user_id: user.user_id,
            })
            .ok_or_else(|| ApiError::Unauthenticated("Invalid or expired token".to_string()))
    }
}
