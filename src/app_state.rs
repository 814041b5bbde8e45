use chrono::Duration;
use std::sync::Arc;

use crate::{auth::Sessions, generator::CredentialGenerator, store::MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub generator: Arc<dyn CredentialGenerator>,
    pub sessions: Sessions,
}

impl AppState {
    pub fn new(
        store: Arc<MemoryStore>,
        generator: Arc<dyn CredentialGenerator>,
        session_ttl: Duration,
    ) -> Self {
        let sessions = Sessions::new(store.clone(), generator.clone(), session_ttl);
        Self {
            store,
            generator,
            sessions,
        }
    }
}
