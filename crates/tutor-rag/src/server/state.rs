//! Application state for the tutoring server

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::TutorConfig;
use crate::error::{Error, Result};
use crate::providers::{OpenAiChatModel, OpenAiEmbedder, WeaviateStore};
use crate::session::{ProviderHandles, StudySession};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: TutorConfig,
    /// Model handles, constructed once and shared by every session
    handles: ProviderHandles,
    /// Per-user sessions
    sessions: DashMap<String, Arc<StudySession>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: TutorConfig) -> Self {
        tracing::info!("Initializing tutoring application state...");

        let chat = Arc::new(OpenAiChatModel::new(
            &config.llm,
            config.llm.chat_model.clone(),
            config.llm.resolved_chat_api_key(),
        ));
        let generation = Arc::new(OpenAiChatModel::new(
            &config.llm,
            config.llm.generation_model.clone(),
            config.llm.resolved_generation_api_key(),
        ));
        let embedder = Arc::new(OpenAiEmbedder::new(
            &config.llm,
            &config.embeddings,
            config.llm.resolved_generation_api_key(),
        ));

        tracing::info!(
            chat_model = %config.llm.chat_model,
            generation_model = %config.llm.generation_model,
            embedding_model = %config.embeddings.model,
            "model handles initialized"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                handles: ProviderHandles {
                    chat,
                    generation,
                    embedder,
                },
                sessions: DashMap::new(),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &TutorConfig {
        &self.inner.config
    }

    /// Look up a user's session; missing sessions are a 404, the user has
    /// to load a document first
    pub fn session(&self, user_id: &str) -> Result<Arc<StudySession>> {
        self.inner
            .sessions
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no session for user '{user_id}'; load a document first"
                ))
            })
    }

    /// Get or create the session for a user
    ///
    /// Each new session gets its own store connection; construction fails
    /// fast when the store is unreachable.
    pub async fn get_or_create_session(&self, user_id: &str) -> Result<Arc<StudySession>> {
        if let Some(existing) = self.inner.sessions.get(user_id) {
            return Ok(existing.value().clone());
        }

        let store = Arc::new(WeaviateStore::connect(&self.inner.config.store).await?);
        let session = Arc::new(
            StudySession::connect(self.inner.handles.clone(), store, &self.inner.config).await?,
        );

        // Two concurrent first loads can race here; keep whichever session
        // landed in the map and let the loser's connection drop.
        let entry = self
            .inner
            .sessions
            .entry(user_id.to_string())
            .or_insert(session);
        Ok(entry.value().clone())
    }

    /// Clean up every session, e.g. at shutdown
    ///
    /// Failures are logged inside each session's cleanup; one session can
    /// never block another's release.
    pub async fn cleanup_all(&self) {
        let user_ids: Vec<String> = self
            .inner
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        for user_id in user_ids {
            if let Some((_, session)) = self.inner.sessions.remove(&user_id) {
                session.cleanup().await;
                tracing::info!(user_id, "session cleaned up");
            }
        }
    }
}
