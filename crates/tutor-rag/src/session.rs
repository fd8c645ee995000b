//! Per-user study session orchestration
//!
//! A session binds the chat and generation model handles to a store
//! connection and moves through three states: construction (collections
//! ensured, store reachable), ready (operations available), and cleaned-up
//! (every operation fails fast). Cleanup releases the store connection
//! exactly once and never propagates errors.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::TutorConfig;
use crate::error::Result;
use crate::generation::{FlashcardChain, QuizChain, SummaryChain};
use crate::index::IndexStore;
use crate::ingestion::{loader, TextChunker};
use crate::providers::{CompletionProvider, EmbeddingProvider, VectorStore};
use crate::retrieval::{GenerationChunkFetcher, Retriever};
use crate::storage::documents;
use crate::types::{ChunkMetadata, Flashcard, QuizQuestion};

/// Chunks of retrieved context per chat prompt
const CHAT_TOP_K: usize = 5;

/// Explicit model dependencies handed to every session
///
/// Constructed once at startup and shared across sessions; the chat and
/// generation handles may point at the same model or different ones.
#[derive(Clone)]
pub struct ProviderHandles {
    pub chat: Arc<dyn CompletionProvider>,
    pub generation: Arc<dyn CompletionProvider>,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

/// A user's study session over their indexed documents
pub struct StudySession {
    chat: Arc<dyn CompletionProvider>,
    generation: Arc<dyn CompletionProvider>,
    index: IndexStore,
    retriever: Retriever,
    fetcher: GenerationChunkFetcher,
    retrieval_chunker: TextChunker,
    generation_chunker: TextChunker,
    protected_namespace: String,
    closed: AtomicBool,
}

impl StudySession {
    /// Wire a session to a fresh store connection and ensure the collections
    /// exist; an unreachable store fails construction
    pub async fn connect(
        handles: ProviderHandles,
        store: Arc<dyn VectorStore>,
        config: &TutorConfig,
    ) -> Result<Self> {
        let index = IndexStore::new(store.clone(), handles.embedder.clone(), &config.store);
        index.ensure_collections().await?;

        let retriever = Retriever::new(
            store.clone(),
            handles.embedder.clone(),
            &config.store.retrieval_collection,
        );
        let fetcher = GenerationChunkFetcher::new(
            store,
            &config.store.generation_collection,
            config.store.generation_fetch_limit,
        );

        let chunking = &config.chunking;
        Ok(Self {
            chat: handles.chat,
            generation: handles.generation,
            index,
            retriever,
            fetcher,
            retrieval_chunker: TextChunker::new(
                chunking.retrieval_chunk_size,
                chunking.retrieval_chunk_overlap,
            ),
            generation_chunker: TextChunker::new(
                chunking.generation_chunk_size,
                chunking.generation_chunk_overlap,
            ),
            protected_namespace: config.documents.protected_namespace.clone(),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(crate::error::Error::SessionClosed(
                "session has been cleaned up".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a document into both collections
    ///
    /// The source file is deleted as soon as its text is extracted,
    /// regardless of whether indexing succeeds (protected example documents
    /// excepted). `chunk_index` is unique only within one invocation:
    /// concurrent loads of the same (user, document) pair can interleave
    /// their writes, so callers must serialize loads per document key.
    pub async fn load_document(
        &self,
        document_name: &str,
        path: &Path,
        user_id: &str,
    ) -> Result<String> {
        self.ensure_open()?;
        let context = format!("failed to load document '{document_name}' for user '{user_id}'");

        let units = loader::load(path).map_err(|e| e.with_context(&context))?;
        documents::delete_document(path, &self.protected_namespace);

        let metadata = ChunkMetadata::new(user_id, document_name);
        let retrieval_chunks = self.retrieval_chunker.split_documents(&units, &metadata);

        // One combined text for generation chunking, so page boundaries do
        // not fragment the large chunks.
        let full_text = units.join("\n\n");
        let generation_chunks = self
            .generation_chunker
            .split_documents(&[full_text], &metadata);

        tracing::info!(
            user_id,
            document = document_name,
            retrieval_chunks = retrieval_chunks.len(),
            generation_chunks = generation_chunks.len(),
            "indexing document"
        );

        self.index
            .write_retrieval_chunks(&retrieval_chunks)
            .await
            .map_err(|e| e.with_context(&context))?;
        self.index
            .write_generation_chunks(&generation_chunks)
            .await
            .map_err(|e| e.with_context(&context))?;

        Ok(format!(
            "Document {document_name} loaded successfully for user {user_id}."
        ))
    }

    /// Answer a question from retrieved context
    pub async fn prompt(
        &self,
        message: &str,
        user_id: &str,
        document_name: Option<&str>,
    ) -> Result<String> {
        self.ensure_open()?;
        let context = self
            .retriever
            .retrieve(message, user_id, document_name, CHAT_TOP_K)
            .await?;

        let messages = crate::generation::PromptBuilder::chat(&context, message);
        self.chat
            .complete(&messages)
            .await
            .map_err(|e| e.with_context(&format!("chat failed for user '{user_id}'")))
    }

    /// Summarize a document as Markdown
    pub async fn summarize(&self, document_name: &str, user_id: &str) -> Result<String> {
        self.ensure_open()?;
        let chunks = self
            .fetcher
            .get_generation_chunks(user_id, document_name)
            .await?;
        SummaryChain::new(self.generation.clone())
            .run(&chunks)
            .await
            .map_err(|e| {
                e.with_context(&format!(
                    "summary failed for document '{document_name}' (user '{user_id}')"
                ))
            })
    }

    /// Generate flashcards for a document
    pub async fn generate_flashcards(
        &self,
        document_name: &str,
        user_id: &str,
    ) -> Result<Vec<Flashcard>> {
        self.ensure_open()?;
        let chunks = self
            .fetcher
            .get_generation_chunks(user_id, document_name)
            .await?;
        FlashcardChain::new(self.generation.clone())
            .run(&chunks)
            .await
            .map_err(|e| {
                e.with_context(&format!(
                    "flashcard generation failed for document '{document_name}' (user '{user_id}')"
                ))
            })
    }

    /// Generate a quiz for a document
    pub async fn generate_quiz(
        &self,
        document_name: &str,
        user_id: &str,
    ) -> Result<Vec<QuizQuestion>> {
        self.ensure_open()?;
        let chunks = self
            .fetcher
            .get_generation_chunks(user_id, document_name)
            .await?;
        QuizChain::new(self.generation.clone())
            .run(&chunks)
            .await
            .map_err(|e| {
                e.with_context(&format!(
                    "quiz generation failed for document '{document_name}' (user '{user_id}')"
                ))
            })
    }

    /// Release the store connection; idempotent and best-effort
    pub async fn cleanup(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.index.store().close().await {
            tracing::warn!("cleanup failed to close store connection: {e}");
        } else {
            tracing::info!("store connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::MemoryStore;
    use crate::testing::{ScriptedCompletion, StubEmbedder};
    use std::fs;

    fn handles(chat: Arc<ScriptedCompletion>, generation: Arc<ScriptedCompletion>) -> ProviderHandles {
        ProviderHandles {
            chat,
            generation,
            embedder: Arc::new(StubEmbedder::default()),
        }
    }

    async fn session_with_store() -> (StudySession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let chat = Arc::new(ScriptedCompletion::always("grounded answer"));
        let generation = Arc::new(ScriptedCompletion::always(
            "# Summary\n\n- consolidated",
        ));
        let session = StudySession::connect(
            handles(chat, generation),
            store.clone(),
            &TutorConfig::default(),
        )
        .await
        .unwrap();
        (session, store)
    }

    #[tokio::test]
    async fn test_load_short_document_yields_one_generation_chunk() {
        let (session, store) = session_with_store().await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Page one of the notes.\n\nPage two of the notes.").unwrap();

        let message = session
            .load_document("notes.txt", &path, "u1")
            .await
            .unwrap();
        assert!(message.contains("notes.txt"));
        assert!(message.contains("u1"));

        // Upload is ephemeral: gone right after a successful load.
        assert!(!path.exists());

        // Short content fits one 4000-char generation chunk with index 0.
        assert_eq!(store.len("GenerationChunk"), 1);
        let fetcher = GenerationChunkFetcher::new(store.clone(), "GenerationChunk", 100);
        let texts = fetcher.get_generation_chunks("u1", "notes.txt").await.unwrap();
        assert_eq!(
            texts,
            vec!["Page one of the notes.\n\nPage two of the notes.".to_string()]
        );

        assert!(store.len("RetrievalChunk") >= 1);
    }

    #[tokio::test]
    async fn test_load_errors_name_the_failing_unit_of_work() {
        let (session, _store) = session_with_store().await;

        let err = session
            .load_document("ghost.txt", Path::new("/nonexistent/ghost.txt"), "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let message = err.to_string();
        assert!(message.contains("ghost.txt"));
        assert!(message.contains("u1"));
    }

    #[tokio::test]
    async fn test_prompt_runs_one_chat_completion() {
        let store = Arc::new(MemoryStore::new());
        let chat = Arc::new(ScriptedCompletion::always("grounded answer"));
        let generation = Arc::new(ScriptedCompletion::always("unused"));
        let session = StudySession::connect(
            handles(chat.clone(), generation.clone()),
            store,
            &TutorConfig::default(),
        )
        .await
        .unwrap();

        let answer = session.prompt("What is this about?", "u1", None).await.unwrap();
        assert_eq!(answer, "grounded answer");
        assert_eq!(chat.plain_call_count(), 1);
        // Chat never touches the generation model or the map-reduce chains.
        assert_eq!(generation.plain_call_count(), 0);
        assert_eq!(generation.structured_call_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_uses_fetcher_and_generation_model() {
        let store = Arc::new(MemoryStore::new());
        let chat = Arc::new(ScriptedCompletion::always("unused"));
        let generation = Arc::new(ScriptedCompletion::always("# Summary\n\n- point"));
        let session = StudySession::connect(
            handles(chat.clone(), generation.clone()),
            store,
            &TutorConfig::default(),
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "A short note.").unwrap();
        session.load_document("notes.txt", &path, "u1").await.unwrap();

        let summary = session.summarize("notes.txt", "u1").await.unwrap();
        assert!(summary.starts_with("# Summary"));
        // One chunk: one map call plus one reduce call, all on the
        // generation handle.
        assert_eq!(generation.plain_call_count(), 2);
        assert_eq!(chat.plain_call_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_without_document_is_not_found() {
        let (session, _store) = session_with_store().await;
        let err = session.summarize("missing.txt", "u1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent_and_closes_once() {
        let (session, store) = session_with_store().await;
        session.cleanup().await;
        assert!(store.is_closed());
        // Second cleanup is a no-op, not an error.
        session.cleanup().await;
    }

    #[tokio::test]
    async fn test_operations_fail_fast_after_cleanup() {
        let (session, _store) = session_with_store().await;
        session.cleanup().await;

        let err = session.prompt("hi", "u1", None).await.unwrap_err();
        assert!(matches!(err, Error::SessionClosed(_)));

        let err = session
            .load_document("notes.txt", Path::new("/tmp/notes.txt"), "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed(_)));
    }
}
