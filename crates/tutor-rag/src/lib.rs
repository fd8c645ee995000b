//! tutor-rag: document-grounded tutoring backend
//!
//! Ingests user documents, indexes them for semantic retrieval in an
//! external vector store, and serves four AI-generated artifacts scoped to
//! a user and document: grounded chat answers, Markdown summaries,
//! flashcards, and quizzes. Flashcards, quizzes, and summaries are produced
//! by map-reduce chains over large plain-text chunks; chat answers are
//! grounded in similarity search over small embedded chunks.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::TutorConfig;
pub use error::{Error, Result};
pub use session::{ProviderHandles, StudySession};
pub use types::{Chunk, ChunkMetadata, Difficulty, Flashcard, QuizQuestion};
