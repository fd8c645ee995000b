//! Shared types: chunks, study artifacts, and API DTOs

pub mod chunk;
pub mod request;
pub mod response;
pub mod study;

pub use chunk::{Chunk, ChunkMetadata};
pub use study::{Difficulty, Flashcard, FlashcardResponse, QuizQuestion, QuizResponse};
