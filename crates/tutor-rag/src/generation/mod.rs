//! Map-reduce generation chains for study artifacts
//!
//! All three chains share one protocol: one generation request per chunk in
//! parallel, then a single consolidation request over the concatenated
//! partial results. A failing map request aborts the whole operation; the
//! reduce stage needs the complete set of partials.

pub mod flashcard;
pub mod prompt;
pub mod quiz;
pub mod summary;

pub use flashcard::FlashcardChain;
pub use prompt::PromptBuilder;
pub use quiz::QuizChain;
pub use summary::SummaryChain;
