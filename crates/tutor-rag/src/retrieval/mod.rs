//! Read paths over the index store: similarity search and ordered
//! generation-chunk fetch

pub mod fetcher;
pub mod retriever;

pub use fetcher::GenerationChunkFetcher;
pub use retriever::Retriever;
