//! Recursive text chunking with overlap and ordering metadata
//!
//! Splitting is greedy and recursive over a separator priority list
//! (paragraph, sentence, word, character): text is fragmented at the
//! coarsest level whose pieces fit the chunk size, and fragments are then
//! merged back into chunks that share `chunk_overlap` characters of
//! trailing context. The output is deterministic for identical input;
//! consumers rely on that to re-sort by `chunk_index` after a round-trip
//! through unordered storage.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, ChunkMetadata};

/// Separator priority levels, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitLevel {
    Paragraph,
    Sentence,
    Word,
}

impl SplitLevel {
    fn split<'a>(self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Paragraph => text.split_inclusive("\n\n").collect(),
            Self::Sentence => text.split_sentence_bounds().collect(),
            Self::Word => text.split_word_bounds().collect(),
        }
    }

    /// Next finer level; `None` means fall back to character cuts
    fn next(self) -> Option<Self> {
        match self {
            Self::Paragraph => Some(Self::Sentence),
            Self::Sentence => Some(Self::Word),
            Self::Word => None,
        }
    }
}

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Context shared between consecutive chunks
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new chunker; the overlap must be smaller than the chunk size
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(
            chunk_overlap < chunk_size,
            "chunk_overlap must be smaller than chunk_size"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split ordered text units into chunks carrying the supplied metadata
    ///
    /// `chunk_index` is assigned over the whole output sequence (0-based),
    /// spanning unit boundaries, so a document's chunks form one contiguous
    /// index range.
    pub fn split_documents(&self, documents: &[String], metadata: &ChunkMetadata) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|text| self.split_text(text))
            .enumerate()
            .map(|(i, text)| Chunk::new(text, metadata, i as u32))
            .collect()
    }

    /// Split one text into chunk strings, preserving reading order
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let fragments = self.fragment(text, SplitLevel::Paragraph);
        self.merge(fragments)
    }

    /// Recursively fragment text until every piece fits the chunk size
    fn fragment(&self, text: &str, level: SplitLevel) -> Vec<String> {
        let mut fragments = Vec::new();
        for piece in level.split(text) {
            if piece.len() <= self.chunk_size {
                fragments.push(piece.to_string());
            } else if let Some(finer) = level.next() {
                fragments.extend(self.fragment(piece, finer));
            } else {
                fragments.extend(hard_cut(piece, self.chunk_size));
            }
        }
        fragments
    }

    /// Greedily merge fragments into chunks, keeping a trailing window of
    /// fragments within the overlap size as the seed of the next chunk
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<String> = Vec::new();
        let mut window_len = 0usize;

        for fragment in fragments {
            if !window.is_empty() && window_len + fragment.len() > self.chunk_size {
                push_chunk(&mut chunks, &window);

                // Drop leading fragments until the window fits the overlap
                // size and leaves room for the incoming fragment.
                while !window.is_empty()
                    && (window_len > self.chunk_overlap
                        || window_len + fragment.len() > self.chunk_size)
                {
                    window_len -= window.remove(0).len();
                }
            }
            window_len += fragment.len();
            window.push(fragment);
        }

        push_chunk(&mut chunks, &window);
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &[String]) {
    let chunk = window.concat().trim().to_string();
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
}

/// Character-level fallback: cut at chunk-size boundaries, never inside a
/// UTF-8 code point
fn hard_cut(text: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        pieces.push(text[start..end].to_string());
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        (1..=40)
            .map(|i| format!("Sentence number {i} talks about spaced repetition."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Longest suffix of `a` that is also a prefix of `b`
    fn shared_overlap(a: &str, b: &str) -> usize {
        let max = a.len().min(b.len());
        (1..=max)
            .rev()
            .find(|&n| b.is_char_boundary(n) && a.ends_with(&b[..n]))
            .unwrap_or(0)
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let chunker = TextChunker::new(200, 50);
        let metadata = ChunkMetadata::new("u1", "notes.txt");
        let text = vec![sample_text()];

        let first = chunker.split_documents(&text, &metadata);
        let second = chunker.split_documents(&text, &metadata);
        assert_eq!(first, second);
        assert!(first.len() > 1);
    }

    #[test]
    fn test_short_content_yields_single_chunk() {
        let chunker = TextChunker::new(4000, 200);
        let metadata = ChunkMetadata::new("u1", "notes.txt");
        let text = "A short note that fits in one generation chunk.".to_string();

        let chunks = chunker.split_documents(&[text.clone()], &metadata);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let chunker = TextChunker::new(200, 50);
        for chunk in chunker.split_text(&sample_text()) {
            assert!(chunk.len() <= 200, "chunk too large: {} chars", chunk.len());
        }
    }

    #[test]
    fn test_indices_are_contiguous_and_zero_based() {
        let chunker = TextChunker::new(150, 30);
        let metadata = ChunkMetadata::new("u1", "notes.txt");
        let chunks = chunker.split_documents(&[sample_text()], &metadata);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert_eq!(chunk.user_id, "u1");
            assert_eq!(chunk.source, "notes.txt");
        }
    }

    #[test]
    fn test_indices_span_unit_boundaries() {
        let chunker = TextChunker::new(1000, 200);
        let metadata = ChunkMetadata::new("u1", "slides.pdf");
        let pages = vec!["Page one content.".to_string(), "Page two content.".to_string()];

        let chunks = chunker.split_documents(&pages, &metadata);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let chunker = TextChunker::new(200, 60);
        let chunks = chunker.split_text(&sample_text());
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            assert!(
                shared_overlap(&pair[0], &pair[1]) > 0,
                "no shared context between consecutive chunks"
            );
        }
    }

    #[test]
    fn test_unbroken_text_falls_back_to_character_cuts() {
        let chunker = TextChunker::new(100, 0);
        let text = "a".repeat(250);
        let chunks = chunker.split_text(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[2].len(), 50);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.split_text("").is_empty());
        assert!(chunker.split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn test_paragraph_boundaries_are_preferred() {
        let chunker = TextChunker::new(40, 0);
        let text = "First paragraph stays whole.\n\nSecond paragraph stays whole.";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "First paragraph stays whole.");
        assert_eq!(chunks[1], "Second paragraph stays whole.");
    }
}
