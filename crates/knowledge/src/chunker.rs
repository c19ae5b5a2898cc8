//! Text chunking with configurable size and overlap.

use crate::types::DocumentChunk;

/// Split a document into overlapping character windows.
///
/// Sizes are measured in chars, so a window never splits a code point.
/// Windows that are blank after trimming are dropped; positions stay dense.
pub fn chunk_text(source: &str, text: &str, chunk_size: usize, overlap: usize) -> Vec<DocumentChunk> {
    let chunk_size = chunk_size.max(1);
    let step = if chunk_size > overlap {
        chunk_size - overlap
    } else {
        chunk_size
    };

    // Byte offset of every char, plus the end of the text.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let char_count = bounds.len();
    bounds.push(text.len());

    let mut chunks = Vec::new();
    let mut position = 0u32;
    let mut start = 0usize;

    while start < char_count {
        let end = (start + chunk_size).min(char_count);
        let window = text[bounds[start]..bounds[end]].trim();

        if !window.is_empty() {
            chunks.push(DocumentChunk::new(source, position, window));
            position += 1;
        }

        if end == char_count {
            break;
        }
        start += step;
    }

    tracing::debug!(
        "Chunked {} into {} chunks (size: {}, overlap: {})",
        source,
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_basic() {
        let text = "a".repeat(1000);
        let chunks = chunk_text("doc.md", &text, 200, 50);

        assert_eq!(chunks[0].id, "doc.md_chunk_0");
        assert_eq!(chunks[1].id, "doc.md_chunk_1");
        assert_eq!(chunks[0].content.len(), 200);
    }

    #[test]
    fn test_chunk_text_no_overlap() {
        let text = "a".repeat(300);
        let chunks = chunk_text("doc.md", &text, 100, 0);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("doc.md", "  Short text.  ", 1000, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Short text.");
    }

    #[test]
    fn test_chunk_text_empty() {
        assert!(chunk_text("doc.md", "", 100, 10).is_empty());
        assert!(chunk_text("doc.md", "   \n  ", 100, 10).is_empty());
    }

    #[test]
    fn test_chunk_text_overlap() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let chunks = chunk_text("doc.md", &text, 50, 10);

        let first: Vec<char> = chunks[0].content.chars().collect();
        let second: Vec<char> = chunks[1].content.chars().collect();
        assert_eq!(&first[40..], &second[..10]);
    }

    #[test]
    fn test_chunk_text_multibyte() {
        let text = "é".repeat(25);
        let chunks = chunk_text("doc.md", &text, 10, 0);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content.chars().count(), 10);
        assert_eq!(chunks[2].content.chars().count(), 5);
    }

    #[test]
    fn test_overlap_not_smaller_than_size() {
        let text = "a".repeat(30);
        let chunks = chunk_text("doc.md", &text, 10, 10);
        assert_eq!(chunks.len(), 3);
    }
}
