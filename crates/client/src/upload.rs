//! Chunk planning for binary ingestion uploads.

use std::ops::Range;

/// Split `total` bytes into contiguous spans of at most `chunk_size`
/// bytes each. A zero-byte file yields no spans; a `chunk_size` of zero
/// is treated as one byte.
pub fn chunk_spans(total: u64, chunk_size: u64) -> Vec<Range<u64>> {
    let size = chunk_size.max(1);
    let mut spans = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + size).min(total);
        spans.push(start..end);
        start = end;
    }
    spans
}

/// `Content-Range` header value for one span (inclusive byte indices).
pub fn content_range_header(span: &Range<u64>, total: u64) -> String {
    format!("bytes {}-{}/{}", span.start, span.end - 1, total)
}
