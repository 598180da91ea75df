//! Content hashing via xxh3.

use xxhash_rust::xxh3::xxh3_64;

use redline_core::{FindingId, Span};

/// Compute the xxh3 64-bit hash of document content.
#[inline]
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

/// Render a content hash the way reports show it.
pub fn hash_hex(hash: u64) -> String {
    format!("{hash:016x}")
}

/// Stable finding id: a digest of document, rule, and span.
pub fn finding_id(document: &str, rule_id: &str, span: Span) -> FindingId {
    let key = format!("{document}\0{rule_id}\0{}\0{}", span.start, span.end);
    FindingId::from_digest(xxh3_64(key.as_bytes()))
}
