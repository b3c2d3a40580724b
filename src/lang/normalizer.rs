//! Lexical token normalization and stable hashing.
//!
//! Raw lexer tokens are split at boundaries between letter/digit runs and
//! single punctuation characters, so `foo(bar)` always yields `foo`, `(`,
//! `bar`, `)` regardless of how a grammar aggregates its leaves. Each
//! normalized token is represented downstream by a stable 32-bit hash of its
//! UTF-8 bytes, identical within a run and across threads.

use xxhash_rust::xxh32::xxh32;
use xxhash_rust::xxh64::xxh64;

/// Seed for the 32-bit token hash; fixed so hashes are stable across runs.
const TOKEN_HASH_SEED: u32 = 0;

/// Seed for the 64-bit token-sequence hash written to the code-blocks file.
const SEQUENCE_HASH_SEED: u64 = 0;

/// Whether a raw lexer token is dropped outright.
///
/// Empty tokens and tokens beginning with whitespace never reach the
/// normalizer output; comment filtering is language-specific and happens at
/// the tokenizer via node kinds.
pub fn is_discardable(text: &str) -> bool {
    text.is_empty() || text.starts_with(char::is_whitespace)
}

/// Stable 32-bit hash of one normalized token.
pub fn token_hash(text: &str) -> u32 {
    xxh32(text.as_bytes(), TOKEN_HASH_SEED)
}

/// 64-bit hash of a whole token sequence, for code-block records.
pub fn sequence_hash(tokens: &[u32]) -> u64 {
    let mut bytes = Vec::with_capacity(tokens.len() * 4);
    for token in tokens {
        bytes.extend_from_slice(&token.to_le_bytes());
    }
    xxh64(&bytes, SEQUENCE_HASH_SEED)
}

/// Split a raw token into normalized tokens and append their hashes.
///
/// Letter/digit/underscore runs stay whole; every other non-whitespace
/// character becomes a single-character token; whitespace separates.
pub fn normalize_into(text: &str, out: &mut Vec<u32>) {
    if is_discardable(text) {
        return;
    }

    let mut run_start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() || ch == '_' {
            run_start.get_or_insert(idx);
            continue;
        }

        if let Some(start) = run_start.take() {
            out.push(token_hash(&text[start..idx]));
        }

        if !ch.is_whitespace() {
            let mut buf = [0u8; 4];
            out.push(token_hash(ch.encode_utf8(&mut buf)));
        }
    }

    if let Some(start) = run_start {
        out.push(token_hash(&text[start..]));
    }
}
