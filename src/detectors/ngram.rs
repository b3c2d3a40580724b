//! N-gram multiset construction over token sequences.
//!
//! An n-gram's identity is a 64-bit rolling polynomial hash of its token
//! integers; 64 bits keep accidental collisions within one partition
//! statistically negligible. Multisets are computed on demand and never
//! stored with the corpus.

/// Fixed prime base for the polynomial window hash.
const NGRAM_HASH_BASE: u64 = 1_099_511_628_211;

/// N-gram multiset of one token sequence, as sorted `(hash, multiplicity)`
/// runs.
#[derive(Debug, Clone)]
pub struct NgramSet {
    grams: Vec<(u64, u32)>,
    total: u32,
}

impl NgramSet {
    /// Build the n-gram multiset of `tokens`.
    ///
    /// Sequences shorter than `gram_size` yield the empty multiset and
    /// cannot participate in detection.
    pub fn build(tokens: &[u32], gram_size: usize) -> Self {
        let mut hashes = window_hashes(tokens, gram_size);
        let total = hashes.len() as u32;
        hashes.sort_unstable();

        let mut grams: Vec<(u64, u32)> = Vec::new();
        for hash in hashes {
            match grams.last_mut() {
                Some((last, count)) if *last == hash => *count += 1,
                _ => grams.push((hash, 1)),
            }
        }

        Self { grams, total }
    }

    /// Distinct grams with multiplicities, ascending by hash.
    pub fn grams(&self) -> &[(u64, u32)] {
        &self.grams
    }

    /// Multiset size: `max(0, len − gram_size + 1)`.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether the sequence was too short to produce any gram.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Rolling polynomial hashes of every length-`gram_size` window.
pub fn window_hashes(tokens: &[u32], gram_size: usize) -> Vec<u64> {
    if gram_size == 0 || tokens.len() < gram_size {
        return Vec::new();
    }

    let mut hashes = Vec::with_capacity(tokens.len() - gram_size + 1);

    // lead = base^(gram_size - 1), the weight of the outgoing token
    let mut lead: u64 = 1;
    for _ in 1..gram_size {
        lead = lead.wrapping_mul(NGRAM_HASH_BASE);
    }

    let mut hash: u64 = 0;
    for &token in &tokens[..gram_size] {
        hash = hash
            .wrapping_mul(NGRAM_HASH_BASE)
            .wrapping_add(u64::from(token) + 1);
    }
    hashes.push(hash);

    for i in gram_size..tokens.len() {
        let outgoing = (u64::from(tokens[i - gram_size]) + 1).wrapping_mul(lead);
        hash = hash
            .wrapping_sub(outgoing)
            .wrapping_mul(NGRAM_HASH_BASE)
            .wrapping_add(u64::from(tokens[i]) + 1);
        hashes.push(hash);
    }

    hashes
}

/// Multiset size of a sequence without materializing the grams.
pub fn gram_count(token_len: usize, gram_size: usize) -> u32 {
    if gram_size == 0 || token_len < gram_size {
        0
    } else {
        (token_len - gram_size + 1) as u32
    }
}
