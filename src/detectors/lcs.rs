//! Longest-common-subsequence verification.
//!
//! Implements the Hunt–Szymanski algorithm: for each symbol of the shorter
//! sequence, its occurrence positions in the longer sequence are visited in
//! descending order while a thresholds array is maintained by binary search.
//! Complexity is O((r + n) log n) with r the number of matching symbol
//! pairs, which beats the classical quadratic table for typical
//! function-sized token sequences where r is small.

use ahash::AHashMap;

/// Length of the longest common subsequence of `a` and `b`.
pub fn lcs_length(a: &[u32], b: &[u32]) -> usize {
    let (shorter, longer) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let n = shorter.len();
    let m = longer.len();
    if n == 0 || m == 0 {
        return 0;
    }

    // Occurrence positions per symbol in the longer sequence, descending.
    let mut positions: AHashMap<u32, Vec<u32>> = AHashMap::new();
    for i in (0..m).rev() {
        positions.entry(longer[i]).or_default().push(i as u32);
    }

    // thresholds[k] = smallest index in the longer sequence at which an LCS
    // of length k can end; -1 sentinel below, MAX sentinel above.
    let mut thresholds: Vec<i64> = vec![i64::MAX; n + 1];
    thresholds[0] = -1;

    for &symbol in shorter {
        let Some(symbol_positions) = positions.get(&symbol) else {
            continue;
        };

        for &position in symbol_positions {
            let position = i64::from(position);

            // Largest k with thresholds[k] < position
            let mut left = 0usize;
            let mut right = n;
            while left < right {
                let mid = (left + right + 1) / 2;
                if thresholds[mid] < position {
                    left = mid;
                } else {
                    right = mid - 1;
                }
            }

            if left < n && thresholds[left] < position && position < thresholds[left + 1] {
                thresholds[left + 1] = position;
            }
        }
    }

    (0..=n)
        .rev()
        .find(|&k| thresholds[k] != i64::MAX)
        .unwrap_or(0)
}

/// LCS similarity as an integer percentage of the shorter sequence.
pub fn lcs_similarity(a: &[u32], b: &[u32]) -> u32 {
    let shorter_len = a.len().min(b.len());
    if shorter_len == 0 {
        return 0;
    }
    ((lcs_length(a, b) as u64 * 100) / shorter_len as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classical quadratic LCS used as a reference oracle.
    fn lcs_reference(a: &[u32], b: &[u32]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                table[i][j] = if a[i - 1] == b[j - 1] {
                    table[i - 1][j - 1] + 1
                } else {
                    table[i - 1][j].max(table[i][j - 1])
                };
            }
        }
        table[a.len()][b.len()]
    }

    #[test]
    fn identity_law() {
        let a = [4, 8, 15, 16, 23, 42];
        assert_eq!(lcs_length(&a, &a), a.len());
        assert_eq!(lcs_similarity(&a, &a), 100);
    }

    #[test]
    fn symmetry_law() {
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [1, 9, 2, 3, 9, 4, 5, 6];
        assert_eq!(lcs_length(&a, &b), lcs_length(&b, &a));
    }

    #[test]
    fn interleaved_noise_sequence() {
        // LCS([1..8], [1,9,2,3,9,4,5,6]) = [1,2,3,4,5,6]
        let a = [1, 2, 3, 4, 5, 6, 7, 8];
        let b = [1, 9, 2, 3, 9, 4, 5, 6];
        assert_eq!(lcs_length(&a, &b), 6);
        assert_eq!(lcs_similarity(&a, &b), 75);
    }

    #[test]
    fn single_shared_token() {
        let a = [1, 100];
        let b = [1, 200];
        assert_eq!(lcs_length(&a, &b), 1);
        assert_eq!(lcs_similarity(&a, &b), 50);
    }

    #[test]
    fn disjoint_sequences() {
        assert_eq!(lcs_length(&[1, 2, 3], &[4, 5, 6]), 0);
        assert_eq!(lcs_similarity(&[1, 2, 3], &[4, 5, 6]), 0);
    }

    #[test]
    fn empty_sequences() {
        assert_eq!(lcs_length(&[], &[1, 2]), 0);
        assert_eq!(lcs_similarity(&[], &[]), 0);
    }

    #[test]
    fn repeated_symbols() {
        let a = [1, 1, 1];
        let b = [1, 1, 1, 1, 1];
        assert_eq!(lcs_length(&a, &b), 3);
        assert_eq!(lcs_similarity(&a, &b), 100);
    }

    #[test]
    fn hundred_percent_requires_containment_of_shorter() {
        let a = [1, 2, 3];
        let b = [0, 1, 9, 2, 9, 3, 9];
        assert_eq!(lcs_similarity(&a, &b), 100);
    }

    #[test]
    fn matches_reference_on_varied_inputs() {
        let cases: &[(&[u32], &[u32])] = &[
            (&[1, 3, 5, 7, 9, 11], &[1, 2, 3, 4, 5, 6, 7]),
            (&[2, 2, 4, 4, 2, 2], &[4, 2, 4, 2, 4, 2]),
            (&[10, 20, 30], &[30, 20, 10]),
            (&[5, 5, 5, 1, 5], &[5, 1, 5, 5]),
            (&[8], &[8, 8, 8]),
        ];
        for (a, b) in cases {
            assert_eq!(
                lcs_length(a, b),
                lcs_reference(a, b),
                "mismatch for {a:?} vs {b:?}"
            );
        }
    }
}
