// file: src/search/similarity.rs
// description: sequence-matching similarity ratio on a 0-100 scale
// reference: Ratcliff/Obershelp longest-matching-block algorithm

//! Similarity between a keyword and a heading or paragraph.
//!
//! The ratio is `2·M / T`, where `T` is the combined length of both strings
//! and `M` is the number of characters covered by matching blocks. Blocks are
//! found by taking the longest common block, then recursing on the text to
//! its left and to its right. Lengths count Unicode scalar values, not bytes.
//!
//! When the second string has at least 200 characters, characters that make
//! up more than 1% of it are left out of the block index ("autojunk"). They
//! can still extend a block that started on an ordinary character. This keeps
//! long paragraphs from being dominated by spaces and common letters, and is
//! required to reproduce the reference ratios exactly.

use crate::error::CapabilityError;
use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Pluggable similarity measure. Implementations may fail; the matcher then
/// falls back to plain substring scoring for that keyword/candidate pair.
pub trait SimilarityMeasure: Send + Sync {
    /// Similarity of `a` and `b` in `0.0..=100.0`.
    fn ratio(&self, a: &str, b: &str) -> Result<f64, CapabilityError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceRatio;

impl SimilarityMeasure for SequenceRatio {
    fn ratio(&self, a: &str, b: &str) -> Result<f64, CapabilityError> {
        Ok(ratio(a, b))
    }
}

/// Similarity of `a` and `b` in `0.0..=100.0`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let matched = BlockMatcher::new(&a, &b).matched_chars();
    (2.0 * matched as f64 / total as f64) * 100.0
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each non-popular character of `b`, ascending.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b_index }
    }

    fn matched_chars(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let (i, j, size) = self.longest_block(a_lo, a_hi, b_lo, b_hi);
            if size == 0 {
                continue;
            }
            matched += size;
            if a_lo < i && b_lo < j {
                pending.push((a_lo, i, b_lo, j));
            }
            if i + size < a_hi && j + size < b_hi {
                pending.push((i + size, a_hi, j + size, b_hi));
            }
        }

        matched
    }

    /// Longest block `a[i..i+size] == b[j..j+size]` inside the given window.
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_block(
        &self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);

        // run length of the block ending at b[j], for the previous row of a
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for i in a_lo..a_hi {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_index.get(&a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_lengths = next_runs;
        }

        // popular characters were left out of the index but may still extend a block
        while best_i > a_lo && best_j > b_lo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < a_hi
            && best_j + best_size < b_hi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}
