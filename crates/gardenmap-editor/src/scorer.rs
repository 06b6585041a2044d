//! Edge match scoring.
//!
//! Compares a candidate edge against the reversed target edge: sample `i` of
//! the candidate is paired with sample `count - 1 - i` of the target, which
//! matches mirrored adjacency in symmetric tilings.

use gardenmap_core::Rgb;

/// Largest possible distance between two RGB colours.
fn max_distance() -> f64 {
    (255.0f64 * 255.0 * 3.0).sqrt()
}

/// Similarity of two edge sequences in `[0, 100]`; 100 is pixel-identical.
///
/// Sequences of different length are compared over the shorter length.
/// Returns exactly 0 when either sequence is empty.
pub fn score_edges(candidate: &[Rgb], target: &[Rgb]) -> f64 {
    let count = candidate.len().min(target.len());
    if count == 0 {
        return 0.0;
    }

    let total: f64 = (0..count)
        .map(|i| candidate[i].distance(&target[count - 1 - i]))
        .sum();
    let average = total / count as f64;

    (100.0 * (1.0 - average / max_distance())).max(0.0)
}
