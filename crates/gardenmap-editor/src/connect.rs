//! Auto-connect: derive the adjacency graph from piece geometry.
//!
//! Each unordered pair is checked for right-to-left and bottom-to-top
//! adjacency in both directions; the smallest gap wins.

use crate::store::PieceStore;
use gardenmap_core::Edge;

/// Pairwise adjacency scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoConnect {
    threshold: f64,
}

impl AutoConnect {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Links every edge-adjacent pair in `store`.
    ///
    /// Existing identical links are left alone and existing connections are
    /// never removed. Returns the number of links written.
    pub fn run(&self, store: &mut PieceStore) -> usize {
        let links = self.find_links(store);
        let mut written = 0;
        for (a, a_edge, b, b_edge) in links {
            if store.link(a, a_edge, b, b_edge) {
                written += 1;
            }
        }
        if written > 0 {
            tracing::info!("Auto-connect recorded {} new links", written);
        }
        written
    }

    fn find_links(
        &self,
        store: &PieceStore,
    ) -> Vec<(crate::PieceId, Edge, crate::PieceId, Edge)> {
        let t = self.threshold;
        let pieces = store.pieces();
        let mut links = Vec::new();

        for (i, a) in pieces.iter().enumerate() {
            let ab = a.bounds();
            for b in &pieces[i + 1..] {
                let bb = b.bounds();
                let candidates = [
                    (
                        (ab.right() - bb.x).abs(),
                        ab.overlaps_vertically(&bb, 0.0),
                        (a.id, Edge::Right, b.id, Edge::Left),
                    ),
                    (
                        (bb.right() - ab.x).abs(),
                        ab.overlaps_vertically(&bb, 0.0),
                        (b.id, Edge::Right, a.id, Edge::Left),
                    ),
                    (
                        (ab.bottom() - bb.y).abs(),
                        ab.overlaps_horizontally(&bb, 0.0),
                        (a.id, Edge::Bottom, b.id, Edge::Top),
                    ),
                    (
                        (bb.bottom() - ab.y).abs(),
                        ab.overlaps_horizontally(&bb, 0.0),
                        (b.id, Edge::Bottom, a.id, Edge::Top),
                    ),
                ];

                // One adjacency per pair: connections are keyed by target,
                // so a second link would overwrite the first.
                let closest = candidates
                    .into_iter()
                    .filter(|(gap, overlaps, _)| *overlaps && *gap < t)
                    .fold(None, |best: Option<(f64, _)>, (gap, _, link)| match best {
                        Some((best_gap, _)) if best_gap <= gap => best,
                        _ => Some((gap, link)),
                    });
                if let Some((_, link)) = closest {
                    links.push(link);
                }
            }
        }

        // Skip pairs whose mirrored records are already in place.
        links.retain(|(a, a_edge, b, b_edge)| {
            let forward = store
                .get(*a)
                .and_then(|p| p.connection_to(*b))
                .is_some_and(|c| c.from_edge == *a_edge && c.to_edge == *b_edge);
            let backward = store
                .get(*b)
                .and_then(|p| p.connection_to(*a))
                .is_some_and(|c| c.from_edge == *b_edge && c.to_edge == *a_edge);
            !(forward && backward)
        });
        links
    }
}

impl Default for AutoConnect {
    fn default() -> Self {
        Self::new(gardenmap_core::constants::CONNECT_THRESHOLD)
    }
}
