//! Staged pieces and edge-matched placement suggestions.
//!
//! A pending piece has been uploaded and sampled but not yet committed to the
//! canvas. For each existing piece that carries edge signatures, the four
//! complementary edge pairs are scored and turned into candidate positions.

use crate::piece::{EdgeSignatures, MapPiece, PieceId};
use crate::scorer::score_edges;
use gardenmap_core::{Edge, Point};
use std::cmp::Ordering;

/// An uploaded image waiting to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPiece {
    pub id: PieceId,
    pub name: String,
    pub image_path: String,
    /// Natural image width.
    pub width: f64,
    /// Natural image height.
    pub height: f64,
    pub signatures: EdgeSignatures,
    /// PNG-encoded preview.
    pub thumbnail: Vec<u8>,
}

impl PendingPiece {
    /// Converts into a placed piece at `position`, stacked at `z_index`.
    ///
    /// Non-empty signatures are cached on the piece.
    pub fn into_piece(self, position: Point, z_index: i32) -> MapPiece {
        let piece = MapPiece::new(
            self.id,
            self.name,
            self.image_path,
            position.x,
            position.y,
            self.width,
            self.height,
        )
        .with_z_index(z_index);

        if self.signatures.is_empty() {
            piece
        } else {
            piece.with_signatures(self.signatures)
        }
    }
}

/// A candidate placement of a pending piece against an existing one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSuggestion {
    pub target_id: PieceId,
    /// Edge of the existing piece.
    pub target_edge: Edge,
    /// Edge of the pending piece that would touch it.
    pub source_edge: Edge,
    /// World position of the pending piece's top-left corner.
    pub position: Point,
    pub score: f64,
}

/// Ranks placements of `pending` against every piece with signatures.
///
/// Returns at most `limit` suggestions, best score first. Ties keep the
/// order pieces and edges were visited in.
pub fn suggest_placements(
    pending: &PendingPiece,
    pieces: &[MapPiece],
    limit: usize,
) -> Vec<SnapSuggestion> {
    let mut suggestions = Vec::new();

    for target in pieces {
        let Some(signatures) = &target.signatures else {
            continue;
        };
        for target_edge in Edge::ALL {
            let source_edge = target_edge.opposite();
            let target_samples = signatures.edge(target_edge);
            let source_samples = pending.signatures.edge(source_edge);
            if target_samples.is_empty() || source_samples.is_empty() {
                continue;
            }

            suggestions.push(SnapSuggestion {
                target_id: target.id,
                target_edge,
                source_edge,
                position: placement(target, target_edge, pending),
                score: score_edges(source_samples, target_samples),
            });
        }
    }

    suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    suggestions.truncate(limit);

    tracing::debug!(
        "Ranked {} suggestions for pending piece {}",
        suggestions.len(),
        pending.id
    );
    suggestions
}

/// Top-left corner that puts `pending` flush against `edge` of `target`.
fn placement(target: &MapPiece, edge: Edge, pending: &PendingPiece) -> Point {
    match edge {
        Edge::Right => Point::new(target.right(), target.y),
        Edge::Left => Point::new(target.x - pending.width, target.y),
        Edge::Bottom => Point::new(target.x, target.bottom()),
        Edge::Top => Point::new(target.x, target.y - pending.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardenmap_core::Rgb;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn uniform(top: Rgb, right: Rgb, bottom: Rgb, left: Rgb) -> EdgeSignatures {
        EdgeSignatures {
            top: vec![top; 20],
            right: vec![right; 20],
            bottom: vec![bottom; 20],
            left: vec![left; 20],
        }
    }

    fn pending(signatures: EdgeSignatures) -> PendingPiece {
        PendingPiece {
            id: PieceId::new(),
            name: "Orchard".to_string(),
            image_path: "/uploads/orchard.png".to_string(),
            width: 150.0,
            height: 80.0,
            signatures,
            thumbnail: Vec::new(),
        }
    }

    #[test]
    fn test_best_match_ranked_first() {
        let target = MapPiece::new(PieceId::new(), "Meadow", "/m.png", 10.0, 20.0, 200.0, 100.0)
            .with_signatures(uniform(BLUE, RED, BLUE, BLUE));
        let candidate = pending(uniform(RED, RED, RED, RED));

        let suggestions = suggest_placements(&candidate, &[target.clone()], 8);
        assert_eq!(suggestions.len(), 4);

        let best = suggestions[0];
        assert_eq!(best.target_id, target.id);
        assert_eq!(best.target_edge, Edge::Right);
        assert_eq!(best.source_edge, Edge::Left);
        assert_eq!(best.position, Point::new(210.0, 20.0));
        assert!((best.score - 100.0).abs() < 1e-9);
        assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_positions_for_each_edge() {
        let target = MapPiece::new(PieceId::new(), "Meadow", "/m.png", 0.0, 0.0, 200.0, 100.0)
            .with_signatures(uniform(RED, RED, RED, RED));
        let candidate = pending(uniform(RED, RED, RED, RED));

        let suggestions = suggest_placements(&candidate, &[target], 8);
        let at = |edge: Edge| {
            suggestions
                .iter()
                .find(|s| s.target_edge == edge)
                .map(|s| s.position)
        };
        assert_eq!(at(Edge::Right), Some(Point::new(200.0, 0.0)));
        assert_eq!(at(Edge::Left), Some(Point::new(-150.0, 0.0)));
        assert_eq!(at(Edge::Bottom), Some(Point::new(0.0, 100.0)));
        assert_eq!(at(Edge::Top), Some(Point::new(0.0, -80.0)));
    }

    #[test]
    fn test_pieces_without_signatures_skipped() {
        let bare = MapPiece::new(PieceId::new(), "Bare", "/b.png", 0.0, 0.0, 10.0, 10.0);
        let candidate = pending(uniform(RED, RED, RED, RED));
        assert!(suggest_placements(&candidate, &[bare], 8).is_empty());

        let target = MapPiece::new(PieceId::new(), "T", "/t.png", 0.0, 0.0, 10.0, 10.0)
            .with_signatures(uniform(RED, RED, RED, RED));
        let unsampled = pending(EdgeSignatures::default());
        assert!(suggest_placements(&unsampled, &[target], 8).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let pieces: Vec<MapPiece> = (0..3)
            .map(|i| {
                MapPiece::new(PieceId::new(), "T", "/t.png", i as f64 * 500.0, 0.0, 10.0, 10.0)
                    .with_signatures(uniform(RED, RED, RED, RED))
            })
            .collect();
        let candidate = pending(uniform(RED, RED, RED, RED));
        assert_eq!(suggest_placements(&candidate, &pieces, 8).len(), 8);
        assert_eq!(suggest_placements(&candidate, &pieces, 0).len(), 0);
    }

    #[test]
    fn test_into_piece_caches_signatures() {
        let candidate = pending(uniform(RED, RED, RED, RED));
        let id = candidate.id;
        let piece = candidate.into_piece(Point::new(5.0, 6.0), 3);
        assert_eq!(piece.id, id);
        assert_eq!(piece.bounds().width, 150.0);
        assert_eq!(piece.z_index, 3);
        assert_eq!(piece.scale, 1.0);
        assert!(piece.signatures.is_some());

        let bare = pending(EdgeSignatures::default()).into_piece(Point::new(0.0, 0.0), 0);
        assert!(bare.signatures.is_none());
    }
}
