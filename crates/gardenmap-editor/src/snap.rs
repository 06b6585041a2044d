//! Edge snapping for dragged pieces.
//!
//! Given the piece being dragged and its proposed top-left corner, the engine
//! looks for the closest neighbour edge on each axis and pulls the piece flush
//! against it. The X and Y axes snap independently, so a piece can sit against
//! one neighbour horizontally and another vertically at the same time.

use crate::piece::{MapPiece, PieceId};
use gardenmap_core::{Bounds, Edge, Point};

/// What a drag snapped against, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// The neighbour the piece was pulled against.
    pub piece_id: PieceId,
    /// Edge of the dragged piece brought flush.
    pub edge: Edge,
    /// Edge of the neighbour it now touches.
    pub target_edge: Edge,
    /// Distance that was closed by the snap, in world units.
    pub distance: f64,
}

/// Corrected position and the closest snap, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub position: Point,
    pub target: Option<SnapTarget>,
}

impl SnapResult {
    fn unchanged(position: Point) -> Self {
        Self {
            position,
            target: None,
        }
    }
}

/// Best candidate found on one axis.
#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    value: f64,
    target: SnapTarget,
    neighbour: Bounds,
}

/// Pulls dragged pieces flush against nearby edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    threshold: f64,
}

impl SnapEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Snaps `dragged` at `proposed` against every other piece in `pieces`.
    ///
    /// Returns `proposed` unchanged when the dragged id is unknown or no
    /// edge lies strictly within the threshold.
    pub fn snap(&self, pieces: &[MapPiece], dragged: PieceId, proposed: Point) -> SnapResult {
        let Some(piece) = pieces.iter().find(|p| p.id == dragged) else {
            return SnapResult::unchanged(proposed);
        };
        if !proposed.is_finite() {
            return SnapResult::unchanged(proposed);
        }

        let moving = Bounds::new(proposed.x, proposed.y, piece.width, piece.height);
        let t = self.threshold;

        let mut best_x: Option<AxisSnap> = None;
        let mut best_y: Option<AxisSnap> = None;

        for other in pieces.iter().filter(|p| p.id != dragged) {
            let neighbour = other.bounds();

            if moving.overlaps_vertically(&neighbour, t) {
                // dragged right -> other left
                consider(
                    &mut best_x,
                    (moving.right() - neighbour.x).abs(),
                    t,
                    neighbour.x - moving.width,
                    other.id,
                    Edge::Right,
                    Edge::Left,
                    neighbour,
                );
                // dragged left -> other right
                consider(
                    &mut best_x,
                    (moving.x - neighbour.right()).abs(),
                    t,
                    neighbour.right(),
                    other.id,
                    Edge::Left,
                    Edge::Right,
                    neighbour,
                );
            }

            if moving.overlaps_horizontally(&neighbour, t) {
                // dragged bottom -> other top
                consider(
                    &mut best_y,
                    (moving.bottom() - neighbour.y).abs(),
                    t,
                    neighbour.y - moving.height,
                    other.id,
                    Edge::Bottom,
                    Edge::Top,
                    neighbour,
                );
                // dragged top -> other bottom
                consider(
                    &mut best_y,
                    (moving.y - neighbour.bottom()).abs(),
                    t,
                    neighbour.bottom(),
                    other.id,
                    Edge::Top,
                    Edge::Bottom,
                    neighbour,
                );
            }
        }

        let mut position = proposed;
        if let Some(snap) = best_x {
            position.x = snap.value;
        }
        if let Some(snap) = best_y {
            position.y = snap.value;
        }

        // A lone snap on one axis also flushes the other axis with the same
        // neighbour, so the piece does not sit offset along the shared edge.
        match (best_x, best_y) {
            (Some(snap), None) => {
                let n = snap.neighbour;
                if let Some(y) = flush(moving.y, moving.height, n.y, n.bottom(), t) {
                    position.y = y;
                }
            }
            (None, Some(snap)) => {
                let n = snap.neighbour;
                if let Some(x) = flush(moving.x, moving.width, n.x, n.right(), t) {
                    position.x = x;
                }
            }
            _ => {}
        }

        let target = match (best_x, best_y) {
            (Some(x), Some(y)) if y.target.distance < x.target.distance => Some(y.target),
            (Some(x), _) => Some(x.target),
            (None, Some(y)) => Some(y.target),
            (None, None) => None,
        };

        if let Some(target) = &target {
            tracing::debug!(
                "Snapped {} {} to {} {} ({:.1} units)",
                dragged,
                target.edge,
                target.piece_id,
                target.target_edge,
                target.distance
            );
        }

        SnapResult { position, target }
    }
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(gardenmap_core::constants::SNAP_THRESHOLD)
    }
}

#[allow(clippy::too_many_arguments)]
fn consider(
    best: &mut Option<AxisSnap>,
    distance: f64,
    threshold: f64,
    value: f64,
    piece_id: PieceId,
    edge: Edge,
    target_edge: Edge,
    neighbour: Bounds,
) {
    if distance >= threshold {
        return;
    }
    if best.is_some_and(|b| distance >= b.target.distance) {
        return;
    }
    *best = Some(AxisSnap {
        value,
        target: SnapTarget {
            piece_id,
            edge,
            target_edge,
            distance,
        },
        neighbour,
    });
}

/// Start-to-start alignment first, then end-to-end.
fn flush(start: f64, extent: f64, other_start: f64, other_end: f64, threshold: f64) -> Option<f64> {
    if (start - other_start).abs() < threshold {
        Some(other_start)
    } else if (start + extent - other_end).abs() < threshold {
        Some(other_end - extent)
    } else {
        None
    }
}
