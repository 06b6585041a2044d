//! Authoritative store of placed map pieces.
//!
//! `PieceStore` owns every placed [`MapPiece`], the single active selection,
//! the adjacency graph held in each piece's connection list and the editor
//! preference flags that are persisted alongside the pieces.
//!
//! # Stale references
//!
//! Every operation taking a piece id treats an unknown id as a no-op and
//! reports it through its return value. Queued pointer events may still name
//! a piece that was deleted a moment earlier; that must never be an error.

use crate::piece::{Connection, MapPiece, PieceId, PiecePatch};
use gardenmap_core::{Bounds, Edge, Point};

/// Owns the piece list, selection and editor preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceStore {
    pieces: Vec<MapPiece>,
    selected: Option<PieceId>,
    show_connections: bool,
    snap_enabled: bool,
}

impl Default for PieceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceStore {
    /// Creates an empty store with connections shown and snapping enabled.
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            selected: None,
            show_connections: true,
            snap_enabled: true,
        }
    }

    /// Creates a store from previously persisted parts.
    pub fn from_parts(pieces: Vec<MapPiece>, show_connections: bool, snap_enabled: bool) -> Self {
        let mut store = Self {
            pieces: Vec::with_capacity(pieces.len()),
            selected: None,
            show_connections,
            snap_enabled,
        };
        for piece in pieces {
            store.add(piece);
        }
        store
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// All pieces in insertion order.
    pub fn pieces(&self) -> &[MapPiece] {
        &self.pieces
    }

    /// Pieces in draw order: ascending z-index, ties in insertion order.
    pub fn draw_order(&self) -> Vec<&MapPiece> {
        let mut ordered: Vec<&MapPiece> = self.pieces.iter().collect();
        ordered.sort_by_key(|p| p.z_index);
        ordered
    }

    pub fn get(&self, id: PieceId) -> Option<&MapPiece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == id)
    }

    /// Adds a piece. A piece with the same id is replaced in place, keeping
    /// its position in insertion order.
    pub fn add(&mut self, piece: MapPiece) {
        match self.index_of(piece.id) {
            Some(index) => {
                tracing::warn!("Replacing piece {} with duplicate id", piece.id);
                self.pieces[index] = piece;
            }
            None => {
                tracing::debug!("Added piece {} '{}'", piece.id, piece.name);
                self.pieces.push(piece);
            }
        }
    }

    /// Applies a partial patch. Returns false when the id is unknown.
    pub fn update(&mut self, id: PieceId, patch: PiecePatch) -> bool {
        match self.pieces.iter_mut().find(|p| p.id == id) {
            Some(piece) => {
                patch.apply(piece);
                true
            }
            None => false,
        }
    }

    /// Removes a piece and prunes every connection that targeted it.
    pub fn remove(&mut self, id: PieceId) -> Option<MapPiece> {
        let index = self.index_of(id)?;
        let removed = self.pieces.remove(index);

        let mut pruned = 0;
        for piece in &mut self.pieces {
            if piece.remove_connection(id) {
                pruned += 1;
            }
        }
        if self.selected == Some(id) {
            self.selected = None;
        }

        tracing::debug!("Removed piece {} (pruned {} connections)", id, pruned);
        Some(removed)
    }

    /// Removes every piece.
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.selected = None;
    }

    /// Sets or clears the single active selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<PieceId>) {
        self.selected = id.filter(|id| self.contains(*id));
    }

    pub fn selected_id(&self) -> Option<PieceId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&MapPiece> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Tight axis-aligned bounds of all pieces; the zero box when empty.
    pub fn bounds(&self) -> Bounds {
        let mut iter = self.pieces.iter();
        match iter.next() {
            Some(first) => iter.fold(first.bounds(), |acc, p| acc.union(&p.bounds())),
            None => Bounds::empty(),
        }
    }

    /// Topmost piece under a world point.
    pub fn piece_at(&self, point: Point) -> Option<&MapPiece> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.bounds().contains(&point))
            .max_by_key(|(index, p)| (p.z_index, *index))
            .map(|(_, p)| p)
    }

    /// Records a single outgoing connection `from -> to`, replacing any prior
    /// record for the same ordered pair. The target keeps its own records.
    pub fn connect(&mut self, from: PieceId, to: PieceId, from_edge: Edge, to_edge: Edge) -> bool {
        if from == to || !self.contains(to) {
            return false;
        }
        match self.pieces.iter_mut().find(|p| p.id == from) {
            Some(piece) => piece.set_connection(Connection::new(to, from_edge, to_edge)),
            None => false,
        }
    }

    /// Removes the connection `from -> to` if present.
    pub fn disconnect(&mut self, from: PieceId, to: PieceId) -> bool {
        match self.pieces.iter_mut().find(|p| p.id == from) {
            Some(piece) => piece.remove_connection(to),
            None => false,
        }
    }

    /// Records a mirrored adjacency on both pieces in one operation.
    ///
    /// Returns true when either side changed.
    pub fn link(&mut self, a: PieceId, a_edge: Edge, b: PieceId, b_edge: Edge) -> bool {
        if a == b {
            return false;
        }
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };

        let forward = self.pieces[ia].set_connection(Connection::new(b, a_edge, b_edge));
        let backward = self.pieces[ib].set_connection(Connection::new(a, b_edge, a_edge));
        if forward || backward {
            tracing::debug!("Linked {}.{} <-> {}.{}", a, a_edge, b, b_edge);
        }
        forward || backward
    }

    /// Removes the adjacency between two pieces on both sides.
    pub fn unlink(&mut self, a: PieceId, b: PieceId) -> bool {
        let forward = self.disconnect(a, b);
        let backward = self.disconnect(b, a);
        forward || backward
    }

    /// Total number of directed connection records.
    pub fn connection_count(&self) -> usize {
        self.pieces.iter().map(|p| p.connections.len()).sum()
    }

    /// Highest z-index in use, or `None` when empty.
    pub fn max_z_index(&self) -> Option<i32> {
        self.pieces.iter().map(|p| p.z_index).max()
    }

    /// Moves a piece above every other piece.
    pub fn bring_to_front(&mut self, id: PieceId) -> bool {
        let top = self
            .pieces
            .iter()
            .filter(|p| p.id != id)
            .map(|p| p.z_index)
            .max();
        match top {
            Some(top) => self.update(
                id,
                PiecePatch {
                    z_index: Some(top.saturating_add(1)),
                    ..PiecePatch::default()
                },
            ),
            None => self.contains(id),
        }
    }

    /// Moves a piece below every other piece.
    pub fn send_to_back(&mut self, id: PieceId) -> bool {
        let bottom = self
            .pieces
            .iter()
            .filter(|p| p.id != id)
            .map(|p| p.z_index)
            .min();
        match bottom {
            Some(bottom) => self.update(
                id,
                PiecePatch {
                    z_index: Some(bottom.saturating_sub(1)),
                    ..PiecePatch::default()
                },
            ),
            None => self.contains(id),
        }
    }

    pub fn set_locked(&mut self, id: PieceId, locked: bool) -> bool {
        self.update(
            id,
            PiecePatch {
                locked: Some(locked),
                ..PiecePatch::default()
            },
        )
    }

    /// Flips the lock flag, returning the new state.
    pub fn toggle_lock(&mut self, id: PieceId) -> Option<bool> {
        let locked = !self.get(id)?.locked;
        self.set_locked(id, locked);
        Some(locked)
    }

    pub fn rename(&mut self, id: PieceId, name: impl Into<String>) -> bool {
        self.update(
            id,
            PiecePatch {
                name: Some(name.into()),
                ..PiecePatch::default()
            },
        )
    }

    pub fn show_connections(&self) -> bool {
        self.show_connections
    }

    pub fn set_show_connections(&mut self, show: bool) {
        self.show_connections = show;
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }
}
