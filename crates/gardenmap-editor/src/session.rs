//! Editor session.
//!
//! The session is the single owner of editor state: the piece store, the
//! viewport, the pending set and the persistence collaborator. It is
//! rehydrated from storage when opened and framed with zoom-to-fit.

use crate::connect::AutoConnect;
use crate::pending::{suggest_placements, PendingPiece, SnapSuggestion};
use crate::piece::{MapPiece, PieceId};
use crate::snap::SnapEngine;
use crate::storage::{MapDocument, MapStorage};
use crate::store::PieceStore;
use crate::viewport::Viewport;
use gardenmap_core::{Point, Result};
use gardenmap_settings::{Config, EditorSettings};

/// Owns everything one editor instance works on.
pub struct EditorSession {
    store: PieceStore,
    viewport: Viewport,
    pending: Vec<PendingPiece>,
    settings: EditorSettings,
    storage: Box<dyn MapStorage>,
    namespace: String,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("namespace", &self.namespace)
            .field("pieces", &self.store.len())
            .field("pending", &self.pending.len())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl EditorSession {
    /// Opens the session, loading the layout saved under the configured
    /// namespace and fitting it into a `width` x `height` screen.
    ///
    /// A corrupted document is returned as an error rather than replaced.
    pub fn open(
        config: &Config,
        storage: Box<dyn MapStorage>,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        let namespace = config.storage.namespace.clone();
        let document = storage.load(&namespace)?.unwrap_or_default();
        tracing::info!(
            "Opened map '{}' with {} pieces (format {})",
            namespace,
            document.pieces.len(),
            document.version
        );

        let store = PieceStore::from_parts(
            document.pieces,
            document.show_connections,
            document.snap_enabled,
        );
        let mut session = Self {
            store,
            viewport: Viewport::new(width, height, config.viewport.builder),
            pending: Vec::new(),
            settings: config.editor.clone(),
            storage,
            namespace,
        };
        session.zoom_to_fit();
        Ok(session)
    }

    pub fn store(&self) -> &PieceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PieceStore {
        &mut self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> &dyn MapStorage {
        self.storage.as_ref()
    }

    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine::new(self.settings.snap_threshold)
    }

    pub fn auto_connect_engine(&self) -> AutoConnect {
        AutoConnect::new(self.settings.connect_threshold)
    }

    /// Runs auto-connect over the whole store.
    pub fn auto_connect(&mut self) -> usize {
        self.auto_connect_engine().run(&mut self.store)
    }

    /// Frames every piece on screen.
    pub fn zoom_to_fit(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let bounds = self.store.bounds();
        self.viewport.zoom_to_fit(&bounds, self.settings.fit_padding);
        tracing::debug!("Zoomed to fit {}: {}", bounds, self.viewport);
    }

    /// Snapshot of the persisted state.
    pub fn document(&self) -> MapDocument {
        MapDocument::new(
            self.store.pieces().to_vec(),
            self.store.show_connections(),
            self.store.snap_enabled(),
        )
    }

    /// Writes the layout to storage.
    pub fn save(&mut self) -> Result<()> {
        let mut document = self.document();
        document.touch();
        self.storage.save(&self.namespace, &document)
    }

    /// Saves, logging instead of failing. Used after interactive edits.
    pub fn persist(&mut self) {
        if let Err(err) = self.save() {
            tracing::warn!("Failed to persist map '{}': {}", self.namespace, err);
        }
    }

    /// Removes a piece and its incoming connections, then persists.
    pub fn remove_piece(&mut self, id: PieceId) -> Option<MapPiece> {
        let removed = self.store.remove(id)?;
        tracing::info!("Deleted piece {} '{}'", removed.id, removed.name);
        self.persist();
        Some(removed)
    }

    pub fn pending(&self) -> &[PendingPiece] {
        &self.pending
    }

    pub fn pending_piece(&self, id: PieceId) -> Option<&PendingPiece> {
        self.pending.iter().find(|p| p.id == id)
    }

    /// Exposes a staged piece to the editor.
    pub fn add_pending(&mut self, piece: PendingPiece) {
        tracing::debug!("Pending piece {} '{}' added", piece.id, piece.name);
        self.pending.retain(|p| p.id != piece.id);
        self.pending.push(piece);
    }

    /// Drops a pending piece without placing it.
    pub fn discard_pending(&mut self, id: PieceId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Drops every pending piece.
    pub fn clear_pending(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!("Discarding {} pending pieces", self.pending.len());
        }
        self.pending.clear();
    }

    /// Ranked placements for a pending piece; empty for unknown ids.
    pub fn suggestions_for(&self, id: PieceId) -> Vec<SnapSuggestion> {
        match self.pending_piece(id) {
            Some(pending) => {
                suggest_placements(pending, self.store.pieces(), self.settings.max_suggestions)
            }
            None => Vec::new(),
        }
    }

    /// Commits a pending piece at `position` on top of every other piece.
    ///
    /// The new piece is selected, auto-connect runs, the view is re-framed
    /// and the layout is persisted. Returns `None` for an unknown pending id.
    pub fn place_pending(&mut self, id: PieceId, position: Point) -> Option<PieceId> {
        if !position.is_finite() {
            return None;
        }
        let index = self.pending.iter().position(|p| p.id == id)?;
        let pending = self.pending.remove(index);

        let z_index = self.store.max_z_index().map_or(0, |z| z.saturating_add(1));
        let piece = pending.into_piece(position, z_index);
        let piece_id = piece.id;
        tracing::info!("Placed '{}' at {}", piece.name, position);

        self.store.add(piece);
        self.store.select(Some(piece_id));
        self.auto_connect();
        self.zoom_to_fit();
        self.persist();
        Some(piece_id)
    }

    /// Places a pending piece where `suggestion` puts it.
    pub fn accept_suggestion(&mut self, id: PieceId, suggestion: &SnapSuggestion) -> Option<PieceId> {
        self.place_pending(id, suggestion.position)
    }

    /// Places a pending piece centred in the current view.
    pub fn place_pending_at_center(&mut self, id: PieceId) -> Option<PieceId> {
        let pending = self.pending_piece(id)?;
        let center = self.viewport.world_center();
        let position = Point::new(center.x - pending.width / 2.0, center.y - pending.height / 2.0);
        self.place_pending(id, position)
    }

    /// Places a pending piece at its best suggestion, or to the right of the
    /// existing layout when nothing can be matched.
    pub fn place_pending_best(&mut self, id: PieceId) -> Option<PieceId> {
        if let Some(best) = self.suggestions_for(id).first().copied() {
            return self.accept_suggestion(id, &best);
        }
        let position = if self.store.is_empty() {
            Point::new(0.0, 0.0)
        } else {
            let bounds = self.store.bounds();
            Point::new(bounds.right(), bounds.y)
        };
        self.place_pending(id, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::EdgeSignatures;
    use crate::storage::MemoryStorage;
    use gardenmap_core::{Edge, Rgb};

    fn pending(width: f64, height: f64, signatures: EdgeSignatures) -> PendingPiece {
        PendingPiece {
            id: PieceId::new(),
            name: "Orchard".to_string(),
            image_path: "/uploads/orchard.png".to_string(),
            width,
            height,
            signatures,
            thumbnail: Vec::new(),
        }
    }

    fn session() -> EditorSession {
        EditorSession::open(&Config::default(), Box::new(MemoryStorage::new()), 1200.0, 800.0)
            .unwrap()
    }

    #[test]
    fn test_open_empty() {
        let session = session();
        assert!(session.store().is_empty());
        assert_eq!(session.viewport().zoom(), 1.0);
        assert_eq!(session.namespace(), "map-editor");
    }

    #[test]
    fn test_place_pending_stacks_on_top_and_selects() {
        let mut session = session();
        let first = pending(100.0, 100.0, EdgeSignatures::default());
        let second = pending(100.0, 100.0, EdgeSignatures::default());
        let (a, b) = (first.id, second.id);
        session.add_pending(first);
        session.add_pending(second);

        assert_eq!(session.place_pending(a, Point::new(0.0, 0.0)), Some(a));
        assert_eq!(session.place_pending(b, Point::new(100.0, 0.0)), Some(b));
        assert!(session.pending().is_empty());
        assert_eq!(session.store().get(b).unwrap().z_index, 1);
        assert_eq!(session.store().selected_id(), Some(b));
        // placed flush, so auto-connect linked them
        assert_eq!(session.store().connection_count(), 2);
        assert!(session.storage().load("map-editor").unwrap().is_some());

        assert_eq!(session.place_pending(a, Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_place_at_center() {
        let mut session = session();
        let piece = pending(200.0, 100.0, EdgeSignatures::default());
        let id = piece.id;
        session.add_pending(piece);

        session.place_pending_at_center(id).unwrap();
        let placed = session.store().get(id).unwrap();
        assert_eq!(placed.position(), Point::new(500.0, 350.0));
    }

    #[test]
    fn test_placement_reframes_view() {
        let mut session = session();
        let piece = pending(200.0, 200.0, EdgeSignatures::default());
        let id = piece.id;
        session.add_pending(piece);

        session.place_pending(id, Point::new(5000.0, 5000.0)).unwrap();
        let center = session.viewport().world_center();
        assert!((center.x - 5100.0).abs() < 1e-6);
        assert!((center.y - 5100.0).abs() < 1e-6);
        assert_eq!(session.viewport().zoom(), 1.0);
    }

    #[test]
    fn test_place_best_falls_back_right_of_bounds() {
        let mut session = session();
        let first = pending(100.0, 50.0, EdgeSignatures::default());
        let second = pending(100.0, 50.0, EdgeSignatures::default());
        let (a, b) = (first.id, second.id);
        session.add_pending(first);
        session.add_pending(second);

        session.place_pending_best(a).unwrap();
        session.place_pending_best(b).unwrap();
        assert_eq!(session.store().get(a).unwrap().position(), Point::new(0.0, 0.0));
        assert_eq!(session.store().get(b).unwrap().position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_discard_and_clear_pending() {
        let mut session = session();
        let piece = pending(10.0, 10.0, EdgeSignatures::default());
        let id = piece.id;
        session.add_pending(piece);
        assert!(session.discard_pending(id));
        assert!(!session.discard_pending(id));

        session.add_pending(pending(10.0, 10.0, EdgeSignatures::default()));
        session.clear_pending();
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_suggestions_use_limit() {
        let red = Rgb::new(255, 0, 0);
        let uniform = EdgeSignatures {
            top: vec![red; 5],
            right: vec![red; 5],
            bottom: vec![red; 5],
            left: vec![red; 5],
        };
        let mut session = session();
        for i in 0..3 {
            let piece = pending(100.0, 100.0, uniform.clone());
            let id = piece.id;
            session.add_pending(piece);
            session.place_pending(id, Point::new(i as f64 * 400.0, 0.0));
        }

        let candidate = pending(100.0, 100.0, uniform);
        let id = candidate.id;
        session.add_pending(candidate);
        let suggestions = session.suggestions_for(id);
        assert_eq!(suggestions.len(), 8);
        assert!(suggestions.iter().all(|s| s.score == 100.0));
        assert_eq!(suggestions[0].target_edge, Edge::Top);
        assert!(session.suggestions_for(PieceId::new()).is_empty());
    }
}
