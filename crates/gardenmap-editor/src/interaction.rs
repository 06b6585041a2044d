//! Pointer, wheel and keyboard handling for the map editor.
//!
//! One gesture is active at a time. Pointer coordinates come in as screen
//! pixels and are converted through the session viewport; every handler
//! returns a [`Feedback`] value the UI can turn into a notice.

use crate::piece::{PieceId, PiecePatch};
use crate::session::EditorSession;
use crate::snap::SnapTarget;
use gardenmap_core::constants::HANDLE_RADIUS;
use gardenmap_core::{Bounds, Point};

/// Resize handle positions around a selected piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// World position of this handle on `bounds`.
    pub fn position(self, bounds: &Bounds) -> Point {
        let cx = bounds.x + bounds.width / 2.0;
        let cy = bounds.y + bounds.height / 2.0;
        let x = if self.moves_west() {
            bounds.x
        } else if self.moves_east() {
            bounds.right()
        } else {
            cx
        };
        let y = if self.moves_north() {
            bounds.y
        } else if self.moves_south() {
            bounds.bottom()
        } else {
            cy
        };
        Point::new(x, y)
    }
}

/// Applies a handle drag of `delta` world units to `start`.
///
/// Sizes never drop below `min_size`. With `aspect` set, the result keeps
/// that width/height ratio: north and south handles drive the width from
/// the height, every other handle drives the height from the width. The
/// side opposite the handle stays fixed.
pub fn resize_bounds(
    start: &Bounds,
    handle: ResizeHandle,
    delta: Point,
    min_size: f64,
    aspect: Option<f64>,
) -> Bounds {
    let mut width = start.width;
    let mut height = start.height;
    if handle.moves_east() {
        width += delta.x;
    } else if handle.moves_west() {
        width -= delta.x;
    }
    if handle.moves_south() {
        height += delta.y;
    } else if handle.moves_north() {
        height -= delta.y;
    }

    width = width.max(min_size);
    height = height.max(min_size);

    if let Some(ratio) = aspect.filter(|r| r.is_finite() && *r > 0.0) {
        if matches!(handle, ResizeHandle::North | ResizeHandle::South) {
            width = height * ratio;
        } else {
            height = width / ratio;
        }
        // Scale both up together so the floor does not break the ratio.
        let grow = (min_size / width).max(min_size / height).max(1.0);
        width *= grow;
        height *= grow;
    }

    let x = if handle.moves_west() {
        start.right() - width
    } else {
        start.x
    };
    let y = if handle.moves_north() {
        start.bottom() - height
    } else {
        start.y
    };
    Bounds::new(x, y, width, height)
}

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

/// Outcome of an interaction, for UI notices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    None,
    Snapped(SnapTarget),
    Placed(PieceId),
    Deleted(PieceId),
    Fitted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging {
        piece_id: PieceId,
        /// Pointer position relative to the piece's top-left corner.
        offset: Point,
    },
    Resizing {
        piece_id: PieceId,
        handle: ResizeHandle,
        start_pointer: Point,
        start_bounds: Bounds,
    },
    Panning {
        last: Point,
    },
}

/// Gesture state machine driving an [`EditorSession`].
#[derive(Debug, Clone)]
pub struct InteractionController {
    gesture: Gesture,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resizing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Ends the current gesture as if the pointer were released.
    pub fn cancel(&mut self, session: &mut EditorSession) {
        self.end_gesture(session);
    }

    /// Returns to idle. A drag or resize has already moved the piece, so
    /// ending one re-runs auto-connect and persists however it ends.
    fn end_gesture(&mut self, session: &mut EditorSession) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        if let Gesture::Dragging { piece_id, .. } | Gesture::Resizing { piece_id, .. } = gesture {
            if session.store().contains(piece_id) {
                session.auto_connect();
                session.persist();
            }
        }
    }

    /// Handle of the selected, unlocked piece under `screen`, if any.
    pub fn handle_at(&self, session: &EditorSession, screen: Point) -> Option<ResizeHandle> {
        let piece = session.store().selected().filter(|p| !p.locked)?;
        let bounds = piece.bounds();
        let viewport = session.viewport();
        ResizeHandle::ALL.into_iter().find(|handle| {
            let at = viewport.world_to_screen(handle.position(&bounds));
            (screen.x - at.x).abs() <= HANDLE_RADIUS && (screen.y - at.y).abs() <= HANDLE_RADIUS
        })
    }

    pub fn pointer_down(
        &mut self,
        session: &mut EditorSession,
        screen: Point,
        _modifiers: Modifiers,
    ) -> Feedback {
        self.end_gesture(session);
        if !screen.is_finite() {
            return Feedback::None;
        }
        let world = session.viewport().screen_to_world(screen);

        if let Some(handle) = self.handle_at(session, screen) {
            if let Some(piece) = session.store().selected() {
                tracing::debug!("Resizing {} from {:?}", piece.id, handle);
                self.gesture = Gesture::Resizing {
                    piece_id: piece.id,
                    handle,
                    start_pointer: world,
                    start_bounds: piece.bounds(),
                };
            }
            return Feedback::None;
        }

        let hit = session
            .store()
            .piece_at(world)
            .map(|p| (p.id, p.locked, p.position()));
        match hit {
            Some((piece_id, locked, position)) => {
                session.store_mut().select(Some(piece_id));
                if !locked {
                    self.gesture = Gesture::Dragging {
                        piece_id,
                        offset: world.offset_from(&position),
                    };
                }
            }
            None => {
                session.store_mut().select(None);
                self.gesture = Gesture::Panning { last: screen };
            }
        }
        Feedback::None
    }

    pub fn pointer_move(
        &mut self,
        session: &mut EditorSession,
        screen: Point,
        modifiers: Modifiers,
    ) -> Feedback {
        if !screen.is_finite() {
            return Feedback::None;
        }

        match self.gesture {
            Gesture::Idle => Feedback::None,
            Gesture::Dragging { piece_id, offset } => {
                let world = session.viewport().screen_to_world(screen);
                let proposed = Point::new(world.x - offset.x, world.y - offset.y);
                let (position, target) = if session.store().snap_enabled() {
                    let result = session
                        .snap_engine()
                        .snap(session.store().pieces(), piece_id, proposed);
                    (result.position, result.target)
                } else {
                    (proposed, None)
                };

                if !session
                    .store_mut()
                    .update(piece_id, PiecePatch::position(position))
                {
                    self.gesture = Gesture::Idle;
                    return Feedback::None;
                }
                target.map_or(Feedback::None, Feedback::Snapped)
            }
            Gesture::Resizing {
                piece_id,
                handle,
                start_pointer,
                start_bounds,
            } => {
                let Some(piece) = session.store().get(piece_id) else {
                    self.gesture = Gesture::Idle;
                    return Feedback::None;
                };
                let world = session.viewport().screen_to_world(screen);
                let aspect = modifiers.shift.then(|| piece.aspect_ratio());
                let original_width = piece.original_width;

                let bounds = resize_bounds(
                    &start_bounds,
                    handle,
                    world.offset_from(&start_pointer),
                    session.settings().min_piece_size,
                    aspect,
                );
                let scale = if original_width > 0.0 {
                    bounds.width / original_width
                } else {
                    1.0
                };
                session
                    .store_mut()
                    .update(piece_id, PiecePatch::geometry(bounds, scale));
                Feedback::None
            }
            Gesture::Panning { last } => {
                session
                    .viewport_mut()
                    .pan_by(screen.x - last.x, screen.y - last.y);
                self.gesture = Gesture::Panning { last: screen };
                Feedback::None
            }
        }
    }

    /// Ends the gesture. Releasing a drag or resize re-runs auto-connect and
    /// persists the layout.
    pub fn pointer_up(&mut self, session: &mut EditorSession) -> Feedback {
        self.end_gesture(session);
        Feedback::None
    }

    /// Zooms toward the cursor: negative `delta_y` (wheel up) zooms in.
    pub fn wheel(&mut self, session: &mut EditorSession, screen: Point, delta_y: f64) -> Feedback {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return Feedback::None;
        }
        let step = session.settings().zoom_step;
        let factor = if delta_y < 0.0 { step } else { 1.0 / step };
        session.viewport_mut().zoom_at(screen, factor);
        Feedback::None
    }

    pub fn key_down(
        &mut self,
        session: &mut EditorSession,
        key: Key,
        modifiers: Modifiers,
    ) -> Feedback {
        match key {
            Key::Delete | Key::Backspace => {
                let Some(piece) = session.store().selected().filter(|p| !p.locked) else {
                    return Feedback::None;
                };
                let id = piece.id;
                self.end_gesture(session);
                match session.remove_piece(id) {
                    Some(_) => Feedback::Deleted(id),
                    None => Feedback::None,
                }
            }
            Key::Escape => {
                self.end_gesture(session);
                session.store_mut().select(None);
                session.clear_pending();
                Feedback::None
            }
            Key::Char(c) if modifiers.command() && c.eq_ignore_ascii_case(&'f') => {
                session.zoom_to_fit();
                Feedback::Fitted
            }
            Key::Char(_) => Feedback::None,
        }
    }

    /// Places a pending piece at a world position.
    pub fn place_pending(
        &mut self,
        session: &mut EditorSession,
        pending_id: PieceId,
        position: Point,
    ) -> Feedback {
        self.end_gesture(session);
        session
            .place_pending(pending_id, position)
            .map_or(Feedback::None, Feedback::Placed)
    }

    /// Places a pending piece at the best-ranked suggestion at `index`.
    pub fn accept_suggestion(
        &mut self,
        session: &mut EditorSession,
        pending_id: PieceId,
        index: usize,
    ) -> Feedback {
        let Some(suggestion) = session.suggestions_for(pending_id).get(index).copied() else {
            return Feedback::None;
        };
        self.end_gesture(session);
        session
            .accept_suggestion(pending_id, &suggestion)
            .map_or(Feedback::None, Feedback::Placed)
    }

    /// Places a pending piece centred in the current view.
    pub fn place_pending_at_center(
        &mut self,
        session: &mut EditorSession,
        pending_id: PieceId,
    ) -> Feedback {
        self.end_gesture(session);
        session
            .place_pending_at_center(pending_id)
            .map_or(Feedback::None, Feedback::Placed)
    }
}
