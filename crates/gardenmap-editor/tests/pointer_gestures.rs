//! Drag, pan, wheel and keyboard handling through the interaction
//! controller.

use gardenmap_core::{Edge, Point};
use gardenmap_editor::{
    EdgeSignatures, EditorSession, Feedback, InteractionController, Key, MapPiece, MapStorage,
    MemoryStorage, Modifiers, PendingPiece, PieceId,
};
use gardenmap_settings::Config;

fn piece(x: f64, y: f64, w: f64, h: f64) -> MapPiece {
    MapPiece::new(PieceId::new(), "tile", "/uploads/tile.png", x, y, w, h)
}

fn empty_session() -> EditorSession {
    EditorSession::open(&Config::default(), Box::new(MemoryStorage::new()), 1200.0, 800.0)
        .unwrap()
}

#[test]
fn test_drag_snaps_and_connects_on_release() {
    let mut session = empty_session();
    let a = piece(0.0, 0.0, 200.0, 200.0);
    let b = piece(600.0, 0.0, 200.0, 200.0);
    let (ida, idb) = (a.id, b.id);
    session.store_mut().add(a);
    session.store_mut().add(b);
    let mut controller = InteractionController::new();

    // grab b 10px in from its corner, drop it 7px right of a
    controller.pointer_down(&mut session, Point::new(610.0, 10.0), Modifiers::NONE);
    assert!(controller.is_dragging());
    assert_eq!(session.store().selected_id(), Some(idb));

    let feedback = controller.pointer_move(&mut session, Point::new(217.0, 14.0), Modifiers::NONE);
    match feedback {
        Feedback::Snapped(target) => {
            assert_eq!(target.piece_id, ida);
            assert_eq!(target.edge, Edge::Left);
        }
        other => panic!("expected a snap, got {:?}", other),
    }
    assert_eq!(session.store().get(idb).unwrap().position(), Point::new(200.0, 0.0));

    // no connection until release
    assert_eq!(session.store().connection_count(), 0);
    controller.pointer_up(&mut session);
    assert_eq!(session.store().connection_count(), 2);

    let saved = session.storage().load("map-editor").unwrap().unwrap();
    assert_eq!(saved.pieces.len(), 2);
}

#[test]
fn test_escape_mid_drag_still_connects() {
    let mut session = empty_session();
    let a = piece(0.0, 0.0, 200.0, 200.0);
    let b = piece(600.0, 0.0, 200.0, 200.0);
    let (ida, idb) = (a.id, b.id);
    session.store_mut().add(a);
    session.store_mut().add(b);
    let mut controller = InteractionController::new();

    controller.pointer_down(&mut session, Point::new(610.0, 10.0), Modifiers::NONE);
    controller.pointer_move(&mut session, Point::new(217.0, 14.0), Modifiers::NONE);
    assert_eq!(session.store().get(idb).unwrap().position(), Point::new(200.0, 0.0));

    controller.key_down(&mut session, Key::Escape, Modifiers::NONE);
    assert!(controller.is_idle());
    assert!(session.store().get(ida).unwrap().connection_to(idb).is_some());
    assert!(session.store().get(idb).unwrap().connection_to(ida).is_some());

    let saved = session.storage().load("map-editor").unwrap().unwrap();
    let moved = saved.pieces.iter().find(|p| p.id == idb).unwrap();
    assert_eq!(moved.position(), Point::new(200.0, 0.0));
}

#[test]
fn test_new_press_ends_previous_drag() {
    let mut session = empty_session();
    let a = piece(0.0, 0.0, 200.0, 200.0);
    let b = piece(600.0, 0.0, 200.0, 200.0);
    session.store_mut().add(a);
    session.store_mut().add(b);
    let mut controller = InteractionController::new();

    controller.pointer_down(&mut session, Point::new(610.0, 10.0), Modifiers::NONE);
    controller.pointer_move(&mut session, Point::new(217.0, 14.0), Modifiers::NONE);
    // release was lost; the next press lands on the background
    controller.pointer_down(&mut session, Point::new(900.0, 700.0), Modifiers::NONE);

    assert!(controller.is_panning());
    assert_eq!(session.store().connection_count(), 2);
}

#[test]
fn test_drag_without_snapping() {
    let mut session = empty_session();
    let a = piece(0.0, 0.0, 200.0, 200.0);
    let b = piece(600.0, 0.0, 200.0, 200.0);
    let idb = b.id;
    session.store_mut().add(a);
    session.store_mut().add(b);
    session.store_mut().set_snap_enabled(false);
    let mut controller = InteractionController::new();

    controller.pointer_down(&mut session, Point::new(610.0, 10.0), Modifiers::NONE);
    let feedback = controller.pointer_move(&mut session, Point::new(217.0, 14.0), Modifiers::NONE);
    assert_eq!(feedback, Feedback::None);
    assert_eq!(session.store().get(idb).unwrap().position(), Point::new(207.0, 4.0));
}

#[test]
fn test_locked_piece_selects_but_does_not_move() {
    let mut session = empty_session();
    let mut p = piece(0.0, 0.0, 200.0, 200.0);
    p.locked = true;
    let id = p.id;
    session.store_mut().add(p);
    let mut controller = InteractionController::new();

    controller.pointer_down(&mut session, Point::new(50.0, 50.0), Modifiers::NONE);
    assert_eq!(session.store().selected_id(), Some(id));
    assert!(controller.is_idle());
    controller.pointer_move(&mut session, Point::new(300.0, 300.0), Modifiers::NONE);
    assert_eq!(session.store().get(id).unwrap().position(), Point::new(0.0, 0.0));

    // delete is refused as well
    assert_eq!(
        controller.key_down(&mut session, Key::Delete, Modifiers::NONE),
        Feedback::None
    );
    assert!(session.store().contains(id));
}

#[test]
fn test_background_drag_pans_and_clears_selection() {
    let mut session = empty_session();
    let p = piece(0.0, 0.0, 100.0, 100.0);
    let id = p.id;
    session.store_mut().add(p);
    session.store_mut().select(Some(id));
    let mut controller = InteractionController::new();

    controller.pointer_down(&mut session, Point::new(500.0, 500.0), Modifiers::NONE);
    assert!(controller.is_panning());
    assert_eq!(session.store().selected_id(), None);

    controller.pointer_move(&mut session, Point::new(530.0, 480.0), Modifiers::NONE);
    controller.pointer_move(&mut session, Point::new(540.0, 470.0), Modifiers::NONE);
    assert_eq!(session.viewport().pan(), Point::new(40.0, -30.0));
    controller.pointer_up(&mut session);
    assert!(controller.is_idle());
}

#[test]
fn test_wheel_zooms_toward_cursor() {
    let mut session = empty_session();
    let mut controller = InteractionController::new();
    let cursor = Point::new(300.0, 200.0);
    let anchor = session.viewport().screen_to_world(cursor);

    controller.wheel(&mut session, cursor, -1.0);
    assert!((session.viewport().zoom() - 1.1).abs() < 1e-9);
    let after = session.viewport().world_to_screen(anchor);
    assert!((after.x - cursor.x).abs() < 1e-9 && (after.y - cursor.y).abs() < 1e-9);

    controller.wheel(&mut session, cursor, 1.0);
    assert!((session.viewport().zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn test_delete_removes_selected_and_prunes() {
    let mut session = empty_session();
    let a = piece(0.0, 0.0, 100.0, 100.0);
    let b = piece(100.0, 0.0, 100.0, 100.0);
    let (ida, idb) = (a.id, b.id);
    session.store_mut().add(a);
    session.store_mut().add(b);
    session.auto_connect();
    session.store_mut().select(Some(idb));
    let mut controller = InteractionController::new();

    let feedback = controller.key_down(&mut session, Key::Delete, Modifiers::NONE);
    assert_eq!(feedback, Feedback::Deleted(idb));
    assert!(!session.store().contains(idb));
    assert!(session.store().get(ida).unwrap().connections.is_empty());

    // nothing selected any more
    assert_eq!(
        controller.key_down(&mut session, Key::Delete, Modifiers::NONE),
        Feedback::None
    );
}

#[test]
fn test_escape_clears_selection_pending_and_gesture() {
    let mut session = empty_session();
    let p = piece(0.0, 0.0, 100.0, 100.0);
    session.store_mut().add(p);
    session.add_pending(PendingPiece {
        id: PieceId::new(),
        name: "Orchard".to_string(),
        image_path: "/uploads/orchard.png".to_string(),
        width: 100.0,
        height: 100.0,
        signatures: EdgeSignatures::default(),
        thumbnail: Vec::new(),
    });
    let mut controller = InteractionController::new();
    controller.pointer_down(&mut session, Point::new(50.0, 50.0), Modifiers::NONE);
    assert!(controller.is_dragging());

    controller.key_down(&mut session, Key::Escape, Modifiers::NONE);
    assert!(controller.is_idle());
    assert_eq!(session.store().selected_id(), None);
    assert!(session.pending().is_empty());
}

#[test]
fn test_ctrl_f_fits_all_pieces() {
    let mut session = empty_session();
    session.store_mut().add(piece(0.0, 0.0, 5000.0, 1000.0));
    let mut controller = InteractionController::new();

    assert_eq!(
        controller.key_down(&mut session, Key::Char('f'), Modifiers::NONE),
        Feedback::None
    );
    assert_eq!(session.viewport().zoom(), 1.0);

    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    assert_eq!(
        controller.key_down(&mut session, Key::Char('F'), cmd),
        Feedback::Fitted
    );
    // (1200 - 100) / 5000
    assert!((session.viewport().zoom() - 0.22).abs() < 1e-9);
}

#[test]
fn test_place_pending_at_center_reports_placement() {
    let mut session = empty_session();
    let pending = PendingPiece {
        id: PieceId::new(),
        name: "Orchard".to_string(),
        image_path: "/uploads/orchard.png".to_string(),
        width: 200.0,
        height: 200.0,
        signatures: EdgeSignatures::default(),
        thumbnail: Vec::new(),
    };
    let id = pending.id;
    session.add_pending(pending);
    let mut controller = InteractionController::new();

    assert_eq!(
        controller.place_pending_at_center(&mut session, id),
        Feedback::Placed(id)
    );
    assert_eq!(session.store().get(id).unwrap().position(), Point::new(500.0, 300.0));
    assert_eq!(
        controller.place_pending_at_center(&mut session, id),
        Feedback::None
    );
}
