use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gardenmap_core::{Point, Rgb};
use gardenmap_editor::{
    suggest_placements, AutoConnect, EdgeSignatures, MapPiece, PendingPiece, PieceId, PieceStore,
    SnapEngine,
};

fn signatures(seed: u8) -> EdgeSignatures {
    let edge = |offset: u8| {
        (0..20u8)
            .map(|i| Rgb::new(seed.wrapping_add(i), offset, seed.wrapping_mul(3)))
            .collect::<Vec<_>>()
    };
    EdgeSignatures {
        top: edge(10),
        right: edge(80),
        bottom: edge(150),
        left: edge(220),
    }
}

/// 20x20 grid of touching 100x100 tiles.
fn grid_store() -> PieceStore {
    let mut store = PieceStore::new();
    for row in 0..20 {
        for col in 0..20 {
            let piece = MapPiece::new(
                PieceId::new(),
                "tile",
                "/uploads/tile.png",
                col as f64 * 100.0,
                row as f64 * 100.0,
                100.0,
                100.0,
            )
            .with_signatures(signatures((row * 20 + col) as u8));
            store.add(piece);
        }
    }
    store
}

fn bench_auto_connect(c: &mut Criterion) {
    let store = grid_store();
    let engine = AutoConnect::new(10.0);

    c.bench_function("auto_connect_400_pieces", |b| {
        b.iter(|| {
            let mut store = store.clone();
            black_box(engine.run(&mut store))
        })
    });
}

fn bench_suggestions(c: &mut Criterion) {
    let store = grid_store();
    let pending = PendingPiece {
        id: PieceId::new(),
        name: "candidate".to_string(),
        image_path: "/uploads/candidate.png".to_string(),
        width: 100.0,
        height: 100.0,
        signatures: signatures(42),
        thumbnail: Vec::new(),
    };

    c.bench_function("suggest_placements_400_pieces", |b| {
        b.iter(|| black_box(suggest_placements(&pending, store.pieces(), 8)))
    });
}

fn bench_snap(c: &mut Criterion) {
    let store = grid_store();
    let dragged = store.pieces()[0].id;
    let engine = SnapEngine::new(20.0);

    c.bench_function("snap_drag_400_pieces", |b| {
        b.iter(|| black_box(engine.snap(store.pieces(), dragged, Point::new(2004.0, 507.0))))
    });
}

criterion_group!(benches, bench_auto_connect, bench_suggestions, bench_snap);
criterion_main!(benches);
