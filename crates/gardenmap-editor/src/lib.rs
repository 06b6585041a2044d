//! # Gardenmap Editor
//!
//! The map-piece editor engine. Pieces are image tiles laid out on an
//! infinite canvas; this crate keeps them in a [`PieceStore`], snaps dragged
//! pieces against their neighbours, records edge adjacency with
//! [`AutoConnect`] and ranks placements for newly uploaded images by
//! comparing sampled edge colours.
//!
//! ## Layout
//!
//! - [`sampler`] and [`scorer`]: edge colour signatures and their similarity
//! - [`viewport`]: screen/world transform with pan and zoom
//! - [`store`], [`snap`], [`connect`]: placed pieces and their geometry rules
//! - [`pending`], [`upload`], [`staging`]: getting new images onto the map
//! - [`storage`], [`session`]: persistence and the session that owns it all
//! - [`interaction`]: pointer, wheel and keyboard gestures

pub mod connect;
pub mod interaction;
pub mod pending;
pub mod piece;
pub mod sampler;
pub mod scorer;
pub mod session;
pub mod snap;
pub mod staging;
pub mod storage;
pub mod store;
pub mod upload;
pub mod viewport;

pub use connect::AutoConnect;
pub use interaction::{
    resize_bounds, Feedback, InteractionController, Key, Modifiers, ResizeHandle,
};
pub use pending::{suggest_placements, PendingPiece, SnapSuggestion};
pub use piece::{Connection, EdgeSignatures, MapPiece, PieceId, PiecePatch};
pub use sampler::{sample_edges, PixelSource};
pub use scorer::score_edges;
pub use session::EditorSession;
pub use snap::{SnapEngine, SnapResult, SnapTarget};
pub use staging::stage_upload;
pub use storage::{JsonFileStorage, MapDocument, MapStorage, MemoryStorage, DOCUMENT_VERSION};
pub use store::PieceStore;
pub use upload::{LocalUploadService, UploadResponse, UploadService};
pub use viewport::Viewport;
