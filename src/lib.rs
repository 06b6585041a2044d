//! # Gardenmap
//!
//! Map-piece editor for the merge garden world map. Uploaded images become
//! pieces on an infinite canvas; dragged pieces snap against their
//! neighbours, edge adjacency is recorded automatically and new uploads get
//! placement suggestions ranked by how well their edge colours match.
//!
//! ## Architecture
//!
//! Gardenmap is organized as a workspace with multiple crates:
//!
//! 1. **gardenmap-core** - Geometry, edges, colours, constants and errors
//! 2. **gardenmap-settings** - Configuration file handling and validation
//! 3. **gardenmap-editor** - Piece store, viewport, snapping, auto-connect,
//!    staging, persistence and gesture handling
//! 4. **gardenmap** - Command-line front end over an editor session

pub use gardenmap_core::{Bounds, Edge, Error, Point, Result, Rgb, Size};
pub use gardenmap_editor as editor;
pub use gardenmap_settings as settings;

pub use gardenmap_editor::{
    AutoConnect, EditorSession, InteractionController, JsonFileStorage, LocalUploadService,
    MapDocument, MapPiece, MapStorage, PendingPiece, PieceId, PieceStore, SnapEngine,
    SnapSuggestion, UploadService, Viewport,
};
pub use gardenmap_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, keeping stdout for command output
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
