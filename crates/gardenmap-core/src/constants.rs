//! Editor-wide default values.
//!
//! These are the values the settings crate falls back to when no
//! configuration file overrides them.

/// Samples taken along each edge of an image.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Pixels between the image border and the sampled row/column.
pub const SAMPLE_INSET: u32 = 2;

/// World units within which a dragged piece snaps to a neighbour.
pub const SNAP_THRESHOLD: f64 = 20.0;

/// World units within which two edges count as adjacent for auto-connect.
pub const CONNECT_THRESHOLD: f64 = 10.0;

/// Smallest width or height a resize may produce, in world units.
pub const MIN_PIECE_SIZE: f64 = 100.0;

/// Maximum number of placement suggestions offered for a pending piece.
pub const MAX_SUGGESTIONS: usize = 8;

/// Longest side of a pending piece thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 64;

/// Size used for an uploaded image whose dimensions cannot be read.
pub const FALLBACK_PIECE_SIZE: f64 = 200.0;

/// Screen padding kept around content on zoom-to-fit, in pixels.
pub const FIT_PADDING: f64 = 50.0;

/// Multiplicative zoom step for wheel and zoom in/out commands.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom limits for the editable map builder.
pub const BUILDER_MIN_ZOOM: f64 = 0.02;
pub const BUILDER_MAX_ZOOM: f64 = 5.0;

/// Zoom limits for the read-only map viewer.
pub const VIEWER_MIN_ZOOM: f64 = 0.1;
pub const VIEWER_MAX_ZOOM: f64 = 3.0;

/// Screen-space radius of a resize handle hit area.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Namespace under which the map layout is persisted.
pub const DEFAULT_NAMESPACE: &str = "map-editor";

/// Path prefix returned for uploaded images.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/uploads";
