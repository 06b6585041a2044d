//! Map piece data model.
//!
//! A [`MapPiece`] is one placed image tile on the world canvas. It only ever
//! holds a reference to its image; the bytes live with the upload service.

use gardenmap_core::{Bounds, Edge, Point, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a piece (or pending piece) across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(Uuid);

impl PieceId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PieceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PieceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One directed adjacency record held by the source piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// The neighbouring piece.
    pub target_id: PieceId,
    /// Edge of the piece holding this record.
    pub from_edge: Edge,
    /// Edge of the target that it touches.
    pub to_edge: Edge,
}

impl Connection {
    pub fn new(target_id: PieceId, from_edge: Edge, to_edge: Edge) -> Self {
        Self {
            target_id,
            from_edge,
            to_edge,
        }
    }
}

/// Sampled colours along the four edges of an image.
///
/// Top and bottom run left to right; left and right run top to bottom.
/// An empty sequence means no signature is available for that edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeSignatures {
    pub top: Vec<Rgb>,
    pub right: Vec<Rgb>,
    pub bottom: Vec<Rgb>,
    pub left: Vec<Rgb>,
}

impl EdgeSignatures {
    /// Samples for one edge.
    pub fn edge(&self, edge: Edge) -> &[Rgb] {
        match edge {
            Edge::Top => &self.top,
            Edge::Right => &self.right,
            Edge::Bottom => &self.bottom,
            Edge::Left => &self.left,
        }
    }

    /// True when no edge carries any sample.
    pub fn is_empty(&self) -> bool {
        Edge::ALL.iter().all(|e| self.edge(*e).is_empty())
    }
}

/// A placed image tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPiece {
    pub id: PieceId,
    pub name: String,
    /// Path or URL handed out by the upload service.
    pub image_path: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub original_width: f64,
    pub original_height: f64,
    /// `width / original_width`, stored for convenience.
    pub scale: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<EdgeSignatures>,
}

impl MapPiece {
    /// Creates an unscaled piece at `(x, y)`.
    pub fn new(
        id: PieceId,
        name: impl Into<String>,
        image_path: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image_path: image_path.into(),
            x,
            y,
            width,
            height,
            original_width: width,
            original_height: height,
            scale: 1.0,
            z_index: 0,
            locked: false,
            connections: Vec::new(),
            signatures: None,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_signatures(mut self, signatures: EdgeSignatures) -> Self {
        self.signatures = Some(signatures);
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Original width divided by original height; 1.0 for degenerate images.
    pub fn aspect_ratio(&self) -> f64 {
        if self.original_width > 0.0 && self.original_height > 0.0 {
            self.original_width / self.original_height
        } else {
            1.0
        }
    }

    /// The recorded connection towards `target`, if any.
    pub fn connection_to(&self, target: PieceId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.target_id == target)
    }

    /// Records a connection, replacing any prior one towards the same target.
    /// Returns false when an identical record already existed.
    pub(crate) fn set_connection(&mut self, connection: Connection) -> bool {
        match self
            .connections
            .iter_mut()
            .find(|c| c.target_id == connection.target_id)
        {
            Some(existing) if *existing == connection => false,
            Some(existing) => {
                *existing = connection;
                true
            }
            None => {
                self.connections.push(connection);
                true
            }
        }
    }

    /// Drops the connection towards `target`. Returns whether one existed.
    pub(crate) fn remove_connection(&mut self, target: PieceId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.target_id != target);
        self.connections.len() != before
    }
}

/// A partial update applied by [`crate::PieceStore::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecePatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub scale: Option<f64>,
    pub z_index: Option<i32>,
    pub locked: Option<bool>,
    pub signatures: Option<EdgeSignatures>,
}

impl PiecePatch {
    /// Patch moving a piece to a new top-left corner.
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Patch replacing a piece's geometry.
    pub fn geometry(bounds: Bounds, scale: f64) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, piece: &mut MapPiece) {
        if let Some(name) = self.name {
            piece.name = name;
        }
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            piece.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            piece.y = y;
        }
        if let Some(width) = self.width.filter(|v| v.is_finite() && *v > 0.0) {
            piece.width = width;
        }
        if let Some(height) = self.height.filter(|v| v.is_finite() && *v > 0.0) {
            piece.height = height;
        }
        if let Some(scale) = self.scale.filter(|v| v.is_finite() && *v > 0.0) {
            piece.scale = scale;
        }
        if let Some(z_index) = self.z_index {
            piece.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            piece.locked = locked;
        }
        if let Some(signatures) = self.signatures {
            piece.signatures = Some(signatures);
        }
    }
}
