//! Viewport and coordinate transformation for the infinite map canvas.
//!
//! Handles conversion between screen coordinates (pixels) and world
//! coordinates (map units). Both spaces share a top-left origin with +Y
//! down, so the transform is a uniform scale followed by a translation.

use std::fmt;

use gardenmap_core::constants::{
    BUILDER_MAX_ZOOM, BUILDER_MIN_ZOOM, VIEWER_MAX_ZOOM, VIEWER_MIN_ZOOM,
};
use gardenmap_core::{Bounds, Point};
use gardenmap_settings::ZoomRange;

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    width: f64,
    height: f64,
    limits: ZoomRange,
}

impl Viewport {
    /// Creates a viewport of the given screen size with explicit zoom limits.
    pub fn new(width: f64, height: f64, limits: ZoomRange) -> Self {
        let min = if limits.min.is_finite() && limits.min > 0.0 {
            limits.min
        } else {
            BUILDER_MIN_ZOOM
        };
        let max = if limits.max.is_finite() && limits.max >= min {
            limits.max
        } else {
            min.max(BUILDER_MAX_ZOOM)
        };
        Self {
            zoom: 1.0f64.clamp(min, max),
            pan_x: 0.0,
            pan_y: 0.0,
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            limits: ZoomRange::new(min, max),
        }
    }

    /// Viewport for the editable map builder.
    pub fn builder(width: f64, height: f64) -> Self {
        Self::new(width, height, ZoomRange::new(BUILDER_MIN_ZOOM, BUILDER_MAX_ZOOM))
    }

    /// Viewport for the read-only map viewer.
    pub fn viewer(width: f64, height: f64) -> Self {
        Self::new(width, height, ZoomRange::new(VIEWER_MIN_ZOOM, VIEWER_MAX_ZOOM))
    }

    /// Gets the zoom limits.
    pub fn limits(&self) -> ZoomRange {
        self.limits
    }

    /// Gets the screen width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Gets the screen height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sets the screen dimensions (typically called when the window resizes).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the limits. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.clamp_zoom(zoom);
        }
    }

    /// Gets the pan offset in screen pixels.
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Sets the pan offset. Non-finite values are ignored.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.pan_x = x;
            self.pan_y = y;
        }
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_pan(self.pan_x + dx, self.pan_y + dy);
    }

    /// Converts screen coordinates to world coordinates.
    ///
    /// ```text
    /// world = (screen - pan) / zoom
    /// ```
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Converts world coordinates to screen coordinates.
    ///
    /// ```text
    /// screen = world * zoom + pan
    /// ```
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan_x,
            world.y * self.zoom + self.pan_y,
        )
    }

    /// World point currently at the centre of the screen.
    pub fn world_center(&self) -> Point {
        self.screen_to_world(Point::new(self.width / 2.0, self.height / 2.0))
    }

    /// Multiplies the zoom by `factor`, keeping the world point under
    /// `screen` fixed on screen ("zoom toward cursor").
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0 && screen.is_finite()) {
            return;
        }

        let anchor = self.screen_to_world(screen);
        let new_zoom = self.clamp_zoom(self.zoom * factor);

        // screen = anchor * zoom + pan  =>  pan = screen - anchor * zoom
        self.zoom = new_zoom;
        self.set_pan(screen.x - anchor.x * new_zoom, screen.y - anchor.y * new_zoom);
    }

    /// Zooms in by `step` around the screen centre.
    pub fn zoom_in(&mut self, step: f64) {
        self.zoom_at(Point::new(self.width / 2.0, self.height / 2.0), step);
    }

    /// Zooms out by `step` around the screen centre.
    pub fn zoom_out(&mut self, step: f64) {
        if step > 0.0 {
            self.zoom_at(Point::new(self.width / 2.0, self.height / 2.0), 1.0 / step);
        }
    }

    /// Fits `bounds` into the screen with `padding` pixels on every side.
    ///
    /// The zoom never exceeds 1.0 (content is not magnified past native
    /// scale) and is clamped to the limits; the bounds end up centred.
    /// Zero-area bounds centre on their midpoint at zoom 1.0.
    pub fn zoom_to_fit(&mut self, bounds: &Bounds, padding: f64) {
        if !(bounds.x.is_finite()
            && bounds.y.is_finite()
            && bounds.width.is_finite()
            && bounds.height.is_finite())
        {
            return;
        }

        if bounds.is_empty() {
            self.zoom = self.clamp_zoom(1.0);
            self.center_on(bounds.center());
            return;
        }

        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let available_w = (self.width - padding * 2.0).max(1.0);
        let available_h = (self.height - padding * 2.0).max(1.0);

        let fit = (available_w / bounds.width)
            .min(available_h / bounds.height)
            .min(1.0);
        self.zoom = self.clamp_zoom(fit);

        // Center the content
        let content_w = bounds.width * self.zoom;
        let content_h = bounds.height * self.zoom;
        self.set_pan(
            (self.width - content_w) / 2.0 - bounds.x * self.zoom,
            (self.height - content_h) / 2.0 - bounds.y * self.zoom,
        );
    }

    /// Centres the screen on a world coordinate.
    pub fn center_on(&mut self, world: Point) {
        if world.is_finite() {
            self.set_pan(
                self.width / 2.0 - world.x * self.zoom,
                self.height / 2.0 - world.y * self.zoom,
            );
        }
    }

    /// Resets to 1:1 zoom with the world origin at the top-left corner.
    pub fn reset(&mut self) {
        self.zoom = self.clamp_zoom(1.0);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.limits.min, self.limits.max)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::builder(1200.0, 800.0)
    }
}
