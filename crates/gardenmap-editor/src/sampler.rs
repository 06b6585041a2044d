//! Pixel edge sampling.
//!
//! Reads evenly spaced colours along the four borders of an image so that
//! uploads can be compared edge against edge. The sampler works over the
//! [`PixelSource`] capability, so it runs against any decoded raster (or a
//! synthetic one in tests) without a rendering surface.

use crate::piece::EdgeSignatures;
use gardenmap_core::constants::SAMPLE_INSET;
use gardenmap_core::Rgb;
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

/// Read access to decoded pixel data.
pub trait PixelSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Colour at `(x, y)`; callers guarantee the coordinate is in bounds.
    fn pixel(&self, x: u32, y: u32) -> Rgb;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }
}

impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b] = self.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }
}

/// Samples `count` colours along each edge of `source`.
///
/// Returns empty sequences for a zero-sized image or a zero count.
pub fn sample_edges<S: PixelSource + ?Sized>(source: &S, count: usize) -> EdgeSignatures {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 || count == 0 {
        return EdgeSignatures::default();
    }

    // Inset rows/columns, clamped inside the image for tiny sources.
    let near_x = SAMPLE_INSET.min(width - 1);
    let near_y = SAMPLE_INSET.min(height - 1);
    let far_x = (width - 1).saturating_sub(SAMPLE_INSET);
    let far_y = (height - 1).saturating_sub(SAMPLE_INSET);

    let columns = steps(width, count);
    let rows = steps(height, count);

    EdgeSignatures {
        top: columns.iter().map(|&x| source.pixel(x, near_y)).collect(),
        right: rows.iter().map(|&y| source.pixel(far_x, y)).collect(),
        bottom: columns.iter().map(|&x| source.pixel(x, far_y)).collect(),
        left: rows.iter().map(|&y| source.pixel(near_x, y)).collect(),
    }
}

/// Evenly spaced coordinates `i * dimension / count`, clamped to the image.
fn steps(dimension: u32, count: usize) -> Vec<u32> {
    let step = f64::from(dimension) / count as f64;
    (0..count)
        .map(|i| ((i as f64 * step).floor() as u32).min(dimension - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// 40x20 image, blue except for a red right-hand band of 5 columns.
    fn banded() -> RgbaImage {
        RgbaImage::from_fn(40, 20, |x, _| {
            if x >= 35 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn test_sample_counts() {
        let sig = sample_edges(&banded(), 20);
        assert_eq!(sig.top.len(), 20);
        assert_eq!(sig.right.len(), 20);
        assert_eq!(sig.bottom.len(), 20);
        assert_eq!(sig.left.len(), 20);
    }

    #[test]
    fn test_right_and_left_edges() {
        let sig = sample_edges(&banded(), 10);
        assert!(sig.right.iter().all(|c| *c == RED));
        assert!(sig.left.iter().all(|c| *c == BLUE));
    }

    #[test]
    fn test_top_runs_left_to_right() {
        let sig = sample_edges(&banded(), 8);
        // columns 0, 5, ..., 35: only the last lands in the red band
        assert_eq!(sig.top[0], BLUE);
        assert_eq!(sig.top[7], RED);
        assert_eq!(sig.top, sig.bottom);
    }

    #[test]
    fn test_left_runs_top_to_bottom() {
        let img = RgbImage::from_fn(10, 10, |_, y| {
            if y < 5 {
                image::Rgb([0, 255, 0])
            } else {
                image::Rgb([0, 0, 0])
            }
        });
        let sig = sample_edges(&img, 2);
        assert_eq!(sig.left, vec![Rgb::new(0, 255, 0), Rgb::new(0, 0, 0)]);
    }

    #[test]
    fn test_inset_skips_border() {
        // One-pixel black frame around a white image
        let img = RgbaImage::from_fn(30, 30, |x, y| {
            if x == 0 || y == 0 || x == 29 || y == 29 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let sig = sample_edges(&img, 5);
        let white = Rgb::new(255, 255, 255);
        assert!(sig.right.iter().skip(1).all(|c| *c == white));
        assert!(sig.bottom.iter().skip(1).all(|c| *c == white));
    }

    #[test]
    fn test_degenerate_inputs_give_empty_signatures() {
        let empty = RgbaImage::new(0, 0);
        assert!(sample_edges(&empty, 20).is_empty());
        assert!(sample_edges(&banded(), 0).is_empty());
    }

    #[test]
    fn test_tiny_image_is_clamped() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 8, 7, 255]));
        let sig = sample_edges(&img, 4);
        assert_eq!(sig.top, vec![Rgb::new(9, 8, 7); 4]);
        assert_eq!(sig.right.len(), 4);
    }

    #[test]
    fn test_dynamic_image_source() {
        let img = DynamicImage::ImageRgba8(banded());
        let sig = sample_edges(&img, 4);
        assert!(sig.right.iter().all(|c| *c == RED));
    }
}
