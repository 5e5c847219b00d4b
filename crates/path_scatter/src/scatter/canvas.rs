//! Alpha-compositing canvases and the compositor that keeps several in sync.
use glam::{IVec2, UVec2};
use image::{imageops, RgbaImage};

use crate::scatter::transform::Transformed;

/// Anything that accepts layers composited at a pixel origin.
pub trait CompositeSink {
    fn composite(&mut self, layer: &RgbaImage, origin: IVec2);
}

/// An RGBA canvas that receives layers with source-over blending.
///
/// Layers may hang off any edge; the out-of-bounds part is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn transparent(size: UVec2) -> Self {
        Self {
            image: RgbaImage::new(size.x, size.y),
        }
    }

    /// A transparent canvas with `underlay` composited at the origin as its bottom layer.
    pub fn with_underlay(size: UVec2, underlay: &RgbaImage) -> Self {
        let mut canvas = Self::transparent(size);
        canvas.composite(underlay, IVec2::ZERO);
        canvas
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl CompositeSink for Canvas {
    #[inline]
    fn composite(&mut self, layer: &RgbaImage, origin: IVec2) {
        imageops::overlay(&mut self.image, layer, origin.x as i64, origin.y as i64);
    }
}

/// Fans every layer out to all registered sinks in registration order.
pub struct Compositor<S: CompositeSink> {
    sinks: Vec<S>,
    layers: usize,
}

impl<S: CompositeSink> Compositor<S> {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            layers: 0,
        }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks, layers: 0 }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    /// Composite one transformed image onto every sink.
    pub fn draw(&mut self, layer: &Transformed) {
        for sink in &mut self.sinks {
            sink.composite(&layer.image, layer.origin);
        }
        self.layers += 1;
    }

    /// Number of layers drawn so far.
    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn into_sinks(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: CompositeSink> Default for Compositor<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite `layers` in order onto a bare canvas and onto a canvas seeded with `guide`.
///
/// Returns `(canvas_only, canvas_with_guide)`.
pub fn composite<'a, I>(base_size: UVec2, guide: &RgbaImage, layers: I) -> (RgbaImage, RgbaImage)
where
    I: IntoIterator<Item = &'a Transformed>,
{
    let mut compositor = Compositor::with_sinks(vec![
        Canvas::transparent(base_size),
        Canvas::with_underlay(base_size, guide),
    ]);
    for layer in layers {
        compositor.draw(layer);
    }
    split_pair(compositor.into_sinks())
}

fn split_pair(sinks: Vec<Canvas>) -> (RgbaImage, RgbaImage) {
    let mut it = sinks.into_iter().map(Canvas::into_image);
    let bare = it.next().unwrap_or_default();
    let with_guide = it.next().unwrap_or_default();
    (bare, with_guide)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn solid(w: u32, h: u32, c: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(c))
    }

    fn layer(image: RgbaImage, x: i32, y: i32) -> Transformed {
        Transformed {
            image,
            origin: IVec2::new(x, y),
        }
    }

    #[test]
    fn later_layers_draw_on_top() {
        let guide = solid(10, 10, [255, 255, 255, 255]);
        let layers = [
            layer(solid(4, 4, [255, 0, 0, 255]), 2, 2),
            layer(solid(4, 4, [0, 0, 255, 255]), 4, 4),
        ];
        let (bare, with_guide) = composite(UVec2::new(10, 10), &guide, &layers);
        assert_eq!(bare.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(bare.get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(with_guide.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(bare.get_pixel(0, 0)[3], 0);
        assert_eq!(with_guide.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn layers_off_the_edge_are_clipped() {
        let guide = solid(6, 6, [0, 0, 0, 0]);
        let layers = [layer(solid(4, 4, [0, 255, 0, 255]), -2, 4)];
        let (bare, _) = composite(UVec2::new(6, 6), &guide, &layers);
        assert_eq!(bare.get_pixel(0, 5), &Rgba([0, 255, 0, 255]));
        assert_eq!(bare.get_pixel(2, 5)[3], 0);
        assert_eq!(bare.get_pixel(0, 3)[3], 0);
    }

    #[test]
    fn transparent_pixels_leave_the_canvas_alone() {
        let guide = solid(4, 4, [9, 9, 9, 255]);
        let layers = [layer(solid(4, 4, [255, 0, 0, 0]), 0, 0)];
        let (_, with_guide) = composite(UVec2::new(4, 4), &guide, &layers);
        assert_eq!(with_guide, guide);
    }

    #[test]
    fn compositor_counts_layers_and_keeps_sinks_in_sync() {
        let mut compositor: Compositor<Canvas> = Compositor::new();
        compositor.push(Canvas::transparent(UVec2::new(3, 3)));
        compositor.push(Canvas::transparent(UVec2::new(3, 3)));
        compositor.draw(&layer(solid(1, 1, [1, 2, 3, 255]), 1, 1));
        assert_eq!(compositor.layers(), 1);
        let sinks = compositor.into_sinks();
        assert_eq!(sinks[0], sinks[1]);
    }
}
