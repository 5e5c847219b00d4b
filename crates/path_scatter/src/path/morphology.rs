//! Binary morphology on guide images: thresholding, 3×3 erosion and
//! Zhang–Suen skeletonization.
//!
//! Masks are stored row-major as one byte per pixel (`0` background, `1`
//! foreground). Reads outside the mask return background.
use glam::IVec2;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;

/// A row-major binary raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryMask {
    /// Create an all-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Returns `true` if the pixel at `(x, y)` is foreground. Out of bounds is background.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return false;
        }
        self.data[(y as usize) * self.width + (x as usize)] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let idx = y * self.width + x;
        self.data[idx] = u8::from(value);
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|v| **v != 0).count()
    }

    /// Returns `true` if no pixel is foreground.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|v| *v == 0)
    }

    /// Render as a luma image (`255` foreground, `0` background) with `pad`
    /// background pixels on every side.
    pub fn to_gray(&self, pad: u32) -> GrayImage {
        let mut img = GrayImage::new(self.width as u32 + 2 * pad, self.height as u32 + 2 * pad);
        for p in self.foreground_points() {
            img.put_pixel(p.x as u32 + pad, p.y as u32 + pad, Luma([255]));
        }
        img
    }

    /// Read the `width`×`height` window at `(pad, pad)` of `img`; non-zero is foreground.
    pub fn from_gray(img: &GrayImage, pad: u32, width: usize, height: usize) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if img.get_pixel(x as u32 + pad, y as u32 + pad)[0] != 0 {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Foreground coordinates as `(x, y)` in row-major scan order.
    pub fn foreground_points(&self) -> Vec<IVec2> {
        let mut out = Vec::new();
        for y in 0..self.height {
            let row = y * self.width;
            for x in 0..self.width {
                if self.data[row + x] != 0 {
                    out.push(IVec2::new(x as i32, y as i32));
                }
            }
        }
        out
    }
}

/// Threshold a luma image. Pixels at or below `threshold` (dark ink) become foreground.
pub fn binarize(luma: &GrayImage, threshold: u8) -> BinaryMask {
    let (w, h) = luma.dimensions();
    let mut mask = BinaryMask::new(w as usize, h as usize);
    for (x, y, px) in luma.enumerate_pixels() {
        if px[0] <= threshold {
            mask.set(x as usize, y as usize, true);
        }
    }
    mask
}

/// One pass of erosion with a 3×3 square structuring element.
///
/// A pixel survives only if it and all eight neighbours are foreground. The
/// mask is padded by one background pixel so the image border erodes too.
pub fn erode(mask: &BinaryMask) -> BinaryMask {
    let padded = mask.to_gray(1);
    let eroded = imageproc::morphology::erode(&padded, Norm::LInf, 1);
    BinaryMask::from_gray(&eroded, 1, mask.width, mask.height)
}

/// Reduce foreground regions to 1-pixel-wide centerlines.
///
/// Zhang–Suen sub-iterations run until a full pass removes nothing. Stroke
/// ends are kept, and a final pass removes staircase corners left on
/// diagonal strokes.
pub fn skeletonize(mask: &BinaryMask) -> BinaryMask {
    let mut out = mask.clone();
    let mut candidates: Vec<(usize, usize)> = Vec::new();
    let mut to_clear: Vec<(usize, usize)> = Vec::new();

    loop {
        let mut changed = false;
        for first_pass in [true, false] {
            candidates.clear();
            for y in 0..out.height {
                for x in 0..out.width {
                    if out.data[y * out.width + x] != 0 {
                        candidates.push((x, y));
                    }
                }
            }

            to_clear.clear();
            for &(x, y) in &candidates {
                if is_removable(&out, x as isize, y as isize, first_pass) {
                    to_clear.push((x, y));
                }
            }

            if !to_clear.is_empty() {
                changed = true;
                for &(x, y) in &to_clear {
                    out.set(x, y, false);
                }
            }
        }
        if !changed {
            break;
        }
    }

    remove_staircases(&mut out);
    out
}

/// Delete pixels whose only neighbours form an L around them, such as the
/// outer pixel of each step on a thinned 2 px diagonal. Runs in scan order and
/// updates in place, so of two mirrored corners only the first goes.
fn remove_staircases(mask: &mut BinaryMask) {
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.data[y * mask.width + x] == 0 {
                continue;
            }
            let p = ring(mask, x as isize, y as isize);
            let (n, ne, e, se, s, sw, w, nw) = (p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7]);
            let corner = (n && e && !s && !w && !sw)
                || (e && s && !n && !w && !nw)
                || (s && w && !n && !e && !ne)
                || (w && n && !s && !e && !se);
            if corner {
                mask.set(x, y, false);
            }
        }
    }
}

/// Neighbours in the clockwise order P2..P9 starting north.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

fn ring(mask: &BinaryMask, x: isize, y: isize) -> [bool; 8] {
    let mut p = [false; 8];
    for (slot, (dx, dy)) in p.iter_mut().zip(RING) {
        *slot = mask.get(x + dx, y + dy);
    }
    p
}

fn is_removable(mask: &BinaryMask, x: isize, y: isize, first_pass: bool) -> bool {
    let p = ring(mask, x, y);

    let neighbours = p.iter().filter(|v| **v).count();
    if !(2..=6).contains(&neighbours) {
        return false;
    }

    let transitions = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
    if transitions != 1 {
        return false;
    }

    // With one transition, two neighbours are adjacent: the pixel ends a
    // diagonal stroke. Thinning it would unravel the stroke from both ends.
    if neighbours == 2 {
        return false;
    }

    // p[0]=P2 (N), p[2]=P4 (E), p[4]=P6 (S), p[6]=P8 (W)
    let (n, e, s, w) = (p[0], p[2], p[4], p[6]);
    if first_pass {
        !(n && e && s) && !(e && s && w)
    } else {
        !(n && e && w) && !(n && s && w)
    }
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    fn mask_from_rows(rows: &[&str]) -> BinaryMask {
        let h = rows.len();
        let w = rows[0].len();
        let mut mask = BinaryMask::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[test]
    fn binarize_marks_dark_pixels_as_foreground() {
        let mut img = GrayImage::from_pixel(3, 1, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([128]));
        img.put_pixel(2, 0, Luma([129]));
        let mask = binarize(&img, 128);
        assert_eq!(mask.data, vec![1, 1, 0]);
    }

    #[test]
    fn get_returns_background_outside_bounds() {
        let mask = mask_from_rows(&["##", "##"]);
        assert!(mask.get(0, 0));
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(2, 1));
    }

    #[test]
    fn erode_keeps_only_fully_surrounded_pixels() {
        let mask = mask_from_rows(&["#####", "#####", "#####", "#####"]);
        let eroded = erode(&mask);
        assert_eq!(
            eroded.foreground_points(),
            vec![
                IVec2::new(1, 1),
                IVec2::new(2, 1),
                IVec2::new(3, 1),
                IVec2::new(1, 2),
                IVec2::new(2, 2),
                IVec2::new(3, 2),
            ]
        );
    }

    #[test]
    fn erode_removes_two_pixel_strokes() {
        let mask = mask_from_rows(&[".....", "#####", "#####", "....."]);
        assert!(erode(&mask).is_empty());
    }

    #[test]
    fn skeleton_of_thick_bar_is_one_pixel_wide() {
        let mask = mask_from_rows(&[
            "............",
            ".##########.",
            ".##########.",
            ".##########.",
            "............",
        ]);
        let skeleton = skeletonize(&mask);
        assert!(!skeleton.is_empty());
        for x in 0..skeleton.width {
            let column = (0..skeleton.height)
                .filter(|&y| skeleton.get(x as isize, y as isize))
                .count();
            assert!(column <= 1, "column {x} has {column} skeleton pixels");
        }
    }

    #[test]
    fn skeleton_preserves_thin_lines() {
        let mask = mask_from_rows(&["........", ".######.", "........"]);
        let skeleton = skeletonize(&mask);
        assert!(skeleton.count() >= 4);
        assert!(skeleton.count() <= 6);
    }

    #[test]
    fn two_pixel_diagonal_staircase_is_kept() {
        let mask = mask_from_rows(&["##....", ".##...", "..##..", "...##.", "....##"]);
        let skeleton = skeletonize(&mask);
        assert!(skeleton.get(0, 0));
        assert!(skeleton.get(5, 4));
        assert!(skeleton.count() >= 5);
    }

    #[test]
    fn thinned_two_pixel_diagonal_is_one_pixel_wide() {
        let size = 64;
        let mut mask = BinaryMask::new(size, size);
        for i in 0..size {
            mask.set(i, i, true);
            if i + 1 < size {
                mask.set(i, i + 1, true);
            }
        }
        let skeleton = skeletonize(&mask);
        assert_eq!(skeleton.count(), size);
        assert!(skeleton.get(0, 0));
        assert!(skeleton.get(size as isize - 1, size as isize - 1));
        for i in 0..size as isize {
            for j in 0..size as isize - 1 {
                assert!(
                    !(skeleton.get(j, i) && skeleton.get(j + 1, i)),
                    "row {i} has adjacent pixels at {j}"
                );
                assert!(
                    !(skeleton.get(i, j) && skeleton.get(i, j + 1)),
                    "column {i} has adjacent pixels at {j}"
                );
            }
        }
    }

    #[test]
    fn staircase_corners_keep_the_stroke_connected() {
        let mask = mask_from_rows(&["#...", "##..", ".##.", "..##"]);
        let skeleton = skeletonize(&mask);
        assert_eq!(
            skeleton.foreground_points(),
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, 1),
                IVec2::new(2, 2),
                IVec2::new(3, 3),
            ]
        );
    }

    #[test]
    fn erode_clears_the_image_border() {
        let mask = mask_from_rows(&["###", "###", "###"]);
        assert_eq!(erode(&mask).foreground_points(), vec![IVec2::new(1, 1)]);
    }

    #[test]
    fn gray_round_trip_keeps_padding_out() {
        let mask = mask_from_rows(&["#.", ".#"]);
        let gray = mask.to_gray(2);
        assert_eq!(gray.dimensions(), (6, 6));
        assert_eq!(gray.get_pixel(2, 2)[0], 255);
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
        assert_eq!(BinaryMask::from_gray(&gray, 2, 2, 2), mask);
    }

    #[test]
    fn skeleton_of_empty_mask_is_empty() {
        let mask = BinaryMask::new(4, 4);
        assert!(skeletonize(&mask).is_empty());
    }
}
