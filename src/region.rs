//! Magic wand region growing
//!
//! Selects the 4-connected region around a seed pixel whose colors lie within
//! a tolerance of the seed color, and clears the alpha channel of that region.
//!
//! The traversal uses an explicit LIFO stack rather than recursion, so region
//! size is bounded only by memory. Neighbors are bounds-checked before they
//! are pushed and checked against the visited set when popped; out-of-bounds
//! coordinates never enter the stack. Neighbors are pushed in the order
//! left, right, up, down, which makes the pixel below the current one the
//! next to be examined. The push order affects only traversal order, never
//! the resulting region.

use crate::{
    color::{Rgb, Tolerance},
    error::{Result, WandError},
    types::{Coordinate, PixelBuffer, Rect},
};
use image::GrayImage;
use tracing::{debug, debug_span};

/// Region selected by the magic wand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    width: u32,
    height: u32,
    /// One entry per pixel, `true` when selected
    mask: Vec<bool>,
    pixel_count: usize,
    bounds: Option<Rect>,
}

impl Selection {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mask: vec![false; width as usize * height as usize],
            pixel_count: 0,
            bounds: None,
        }
    }

    /// Number of selected pixels
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Bounding rectangle of the selected pixels, `None` when empty
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel at `coord` is selected; out-of-bounds is never selected
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        if coord.x >= self.width || coord.y >= self.height {
            return false;
        }
        let index = coord.y as usize * self.width as usize + coord.x as usize;
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Selection mask as a grayscale image (255 = selected, 0 = not selected)
    #[must_use]
    pub fn to_mask_image(&self) -> GrayImage {
        let data = self
            .mask
            .iter()
            .map(|&selected| if selected { 255 } else { 0 })
            .collect();
        GrayImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    /// Clear the alpha channel of every selected pixel in `buffer`
    ///
    /// `buffer` must have the dimensions the selection was computed on.
    pub fn apply<'a>(&self, buffer: &'a mut PixelBuffer) -> Result<&'a mut PixelBuffer> {
        if buffer.dimensions() != self.dimensions() {
            return Err(WandError::dimension_mismatch(format!(
                "selection is {}x{} but buffer is {}x{}",
                self.width,
                self.height,
                buffer.width(),
                buffer.height()
            )));
        }

        for (index, &selected) in self.mask.iter().enumerate() {
            if selected {
                buffer.clear_alpha_at(index);
            }
        }
        Ok(buffer)
    }
}

/// Result of a [`RegionGrower::grow_detailed`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrowOutcome {
    /// Pixels in the grown region, all now transparent
    pub cleared: usize,
    /// Bounding rectangle of the cleared region
    pub bounds: Option<Rect>,
}

/// Running bounding box of visited matches
struct BoundsAccumulator {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    any: bool,
}

impl BoundsAccumulator {
    fn new() -> Self {
        Self {
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
            any: false,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.any = true;
    }

    fn finish(self) -> Option<Rect> {
        self.any.then(|| Rect {
            x: self.min_x,
            y: self.min_y,
            width: self.max_x - self.min_x + 1,
            height: self.max_y - self.min_y + 1,
        })
    }
}

/// Flood-fill background eraser
pub struct RegionGrower;

impl RegionGrower {
    /// Make the contiguous region around `seed` transparent
    ///
    /// Every pixel reachable from `seed` through up/down/left/right neighbors
    /// whose RGB lies within `tolerance` (Euclidean, inclusive) of the seed's
    /// RGB gets alpha 0. RGB channels are never modified.
    ///
    /// Returns the same buffer for chaining. If the seed pixel is already fully
    /// transparent the call is a no-op.
    ///
    /// # Errors
    /// - `InvalidSeed` if `seed` lies outside the buffer; the buffer is untouched
    ///
    /// # Examples
    /// ```rust
    /// use wand_bgremove::{Coordinate, PixelBuffer, RegionGrower, Tolerance};
    ///
    /// let mut buffer = PixelBuffer::filled(4, 4, [255, 255, 255, 255])?;
    /// RegionGrower::grow(&mut buffer, Coordinate::new(0, 0), Tolerance::new(10.0)?)?;
    /// assert_eq!(buffer.transparent_count(), 16);
    /// # Ok::<(), wand_bgremove::WandError>(())
    /// ```
    pub fn grow(
        buffer: &mut PixelBuffer,
        seed: Coordinate,
        tolerance: Tolerance,
    ) -> Result<&mut PixelBuffer> {
        Self::grow_detailed(buffer, seed, tolerance)?;
        Ok(buffer)
    }

    /// Like [`RegionGrower::grow`], reporting how many pixels were cleared
    pub fn grow_detailed(
        buffer: &mut PixelBuffer,
        seed: Coordinate,
        tolerance: Tolerance,
    ) -> Result<GrowOutcome> {
        let selection = Self::select(buffer, seed, tolerance)?;
        selection.apply(buffer)?;

        Ok(GrowOutcome {
            cleared: selection.pixel_count(),
            bounds: selection.bounds(),
        })
    }

    /// Compute the region [`RegionGrower::grow`] would clear, without mutating
    ///
    /// A fully transparent seed yields an empty selection.
    pub fn select(
        buffer: &PixelBuffer,
        seed: Coordinate,
        tolerance: Tolerance,
    ) -> Result<Selection> {
        let (width, height) = buffer.dimensions();
        if !buffer.contains(seed) {
            return Err(WandError::invalid_seed(seed.x, seed.y, width, height));
        }

        let span = debug_span!(
            "region_grow",
            seed = %seed,
            tolerance = %tolerance,
            width = width,
            height = height
        );
        let _enter = span.enter();

        let seed_index = buffer.index_of(seed.x, seed.y);
        if buffer.alpha_at(seed_index) == 0 {
            debug!("Seed pixel already transparent, nothing to select");
            return Ok(Selection::empty(width, height));
        }

        let target: Rgb = buffer.rgb_at(seed_index);
        let mut selection = Selection::empty(width, height);
        let mut visited = vec![false; buffer.pixel_count()];
        let mut bounds = BoundsAccumulator::new();
        let mut stack: Vec<(u32, u32)> = vec![(seed.x, seed.y)];
        let mut pops = 0usize;

        while let Some((x, y)) = stack.pop() {
            pops += 1;
            let index = buffer.index_of(x, y);

            match visited.get_mut(index) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }

            if !tolerance.accepts(target, buffer.rgb_at(index)) {
                continue;
            }

            if let Some(selected) = selection.mask.get_mut(index) {
                *selected = true;
            }
            selection.pixel_count += 1;
            bounds.include(x, y);

            let mut push = |nx: u32, ny: u32| {
                let neighbor = buffer.index_of(nx, ny);
                if visited.get(neighbor) == Some(&false) {
                    stack.push((nx, ny));
                }
            };
            if x > 0 {
                push(x - 1, y);
            }
            if x + 1 < width {
                push(x + 1, y);
            }
            if y > 0 {
                push(x, y - 1);
            }
            if y + 1 < height {
                push(x, y + 1);
            }
        }

        selection.bounds = bounds.finish();
        debug!(
            selected = selection.pixel_count,
            pops = pops,
            target = %target,
            "Region growing finished"
        );

        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol(value: f64) -> Tolerance {
        Tolerance::new(value).unwrap()
    }

    /// Buffer of `width` x `height` opaque pixels colored by `paint(x, y)`
    fn paint(width: u32, height: u32, color_at: impl Fn(u32, u32) -> [u8; 3]) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = color_at(x, y);
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn alpha(buffer: &PixelBuffer, x: u32, y: u32) -> u8 {
        buffer.pixel(Coordinate::new(x, y)).unwrap()[3]
    }

    #[test]
    fn test_black_border_white_center() {
        let mut buffer = paint(3, 3, |x, y| {
            if (x, y) == (1, 1) {
                [255, 255, 255]
            } else {
                [0, 0, 0]
            }
        });

        RegionGrower::grow(&mut buffer, Coordinate::new(0, 0), tol(10.0)).unwrap();

        for y in 0..3 {
            for x in 0..3 {
                let expected = if (x, y) == (1, 1) { 255 } else { 0 };
                assert_eq!(alpha(&buffer, x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_single_pixel_buffer() {
        let mut buffer = PixelBuffer::filled(1, 1, [5, 6, 7, 255]).unwrap();
        let outcome =
            RegionGrower::grow_detailed(&mut buffer, Coordinate::new(0, 0), tol(0.0)).unwrap();

        assert_eq!(outcome.cleared, 1);
        assert_eq!(buffer.as_raw(), &[5, 6, 7, 0]);
    }

    #[test]
    fn test_two_regions_left_half_only() {
        let mut buffer = paint(4, 4, |x, _| if x < 2 { [255, 0, 0] } else { [0, 0, 255] });

        let outcome =
            RegionGrower::grow_detailed(&mut buffer, Coordinate::new(0, 0), tol(0.0)).unwrap();

        assert_eq!(outcome.cleared, 8);
        assert_eq!(
            outcome.bounds,
            Some(Rect {
                x: 0,
                y: 0,
                width: 2,
                height: 4
            })
        );
        assert_eq!(alpha(&buffer, 3, 3), 255);
    }

    #[test]
    fn test_boundary_pixels_do_not_propagate() {
        // Left and right columns are red, separated by a green column.
        let mut buffer = paint(3, 5, |x, _| if x == 1 { [0, 255, 0] } else { [255, 0, 0] });

        RegionGrower::grow(&mut buffer, Coordinate::new(0, 2), tol(50.0)).unwrap();

        for y in 0..5 {
            assert_eq!(alpha(&buffer, 0, y), 0);
            assert_eq!(alpha(&buffer, 1, y), 255);
            assert_eq!(alpha(&buffer, 2, y), 255);
        }
    }

    #[test]
    fn test_transparent_seed_is_noop() {
        let mut data = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap().into_raw();
        data[3] = 0;
        let mut buffer = PixelBuffer::from_raw(3, 3, data).unwrap();
        let before = buffer.clone();

        let outcome =
            RegionGrower::grow_detailed(&mut buffer, Coordinate::new(0, 0), tol(441.0)).unwrap();

        assert_eq!(outcome, GrowOutcome::default());
        assert_eq!(buffer, before);

        let selection = RegionGrower::select(&buffer, Coordinate::new(0, 0), tol(441.0)).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.bounds(), None);
    }

    #[test]
    fn test_invalid_seed_rejected_before_mutation() {
        let mut buffer = PixelBuffer::filled(2, 2, [1, 1, 1, 255]).unwrap();
        let before = buffer.clone();

        let err = RegionGrower::grow(&mut buffer, Coordinate::new(2, 0), tol(500.0)).unwrap_err();
        assert!(matches!(
            err,
            WandError::InvalidSeed {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            }
        ));
        assert_eq!(buffer, before);

        assert!(RegionGrower::grow(&mut buffer, Coordinate::new(0, 2), tol(0.0)).is_err());
    }

    #[test]
    fn test_seed_alpha_ignored_for_matching() {
        // Seed is half transparent, neighbors are opaque with the same RGB.
        let mut data = vec![];
        for i in 0..4 {
            data.extend_from_slice(&[9, 9, 9, if i == 0 { 10 } else { 255 }]);
        }
        let mut buffer = PixelBuffer::from_raw(2, 2, data).unwrap();

        RegionGrower::grow(&mut buffer, Coordinate::new(0, 0), tol(0.0)).unwrap();
        assert_eq!(buffer.transparent_count(), 4);
    }

    #[test]
    fn test_gradient_tolerance_window() {
        // Red ramp along a single row: 250, 245, ..., 210
        let values = [250u8, 245, 240, 235, 230, 225, 220, 215, 210];
        let buffer = paint(9, 1, |x, _| [values[x as usize], 0, 0]);

        // Seed at 230 with tolerance 10 reaches 240 and 220 but not beyond.
        let selection = RegionGrower::select(&buffer, Coordinate::new(4, 0), tol(10.0)).unwrap();
        assert_eq!(selection.pixel_count(), 5);
        assert!(selection.contains(Coordinate::new(2, 0)));
        assert!(selection.contains(Coordinate::new(6, 0)));
        assert!(!selection.contains(Coordinate::new(1, 0)));
        assert!(!selection.contains(Coordinate::new(7, 0)));
    }

    #[test]
    fn test_select_does_not_mutate() {
        let buffer = PixelBuffer::filled(5, 5, [20, 20, 20, 255]).unwrap();
        let selection = RegionGrower::select(&buffer, Coordinate::new(2, 2), tol(0.0)).unwrap();

        assert_eq!(selection.pixel_count(), 25);
        assert_eq!(buffer.transparent_count(), 0);

        let mask = selection.to_mask_image();
        assert!(mask.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_selection_apply_checks_dimensions() {
        let buffer = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        let selection = RegionGrower::select(&buffer, Coordinate::new(0, 0), tol(0.0)).unwrap();

        let mut other = PixelBuffer::filled(3, 2, [0, 0, 0, 255]).unwrap();
        assert!(matches!(
            selection.apply(&mut other),
            Err(WandError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_large_region_does_not_overflow_stack() {
        let mut buffer = PixelBuffer::filled(1024, 1024, [7, 7, 7, 255]).unwrap();
        let outcome =
            RegionGrower::grow_detailed(&mut buffer, Coordinate::new(512, 512), tol(0.0)).unwrap();
        assert_eq!(outcome.cleared, 1024 * 1024);
    }
}
