//! Box blur over rectangular regions.
//!
//! Each pass replaces every pixel with the mean of its 3x3 neighborhood,
//! counting only neighbors inside the region: 4 samples at a corner, 6 on an
//! edge, 9 in the interior. Passes read a snapshot of the previous pass and
//! all four channels, alpha included, are averaged independently.

use pixnote_raster::{PixelBuffer, Rect};

use crate::constants::{MAX_BLUR_RADIUS, MIN_BLUR_RADIUS};
use crate::error::{EngineError, Result};
use crate::registry::RegionRecord;

/// A registered blur region. Applying it changes surface pixels, not this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurRegion {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Number of box-blur passes, in `1..=50`.
    pub blur_radius: u32,
}

impl RegionRecord for BlurRegion {
    fn id(&self) -> &str {
        &self.id
    }
}

impl BlurRegion {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

pub fn validate_blur(width: u32, height: u32, blur_radius: u32) -> Result<()> {
    if width < 1 || height < 1 {
        return Err(EngineError::validation(format!(
            "blur region must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    if !(MIN_BLUR_RADIUS..=MAX_BLUR_RADIUS).contains(&blur_radius) {
        return Err(EngineError::validation(format!(
            "blur radius must be in {}..={}, got {}",
            MIN_BLUR_RADIUS, MAX_BLUR_RADIUS, blur_radius
        )));
    }
    Ok(())
}

/// One 3x3 mean pass with in-bounds neighbor counting.
pub fn box_blur_pass(src: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut out = PixelBuffer::new(src.width(), src.height());
    if w == 0 || h == 0 {
        return out;
    }
    let input = src.pixels();
    let output = out.pixels_mut();

    for y in 0..h {
        let rows = y.saturating_sub(1)..=(y + 1).min(h - 1);
        for x in 0..w {
            let cols = x.saturating_sub(1)..=(x + 1).min(w - 1);
            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for ny in rows.clone() {
                for nx in cols.clone() {
                    let p = input[ny * w + nx];
                    for c in 0..4 {
                        sum[c] += u32::from(p[c]);
                    }
                    count += 1;
                }
            }
            // Round half up
            output[y * w + x] = sum.map(|s| ((s + count / 2) / count) as u8);
        }
    }
    out
}

/// Run `passes` box-blur passes.
pub fn box_blur(src: &PixelBuffer, passes: u32) -> PixelBuffer {
    box_blur_until(src, passes, |_| true).0
}

/// Run up to `passes` passes, asking `keep_going(pass_index)` before each one.
///
/// Returns the blurred buffer and the number of passes that ran. Stopping
/// early leaves the output of the last completed pass.
pub fn box_blur_until(
    src: &PixelBuffer,
    passes: u32,
    mut keep_going: impl FnMut(u32) -> bool,
) -> (PixelBuffer, u32) {
    let mut current = src.clone();
    for pass in 0..passes {
        if !keep_going(pass) {
            log::debug!("Blur stopped after {} of {} passes", pass, passes);
            return (current, pass);
        }
        current = box_blur_pass(&current);
        log::trace!("Blur pass {}/{} done", pass + 1, passes);
    }
    (current, passes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(width: u32, height: u32, pixels: &[[u8; 4]]) -> PixelBuffer {
        PixelBuffer::from_rgba8(width, height, pixels.concat()).unwrap()
    }

    #[test]
    fn test_two_by_two_corners_average_four_samples() {
        let src = buffer(
            2,
            2,
            &[[0, 0, 0, 255], [40, 0, 0, 255], [80, 0, 0, 255], [120, 0, 0, 255]],
        );
        let out = box_blur_pass(&src);
        // Every pixel is a corner: (0 + 40 + 80 + 120) / 4
        for p in out.pixels() {
            assert_eq!(*p, [60, 0, 0, 255]);
        }
    }

    #[test]
    fn test_edge_and_interior_counts() {
        // Single bright pixel in the middle of a 3x3 region
        let mut src = PixelBuffer::filled(3, 3, [0, 0, 0, 0].into());
        src.set_pixel(1, 1, [180, 90, 36, 252]);
        let out = box_blur_pass(&src);

        // Corner: 4 samples
        assert_eq!(out.pixel(0, 0), Some([45, 23, 9, 63]));
        // Edge: 6 samples
        assert_eq!(out.pixel(1, 0), Some([30, 15, 6, 42]));
        // Interior: 9 samples
        assert_eq!(out.pixel(1, 1), Some([20, 10, 4, 28]));
    }

    #[test]
    fn test_pass_reads_snapshot() {
        // In-place updates would leak the first pixel's new value into the second
        let src = buffer(3, 1, &[[90, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let out = box_blur_pass(&src);
        assert_eq!(out.pixel(0, 0), Some([45, 0, 0, 0]));
        assert_eq!(out.pixel(1, 0), Some([30, 0, 0, 0]));
        assert_eq!(out.pixel(2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_uniform_region_is_fixed_point() {
        let src = PixelBuffer::filled(5, 4, [12, 34, 56, 78].into());
        assert_eq!(box_blur(&src, 7), src);
    }

    #[test]
    fn test_early_stop() {
        let src = buffer(3, 1, &[[90, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let (out, ran) = box_blur_until(&src, 10, |pass| pass < 2);
        assert_eq!(ran, 2);
        assert_eq!(out, box_blur(&src, 2));
    }

    #[test]
    fn test_validate_blur() {
        assert!(validate_blur(1, 1, 1).is_ok());
        assert!(validate_blur(10, 10, 50).is_ok());
        assert!(validate_blur(0, 10, 5).is_err());
        assert!(validate_blur(10, 10, 0).is_err());
        assert!(validate_blur(10, 10, 51).is_err());
    }
}
