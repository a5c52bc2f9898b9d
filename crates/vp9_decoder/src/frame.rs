//! Sample planes of a decoded picture.

use crate::error::{try_alloc, Result};

/// One plane of `u16` samples. `width`/`height` are the decoded (8-aligned)
/// size; `stride` is the distance between rows in `data`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plane {
    pub width:  usize,
    pub height: usize,
    pub stride: usize,
    pub data:   Vec<u16>,
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let data = try_alloc(width * height, "plane samples")?;
        Ok(Plane { width, height, stride: width, data })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u16) {
        self.data[y * self.stride + x] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u16] {
        &self.data[y * self.stride..y * self.stride + self.width]
    }

    pub fn fill(&mut self, v: u16) {
        self.data.fill(v);
    }

    /// Top-left `width` x `height` samples, packed without padding.
    pub fn cropped(&self, width: usize, height: usize) -> Vec<u16> {
        let w = width.min(self.width);
        let h = height.min(self.height);
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            out.extend_from_slice(&self.row(y)[..w]);
        }
        out
    }
}

/// The three planes of the frame being reconstructed.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    pub planes: [Plane; 3],
}

impl FrameBuffer {
    /// Allocate planes for a frame of `mi_cols` x `mi_rows` 8x8 units.
    pub fn new(mi_cols: usize, mi_rows: usize, ssx: bool, ssy: bool) -> Result<Self> {
        let (w, h) = (mi_cols * 8, mi_rows * 8);
        let (cw, ch) = (w >> ssx as usize, h >> ssy as usize);
        Ok(FrameBuffer {
            planes: [Plane::new(w, h)?, Plane::new(cw, ch)?, Plane::new(cw, ch)?],
        })
    }
}

#[inline]
pub fn clip_pixel(bit_depth: u8, v: i32) -> u16 {
    v.clamp(0, (1 << bit_depth) - 1) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_pixel() {
        assert_eq!(clip_pixel(8, 300), 255);
        assert_eq!(clip_pixel(8, -5), 0);
        assert_eq!(clip_pixel(10, 1023), 1023);
        assert_eq!(clip_pixel(12, 5000), 4095);
    }

    #[test]
    fn test_frame_buffer_sizes() {
        let fb = FrameBuffer::new(3, 2, true, true).unwrap();
        assert_eq!((fb.planes[0].width, fb.planes[0].height), (24, 16));
        assert_eq!((fb.planes[1].width, fb.planes[1].height), (12, 8));
        let fb = FrameBuffer::new(3, 2, true, false).unwrap();
        assert_eq!((fb.planes[2].width, fb.planes[2].height), (12, 16));
    }

    #[test]
    fn test_cropped() {
        let mut p = Plane::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                p.set(x, y, (y * 8 + x) as u16);
            }
        }
        let c = p.cropped(3, 2);
        assert_eq!(c, vec![0, 1, 2, 8, 9, 10]);
        assert_eq!(p.cropped(100, 1).len(), 8);
    }
}
