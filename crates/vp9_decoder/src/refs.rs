//! Reference picture slots.

use std::sync::Arc;

use crate::error::{DecoderError, Result};
use crate::frame::Plane;
use crate::header::{FrameHeader, NUM_REF_FRAMES};
use crate::types::ColorConfig;

pub const REF_SCALE_SHIFT: u32 = 14;

/// A decoded picture as kept for later prediction and for
/// `show_existing_frame` output.
#[derive(Debug, Clone)]
pub struct RefPicture {
    pub width:         u32,
    pub height:        u32,
    pub render_width:  u32,
    pub render_height: u32,
    pub color:         ColorConfig,
    /// Decoded (8-aligned) planes.
    pub planes:        [Plane; 3],
}

/// One of the three references active in the current frame, with the
/// fixed point scale from the current frame's size to its own.
#[derive(Debug, Clone)]
pub struct ActiveRef {
    pub picture: Arc<RefPicture>,
    pub x_scale: i64,
    pub y_scale: i64,
    pub x_step:  i64,
    pub y_step:  i64,
}

impl ActiveRef {
    #[inline]
    pub fn is_scaled(&self) -> bool {
        self.x_scale != 1 << REF_SCALE_SHIFT || self.y_scale != 1 << REF_SCALE_SHIFT
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefFrameStore {
    slots: [Option<Arc<RefPicture>>; NUM_REF_FRAMES],
}

impl RefFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: usize) -> Option<&Arc<RefPicture>> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Frame size held by each slot.
    pub fn sizes(&self) -> [Option<(u32, u32)>; NUM_REF_FRAMES] {
        let mut out = [None; NUM_REF_FRAMES];
        for (o, s) in out.iter_mut().zip(self.slots.iter()) {
            *o = s.as_ref().map(|p| (p.width, p.height));
        }
        out
    }

    /// Store `picture` into every slot whose bit is set in `mask`.
    pub fn refresh(&mut self, mask: u8, picture: RefPicture) {
        if mask == 0 {
            return;
        }
        let picture = Arc::new(picture);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if (mask >> i) & 1 != 0 {
                *slot = Some(Arc::clone(&picture));
            }
        }
    }

    /// Look up the three references of an inter frame and validate that
    /// they can predict it.
    pub fn prepare_active(&self, h: &FrameHeader) -> Result<[ActiveRef; 3]> {
        let w = h.width as i64;
        let hh = h.height as i64;
        let prepare = |i: usize| -> Result<ActiveRef> {
            let slot = h.ref_frame_idx[i] as usize;
            let picture = self.get(slot).cloned().ok_or_else(|| {
                log::warn!("vp9: reference slot {slot} used before it was written");
                DecoderError::corrupted(format!("Reference slot {slot} is empty"))
            })?;
            let (rw, rh) = (picture.width as i64, picture.height as i64);
            if 2 * w < rw || 2 * hh < rh || w > 16 * rw || hh > 16 * rh {
                return Err(DecoderError::corrupted(format!(
                    "Reference {rw}x{rh} cannot be scaled to {w}x{hh}"
                )));
            }
            if picture.color.bit_depth != h.color.bit_depth
                || picture.color.subsampling_x != h.color.subsampling_x
                || picture.color.subsampling_y != h.color.subsampling_y
            {
                return Err(DecoderError::NotImplemented(
                    "Reference with a different bit depth or subsampling".into(),
                ));
            }
            let x_scale = (rw << REF_SCALE_SHIFT) / w;
            let y_scale = (rh << REF_SCALE_SHIFT) / hh;
            Ok(ActiveRef {
                picture,
                x_scale,
                y_scale,
                x_step: (16 * x_scale) >> REF_SCALE_SHIFT,
                y_step: (16 * y_scale) >> REF_SCALE_SHIFT,
            })
        };
        Ok([prepare(0)?, prepare(1)?, prepare(2)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(w: u32, h: u32) -> RefPicture {
        let p = |w: u32, h: u32| Plane::new(w as usize, h as usize).unwrap();
        RefPicture {
            width: w,
            height: h,
            render_width: w,
            render_height: h,
            color: ColorConfig::default(),
            planes: [p(w, h), p(w / 2, h / 2), p(w / 2, h / 2)],
        }
    }

    fn inter_header(w: u32, h: u32, idx: [u8; 3]) -> FrameHeader {
        FrameHeader { width: w, height: h, ref_frame_idx: idx, ..FrameHeader::default() }
    }

    #[test]
    fn test_refresh_mask() {
        let mut store = RefFrameStore::new();
        store.refresh(0b1000_0101, picture(16, 16));
        let sizes = store.sizes();
        assert_eq!(sizes[0], Some((16, 16)));
        assert_eq!(sizes[1], None);
        assert_eq!(sizes[2], Some((16, 16)));
        assert_eq!(sizes[7], Some((16, 16)));
        assert!(Arc::ptr_eq(store.get(0).unwrap(), store.get(7).unwrap()));
    }

    #[test]
    fn test_empty_slot_is_corrupted() {
        let mut store = RefFrameStore::new();
        store.refresh(0b0000_0011, picture(16, 16));
        let err = store.prepare_active(&inter_header(16, 16, [0, 1, 2])).err().unwrap();
        assert!(matches!(err, DecoderError::Corrupted(_)));
    }

    #[test]
    fn test_scale_limits() {
        let mut store = RefFrameStore::new();
        store.refresh(0xff, picture(64, 64));
        let refs = store.prepare_active(&inter_header(32, 32, [0, 1, 2])).unwrap();
        assert_eq!(refs[0].x_scale, 2 << REF_SCALE_SHIFT);
        assert_eq!(refs[0].x_step, 32);
        assert!(refs[0].is_scaled());

        // more than 2:1 downscale
        assert!(store.prepare_active(&inter_header(31, 32, [0, 1, 2])).is_err());
        // more than 16:1 upscale
        store.refresh(0xff, picture(8, 8));
        assert!(store.prepare_active(&inter_header(136, 8, [0, 1, 2])).is_err());
        let same = store.prepare_active(&inter_header(8, 8, [3, 4, 5])).unwrap();
        assert!(!same[2].is_scaled());
        assert_eq!(same[2].x_step, 16);
    }
}
