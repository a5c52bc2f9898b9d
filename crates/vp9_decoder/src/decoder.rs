//! Frame level decoding: header parsing, probability contexts, tile
//! decoding, adaptation and reference bookkeeping.

use crate::block_grid::{Grid, PrevMvInfo};
use crate::error::{DecoderError, Result};
use crate::frame::Plane;
use crate::header::{parse_compressed_header, parse_uncompressed_header, FrameHeader, HeaderState};
use crate::probability::{ProbabilityModel, COEF_MAX_UPDATE_FACTOR, COEF_MAX_UPDATE_FACTOR_AFTER_KEY};
use crate::refs::{RefFrameStore, RefPicture};
use crate::residual::segment_quantizers;
use crate::superframe::parse_superframe_sizes;
use crate::tile::{decode_tiles, FrameParams, FrameState};
use crate::types::{ColorConfig, FrameType, InterpFilter, TxMode};

pub const DEFAULT_MAX_DIMENSION: u32 = 16384;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Frames wider than this are rejected before anything is allocated.
    pub max_width:            u32,
    pub max_height:           u32,
    /// Also return frames that have `show_frame` unset.
    pub output_hidden_frames: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_width:            DEFAULT_MAX_DIMENSION,
            max_height:           DEFAULT_MAX_DIMENSION,
            output_hidden_frames: false,
        }
    }
}

// ─── Output frame ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub width:         u32,
    pub height:        u32,
    pub render_width:  u32,
    pub render_height: u32,
    pub color:         ColorConfig,
    /// `false` only for hidden frames returned because of
    /// [`DecoderConfig::output_hidden_frames`].
    pub shown:         bool,
    pub key_frame:     bool,
    /// Y, U, V at the decoded size (multiple of 8 luma samples).
    pub planes:        [Plane; 3],
}

impl DecodedFrame {
    fn from_picture(p: &RefPicture, shown: bool, key_frame: bool) -> Self {
        DecodedFrame {
            width:         p.width,
            height:        p.height,
            render_width:  p.render_width,
            render_height: p.render_height,
            color:         p.color,
            shown,
            key_frame,
            planes:        p.planes.clone(),
        }
    }

    /// Visible size of plane `plane`.
    pub fn plane_size(&self, plane: usize) -> (usize, usize) {
        let (w, h) = (self.width as usize, self.height as usize);
        if plane == 0 {
            return (w, h);
        }
        let ssx = self.color.subsampling_x as usize;
        let ssy = self.color.subsampling_y as usize;
        ((w + ssx) >> ssx, (h + ssy) >> ssy)
    }

    /// Samples of `plane` cropped to the frame size.
    pub fn cropped_plane(&self, plane: usize) -> Vec<u16> {
        let (w, h) = self.plane_size(plane);
        self.planes[plane].cropped(w, h)
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// What the next frame may borrow from the one decoded before it.
#[derive(Debug, Default)]
struct PreviousFrame {
    width:      u32,
    height:     u32,
    show_frame: bool,
    intra_only: bool,
    frame_type: FrameType,
    mvs:        Option<Grid<PrevMvInfo>>,
    seg_map:    Grid<u8>,
}

pub struct Vp9Decoder {
    config:       DecoderConfig,
    header_state: HeaderState,
    probs:        ProbabilityModel,
    refs:         RefFrameStore,
    prev:         PreviousFrame,
}

impl Default for Vp9Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Vp9Decoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Vp9Decoder {
            config,
            header_state: HeaderState::default(),
            probs:        ProbabilityModel::new(),
            refs:         RefFrameStore::new(),
            prev:         PreviousFrame::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one container chunk, which is either a single frame or a
    /// superframe. Returns the frames to present, in order.
    pub fn decode_chunk(&mut self, chunk: &[u8]) -> Result<Vec<DecodedFrame>> {
        let sizes = parse_superframe_sizes(chunk)?;
        let mut out = Vec::new();
        if sizes.is_empty() {
            self.decode_frame(chunk, &mut out)?;
            return Ok(out);
        }

        log::trace!("vp9: superframe with {} frames", sizes.len());
        let mut offset = 0usize;
        for size in sizes {
            self.decode_frame(&chunk[offset..offset + size], &mut out)?;
            offset += size;
        }
        Ok(out)
    }

    fn decode_frame(&mut self, data: &[u8], out: &mut Vec<DecodedFrame>) -> Result<()> {
        let ref_sizes = self.refs.sizes();
        let mut h = parse_uncompressed_header(data, &mut self.header_state, &ref_sizes)?;

        if h.show_existing_frame {
            let slot = h.frame_to_show as usize;
            let picture = self.refs.get(slot).ok_or_else(|| {
                log::warn!("vp9: show_existing_frame of empty slot {slot}");
                DecoderError::corrupted(format!("Reference slot {slot} is empty"))
            })?;
            out.push(DecodedFrame::from_picture(picture, true, false));
            self.prev.show_frame = true;
            return Ok(());
        }

        if h.width > self.config.max_width || h.height > self.config.max_height {
            return Err(DecoderError::OutOfMemory(format!(
                "Frame size {}x{} exceeds the {}x{} limit",
                h.width, h.height, self.config.max_width, self.config.max_height
            )));
        }

        if h.resets_past() {
            self.setup_past_independence(&mut h);
        }
        let (mi_rows, mi_cols) = (h.mi_rows(), h.mi_cols());
        if !self.prev.seg_map.same_size(mi_rows, mi_cols) {
            self.prev.seg_map = Grid::new(mi_rows, mi_cols)?;
        }

        let ctx = h.frame_context_idx as usize;
        self.probs.load_probs(ctx);
        let comp_start = h.uncompressed_size;
        let comp_end = comp_start + h.header_size_in_bytes as usize;
        if comp_end > data.len() {
            return Err(DecoderError::corrupted(format!(
                "Compressed header of {} bytes overruns a {} byte frame",
                h.header_size_in_bytes, data.len()
            )));
        }
        let compressed = parse_compressed_header(&data[comp_start..comp_end], &h, &mut self.probs.current)?;

        let refs = if h.is_intra() { None } else { Some(self.refs.prepare_active(&h)?) };
        let use_prev_mvs = !h.error_resilient_mode
            && h.width == self.prev.width
            && h.height == self.prev.height
            && !self.prev.intra_only
            && self.prev.show_frame;

        let mut state = FrameState::new(&h)?;
        {
            let params = FrameParams {
                header:       &h,
                compressed:   &compressed,
                probs:        &self.probs.current,
                refs:         refs.as_ref(),
                prev_mvs:     if use_prev_mvs { self.prev.mvs.as_ref() } else { None },
                prev_seg_map: &self.prev.seg_map,
                quant:        segment_quantizers(&h),
            };
            decode_tiles(&params, &mut state, &data[comp_end..])?;
        }

        if !h.error_resilient_mode && !h.frame_parallel_decoding_mode {
            let factor = if !h.is_intra() && self.prev.frame_type == FrameType::Key {
                COEF_MAX_UPDATE_FACTOR_AFTER_KEY
            } else {
                COEF_MAX_UPDATE_FACTOR
            };
            self.probs.adapt_coef_probs(ctx, &state.counts, factor);
            if !h.is_intra() {
                self.probs.adapt_non_coef_probs(
                    ctx,
                    &state.counts,
                    h.interp_filter == InterpFilter::Switchable,
                    compressed.tx_mode == TxMode::Select,
                    h.allow_high_precision_mv,
                );
            }
        }
        if h.refresh_frame_context {
            self.probs.save_probs(ctx);
        }

        let FrameState { grid, seg_map, frame, .. } = state;
        let picture = RefPicture {
            width:         h.width,
            height:        h.height,
            render_width:  h.render_width,
            render_height: h.render_height,
            color:         h.color,
            planes:        frame.planes,
        };
        if h.show_frame || self.config.output_hidden_frames {
            out.push(DecodedFrame::from_picture(&picture, h.show_frame, h.frame_type == FrameType::Key));
        }
        self.refs.refresh(h.refresh_frame_flags, picture);

        let mut mvs = Grid::new(mi_rows, mi_cols)?;
        for r in 0..mi_rows {
            for c in 0..mi_cols {
                let b = grid.get(r, c);
                *mvs.get_mut(r, c) = PrevMvInfo {
                    ref_frame: b.ref_frame,
                    mv:        [b.block_mv(0), b.block_mv(1)],
                };
            }
        }
        if h.segmentation.enabled && h.segmentation.update_map {
            self.prev.seg_map = seg_map;
        }
        self.prev.width = h.width;
        self.prev.height = h.height;
        self.prev.show_frame = h.show_frame;
        self.prev.intra_only = h.intra_only;
        self.prev.frame_type = h.frame_type;
        self.prev.mvs = Some(mvs);
        Ok(())
    }

    /// Reset the probability contexts and the state carried between frames.
    fn setup_past_independence(&mut self, h: &mut FrameHeader) {
        self.probs.reset_current();
        if h.frame_type == FrameType::Key || h.error_resilient_mode || h.reset_frame_context == 3 {
            self.probs.save_all();
        } else if h.reset_frame_context == 2 {
            self.probs.save_probs(h.frame_context_idx as usize);
        }
        h.frame_context_idx = 0;
        self.prev.seg_map.fill(0);
        self.prev.mvs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool_decoder::tests::BoolEncoder;
    use crate::header::tests::{key_frame_header, BitWriter};
    use crate::probability::{merge_prob, FrameProbs, COEF_COUNT_SAT};
    use crate::tables::{COUNTER_TO_CONTEXT, DEFAULT_COEF_PROBS};
    use crate::types::{MotionVector, RefFrame};

    const HEADER_BYTES: usize = 8;
    const TILE_BYTES: usize = 8;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// 64x64 key frame whose range coded parts are all zero: every bool
    /// reads as 0, so each block is DC predicted with no residual.
    fn gray_key_frame() -> Vec<u8> {
        let mut bw = key_frame_header(64, 64, false, 60);
        bw.put(0, 1);               // tile rows
        bw.put(HEADER_BYTES as u32, 16);
        let mut frame = bw.bytes;
        frame.resize(frame.len() + HEADER_BYTES + TILE_BYTES, 0);
        frame
    }

    /// Inter frame predicted from slots 0..=2, sized from LAST.
    fn inter_frame(show: bool, refresh: u8) -> Vec<u8> {
        inter_frame_with_tile(show, refresh, &[0; TILE_BYTES])
    }

    fn inter_frame_with_tile(show: bool, refresh: u8, tile: &[u8]) -> Vec<u8> {
        let mut bw = BitWriter::default();
        bw.put(2, 2);               // frame marker
        bw.put(0, 2);               // profile 0
        bw.put(0, 1);               // show_existing_frame
        bw.put(1, 1);               // non key
        bw.put(show as u32, 1);
        bw.put(0, 1);               // error resilient
        if !show {
            bw.put(0, 1);           // intra_only
        }
        bw.put(0, 2);               // reset_frame_context
        bw.put(refresh as u32, 8);
        for i in 0..3 {
            bw.put(i, 3);
            bw.put(0, 1);           // sign bias
        }
        bw.put(1, 1);               // size from LAST
        bw.put(0, 1);               // render size equal
        bw.put(0, 1);               // allow_high_precision_mv
        bw.put(0, 1);
        bw.put(0, 2);               // fixed filter
        bw.put(1, 1);               // refresh_frame_context
        bw.put(0, 1);               // frame_parallel
        bw.put(0, 2);               // frame_context_idx
        bw.put(10, 6);
        bw.put(0, 3);
        bw.put(0, 1);
        bw.put(60, 8);
        bw.put(0, 3);
        bw.put(0, 1);               // segmentation
        bw.put(0, 1);               // tile rows
        bw.put(HEADER_BYTES as u32, 16);
        let mut frame = bw.bytes;
        frame.resize(frame.len() + HEADER_BYTES, 0);
        frame.extend_from_slice(tile);
        frame
    }

    fn show_existing(slot: u8) -> Vec<u8> {
        vec![0x88 | slot]
    }

    fn superframe(frames: &[&[u8]]) -> Vec<u8> {
        let marker = 0xc0 | (frames.len() as u8 - 1);
        let mut chunk = Vec::new();
        for f in frames {
            chunk.extend_from_slice(f);
        }
        chunk.push(marker);
        for f in frames {
            chunk.push(f.len() as u8);
        }
        chunk.push(marker);
        chunk
    }

    fn assert_flat(frame: &DecodedFrame, value: u16) {
        for p in 0..3 {
            assert!(frame.cropped_plane(p).iter().all(|&v| v == value), "plane {p}");
        }
    }

    #[test]
    fn test_gray_key_frame() {
        init_logger();
        let mut dec = Vp9Decoder::new();
        let frames = dec.decode_chunk(&gray_key_frame()).unwrap();
        assert_eq!(frames.len(), 1);
        let f = &frames[0];
        assert!(f.shown && f.key_frame);
        assert_eq!((f.width, f.height), (64, 64));
        assert_eq!((f.render_width, f.render_height), (64, 64));
        assert_eq!(f.plane_size(1), (32, 32));
        assert_eq!(f.color, ColorConfig::default());
        assert_flat(f, 128);
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let stream = [gray_key_frame(), inter_frame(true, 0b001), inter_frame(true, 0b010)];
        let run = || {
            let mut dec = Vp9Decoder::new();
            let mut out = Vec::new();
            for chunk in stream.iter() {
                out.extend(dec.decode_chunk(chunk).unwrap());
            }
            out
        };
        let (a, b) = (run(), run());
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.planes, y.planes);
        }
        assert!(!a[1].key_frame && a[1].shown);
        assert_flat(&a[2], 128);
    }

    #[test]
    fn test_coef_update_factor_after_key_frame() {
        let mut dec = Vp9Decoder::new();
        // every 4x4 luma block of these frames ends on its first token
        let eob_prob = |dec: &Vp9Decoder| dec.probs.saved(0).coef[0][0][0][0][0][0];
        let adapt = |pre: u8, factor: u32| merge_prob(pre, 256, 0, COEF_COUNT_SAT, factor);

        dec.decode_chunk(&gray_key_frame()).unwrap();
        let after_key = eob_prob(&dec);
        assert_eq!(after_key, adapt(DEFAULT_COEF_PROBS[0][0][0][0][0][0], COEF_MAX_UPDATE_FACTOR));

        dec.decode_chunk(&inter_frame(true, 0b001)).unwrap();
        let first_inter = eob_prob(&dec);
        assert_eq!(first_inter, adapt(after_key, COEF_MAX_UPDATE_FACTOR_AFTER_KEY));
        assert_ne!(first_inter, adapt(after_key, COEF_MAX_UPDATE_FACTOR));

        dec.decode_chunk(&inter_frame(true, 0b001)).unwrap();
        assert_eq!(eob_prob(&dec), adapt(first_inter, COEF_MAX_UPDATE_FACTOR));
    }

    /// 64x64 picture with luma `x + 3 * y` and flat chroma.
    fn ramp_picture() -> RefPicture {
        let mut planes = [
            Plane::new(64, 64).unwrap(),
            Plane::new(32, 32).unwrap(),
            Plane::new(32, 32).unwrap(),
        ];
        for y in 0..64 {
            for x in 0..64 {
                planes[0].set(x, y, (x + 3 * y) as u16);
            }
        }
        planes[1].fill(100);
        planes[2].fill(100);
        RefPicture {
            width:         64,
            height:        64,
            render_width:  64,
            render_height: 64,
            color:         ColorConfig::default(),
            planes,
        }
    }

    /// One skipped 64x64 NEWMV block from LAST moved one row down and two
    /// columns right (1/8 sample units: row 8, col 16).
    fn newmv_tile() -> Vec<u8> {
        let p = FrameProbs::default();
        let mut enc = BoolEncoder::new();
        enc.put(false, 128);
        enc.put(false, p.partition[12][0]);     // 64x64 without neighbours: NONE
        enc.put(true, p.skip[0]);
        enc.put(true, p.is_inter[0]);
        enc.put(false, p.single_ref[2][0]);     // LAST
        for &q in &p.inter_mode[COUNTER_TO_CONTEXT[0]] {
            enc.put(true, q);                   // NEWMV
        }
        for &q in &p.mv_joint {
            enc.put(true, q);                   // row and col nonzero
        }
        // row 8: class 0, integer 0, fraction 3, implied hp
        let row = &p.mv_comp[0];
        enc.put(false, row.sign);
        enc.put(false, row.classes[0]);
        enc.put(false, row.class0);
        for &q in &row.class0_fr[0] {
            enc.put(true, q);
        }
        // col 16: class 0, integer 1, fraction 3, implied hp
        let col = &p.mv_comp[1];
        enc.put(false, col.sign);
        enc.put(false, col.classes[0]);
        enc.put(true, col.class0);
        for &q in &col.class0_fr[1] {
            enc.put(true, q);
        }
        enc.finish()
    }

    #[test]
    fn test_newmv_block_predicts_from_last() {
        init_logger();
        let mut dec = Vp9Decoder::new();
        dec.refs.refresh(0b111, ramp_picture());

        let frames = dec.decode_chunk(&inter_frame_with_tile(true, 0, &newmv_tile())).unwrap();
        assert_eq!(frames.len(), 1);
        let f = &frames[0];
        assert!(!f.key_frame);
        for y in 0..64 {
            for x in 0..64 {
                let expected = (x + 2).min(63) + 3 * (y + 1).min(63);
                assert_eq!(f.planes[0].get(x, y) as usize, expected, "luma ({x}, {y})");
            }
        }
        assert_flat_chroma(f, 100);

        let mvs = dec.prev.mvs.as_ref().unwrap();
        let expected = PrevMvInfo {
            ref_frame: [RefFrame::Last, RefFrame::None],
            mv:        [MotionVector::new(8, 16), MotionVector::ZERO],
        };
        assert_eq!(*mvs.get(0, 0), expected);
        assert_eq!(*mvs.get(7, 7), expected);
    }

    fn assert_flat_chroma(frame: &DecodedFrame, value: u16) {
        for p in 1..3 {
            assert!(frame.cropped_plane(p).iter().all(|&v| v == value), "plane {p}");
        }
    }

    #[test]
    fn test_inter_frame_needs_references() {
        let mut dec = Vp9Decoder::new();
        let err = dec.decode_chunk(&inter_frame(true, 0)).err().unwrap();
        assert!(matches!(err, DecoderError::Corrupted(_)));
    }

    #[test]
    fn test_hidden_frame_and_show_existing() {
        let mut dec = Vp9Decoder::new();
        dec.decode_chunk(&gray_key_frame()).unwrap();
        assert!(dec.decode_chunk(&inter_frame(false, 0b1000)).unwrap().is_empty());

        let frames = dec.decode_chunk(&show_existing(3)).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].shown && !frames[0].key_frame);
        assert_flat(&frames[0], 128);

        let mut dec = Vp9Decoder::with_config(DecoderConfig { output_hidden_frames: true, ..DecoderConfig::default() });
        dec.decode_chunk(&gray_key_frame()).unwrap();
        let frames = dec.decode_chunk(&inter_frame(false, 0)).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].shown);
    }

    #[test]
    fn test_show_existing_of_empty_slot() {
        let mut dec = Vp9Decoder::new();
        let err = dec.decode_chunk(&show_existing(5)).err().unwrap();
        assert!(matches!(err, DecoderError::Corrupted(_)));
    }

    #[test]
    fn test_superframe_yields_shown_frames() {
        let mut dec = Vp9Decoder::new();
        dec.decode_chunk(&gray_key_frame()).unwrap();
        let hidden = inter_frame(false, 0b0100_0000);
        let chunk = superframe(&[hidden.as_slice(), show_existing(6).as_slice()]);
        let frames = dec.decode_chunk(&chunk).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].shown);
        assert_eq!((frames[0].width, frames[0].height), (64, 64));
    }

    #[test]
    fn test_size_limit() {
        let config = DecoderConfig { max_width: 32, max_height: 32, output_hidden_frames: false };
        let mut dec = Vp9Decoder::with_config(config);
        let err = dec.decode_chunk(&gray_key_frame()).err().unwrap();
        assert!(matches!(err, DecoderError::OutOfMemory(_)));
    }

    #[test]
    fn test_truncated_compressed_header() {
        let mut frame = gray_key_frame();
        frame.truncate(frame.len() - HEADER_BYTES - TILE_BYTES + 2);
        let mut dec = Vp9Decoder::new();
        assert!(matches!(dec.decode_chunk(&frame), Err(DecoderError::Corrupted(_))));
    }

    #[test]
    fn test_missing_tile_data() {
        let mut frame = gray_key_frame();
        frame.truncate(frame.len() - TILE_BYTES);
        let mut dec = Vp9Decoder::new();
        assert!(matches!(dec.decode_chunk(&frame), Err(DecoderError::Corrupted(_))));
    }
}
