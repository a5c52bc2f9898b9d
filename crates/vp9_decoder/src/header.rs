//! Uncompressed and compressed frame header parsing.
//!
//! The uncompressed header is plain bit fields read with [`BitReader`]; the
//! compressed header that follows it is range coded and carries forward
//! probability updates, which are applied straight to the working
//! [`FrameProbs`].

use crate::bitreader::BitReader;
use crate::bool_decoder::BoolDecoder;
use crate::error::{DecoderError, Result};
use crate::probability::{diff_update_prob, update_mv_prob, FrameProbs};
use crate::types::*;

pub const NUM_REF_FRAMES: usize = 8;
pub const MAX_SEGMENTS: usize = 8;
pub const SEG_LVL_ALT_Q: usize = 0;
pub const SEG_LVL_ALT_L: usize = 1;
pub const SEG_LVL_REF_FRAME: usize = 2;
pub const SEG_LVL_SKIP: usize = 3;

const FRAME_MARKER: u32 = 2;
const SYNC_CODE: [u8; 3] = [0x49, 0x83, 0x42];
const SEG_FEATURE_BITS: [u8; 4] = [8, 6, 2, 0];
const SEG_FEATURE_SIGNED: [bool; 4] = [true, true, false, false];
const MIN_TILE_WIDTH_B64: usize = 4;
const MAX_TILE_WIDTH_B64: usize = 64;

// ─── Persistent parameter sets ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopFilterParams {
    pub level:         u8,
    pub sharpness:     u8,
    pub delta_enabled: bool,
    pub delta_update:  bool,
    pub ref_deltas:    [i8; 4],
    pub mode_deltas:   [i8; 2],
}

impl Default for LoopFilterParams {
    fn default() -> Self {
        LoopFilterParams {
            level:         0,
            sharpness:     0,
            delta_enabled: false,
            delta_update:  false,
            ref_deltas:    [1, 0, -1, -1],
            mode_deltas:   [0, 0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentFeature {
    pub enabled: bool,
    pub value:   i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationParams {
    pub enabled:         bool,
    pub update_map:      bool,
    pub temporal_update: bool,
    pub update_data:     bool,
    pub abs_delta:       bool,
    pub tree_probs:      [u8; 7],
    pub pred_probs:      [u8; 3],
    pub features:        [[SegmentFeature; 4]; MAX_SEGMENTS],
}

impl Default for SegmentationParams {
    fn default() -> Self {
        SegmentationParams {
            enabled:         false,
            update_map:      false,
            temporal_update: false,
            update_data:     false,
            abs_delta:       false,
            tree_probs:      [255; 7],
            pred_probs:      [255; 3],
            features:        [[SegmentFeature::default(); 4]; MAX_SEGMENTS],
        }
    }
}

impl SegmentationParams {
    pub fn feature(&self, segment_id: u8, feature: usize) -> Option<i32> {
        let f = self.features[segment_id as usize & 7][feature];
        (self.enabled && f.enabled).then_some(f.value)
    }

    /// Quantizer index of a segment after the `ALT_Q` feature.
    pub fn qindex(&self, segment_id: u8, base_q_idx: u8) -> u8 {
        match self.feature(segment_id, SEG_LVL_ALT_Q) {
            Some(v) if self.abs_delta => v.clamp(0, 255) as u8,
            Some(v) => (base_q_idx as i32 + v).clamp(0, 255) as u8,
            None => base_q_idx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantParams {
    pub base_q_idx:    u8,
    pub delta_q_y_dc:  i32,
    pub delta_q_uv_dc: i32,
    pub delta_q_uv_ac: i32,
}

impl QuantParams {
    pub fn lossless(&self) -> bool {
        self.base_q_idx == 0 && self.delta_q_y_dc == 0 && self.delta_q_uv_dc == 0 && self.delta_q_uv_ac == 0
    }
}

/// Header state that carries over from one frame to the next.
#[derive(Debug, Clone, Default)]
pub struct HeaderState {
    pub color:        ColorConfig,
    pub loop_filter:  LoopFilterParams,
    pub segmentation: SegmentationParams,
}

impl HeaderState {
    /// Reset loop filter deltas and segmentation features.
    pub fn setup_past_independence(&mut self) {
        self.loop_filter.ref_deltas = [1, 0, -1, -1];
        self.loop_filter.mode_deltas = [0, 0];
        self.segmentation.abs_delta = false;
        self.segmentation.features = [[SegmentFeature::default(); 4]; MAX_SEGMENTS];
    }
}

// ─── Frame header ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FrameHeader {
    pub profile:                  u8,
    pub show_existing_frame:      bool,
    pub frame_to_show:            u8,
    pub frame_type:               FrameType,
    pub show_frame:               bool,
    pub error_resilient_mode:     bool,
    pub intra_only:               bool,
    pub reset_frame_context:      u8,
    pub color:                    ColorConfig,
    pub width:                    u32,
    pub height:                   u32,
    pub render_width:             u32,
    pub render_height:            u32,
    pub refresh_frame_flags:      u8,
    pub ref_frame_idx:            [u8; 3],
    /// Indexed by [`RefFrame`].
    pub ref_frame_sign_bias:      [bool; 5],
    pub allow_high_precision_mv:  bool,
    pub interp_filter:            InterpFilter,
    pub refresh_frame_context:    bool,
    pub frame_parallel_decoding_mode: bool,
    pub frame_context_idx:        u8,
    pub loop_filter:              LoopFilterParams,
    pub quant:                    QuantParams,
    pub segmentation:             SegmentationParams,
    pub tile_cols_log2:           u8,
    pub tile_rows_log2:           u8,
    pub header_size_in_bytes:     u16,
    /// Bytes taken by the uncompressed header.
    pub uncompressed_size:        usize,
}

impl FrameHeader {
    #[inline]
    pub fn is_intra(&self) -> bool {
        self.frame_type == FrameType::Key || self.intra_only
    }

    #[inline]
    pub fn mi_cols(&self) -> usize { (self.width as usize + 7) >> 3 }

    #[inline]
    pub fn mi_rows(&self) -> usize { (self.height as usize + 7) >> 3 }

    #[inline]
    pub fn sb64_cols(&self) -> usize { (self.mi_cols() + 7) >> 3 }

    #[inline]
    pub fn sb64_rows(&self) -> usize { (self.mi_rows() + 7) >> 3 }

    pub fn lossless(&self) -> bool {
        self.quant.lossless()
    }

    /// Inter frames need full reset of past state too when error resilient.
    pub fn resets_past(&self) -> bool {
        self.is_intra() || self.error_resilient_mode
    }
}

/// Values decoded from the compressed header that are not probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedHeader {
    pub tx_mode:        TxMode,
    pub reference_mode: ReferenceMode,
    pub comp_fixed_ref: RefFrame,
    pub comp_var_ref:   [RefFrame; 2],
}

// ─── Uncompressed header ─────────────────────────────────────────────────────

/// Parse the uncompressed header. `ref_sizes` gives the frame size stored in
/// each reference slot, if any.
pub fn parse_uncompressed_header(
    data: &[u8],
    state: &mut HeaderState,
    ref_sizes: &[Option<(u32, u32)>; NUM_REF_FRAMES],
) -> Result<FrameHeader> {
    let mut br = BitReader::new(data);
    let mut h = FrameHeader::default();

    if br.read_bits(2)? != FRAME_MARKER {
        return Err(DecoderError::corrupted("Frame marker must be 2"));
    }
    let profile_low  = br.read_bits(1)?;
    let profile_high = br.read_bits(1)?;
    h.profile = ((profile_high << 1) | profile_low) as u8;
    if h.profile == 3 && br.read_bit()? {
        return Err(DecoderError::corrupted("Reserved bit after profile 3 must be zero"));
    }

    h.show_existing_frame = br.read_bit()?;
    if h.show_existing_frame {
        h.frame_to_show = br.read_bits(3)? as u8;
        h.show_frame = true;
        h.color = state.color;
        h.uncompressed_size = br.bytes_consumed();
        return Ok(h);
    }

    h.frame_type = if br.read_bit()? { FrameType::NonKey } else { FrameType::Key };
    h.show_frame = br.read_bit()?;
    h.error_resilient_mode = br.read_bit()?;

    if h.frame_type == FrameType::Key {
        read_sync_code(&mut br)?;
        state.color = read_color_config(&mut br, h.profile)?;
        read_frame_size(&mut br, &mut h)?;
        read_render_size(&mut br, &mut h)?;
        h.refresh_frame_flags = 0xff;
    } else {
        h.intra_only = if h.show_frame { false } else { br.read_bit()? };
        h.reset_frame_context = if h.error_resilient_mode { 0 } else { br.read_bits(2)? as u8 };
        if h.intra_only {
            read_sync_code(&mut br)?;
            state.color = if h.profile > 0 {
                read_color_config(&mut br, h.profile)?
            } else {
                ColorConfig::default()
            };
            h.refresh_frame_flags = br.read_f8()?;
            read_frame_size(&mut br, &mut h)?;
            read_render_size(&mut br, &mut h)?;
        } else {
            h.refresh_frame_flags = br.read_f8()?;
            for i in 0..3 {
                h.ref_frame_idx[i] = br.read_bits(3)? as u8;
                h.ref_frame_sign_bias[RefFrame::INTER[i] as usize] = br.read_bit()?;
            }
            read_frame_size_with_refs(&mut br, &mut h, ref_sizes)?;
            h.allow_high_precision_mv = br.read_bit()?;
            h.interp_filter = if br.read_bit()? {
                InterpFilter::Switchable
            } else {
                InterpFilter::from_literal(br.read_bits(2)?)
            };
        }
    }
    h.color = state.color;

    if !h.error_resilient_mode {
        h.refresh_frame_context = br.read_bit()?;
        h.frame_parallel_decoding_mode = br.read_bit()?;
    } else {
        h.refresh_frame_context = false;
        h.frame_parallel_decoding_mode = true;
    }
    h.frame_context_idx = br.read_bits(2)? as u8;

    if h.resets_past() {
        state.setup_past_independence();
    }

    read_loop_filter_params(&mut br, &mut state.loop_filter)?;
    h.loop_filter = state.loop_filter.clone();
    h.quant = read_quant_params(&mut br)?;
    read_segmentation_params(&mut br, &mut state.segmentation)?;
    h.segmentation = state.segmentation.clone();
    read_tile_info(&mut br, &mut h)?;

    h.header_size_in_bytes = br.read_f16()?;
    if h.header_size_in_bytes == 0 {
        return Err(DecoderError::corrupted("Compressed header size must be non-zero"));
    }
    h.uncompressed_size = br.bytes_consumed();

    log::debug!(
        "vp9 frame: {:?} intra_only={} {}x{} show={} refresh={:#04x} q={} ctx={}",
        h.frame_type, h.intra_only, h.width, h.height, h.show_frame,
        h.refresh_frame_flags, h.quant.base_q_idx, h.frame_context_idx,
    );
    Ok(h)
}

fn read_sync_code(br: &mut BitReader<'_>) -> Result<()> {
    for &expected in SYNC_CODE.iter() {
        if br.read_f8()? != expected {
            return Err(DecoderError::corrupted("Invalid frame sync code"));
        }
    }
    Ok(())
}

fn read_color_config(br: &mut BitReader<'_>, profile: u8) -> Result<ColorConfig> {
    let bit_depth = if profile >= 2 {
        if br.read_bit()? { 12 } else { 10 }
    } else {
        8
    };
    let color_space = ColorSpace::from_bits(br.read_bits(3)?);
    let mut cfg = ColorConfig { bit_depth, color_space, ..ColorConfig::default() };

    if color_space != ColorSpace::Rgb {
        cfg.color_range = if br.read_bit()? { ColorRange::Full } else { ColorRange::Studio };
        if profile == 1 || profile == 3 {
            cfg.subsampling_x = br.read_bit()?;
            cfg.subsampling_y = br.read_bit()?;
            if cfg.subsampling_x && cfg.subsampling_y {
                return Err(DecoderError::corrupted("4:2:0 is not allowed in profile 1 or 3"));
            }
            if br.read_bit()? {
                return Err(DecoderError::corrupted("Reserved bit after subsampling must be zero"));
            }
        } else {
            cfg.subsampling_x = true;
            cfg.subsampling_y = true;
        }
    } else {
        cfg.color_range = ColorRange::Full;
        if profile == 1 || profile == 3 {
            cfg.subsampling_x = false;
            cfg.subsampling_y = false;
            if br.read_bit()? {
                return Err(DecoderError::corrupted("Reserved bit after subsampling must be zero"));
            }
        } else {
            return Err(DecoderError::corrupted("RGB is not allowed in profile 0 or 2"));
        }
    }
    Ok(cfg)
}

fn read_frame_size(br: &mut BitReader<'_>, h: &mut FrameHeader) -> Result<()> {
    h.width  = br.read_f16()? as u32 + 1;
    h.height = br.read_f16()? as u32 + 1;
    Ok(())
}

fn read_render_size(br: &mut BitReader<'_>, h: &mut FrameHeader) -> Result<()> {
    if br.read_bit()? {
        h.render_width  = br.read_f16()? as u32 + 1;
        h.render_height = br.read_f16()? as u32 + 1;
    } else {
        h.render_width  = h.width;
        h.render_height = h.height;
    }
    Ok(())
}

fn read_frame_size_with_refs(
    br: &mut BitReader<'_>,
    h: &mut FrameHeader,
    ref_sizes: &[Option<(u32, u32)>; NUM_REF_FRAMES],
) -> Result<()> {
    let mut found = false;
    for i in 0..3 {
        if br.read_bit()? {
            let slot = h.ref_frame_idx[i] as usize;
            let (w, h_) = ref_sizes[slot].ok_or_else(|| {
                DecoderError::corrupted(format!("Frame size copied from empty reference slot {slot}"))
            })?;
            h.width  = w;
            h.height = h_;
            found = true;
            break;
        }
    }
    if !found {
        read_frame_size(br, h)?;
    }
    read_render_size(br, h)
}

fn read_loop_filter_params(br: &mut BitReader<'_>, lf: &mut LoopFilterParams) -> Result<()> {
    lf.level         = br.read_bits(6)? as u8;
    lf.sharpness     = br.read_bits(3)? as u8;
    lf.delta_enabled = br.read_bit()?;
    lf.delta_update  = false;
    if lf.delta_enabled {
        lf.delta_update = br.read_bit()?;
        if lf.delta_update {
            for d in lf.ref_deltas.iter_mut() {
                if br.read_bit()? { *d = br.read_s(6)? as i8; }
            }
            for d in lf.mode_deltas.iter_mut() {
                if br.read_bit()? { *d = br.read_s(6)? as i8; }
            }
        }
    }
    Ok(())
}

fn read_delta_q(br: &mut BitReader<'_>) -> Result<i32> {
    if br.read_bit()? { br.read_s(4) } else { Ok(0) }
}

fn read_quant_params(br: &mut BitReader<'_>) -> Result<QuantParams> {
    Ok(QuantParams {
        base_q_idx:    br.read_f8()?,
        delta_q_y_dc:  read_delta_q(br)?,
        delta_q_uv_dc: read_delta_q(br)?,
        delta_q_uv_ac: read_delta_q(br)?,
    })
}

fn read_prob(br: &mut BitReader<'_>) -> Result<u8> {
    if br.read_bit()? { br.read_f8() } else { Ok(255) }
}

fn read_segmentation_params(br: &mut BitReader<'_>, seg: &mut SegmentationParams) -> Result<()> {
    seg.update_map = false;
    seg.update_data = false;
    seg.enabled = br.read_bit()?;
    if !seg.enabled { return Ok(()); }

    seg.update_map = br.read_bit()?;
    if seg.update_map {
        for p in seg.tree_probs.iter_mut() {
            *p = read_prob(br)?;
        }
        seg.temporal_update = br.read_bit()?;
        for p in seg.pred_probs.iter_mut() {
            *p = if seg.temporal_update { read_prob(br)? } else { 255 };
        }
    }

    seg.update_data = br.read_bit()?;
    if seg.update_data {
        seg.abs_delta = br.read_bit()?;
        for segment in seg.features.iter_mut() {
            for (j, feature) in segment.iter_mut().enumerate() {
                *feature = SegmentFeature::default();
                if br.read_bit()? {
                    let mut value = br.read_bits(SEG_FEATURE_BITS[j])? as i32;
                    if SEG_FEATURE_SIGNED[j] && br.read_bit()? {
                        value = -value;
                    }
                    *feature = SegmentFeature { enabled: true, value };
                }
            }
        }
    }
    Ok(())
}

fn min_log2_tile_cols(sb64_cols: usize) -> u8 {
    let mut min_log2 = 0;
    while (MAX_TILE_WIDTH_B64 << min_log2) < sb64_cols {
        min_log2 += 1;
    }
    min_log2
}

fn max_log2_tile_cols(sb64_cols: usize) -> u8 {
    let mut max_log2 = 1;
    while (sb64_cols >> max_log2) >= MIN_TILE_WIDTH_B64 {
        max_log2 += 1;
    }
    max_log2 - 1
}

fn read_tile_info(br: &mut BitReader<'_>, h: &mut FrameHeader) -> Result<()> {
    let sb64_cols = h.sb64_cols();
    let min_log2 = min_log2_tile_cols(sb64_cols);
    let max_log2 = max_log2_tile_cols(sb64_cols);
    h.tile_cols_log2 = min_log2;
    while h.tile_cols_log2 < max_log2 {
        if !br.read_bit()? { break; }
        h.tile_cols_log2 += 1;
    }
    h.tile_rows_log2 = br.read_bits(1)? as u8;
    if h.tile_rows_log2 != 0 {
        h.tile_rows_log2 += br.read_bits(1)? as u8;
    }
    Ok(())
}

/// First mi column (or row) of tile `tile_num` out of `1 << log2` tiles.
pub fn get_tile_offset(tile_num: usize, mis: usize, log2: u8) -> usize {
    let sbs = (mis + 7) >> 3;
    let offset = ((tile_num * sbs) >> log2) << 3;
    offset.min(mis)
}

// ─── Compressed header ───────────────────────────────────────────────────────

fn read_tx_mode(bd: &mut BoolDecoder<'_>, lossless: bool) -> TxMode {
    if lossless { return TxMode::Only4x4; }
    match bd.read_literal(2) {
        0 => TxMode::Only4x4,
        1 => TxMode::Allow8x8,
        2 => TxMode::Allow16x16,
        _ => if bd.read_flag() { TxMode::Select } else { TxMode::Allow32x32 },
    }
}

fn read_coef_probs(bd: &mut BoolDecoder<'_>, probs: &mut FrameProbs, tx_mode: TxMode) {
    let max_tx = tx_mode.largest_tx() as usize;
    for tx in probs.coef.iter_mut().take(max_tx + 1) {
        if !bd.read_flag() { continue; }
        for plane in tx.iter_mut() {
            for reference in plane.iter_mut() {
                for (band, contexts) in reference.iter_mut().enumerate() {
                    let nctx = if band == 0 { 3 } else { 6 };
                    for ctx in contexts.iter_mut().take(nctx) {
                        for p in ctx.iter_mut() {
                            diff_update_prob(bd, p);
                        }
                    }
                }
            }
        }
    }
}

fn compound_reference_allowed(h: &FrameHeader) -> bool {
    let last = h.ref_frame_sign_bias[RefFrame::Last as usize];
    h.ref_frame_sign_bias[RefFrame::Golden as usize] != last
        || h.ref_frame_sign_bias[RefFrame::AltRef as usize] != last
}

/// Pick the fixed and variable references of compound prediction.
pub fn setup_compound_reference_mode(h: &FrameHeader) -> (RefFrame, [RefFrame; 2]) {
    let bias = |r: RefFrame| h.ref_frame_sign_bias[r as usize];
    if bias(RefFrame::Last) == bias(RefFrame::Golden) {
        (RefFrame::AltRef, [RefFrame::Last, RefFrame::Golden])
    } else if bias(RefFrame::Last) == bias(RefFrame::AltRef) {
        (RefFrame::Golden, [RefFrame::Last, RefFrame::AltRef])
    } else {
        (RefFrame::Last, [RefFrame::Golden, RefFrame::AltRef])
    }
}

fn read_mv_probs(bd: &mut BoolDecoder<'_>, probs: &mut FrameProbs, allow_hp: bool) {
    for p in probs.mv_joint.iter_mut() {
        update_mv_prob(bd, p);
    }
    for comp in probs.mv_comp.iter_mut() {
        update_mv_prob(bd, &mut comp.sign);
        for p in comp.classes.iter_mut() {
            update_mv_prob(bd, p);
        }
        update_mv_prob(bd, &mut comp.class0);
        for p in comp.bits.iter_mut() {
            update_mv_prob(bd, p);
        }
    }
    for comp in probs.mv_comp.iter_mut() {
        for fr in comp.class0_fr.iter_mut() {
            for p in fr.iter_mut() {
                update_mv_prob(bd, p);
            }
        }
        for p in comp.fr.iter_mut() {
            update_mv_prob(bd, p);
        }
    }
    if allow_hp {
        for comp in probs.mv_comp.iter_mut() {
            update_mv_prob(bd, &mut comp.class0_hp);
            update_mv_prob(bd, &mut comp.hp);
        }
    }
}

/// Parse the compressed header in `data` (exactly `header_size_in_bytes`
/// long) and apply its probability deltas to `probs`.
pub fn parse_compressed_header(data: &[u8], h: &FrameHeader, probs: &mut FrameProbs) -> Result<CompressedHeader> {
    let mut bd = BoolDecoder::new(data, h.header_size_in_bytes as usize)?;
    let mut ch = CompressedHeader::default();

    ch.tx_mode = read_tx_mode(&mut bd, h.lossless());
    if ch.tx_mode == TxMode::Select {
        for ctx in 0..2 {
            for p in probs.tx8[ctx].iter_mut() { diff_update_prob(&mut bd, p); }
        }
        for ctx in 0..2 {
            for p in probs.tx16[ctx].iter_mut() { diff_update_prob(&mut bd, p); }
        }
        for ctx in 0..2 {
            for p in probs.tx32[ctx].iter_mut() { diff_update_prob(&mut bd, p); }
        }
    }
    read_coef_probs(&mut bd, probs, ch.tx_mode);
    for p in probs.skip.iter_mut() {
        diff_update_prob(&mut bd, p);
    }

    if !h.is_intra() {
        for ctx in probs.inter_mode.iter_mut() {
            for p in ctx.iter_mut() { diff_update_prob(&mut bd, p); }
        }
        if h.interp_filter == InterpFilter::Switchable {
            for ctx in probs.interp_filter.iter_mut() {
                for p in ctx.iter_mut() { diff_update_prob(&mut bd, p); }
            }
        }
        for p in probs.is_inter.iter_mut() {
            diff_update_prob(&mut bd, p);
        }

        ch.reference_mode = ReferenceMode::Single;
        if compound_reference_allowed(h) && bd.read_flag() {
            ch.reference_mode = if bd.read_flag() { ReferenceMode::Select } else { ReferenceMode::Compound };
        }
        if ch.reference_mode != ReferenceMode::Single {
            let (fixed, var) = setup_compound_reference_mode(h);
            ch.comp_fixed_ref = fixed;
            ch.comp_var_ref = var;
        }
        if ch.reference_mode == ReferenceMode::Select {
            for p in probs.comp_mode.iter_mut() { diff_update_prob(&mut bd, p); }
        }
        if ch.reference_mode != ReferenceMode::Compound {
            for ctx in probs.single_ref.iter_mut() {
                for p in ctx.iter_mut() { diff_update_prob(&mut bd, p); }
            }
        }
        if ch.reference_mode != ReferenceMode::Single {
            for p in probs.comp_ref.iter_mut() { diff_update_prob(&mut bd, p); }
        }

        for ctx in probs.y_mode.iter_mut() {
            for p in ctx.iter_mut() { diff_update_prob(&mut bd, p); }
        }
        for ctx in probs.partition.iter_mut() {
            for p in ctx.iter_mut() { diff_update_prob(&mut bd, p); }
        }
        read_mv_probs(&mut bd, probs, h.allow_high_precision_mv);
    }

    bd.exit()?;
    Ok(ch)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// MSB-first bit writer used to build headers.
    #[derive(Default)]
    pub(crate) struct BitWriter {
        pub bytes: Vec<u8>,
        nbits:     usize,
    }

    impl BitWriter {
        pub(crate) fn put(&mut self, value: u32, n: u32) {
            for i in (0..n).rev() {
                if self.nbits % 8 == 0 { self.bytes.push(0); }
                if (value >> i) & 1 != 0 {
                    let last = self.bytes.len() - 1;
                    self.bytes[last] |= 0x80 >> (self.nbits % 8);
                }
                self.nbits += 1;
            }
        }
    }

    /// Key frame header up to (and including) the compressed header size.
    pub(crate) fn key_frame_header(w: u32, h: u32, seg: bool, q: u32) -> BitWriter {
        let mut bw = BitWriter::default();
        bw.put(2, 2);               // frame marker
        bw.put(0, 2);               // profile 0
        bw.put(0, 1);               // show_existing_frame
        bw.put(0, 1);               // key frame
        bw.put(1, 1);               // show_frame
        bw.put(0, 1);               // error resilient
        bw.put(0x49, 8); bw.put(0x83, 8); bw.put(0x42, 8);
        bw.put(1, 3);               // BT.601
        bw.put(0, 1);               // studio range
        bw.put(w - 1, 16);
        bw.put(h - 1, 16);
        bw.put(0, 1);               // render size equal
        bw.put(1, 1);               // refresh_frame_context
        bw.put(0, 1);               // frame_parallel
        bw.put(0, 2);               // frame_context_idx
        bw.put(10, 6);              // filter level
        bw.put(0, 3);               // sharpness
        bw.put(0, 1);               // delta disabled
        bw.put(q, 8);               // base_q_idx
        bw.put(0, 3);               // no q deltas
        bw.put(seg as u32, 1);
        if seg {
            bw.put(0, 1);           // no map update
            bw.put(1, 1);           // data update
            bw.put(1, 1);           // abs delta
            for s in 0..8 {
                // ALT_Q on segment 3 only
                bw.put((s == 3) as u32, 1);
                if s == 3 { bw.put(40, 8); bw.put(1, 1); }
                bw.put(0, 3);
            }
        }
        bw
    }

    fn no_refs() -> [Option<(u32, u32)>; NUM_REF_FRAMES] {
        [None; NUM_REF_FRAMES]
    }

    #[test]
    fn test_frame_marker_must_be_two() {
        let mut state = HeaderState::default();
        let err = parse_uncompressed_header(&[0x40, 0, 0, 0], &mut state, &no_refs()).err().unwrap();
        match err {
            DecoderError::Corrupted(msg) => assert_eq!(msg, "Frame marker must be 2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_key_frame_refreshes_all_slots() {
        let mut bw = key_frame_header(352, 288, false, 60);
        // 6 superblocks wide: no tile column bits
        bw.put(0, 1);               // tile rows
        bw.put(17, 16);             // compressed header size
        let mut state = HeaderState::default();
        let h = parse_uncompressed_header(&bw.bytes, &mut state, &no_refs()).unwrap();
        assert_eq!(h.refresh_frame_flags, 0xff);
        assert!(h.is_intra());
        assert_eq!((h.width, h.height), (352, 288));
        assert_eq!((h.mi_cols(), h.mi_rows()), (44, 36));
        assert_eq!(h.loop_filter.level, 10);
        assert_eq!(h.quant.base_q_idx, 60);
        assert!(!h.lossless());
        assert_eq!(h.header_size_in_bytes, 17);
        assert_eq!(h.uncompressed_size, bw.bytes.len());
    }

    #[test]
    fn test_segmentation_disabled_keeps_features() {
        let mut state = HeaderState::default();
        let mut bw = key_frame_header(64, 64, true, 0);
        bw.put(0, 1);
        bw.put(1, 16);
        let h = parse_uncompressed_header(&bw.bytes, &mut state, &no_refs()).unwrap();
        assert_eq!(h.segmentation.features[3][SEG_LVL_ALT_Q], SegmentFeature { enabled: true, value: -40 });
        assert_eq!(h.segmentation.qindex(3, 0), 0);
        assert_eq!(h.segmentation.qindex(2, 7), 7);

        // an intra frame without segmentation resets the features via past
        // independence; the disabled flag then stops further reads
        let mut bw = key_frame_header(64, 64, false, 5);
        bw.put(0, 1);
        bw.put(1, 16);
        let h = parse_uncompressed_header(&bw.bytes, &mut state, &no_refs()).unwrap();
        assert!(!h.segmentation.enabled);
        assert_eq!(h.segmentation.features, [[SegmentFeature::default(); 4]; MAX_SEGMENTS]);
        assert_eq!(h.uncompressed_size, bw.bytes.len());
    }

    #[test]
    fn test_tile_offsets_are_monotonic() {
        for mis in [1usize, 7, 8, 44, 120, 513] {
            for log2 in 0..4u8 {
                let mut prev = 0;
                for t in 0..=(1usize << log2) {
                    let off = get_tile_offset(t, mis, log2);
                    assert!(off >= prev);
                    assert!(off <= mis);
                    prev = off;
                }
                assert_eq!(get_tile_offset(1 << log2, mis, log2), mis);
            }
        }
    }

    #[test]
    fn test_tile_col_bounds() {
        assert_eq!(min_log2_tile_cols(1), 0);
        assert_eq!(max_log2_tile_cols(1), 0);
        // 1920 wide: 30 superblocks, up to 4 columns
        assert_eq!(max_log2_tile_cols(30), 2);
        assert_eq!(min_log2_tile_cols(65), 1);
    }

    #[test]
    fn test_show_existing_frame() {
        let mut bw = BitWriter::default();
        bw.put(2, 2);
        bw.put(0, 2);
        bw.put(1, 1);
        bw.put(5, 3);
        let mut state = HeaderState::default();
        let h = parse_uncompressed_header(&bw.bytes, &mut state, &no_refs()).unwrap();
        assert!(h.show_existing_frame);
        assert_eq!(h.frame_to_show, 5);
    }

    #[test]
    fn test_compound_reference_setup() {
        let mut h = FrameHeader::default();
        h.ref_frame_sign_bias[RefFrame::AltRef as usize] = true;
        assert!(compound_reference_allowed(&h));
        assert_eq!(setup_compound_reference_mode(&h), (RefFrame::AltRef, [RefFrame::Last, RefFrame::Golden]));
        h.ref_frame_sign_bias[RefFrame::Golden as usize] = true;
        assert_eq!(setup_compound_reference_mode(&h), (RefFrame::Last, [RefFrame::Golden, RefFrame::AltRef]));
    }
}
