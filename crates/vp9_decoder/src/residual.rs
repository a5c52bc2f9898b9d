//! Prediction, coefficient tokens and reconstruction of one block.

use crate::block_grid::BlockInfo;
use crate::bool_decoder::{BoolDecoder, TreeSelection};
use crate::counter::{TOKEN_EOB, TOKEN_ONE, TOKEN_TWO, TOKEN_ZERO};
use crate::error::{DecoderError, Result};
use crate::frame::clip_pixel;
use crate::header::{FrameHeader, MAX_SEGMENTS};
use crate::predict::{
    chroma_sub8x8_mv, clamp_mv_to_umv_border, predict_inter_block, predict_intra, InterSource, IntraEdges,
    MvClampBlock,
};
use crate::probability::pareto_prob;
use crate::refs::ActiveRef;
use crate::tables::*;
use crate::tile::TileDecoder;
use crate::transform::inverse_transform_2d;
use crate::types::*;

/// Dequantization factors of one segment, `[dc, ac]` per plane type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentQuant {
    pub y:  [i32; 2],
    pub uv: [i32; 2],
}

pub fn segment_quantizers(h: &FrameHeader) -> [SegmentQuant; MAX_SEGMENTS] {
    let bd_idx = ((h.color.bit_depth - 8) >> 1) as usize;
    let q = &h.quant;
    let lookup = |table: &[[i32; 256]; 3], qindex: u8, delta: i32| {
        table[bd_idx][(qindex as i32 + delta).clamp(0, 255) as usize]
    };
    let mut out = [SegmentQuant::default(); MAX_SEGMENTS];
    for (seg, sq) in out.iter_mut().enumerate() {
        let qindex = h.segmentation.qindex(seg as u8, q.base_q_idx);
        *sq = SegmentQuant {
            y:  [lookup(&DC_QLOOKUP, qindex, q.delta_q_y_dc), lookup(&AC_QLOOKUP, qindex, 0)],
            uv: [lookup(&DC_QLOOKUP, qindex, q.delta_q_uv_dc), lookup(&AC_QLOOKUP, qindex, q.delta_q_uv_ac)],
        };
    }
    out
}

fn scan_order(tx: TxSize, tx_type: TxType) -> &'static [u16] {
    match (tx, tx_type) {
        (TxSize::Tx4x4, TxType::AdstDct) => &ROW_SCAN_4X4,
        (TxSize::Tx4x4, TxType::DctAdst) => &COL_SCAN_4X4,
        (TxSize::Tx4x4, _) => &DEFAULT_SCAN_4X4,
        (TxSize::Tx8x8, TxType::AdstDct) => &ROW_SCAN_8X8,
        (TxSize::Tx8x8, TxType::DctAdst) => &COL_SCAN_8X8,
        (TxSize::Tx8x8, _) => &DEFAULT_SCAN_8X8,
        (TxSize::Tx16x16, TxType::AdstDct) => &ROW_SCAN_16X16,
        (TxSize::Tx16x16, TxType::DctAdst) => &COL_SCAN_16X16,
        (TxSize::Tx16x16, _) => &DEFAULT_SCAN_16X16,
        (TxSize::Tx32x32, _) => &DEFAULT_SCAN_32X32,
    }
}

/// Context of the token at scan position `c` from the energy of its
/// already decoded neighbours.
fn coef_context(scan: &[u16], n_log2: usize, tx_type: TxType, cache: &[u8; 1024], c: usize) -> usize {
    let pos = scan[c] as usize;
    let n = 1 << n_log2;
    let (i, j) = (pos >> n_log2, pos & (n - 1));
    let (a, b) = if i > 0 && j > 0 {
        let (above, left) = (pos - n, pos - 1);
        match tx_type {
            TxType::DctAdst => (above, above),
            TxType::AdstDct => (left, left),
            _ => (above, left),
        }
    } else if i > 0 {
        (pos - n, pos - n)
    } else {
        (pos - 1, pos - 1)
    };
    (1 + cache[a] as usize + cache[b] as usize) >> 1
}

/// Magnitude of a token of two or more, before dequantization.
fn read_token_value(bd: &mut BoolDecoder<'_>, token: usize, bit_depth: u8) -> i32 {
    let (cat, nbits, base) = EXTRA_BITS[token];
    if nbits == 0 {
        return base;
    }
    let mut v = 0i32;
    if token == EXTRA_BITS.len() - 1 {
        for _ in 8..bit_depth {
            v = (v << 1) | bd.read_bool(255) as i32;
        }
    }
    for &p in &CAT_PROBS[cat][..nbits] {
        v = (v << 1) | bd.read_bool(p) as i32;
    }
    base + v
}

/// Transform type of a block: only intra luma up to 16x16 uses the
/// asymmetric kernels.
fn block_tx_type(h: &FrameHeader, b: &BlockInfo, plane: usize, tx: TxSize, mode: PredictionMode) -> TxType {
    if plane > 0 || tx == TxSize::Tx32x32 || b.is_inter() || h.lossless() {
        TxType::DctDct
    } else {
        mode_to_tx_type(mode)
    }
}

impl TileDecoder<'_, '_> {
    /// Clear the nonzero contexts under a block without residual.
    pub(crate) fn reset_skip_context(&mut self, mi_row: usize, mi_col: usize, bsize: BlockSize) {
        let color = self.params.header.color;
        let b8 = bsize.max(BlockSize::B8x8);
        for plane in 0..3 {
            let (ssx, ssy) = plane_subsampling(color, plane);
            let n4w = b8.num_4x4_wide() >> ssx as usize;
            let n4h = b8.num_4x4_high() >> ssy as usize;
            let a0 = (mi_col * 2) >> ssx as usize;
            let l0 = ((mi_row & 7) * 2) >> ssy as usize;
            self.state.above_nonzero[plane][a0..a0 + n4w].fill(false);
            self.left_nonzero[plane][l0..l0 + n4h].fill(false);
        }
    }

    /// Predict the block and add its residual. Returns whether any
    /// transform block carried coefficients.
    pub(crate) fn reconstruct_block(
        &mut self,
        mi_row: usize,
        mi_col: usize,
        b: &BlockInfo,
        have_above: bool,
        have_left: bool,
    ) -> Result<bool> {
        let h = self.params.header;
        let bit_depth = h.color.bit_depth;
        let (mi_rows, mi_cols) = (h.mi_rows(), h.mi_cols());
        if b.is_inter() {
            self.predict_inter(mi_row, mi_col, b)?;
        }

        let mut has_coeffs = false;
        for plane in 0..3 {
            let (ssx, ssy) = plane_subsampling(h.color, plane);
            let plane_size = b.size.max(BlockSize::B8x8).subsampled(ssx, ssy).ok_or_else(|| {
                DecoderError::corrupted(format!("Block {:?} is invalid for the chroma subsampling", b.size))
            })?;
            let tx = if plane == 0 { b.tx_size } else { b.size.uv_tx_size(b.tx_size, ssx, ssy) };
            let step = tx.width_4x4();
            let (w4, h4) = (plane_size.num_4x4_wide(), plane_size.num_4x4_high());
            let base_x = (mi_col * 8) >> ssx as usize;
            let base_y = (mi_row * 8) >> ssy as usize;
            let max_w4 = w4.min((((mi_cols * 8) >> ssx as usize) - base_x + 3) >> 2);
            let max_h4 = h4.min((((mi_rows * 8) >> ssy as usize) - base_y + 3) >> 2);
            let a0 = (mi_col * 2) >> ssx as usize;
            let l0 = ((mi_row & 7) * 2) >> ssy as usize;

            for y in (0..max_h4).step_by(step) {
                for x in (0..max_w4).step_by(step) {
                    let (px, py) = (base_x + 4 * x, base_y + 4 * y);
                    let mode = if plane > 0 {
                        b.uv_mode
                    } else if b.size < BlockSize::B8x8 {
                        b.sub_modes[(y << 1) + x]
                    } else {
                        b.y_mode
                    };
                    if !b.is_inter() {
                        let edges = IntraEdges {
                            have_left:    have_left || x > 0,
                            have_above:   have_above || y > 0,
                            not_on_right: x + step < w4,
                        };
                        predict_intra(&mut self.state.frame.planes[plane], px, py, tx, mode, edges, bit_depth);
                    }
                    if b.skip {
                        continue;
                    }
                    let tx_type = block_tx_type(h, b, plane, tx, mode);
                    let eob = self.read_coefs(plane, b, tx, tx_type, (a0 + x, l0 + y), (max_w4 - x, max_h4 - y));
                    if eob > 0 {
                        has_coeffs = true;
                        self.add_residual(plane, px, py, tx, tx_type);
                    }
                }
            }
        }
        Ok(has_coeffs)
    }

    fn predict_inter(&mut self, mi_row: usize, mi_col: usize, b: &BlockInfo) -> Result<()> {
        let h = self.params.header;
        let refs = self
            .params
            .refs
            .ok_or_else(|| DecoderError::corrupted("Inter block in a frame without references"))?;
        let blk = MvClampBlock {
            mi_row,
            mi_col,
            mi_rows: h.mi_rows(),
            mi_cols: h.mi_cols(),
            bw: b.size.num_8x8_wide(),
            bh: b.size.num_8x8_high(),
        };

        for plane in 0..3 {
            let (ssx, ssy) = plane_subsampling(h.color, plane);
            let plane_size = b.size.max(BlockSize::B8x8).subsampled(ssx, ssy).ok_or_else(|| {
                DecoderError::corrupted(format!("Block {:?} is invalid for the chroma subsampling", b.size))
            })?;
            let (w4, h4) = (plane_size.num_4x4_wide(), plane_size.num_4x4_high());
            let base_x = (mi_col * 8) >> ssx as usize;
            let base_y = (mi_row * 8) >> ssy as usize;

            if b.size < BlockSize::B8x8 {
                for y in 0..h4 {
                    for x in 0..w4 {
                        let i = y * w4 + x;
                        let mvs = [0, 1].map(|r| chroma_sub8x8_mv(&b.mv.map(|m| m[r]), i, ssx, ssy));
                        let src = InterSource {
                            plane, ssx, ssy,
                            x: base_x + 4 * x,
                            y: base_y + 4 * y,
                            w: 4,
                            h: 4,
                            mv: MotionVector::ZERO,
                            filter: b.interp_filter,
                        };
                        self.predict_region(refs, b, src, mvs, blk);
                    }
                }
            } else {
                let src = InterSource {
                    plane, ssx, ssy,
                    x: base_x,
                    y: base_y,
                    w: 4 * w4,
                    h: 4 * h4,
                    mv: MotionVector::ZERO,
                    filter: b.interp_filter,
                };
                self.predict_region(refs, b, src, [b.block_mv(0), b.block_mv(1)], blk);
            }
        }
        Ok(())
    }

    /// Predict one region from each reference of `b`, average compound
    /// predictions and write the part inside the plane.
    fn predict_region(
        &mut self,
        refs: &[ActiveRef; 3],
        b: &BlockInfo,
        mut src: InterSource,
        mvs: [MotionVector; 2],
        blk: MvClampBlock,
    ) {
        let bit_depth = self.params.header.color.bit_depth;
        let len = src.w * src.h;
        let num_refs = 1 + b.is_compound() as usize;
        for r in 0..num_refs {
            src.mv = clamp_mv_to_umv_border(mvs[r], blk, src.ssx, src.ssy);
            predict_inter_block(&refs[b.ref_frame[r].slot()], &src, bit_depth, &mut self.pred[r][..len]);
        }

        let [first, second] = &mut *self.pred;
        if num_refs == 2 {
            for (p, q) in first[..len].iter_mut().zip(&second[..len]) {
                *p = ((*p as u32 + *q as u32 + 1) >> 1) as u16;
            }
        }

        let out = &mut self.state.frame.planes[src.plane];
        let w = src.w.min(out.width.saturating_sub(src.x));
        let hgt = src.h.min(out.height.saturating_sub(src.y));
        for row in 0..hgt {
            for col in 0..w {
                out.set(src.x + col, src.y + row, first[row * src.w + col]);
            }
        }
    }

    /// Read the tokens of one transform block into `self.coefs` and update
    /// the nonzero contexts. `inside` is how many 4x4 columns and rows of
    /// the transform block lie inside the frame.
    fn read_coefs(
        &mut self,
        plane: usize,
        b: &BlockInfo,
        tx: TxSize,
        tx_type: TxType,
        (a_off, l_off): (usize, usize),
        inside: (usize, usize),
    ) -> usize {
        let n4 = tx.width_4x4();
        let above = &self.state.above_nonzero[plane][a_off..a_off + n4];
        let left = &self.left_nonzero[plane][l_off..l_off + n4];
        let ctx = above.iter().any(|&v| v) as usize + left.iter().any(|&v| v) as usize;

        let sq = &self.params.quant[b.segment_id as usize];
        let dq = if plane == 0 { sq.y } else { sq.uv };
        let eob = self.decode_coefs(plane, b.is_inter(), tx, tx_type, ctx, dq);

        let nonzero = eob > 0;
        for (i, a) in self.state.above_nonzero[plane][a_off..a_off + n4].iter_mut().enumerate() {
            *a = nonzero && i < inside.0;
        }
        for (i, l) in self.left_nonzero[plane][l_off..l_off + n4].iter_mut().enumerate() {
            *l = nonzero && i < inside.1;
        }
        eob
    }

    fn decode_coefs(&mut self, plane: usize, is_inter: bool, tx: TxSize, tx_type: TxType, mut ctx: usize, dq: [i32; 2]) -> usize {
        let params = self.params;
        let bit_depth = params.header.color.bit_depth;
        let (t, ptype, r) = (tx as usize, (plane > 0) as usize, is_inter as usize);
        let probs = &params.probs.coef[t][ptype][r];
        let coef_counts = &mut self.state.counts.coef[t][ptype][r];
        let eob_counts = &mut self.state.counts.eob_branch[t][ptype][r];
        let bd = &mut self.bd;
        let coefs = &mut *self.coefs;
        let cache = &mut *self.token_cache;

        let scan = scan_order(tx, tx_type);
        let n_log2 = tx.log2_4x4() + 2;
        let max_eob = 16 << (2 * t);
        let dq_shift = (tx == TxSize::Tx32x32) as u32;
        let band = |c: usize| {
            if tx == TxSize::Tx4x4 { COEFBAND_4X4[c] as usize } else { COEFBAND_8X8PLUS[c.min(31)] as usize }
        };

        let mut c = 0;
        let mut dqv = dq[0];
        while c < max_eob {
            let mut bnd = band(c);
            eob_counts[bnd][ctx] += 1;
            if !bd.read_bool(probs[bnd][ctx][0]) {
                coef_counts[bnd][ctx][TOKEN_EOB] += 1;
                break;
            }
            while !bd.read_bool(probs[bnd][ctx][1]) {
                coef_counts[bnd][ctx][TOKEN_ZERO] += 1;
                dqv = dq[1];
                cache[scan[c] as usize] = 0;
                c += 1;
                if c >= max_eob {
                    return c;
                }
                ctx = coef_context(scan, n_log2, tx_type, cache, c);
                bnd = band(c);
            }

            let p = probs[bnd][ctx];
            let (token, val) = if !bd.read_bool(p[2]) {
                coef_counts[bnd][ctx][TOKEN_ONE] += 1;
                (1, 1)
            } else {
                coef_counts[bnd][ctx][TOKEN_TWO] += 1;
                let token = bd.read_tree(TreeSelection::Tree(&COEF_CON_TREE), |i| pareto_prob(p[2], i + 3)) as usize;
                (token, read_token_value(bd, token, bit_depth))
            };
            let v = ((val as i64 * dqv as i64) >> dq_shift) as i32;
            let pos = scan[c] as usize;
            coefs[pos] = if bd.read_bool(128) { -v } else { v };
            cache[pos] = ENERGY_CLASS[token];
            c += 1;
            if c < max_eob {
                ctx = coef_context(scan, n_log2, tx_type, cache, c);
            }
            dqv = dq[1];
        }
        c
    }

    /// Inverse transform `self.coefs` and add it to the prediction at
    /// `(x, y)`, leaving the coefficient buffer zeroed.
    fn add_residual(&mut self, plane: usize, x: usize, y: usize, tx: TxSize, tx_type: TxType) {
        let h = self.params.header;
        let bit_depth = h.color.bit_depth;
        let n_log2 = tx.log2_4x4() + 2;
        let n = 1 << n_log2;
        let block = &mut self.coefs[..n * n];
        inverse_transform_2d(block, n_log2, tx_type, h.lossless(), bit_depth);

        let out = &mut self.state.frame.planes[plane];
        let w = n.min(out.width - x);
        let hgt = n.min(out.height - y);
        for i in 0..hgt {
            for j in 0..w {
                let v = out.get(x + j, y + i) as i32 + block[i * n + j];
                out.set(x + j, y + i, clip_pixel(bit_depth, v));
            }
        }
        block.fill(0);
    }
}

#[inline]
fn plane_subsampling(color: ColorConfig, plane: usize) -> (bool, bool) {
    if plane == 0 { (false, false) } else { (color.subsampling_x, color.subsampling_y) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_grid::Grid;
    use crate::bool_decoder::tests::BoolEncoder;
    use crate::header::{CompressedHeader, QuantParams, SegmentFeature};
    use crate::probability::FrameProbs;
    use crate::tile::{FrameParams, FrameState};

    enum Token {
        Zero,
        One { negative: bool },
        Two { negative: bool },
        /// Category 6 with its 14 extra bits (8-bit video).
        Cat6 { extra: u32, negative: bool },
    }

    fn band_at(tx: TxSize, c: usize) -> usize {
        if tx == TxSize::Tx4x4 { COEFBAND_4X4[c] as usize } else { COEFBAND_8X8PLUS[c.min(31)] as usize }
    }

    /// Range code the tokens of an intra luma DCT_DCT block followed by an
    /// end-of-block token. No more-coefficients flag follows a ZERO token.
    fn encode_block(tx: TxSize, tokens: &[Token]) -> Vec<u8> {
        let defaults = FrameProbs::default();
        let probs = &defaults.coef[tx as usize][0][0];
        let scan = scan_order(tx, TxType::DctDct);
        let n_log2 = tx.log2_4x4() + 2;
        let mut cache = [0u8; 1024];
        let mut ctx = 0;
        let mut after_zero = false;

        let mut enc = BoolEncoder::new();
        enc.put(false, 128);
        for (c, tok) in tokens.iter().enumerate() {
            let p = probs[band_at(tx, c)][ctx];
            if !after_zero {
                enc.put(true, p[0]);
            }
            after_zero = matches!(tok, Token::Zero);
            let token = match *tok {
                Token::Zero => {
                    enc.put(false, p[1]);
                    0
                }
                Token::One { negative } => {
                    enc.put(true, p[1]);
                    enc.put(false, p[2]);
                    enc.put(negative, 128);
                    1
                }
                Token::Two { negative } => {
                    enc.put(true, p[1]);
                    enc.put(true, p[2]);
                    enc.put(false, pareto_prob(p[2], 3));
                    enc.put(false, pareto_prob(p[2], 4));
                    enc.put(negative, 128);
                    2
                }
                Token::Cat6 { extra, negative } => {
                    enc.put(true, p[1]);
                    enc.put(true, p[2]);
                    for node in [3, 6, 8, 10] {
                        enc.put(true, pareto_prob(p[2], node));
                    }
                    for (i, &cp) in CAT_PROBS[5].iter().enumerate() {
                        enc.put((extra >> (13 - i)) & 1 != 0, cp);
                    }
                    enc.put(negative, 128);
                    10
                }
            };
            cache[scan[c] as usize] = ENERGY_CLASS[token];
            ctx = coef_context(scan, n_log2, TxType::DctDct, &cache, c + 1);
        }
        enc.put(false, probs[band_at(tx, tokens.len())][ctx][0]);
        enc.finish()
    }

    /// Run `f` on a tile decoder over `data` in a 64x64 intra frame.
    fn with_tile<R>(data: &[u8], quant: SegmentQuant, f: impl FnOnce(&mut TileDecoder<'_, '_>) -> R) -> R {
        let h = FrameHeader { width: 64, height: 64, ..FrameHeader::default() };
        let compressed = CompressedHeader::default();
        let probs = FrameProbs::default();
        let prev_seg_map = Grid::new(8, 8).unwrap();
        let params = FrameParams {
            header:       &h,
            compressed:   &compressed,
            probs:        &probs,
            refs:         None,
            prev_mvs:     None,
            prev_seg_map: &prev_seg_map,
            quant:        [quant; MAX_SEGMENTS],
        };
        let mut state = FrameState::new(&h).unwrap();
        let mut tile = TileDecoder::new(&params, &mut state, data, 0..8).unwrap();
        f(&mut tile)
    }

    #[test]
    fn test_segment_quantizers() {
        let mut h = FrameHeader::default();
        h.quant = QuantParams { base_q_idx: 60, delta_q_y_dc: -2, delta_q_uv_dc: 0, delta_q_uv_ac: 300 };
        let q = segment_quantizers(&h);
        assert_eq!(q[0].y, [DC_QLOOKUP[0][58], AC_QLOOKUP[0][60]]);
        assert_eq!(q[0].uv, [DC_QLOOKUP[0][60], AC_QLOOKUP[0][255]]);
        assert_eq!(q[7], q[0]);

        h.segmentation.enabled = true;
        h.segmentation.abs_delta = true;
        h.segmentation.features[3][0] = SegmentFeature { enabled: true, value: 0 };
        let q = segment_quantizers(&h);
        assert_eq!(q[3].y[1], AC_QLOOKUP[0][0]);
        assert_ne!(q[3], q[0]);

        h.color.bit_depth = 10;
        let q = segment_quantizers(&h);
        assert_eq!(q[0].y[1], AC_QLOOKUP[1][60]);
    }

    #[test]
    fn test_scan_orders_are_permutations() {
        for tx in [TxSize::Tx4x4, TxSize::Tx8x8, TxSize::Tx16x16, TxSize::Tx32x32] {
            for tx_type in [TxType::DctDct, TxType::AdstDct, TxType::DctAdst, TxType::AdstAdst] {
                let scan = scan_order(tx, tx_type);
                let mut seen = vec![false; scan.len()];
                for &p in scan {
                    assert!(!seen[p as usize]);
                    seen[p as usize] = true;
                }
                assert_eq!(scan.len(), tx.width() * tx.width());
            }
        }
    }

    #[test]
    fn test_coef_context_neighbours() {
        let mut cache = [0u8; 1024];
        // 4x4 raster positions: 1 is right of 0, 4 is below 0, 5 has both.
        cache[1] = 2;
        cache[4] = 4;
        let scan: [u16; 4] = [0, 5, 1, 4];
        assert_eq!(coef_context(&scan, 2, TxType::DctDct, &cache, 1), (1 + 2 + 4) >> 1);
        assert_eq!(coef_context(&scan, 2, TxType::DctAdst, &cache, 1), (1 + 2 + 2) >> 1);
        assert_eq!(coef_context(&scan, 2, TxType::AdstDct, &cache, 1), (1 + 4 + 4) >> 1);
        // first row looks left, first column looks up
        cache[0] = 3;
        assert_eq!(coef_context(&scan, 2, TxType::DctDct, &cache, 2), (1 + 3 + 3) >> 1);
        assert_eq!(coef_context(&scan, 2, TxType::DctDct, &cache, 3), (1 + 3 + 3) >> 1);
    }

    #[test]
    fn test_token_values() {
        let mut enc = BoolEncoder::new();
        enc.put(false, 128);
        // cat1 extra bit 1 -> 6
        enc.put(true, CAT_PROBS[0][0]);
        // cat6 at 10 bits: two high bits then 14 low bits, value 0b01 << 14 | 3
        enc.put(false, 255);
        enc.put(true, 255);
        for i in 0..14 {
            enc.put(i >= 12, CAT_PROBS[5][i]);
        }
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data, data.len()).unwrap();
        assert_eq!(read_token_value(&mut bd, 5, 8), 6);
        assert_eq!(read_token_value(&mut bd, 10, 10), 67 + (1 << 14) + 3);
        assert_eq!(read_token_value(&mut bd, 3, 8), 3);
    }

    #[test]
    fn test_read_coefs_4x4() {
        let tokens = [
            Token::One { negative: false },
            Token::Zero,
            Token::Zero,
            Token::One { negative: true },
            Token::Two { negative: false },
            Token::Cat6 { extra: 5, negative: true },
        ];
        let data = encode_block(TxSize::Tx4x4, &tokens);
        let quant = SegmentQuant { y: [8, 20], uv: [8, 20] };
        with_tile(&data, quant, |tile| {
            let b = BlockInfo::default();
            let eob = tile.read_coefs(0, &b, TxSize::Tx4x4, TxType::DctDct, (0, 0), (1, 1));
            assert_eq!(eob, 6);

            let scan = &DEFAULT_SCAN_4X4;
            let coefs = &tile.coefs;
            // dc factor only at scan position 0
            assert_eq!(coefs[scan[0] as usize], 8);
            assert_eq!(coefs[scan[1] as usize], 0);
            assert_eq!(coefs[scan[2] as usize], 0);
            assert_eq!(coefs[scan[3] as usize], -20);
            assert_eq!(coefs[scan[4] as usize], 40);
            assert_eq!(coefs[scan[5] as usize], -(67 + 5) * 20);
            assert_eq!(coefs.iter().filter(|&&v| v != 0).count(), 4);

            // the two tokens after a ZERO skip the end-of-block check
            let counts = &tile.state.counts;
            let checks: u32 = counts.eob_branch[0][0][0].iter().flatten().sum();
            assert_eq!(checks, 5);
            let ones: u32 = counts.coef[0][0][0].iter().flatten().map(|n| n[TOKEN_ONE]).sum();
            assert_eq!(ones, 2);

            assert!(tile.state.above_nonzero[0][0] && !tile.state.above_nonzero[0][1]);
            assert!(tile.left_nonzero[0][0] && !tile.left_nonzero[0][1]);
        });
    }

    #[test]
    fn test_read_coefs_32x32_at_frame_edge() {
        let tokens = [
            Token::One { negative: false },
            Token::Cat6 { extra: 0, negative: false },
            Token::One { negative: true },
        ];
        let data = encode_block(TxSize::Tx32x32, &tokens);
        let quant = SegmentQuant { y: [9, 21], uv: [9, 21] };
        with_tile(&data, quant, |tile| {
            let b = BlockInfo { size: BlockSize::B32x32, tx_size: TxSize::Tx32x32, ..BlockInfo::default() };
            // only three 4x4 columns of the block lie inside the frame
            let eob = tile.read_coefs(0, &b, TxSize::Tx32x32, TxType::DctDct, (4, 0), (3, 8));
            assert_eq!(eob, 3);

            let scan = &DEFAULT_SCAN_32X32;
            let coefs = &tile.coefs;
            assert_eq!(coefs[scan[0] as usize], 9 >> 1);
            assert_eq!(coefs[scan[1] as usize], (67 * 21) >> 1);
            // the magnitude is halved before the sign is applied
            assert_eq!(coefs[scan[2] as usize], -(21 >> 1));

            let above = &tile.state.above_nonzero[0];
            assert_eq!(&above[4..12], &[true, true, true, false, false, false, false, false]);
            assert!(!above[3]);
            assert!(tile.left_nonzero[0][..8].iter().all(|&v| v));
            assert!(!tile.left_nonzero[0][8]);
        });
    }

    #[test]
    fn test_tx_type_selection() {
        let mut h = FrameHeader::default();
        h.quant.base_q_idx = 40;
        let mut b = BlockInfo::default();
        assert_eq!(block_tx_type(&h, &b, 0, TxSize::Tx4x4, V_PRED), TxType::AdstDct);
        assert_eq!(block_tx_type(&h, &b, 0, TxSize::Tx32x32, V_PRED), TxType::DctDct);
        assert_eq!(block_tx_type(&h, &b, 1, TxSize::Tx4x4, V_PRED), TxType::DctDct);
        b.ref_frame = [RefFrame::Last, RefFrame::None];
        assert_eq!(block_tx_type(&h, &b, 0, TxSize::Tx8x8, NEWMV), TxType::DctDct);
        h.quant.base_q_idx = 0;
        b.ref_frame = [RefFrame::Intra, RefFrame::None];
        assert_eq!(block_tx_type(&h, &b, 0, TxSize::Tx4x4, H_PRED), TxType::DctDct);
    }
}
