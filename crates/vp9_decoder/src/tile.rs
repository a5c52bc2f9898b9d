//! Tile layout, partition trees and per block mode info.

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

use crate::block_grid::{BlockInfo, Grid, Neighbors, PrevMvInfo};
use crate::bool_decoder::{BoolDecoder, TreeSelection};
use crate::counter::SyntaxElementCounter;
use crate::error::{try_alloc, DecoderError, Result};
use crate::frame::FrameBuffer;
use crate::header::{
    get_tile_offset, CompressedHeader, FrameHeader, MAX_SEGMENTS, SEG_LVL_REF_FRAME, SEG_LVL_SKIP,
};
use crate::mvref::{use_mv_hp, MvCandidates, MvRefSearch};
use crate::probability::FrameProbs;
use crate::refs::ActiveRef;
use crate::residual::SegmentQuant;
use crate::tables::*;
use crate::types::*;

/// Largest magnitude a decoded motion vector component may reach.
const MV_UPP: i32 = (1 << 14) - 1;
const MV_LOW: i32 = -(1 << 14);

/// Everything the tiles of one frame read but never modify.
pub struct FrameParams<'a> {
    pub header:       &'a FrameHeader,
    pub compressed:   &'a CompressedHeader,
    pub probs:        &'a FrameProbs,
    /// Active references; `None` for intra frames.
    pub refs:         Option<&'a [ActiveRef; 3]>,
    /// Previous frame vectors, when this frame may use them.
    pub prev_mvs:     Option<&'a Grid<PrevMvInfo>>,
    pub prev_seg_map: &'a Grid<u8>,
    pub quant:        [SegmentQuant; MAX_SEGMENTS],
}

/// Per frame output written block by block while the tiles are decoded.
pub struct FrameState {
    pub grid:    Grid<BlockInfo>,
    pub seg_map: Grid<u8>,
    pub frame:   FrameBuffer,
    pub counts:  SyntaxElementCounter,
    pub(crate) above_nonzero:   [Vec<bool>; 3],
    pub(crate) above_partition: Vec<u8>,
}

impl FrameState {
    pub fn new(h: &FrameHeader) -> Result<Self> {
        let (mi_cols, mi_rows) = (h.mi_cols(), h.mi_rows());
        let (ssx, ssy) = (h.color.subsampling_x, h.color.subsampling_y);
        let cols_4x4 = h.sb64_cols() * 16;
        let chroma_4x4 = cols_4x4 >> ssx as usize;
        Ok(FrameState {
            grid:    Grid::new(mi_rows, mi_cols)?,
            seg_map: Grid::new(mi_rows, mi_cols)?,
            frame:   FrameBuffer::new(mi_cols, mi_rows, ssx, ssy)?,
            counts:  SyntaxElementCounter::new(),
            above_nonzero: [
                try_alloc(cols_4x4, "above nonzero context")?,
                try_alloc(chroma_4x4, "above nonzero context")?,
                try_alloc(chroma_4x4, "above nonzero context")?,
            ],
            above_partition: try_alloc(h.sb64_cols() * 8, "above partition context")?,
        })
    }
}

/// Split `data` into tiles and decode them in raster order.
pub fn decode_tiles(params: &FrameParams<'_>, state: &mut FrameState, data: &[u8]) -> Result<()> {
    let h = params.header;
    let tile_cols = 1usize << h.tile_cols_log2;
    let tile_rows = 1usize << h.tile_rows_log2;
    let (mi_rows, mi_cols) = (h.mi_rows(), h.mi_cols());

    let mut pos = 0usize;
    for tile_row in 0..tile_rows {
        for tile_col in 0..tile_cols {
            let last = tile_row == tile_rows - 1 && tile_col == tile_cols - 1;
            let size = if last {
                data.len() - pos
            } else {
                let marker = data
                    .get(pos..pos + 4)
                    .ok_or_else(|| DecoderError::corrupted("Truncated tile size marker"))?;
                pos += 4;
                BigEndian::read_u32(marker) as usize
            };
            let tile_data = data.get(pos..pos + size).ok_or_else(|| {
                DecoderError::corrupted(format!("Tile size {size} exceeds the {} remaining bytes", data.len() - pos))
            })?;
            pos += size;

            let rows = get_tile_offset(tile_row, mi_rows, h.tile_rows_log2)
                ..get_tile_offset(tile_row + 1, mi_rows, h.tile_rows_log2);
            let cols = get_tile_offset(tile_col, mi_cols, h.tile_cols_log2)
                ..get_tile_offset(tile_col + 1, mi_cols, h.tile_cols_log2);
            log::trace!("vp9: tile ({tile_row}, {tile_col}) rows {rows:?} cols {cols:?} {size} bytes");

            let mut tile = TileDecoder::new(params, state, tile_data, cols)?;
            tile.decode(rows)?;
            tile.bd.exit()?;
        }
    }
    Ok(())
}

pub(crate) struct TileDecoder<'a, 's> {
    pub(crate) params:         &'s FrameParams<'a>,
    pub(crate) state:          &'s mut FrameState,
    pub(crate) bd:             BoolDecoder<'s>,
    pub(crate) col_start:      usize,
    pub(crate) col_end:        usize,
    pub(crate) left_nonzero:   [[bool; 16]; 3],
    pub(crate) left_partition: [u8; 8],
    /// Dequantized coefficients of the transform block being decoded.
    pub(crate) coefs:          Box<[i32; 1024]>,
    pub(crate) token_cache:    Box<[u8; 1024]>,
    pub(crate) pred:           Box<[[u16; 64 * 64]; 2]>,
}

impl<'a, 's> TileDecoder<'a, 's> {
    pub(crate) fn new(params: &'s FrameParams<'a>, state: &'s mut FrameState, data: &'s [u8], cols: Range<usize>) -> Result<Self> {
        Ok(TileDecoder {
            params,
            state,
            bd: BoolDecoder::new(data, data.len())?,
            col_start: cols.start,
            col_end: cols.end,
            left_nonzero: [[false; 16]; 3],
            left_partition: [0; 8],
            coefs: Box::new([0; 1024]),
            token_cache: Box::new([0; 1024]),
            pred: Box::new([[0; 64 * 64]; 2]),
        })
    }

    fn decode(&mut self, rows: Range<usize>) -> Result<()> {
        for mi_row in rows.step_by(8) {
            self.left_nonzero = [[false; 16]; 3];
            self.left_partition = [0; 8];
            for mi_col in (self.col_start..self.col_end).step_by(8) {
                self.decode_partition(mi_row, mi_col, BlockSize::B64x64)?;
            }
        }
        Ok(())
    }

    // ─── Partitions ──────────────────────────────────────────────────────────

    fn decode_partition(&mut self, mi_row: usize, mi_col: usize, bsize: BlockSize) -> Result<()> {
        let h = self.params.header;
        let (mi_rows, mi_cols) = (h.mi_rows(), h.mi_cols());
        if mi_row >= mi_rows || mi_col >= mi_cols {
            return Ok(());
        }
        let num8 = bsize.num_8x8_wide();
        let hbs = num8 >> 1;
        let has_rows = mi_row + hbs < mi_rows;
        let has_cols = mi_col + hbs < mi_cols;
        let partition = self.read_partition(mi_row, mi_col, has_rows, has_cols, bsize);
        let subsize = bsize
            .subsize(partition)
            .ok_or_else(|| DecoderError::corrupted(format!("No {partition:?} partition of {bsize:?}")))?;

        if hbs == 0 || partition == Partition::None {
            self.decode_block(mi_row, mi_col, subsize)?;
        } else {
            match partition {
                Partition::Horizontal => {
                    self.decode_block(mi_row, mi_col, subsize)?;
                    if has_rows {
                        self.decode_block(mi_row + hbs, mi_col, subsize)?;
                    }
                }
                Partition::Vertical => {
                    self.decode_block(mi_row, mi_col, subsize)?;
                    if has_cols {
                        self.decode_block(mi_row, mi_col + hbs, subsize)?;
                    }
                }
                _ => {
                    self.decode_partition(mi_row, mi_col, subsize)?;
                    self.decode_partition(mi_row, mi_col + hbs, subsize)?;
                    self.decode_partition(mi_row + hbs, mi_col, subsize)?;
                    self.decode_partition(mi_row + hbs, mi_col + hbs, subsize)?;
                }
            }
        }

        if bsize == BlockSize::B8x8 || partition != Partition::Split {
            let above = (15u8 << subsize.width_log2()) & 15;
            let left = (15u8 << subsize.height_log2()) & 15;
            self.state.above_partition[mi_col..mi_col + num8].fill(above);
            let l0 = mi_row & 7;
            self.left_partition[l0..l0 + num8].fill(left);
        }
        Ok(())
    }

    fn read_partition(&mut self, mi_row: usize, mi_col: usize, has_rows: bool, has_cols: bool, bsize: BlockSize) -> Partition {
        let bsl = bsize.num_8x8_wide().trailing_zeros() as usize;
        let above = (self.state.above_partition[mi_col] >> bsl) & 1;
        let left = (self.left_partition[mi_row & 7] >> bsl) & 1;
        let ctx = bsl * 4 + (left * 2 + above) as usize;
        let probs = if self.params.header.is_intra() {
            &KF_PARTITION_PROBS[ctx]
        } else {
            &self.params.probs.partition[ctx]
        };

        let p = if has_rows && has_cols {
            Partition::from_index(self.bd.read_tree(TreeSelection::Tree(&PARTITION_TREE), |i| probs[i]))
        } else if has_cols {
            if self.bd.read_bool(probs[1]) { Partition::Split } else { Partition::Horizontal }
        } else if has_rows {
            if self.bd.read_bool(probs[2]) { Partition::Split } else { Partition::Vertical }
        } else {
            Partition::Split
        };
        self.state.counts.partition[ctx][p as usize] += 1;
        p
    }

    // ─── Blocks ──────────────────────────────────────────────────────────────

    fn decode_block(&mut self, mi_row: usize, mi_col: usize, bsize: BlockSize) -> Result<()> {
        let h = self.params.header;
        let (ssx, ssy) = (h.color.subsampling_x, h.color.subsampling_y);
        if bsize >= BlockSize::B8x8 && bsize.subsampled(ssx, ssy).is_none() {
            return Err(DecoderError::corrupted(format!("Block {bsize:?} is invalid for the chroma subsampling")));
        }
        let x_mis = bsize.num_8x8_wide().min(h.mi_cols() - mi_col);
        let y_mis = bsize.num_8x8_high().min(h.mi_rows() - mi_row);

        let above = (mi_row > 0).then(|| *self.state.grid.get(mi_row - 1, mi_col));
        let left = (mi_col > self.col_start).then(|| *self.state.grid.get(mi_row, mi_col - 1));
        let nb = Neighbors { above: above.as_ref(), left: left.as_ref() };

        let mut b = if h.is_intra() {
            self.intra_frame_mode_info(mi_row, mi_col, bsize, &nb, x_mis, y_mis)
        } else {
            self.inter_frame_mode_info(mi_row, mi_col, bsize, &nb, x_mis, y_mis)?
        };

        if b.skip {
            self.reset_skip_context(mi_row, mi_col, bsize);
        }
        let has_coeffs = self.reconstruct_block(mi_row, mi_col, &b, above.is_some(), left.is_some())?;
        if b.is_inter() && bsize >= BlockSize::B8x8 && !has_coeffs {
            b.skip = true;
        }
        self.state.grid.fill_rect(mi_row, mi_col, y_mis, x_mis, &b);
        Ok(())
    }

    fn intra_frame_mode_info(
        &mut self,
        mi_row: usize,
        mi_col: usize,
        bsize: BlockSize,
        nb: &Neighbors<'_>,
        x_mis: usize,
        y_mis: usize,
    ) -> BlockInfo {
        let mut b = BlockInfo { size: bsize, ..BlockInfo::default() };
        b.segment_id = self.read_intra_segment_id(mi_row, mi_col, x_mis, y_mis);
        b.skip = self.read_skip(b.segment_id, nb);
        b.tx_size = self.read_tx_size(bsize, true, nb);

        let above_mode = |blk: usize, cur: &[PredictionMode; 4]| {
            if blk < 2 {
                nb.above.filter(|a| !a.is_inter()).map_or(DC_PRED, |a| a.sub_modes[blk + 2])
            } else {
                cur[blk - 2]
            }
        };
        let left_mode = |blk: usize, cur: &[PredictionMode; 4]| {
            if blk & 1 == 0 {
                nb.left.filter(|l| !l.is_inter()).map_or(DC_PRED, |l| l.sub_modes[blk + 1])
            } else {
                cur[blk - 1]
            }
        };

        let (w4, h4) = sub_block_steps(bsize);
        for idy in (0..2).step_by(h4) {
            for idx in (0..2).step_by(w4) {
                let blk = idy * 2 + idx;
                let probs = &KF_Y_MODE_PROBS[above_mode(blk, &b.sub_modes) as usize][left_mode(blk, &b.sub_modes) as usize];
                let mode = self.bd.read_tree(TreeSelection::Tree(&INTRA_MODE_TREE), |i| probs[i]);
                fill_sub_blocks(&mut b.sub_modes, blk, w4, h4, mode);
            }
        }
        b.y_mode = b.sub_modes[3];
        let uv_probs = &KF_UV_MODE_PROBS[b.y_mode as usize];
        b.uv_mode = self.bd.read_tree(TreeSelection::Tree(&INTRA_MODE_TREE), |i| uv_probs[i]);
        b
    }

    fn inter_frame_mode_info(
        &mut self,
        mi_row: usize,
        mi_col: usize,
        bsize: BlockSize,
        nb: &Neighbors<'_>,
        x_mis: usize,
        y_mis: usize,
    ) -> Result<BlockInfo> {
        let mut b = BlockInfo { size: bsize, ..BlockInfo::default() };
        let (segment_id, predicted) = self.read_inter_segment_id(mi_row, mi_col, x_mis, y_mis, nb);
        b.segment_id = segment_id;
        b.seg_id_predicted = predicted;
        b.skip = self.read_skip(b.segment_id, nb);
        let is_inter = self.read_is_inter(b.segment_id, nb);
        b.tx_size = self.read_tx_size(bsize, !b.skip || !is_inter, nb);
        if is_inter {
            self.read_inter_block_mode_info(&mut b, mi_row, mi_col, nb)?;
        } else {
            self.read_intra_block_mode_info(&mut b);
        }
        Ok(b)
    }

    // ─── Segment ids ─────────────────────────────────────────────────────────

    fn read_segment_id(&mut self) -> u8 {
        let probs = &self.params.header.segmentation.tree_probs;
        self.bd.read_tree(TreeSelection::Tree(&SEGMENT_TREE), |i| probs[i])
    }

    fn copy_segment_ids(&mut self, mi_row: usize, mi_col: usize, x_mis: usize, y_mis: usize) {
        let prev = self.params.prev_seg_map;
        for r in mi_row..mi_row + y_mis {
            for c in mi_col..mi_col + x_mis {
                *self.state.seg_map.get_mut(r, c) = *prev.get(r, c);
            }
        }
    }

    fn read_intra_segment_id(&mut self, mi_row: usize, mi_col: usize, x_mis: usize, y_mis: usize) -> u8 {
        let h = self.params.header;
        let seg = &h.segmentation;
        if !seg.enabled {
            return 0;
        }
        if !seg.update_map {
            self.copy_segment_ids(mi_row, mi_col, x_mis, y_mis);
            return 0;
        }
        let id = self.read_segment_id();
        self.state.seg_map.fill_rect(mi_row, mi_col, y_mis, x_mis, &id);
        id
    }

    /// Returns the segment id and whether it was temporally predicted.
    fn read_inter_segment_id(
        &mut self,
        mi_row: usize,
        mi_col: usize,
        x_mis: usize,
        y_mis: usize,
        nb: &Neighbors<'_>,
    ) -> (u8, bool) {
        let h = self.params.header;
        let seg = &h.segmentation;
        if !seg.enabled {
            return (0, false);
        }
        let prev = self.params.prev_seg_map;
        let mut predicted = MAX_SEGMENTS as u8 - 1;
        for r in mi_row..mi_row + y_mis {
            for c in mi_col..mi_col + x_mis {
                predicted = predicted.min(*prev.get(r, c));
            }
        }
        if !seg.update_map {
            self.copy_segment_ids(mi_row, mi_col, x_mis, y_mis);
            return (predicted, false);
        }

        let (id, was_predicted) = if seg.temporal_update {
            let ctx = nb.seg_id_predicted_ctx();
            if self.bd.read_bool(seg.pred_probs[ctx]) {
                (predicted, true)
            } else {
                (self.read_segment_id(), false)
            }
        } else {
            (self.read_segment_id(), false)
        };
        self.state.seg_map.fill_rect(mi_row, mi_col, y_mis, x_mis, &id);
        (id, was_predicted)
    }

    // ─── Shared syntax elements ──────────────────────────────────────────────

    fn read_skip(&mut self, segment_id: u8, nb: &Neighbors<'_>) -> bool {
        if self.params.header.segmentation.feature(segment_id, SEG_LVL_SKIP).is_some() {
            return true;
        }
        let ctx = nb.skip_ctx();
        let skip = self.bd.read_bool(self.params.probs.skip[ctx]);
        self.state.counts.skip[ctx][skip as usize] += 1;
        skip
    }

    fn read_tx_size(&mut self, bsize: BlockSize, allow_select: bool, nb: &Neighbors<'_>) -> TxSize {
        let max_tx = bsize.max_tx_size();
        let tx_mode = self.params.compressed.tx_mode;
        if !(allow_select && tx_mode == TxMode::Select && bsize >= BlockSize::B8x8) {
            return max_tx.min(tx_mode.largest_tx());
        }

        let ctx = nb.tx_size_ctx(max_tx);
        let p = self.params.probs;
        let probs: &[u8] = match max_tx {
            TxSize::Tx8x8 => &p.tx8[ctx],
            TxSize::Tx16x16 => &p.tx16[ctx],
            _ => &p.tx32[ctx],
        };
        let mut tx = self.bd.read_bool(probs[0]) as usize;
        if tx != 0 && max_tx >= TxSize::Tx16x16 {
            tx += self.bd.read_bool(probs[1]) as usize;
            if tx != 1 && max_tx >= TxSize::Tx32x32 {
                tx += self.bd.read_bool(probs[2]) as usize;
            }
        }
        let counts = &mut self.state.counts;
        match max_tx {
            TxSize::Tx8x8 => counts.tx8[ctx][tx] += 1,
            TxSize::Tx16x16 => counts.tx16[ctx][tx] += 1,
            _ => counts.tx32[ctx][tx] += 1,
        }
        TxSize::from_index(tx as u8)
    }

    fn read_is_inter(&mut self, segment_id: u8, nb: &Neighbors<'_>) -> bool {
        if let Some(v) = self.params.header.segmentation.feature(segment_id, SEG_LVL_REF_FRAME) {
            return v != 0;
        }
        let ctx = nb.is_inter_ctx();
        let is_inter = self.bd.read_bool(self.params.probs.is_inter[ctx]);
        self.state.counts.is_inter[ctx][is_inter as usize] += 1;
        is_inter
    }

    // ─── Intra blocks of inter frames ────────────────────────────────────────

    fn read_intra_mode_y(&mut self, size_group: usize) -> PredictionMode {
        let probs = &self.params.probs.y_mode[size_group];
        let mode = self.bd.read_tree(TreeSelection::Tree(&INTRA_MODE_TREE), |i| probs[i]);
        self.state.counts.y_mode[size_group][mode as usize] += 1;
        mode
    }

    fn read_intra_block_mode_info(&mut self, b: &mut BlockInfo) {
        if b.size >= BlockSize::B8x8 {
            b.sub_modes = [self.read_intra_mode_y(b.size.size_group()); 4];
        } else {
            let (w4, h4) = sub_block_steps(b.size);
            for idy in (0..2).step_by(h4) {
                for idx in (0..2).step_by(w4) {
                    let mode = self.read_intra_mode_y(0);
                    fill_sub_blocks(&mut b.sub_modes, idy * 2 + idx, w4, h4, mode);
                }
            }
        }
        b.y_mode = b.sub_modes[3];
        let y = b.y_mode as usize;
        let probs = &self.params.probs.uv_mode[y];
        b.uv_mode = self.bd.read_tree(TreeSelection::Tree(&INTRA_MODE_TREE), |i| probs[i]);
        self.state.counts.uv_mode[y][b.uv_mode as usize] += 1;
    }

    // ─── Inter blocks ────────────────────────────────────────────────────────

    fn mv_search(&self, size: BlockSize, mi_row: usize, mi_col: usize) -> MvRefSearch<'_> {
        let h = self.params.header;
        MvRefSearch {
            grid: &self.state.grid,
            prev: self.params.prev_mvs,
            sign_bias: &h.ref_frame_sign_bias,
            size,
            mi_row,
            mi_col,
            mi_rows: h.mi_rows(),
            mi_cols: h.mi_cols(),
            tile_start: self.col_start,
            tile_end: self.col_end,
        }
    }

    fn read_ref_frames(&mut self, segment_id: u8, nb: &Neighbors<'_>) -> [RefFrame; 2] {
        let h = self.params.header;
        if let Some(v) = h.segmentation.feature(segment_id, SEG_LVL_REF_FRAME) {
            return [RefFrame::from_index(v as u32), RefFrame::None];
        }
        let ch = self.params.compressed;
        let probs = self.params.probs;
        let counts = &mut self.state.counts;

        let mode = match ch.reference_mode {
            ReferenceMode::Select => {
                let ctx = nb.comp_mode_ctx(ch.comp_fixed_ref);
                let bit = self.bd.read_bool(probs.comp_mode[ctx]);
                counts.comp_mode[ctx][bit as usize] += 1;
                if bit { ReferenceMode::Compound } else { ReferenceMode::Single }
            }
            m => m,
        };

        if mode == ReferenceMode::Compound {
            let fix_idx = h.ref_frame_sign_bias[ch.comp_fixed_ref as usize] as usize;
            let var_idx = 1 - fix_idx;
            let ctx = nb.comp_ref_ctx(ch.comp_fixed_ref, ch.comp_var_ref, var_idx);
            let bit = self.bd.read_bool(probs.comp_ref[ctx]) as usize;
            counts.comp_ref[ctx][bit] += 1;
            let mut refs = [RefFrame::None; 2];
            refs[fix_idx] = ch.comp_fixed_ref;
            refs[var_idx] = ch.comp_var_ref[bit];
            refs
        } else {
            let ctx0 = nb.single_ref_p1_ctx();
            let bit0 = self.bd.read_bool(probs.single_ref[ctx0][0]);
            counts.single_ref[ctx0][0][bit0 as usize] += 1;
            if !bit0 {
                return [RefFrame::Last, RefFrame::None];
            }
            let ctx1 = nb.single_ref_p2_ctx();
            let bit1 = self.bd.read_bool(probs.single_ref[ctx1][1]);
            counts.single_ref[ctx1][1][bit1 as usize] += 1;
            [if bit1 { RefFrame::AltRef } else { RefFrame::Golden }, RefFrame::None]
        }
    }

    fn read_inter_mode(&mut self, ctx: usize) -> PredictionMode {
        let probs = &self.params.probs.inter_mode[ctx];
        let offset = self.bd.read_tree(TreeSelection::Tree(&INTER_MODE_TREE), |i| probs[i]);
        self.state.counts.inter_mode[ctx][offset as usize] += 1;
        NEARESTMV + offset
    }

    fn read_interp_filter(&mut self, nb: &Neighbors<'_>) -> InterpFilter {
        let ctx = nb.interp_filter_ctx();
        let probs = &self.params.probs.interp_filter[ctx];
        let t = self.bd.read_tree(TreeSelection::Tree(&INTERP_FILTER_TREE), |i| probs[i]);
        self.state.counts.interp_filter[ctx][t as usize] += 1;
        InterpFilter::from_index(t)
    }

    fn read_inter_block_mode_info(&mut self, b: &mut BlockInfo, mi_row: usize, mi_col: usize, nb: &Neighbors<'_>) -> Result<()> {
        let h = self.params.header;
        b.ref_frame = self.read_ref_frames(b.segment_id, nb);
        let num_refs = 1 + b.is_compound() as usize;

        let mut cands = [MvCandidates::default(); 2];
        {
            let search = self.mv_search(b.size, mi_row, mi_col);
            for r in 0..num_refs {
                cands[r] = search.find_mv_refs(b.ref_frame[r], None);
            }
        }
        let mode_ctx = cands[0].mode_ctx;

        if h.segmentation.feature(b.segment_id, SEG_LVL_SKIP).is_some() {
            if b.size < BlockSize::B8x8 {
                return Err(DecoderError::corrupted("Segment skip feature on a sub-8x8 inter block"));
            }
            b.y_mode = ZEROMV;
        } else if b.size >= BlockSize::B8x8 {
            b.y_mode = self.read_inter_mode(mode_ctx);
        }

        let mut nearest = [MotionVector::ZERO; 2];
        let mut near = [MotionVector::ZERO; 2];
        if b.size < BlockSize::B8x8 || b.y_mode != ZEROMV {
            let search = self.mv_search(b.size, mi_row, mi_col);
            for r in 0..num_refs {
                (nearest[r], near[r]) = search.find_best_ref_mvs(&cands[r], h.allow_high_precision_mv);
            }
        }

        b.interp_filter = if h.interp_filter == InterpFilter::Switchable {
            self.read_interp_filter(nb)
        } else {
            h.interp_filter
        };

        if b.size >= BlockSize::B8x8 {
            let mv = self.assign_mv(b.y_mode, num_refs, &nearest, &nearest, &near)?;
            b.mv = [mv; 4];
            b.sub_modes = [b.y_mode; 4];
            return Ok(());
        }

        let (w4, h4) = sub_block_steps(b.size);
        let mut assigned = [[MotionVector::ZERO; 2]; 4];
        let mut sub_nearest = [MotionVector::ZERO; 2];
        let mut sub_near = [MotionVector::ZERO; 2];
        let mut mode = ZEROMV;
        for idy in (0..2).step_by(h4) {
            for idx in (0..2).step_by(w4) {
                let blk = idy * 2 + idx;
                mode = self.read_inter_mode(mode_ctx);
                if mode == NEARESTMV || mode == NEARMV {
                    let search = self.mv_search(b.size, mi_row, mi_col);
                    for r in 0..num_refs {
                        (sub_nearest[r], sub_near[r]) = search.append_sub8x8_mvs(b.ref_frame[r], blk, r, &assigned);
                    }
                }
                let mv = self.assign_mv(mode, num_refs, &nearest, &sub_nearest, &sub_near)?;
                fill_sub_blocks(&mut assigned, blk, w4, h4, mv);
                fill_sub_blocks(&mut b.sub_modes, blk, w4, h4, mode);
            }
        }
        b.y_mode = mode;
        b.mv = assigned;
        Ok(())
    }

    /// Vectors of one block or sub-block; new vectors are coded relative
    /// to `best`.
    fn assign_mv(
        &mut self,
        mode: PredictionMode,
        num_refs: usize,
        best: &[MotionVector; 2],
        nearest: &[MotionVector; 2],
        near: &[MotionVector; 2],
    ) -> Result<[MotionVector; 2]> {
        let mut mv = [MotionVector::ZERO; 2];
        for r in 0..num_refs {
            mv[r] = match mode {
                NEWMV => self.read_mv(best[r])?,
                NEARESTMV => nearest[r],
                NEARMV => near[r],
                _ => MotionVector::ZERO,
            };
        }
        Ok(mv)
    }

    fn read_mv(&mut self, best: MotionVector) -> Result<MotionVector> {
        let probs = self.params.probs;
        let use_hp = self.params.header.allow_high_precision_mv && use_mv_hp(best);
        let joint = self.bd.read_tree(TreeSelection::Tree(&MV_JOINT_TREE), |i| probs.mv_joint[i]);
        self.state.counts.mv_joint[joint as usize] += 1;

        let mut diff = MotionVector::ZERO;
        if joint == 2 || joint == 3 {
            diff.row = self.read_mv_component(0, use_hp);
        }
        if joint == 1 || joint == 3 {
            diff.col = self.read_mv_component(1, use_hp);
        }
        let mv = best + diff;
        let valid = |v: i32| v > MV_LOW && v < MV_UPP;
        if !valid(mv.row) || !valid(mv.col) {
            return Err(DecoderError::corrupted(format!("Motion vector {mv:?} is out of range")));
        }
        Ok(mv)
    }

    fn read_mv_component(&mut self, comp: usize, use_hp: bool) -> i32 {
        let p = &self.params.probs.mv_comp[comp];
        let counts = &mut self.state.counts.mv_comp[comp];
        let bd = &mut self.bd;

        let sign = bd.read_bool(p.sign);
        let class = bd.read_tree(TreeSelection::Tree(&MV_CLASS_TREE), |i| p.classes[i]) as usize;
        counts.sign[sign as usize] += 1;
        counts.classes[class] += 1;

        let mag = if class == 0 {
            let d = bd.read_bool(p.class0) as usize;
            let fr = bd.read_tree(TreeSelection::Tree(&MV_FR_TREE), |i| p.class0_fr[d][i]) as usize;
            let hp = if use_hp { bd.read_bool(p.class0_hp) as usize } else { 1 };
            counts.class0[d] += 1;
            counts.class0_fr[d][fr] += 1;
            counts.class0_hp[hp] += 1;
            ((d << 3) | (fr << 1) | hp) + 1
        } else {
            let mut d = 0usize;
            for i in 0..class {
                let bit = bd.read_bool(p.bits[i]) as usize;
                counts.bits[i][bit] += 1;
                d |= bit << i;
            }
            let fr = bd.read_tree(TreeSelection::Tree(&MV_FR_TREE), |i| p.fr[i]) as usize;
            let hp = if use_hp { bd.read_bool(p.hp) as usize } else { 1 };
            counts.fr[fr] += 1;
            counts.hp[hp] += 1;
            (2 << (class + 2)) + ((d << 3) | (fr << 1) | hp) + 1
        };
        if sign { -(mag as i32) } else { mag as i32 }
    }
}

/// Steps in 4x4 units between the separately coded sub-blocks of `bsize`.
fn sub_block_steps(bsize: BlockSize) -> (usize, usize) {
    if bsize >= BlockSize::B8x8 {
        (2, 2)
    } else {
        (bsize.num_4x4_wide(), bsize.num_4x4_high())
    }
}

fn fill_sub_blocks<T: Copy>(dst: &mut [T; 4], blk: usize, w4: usize, h4: usize, v: T) {
    for y in 0..h4 {
        for x in 0..w4 {
            dst[blk + y * 2 + x] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_block_fill() {
        let mut modes = [0u8; 4];
        fill_sub_blocks(&mut modes, 1, 1, 2, 7);
        assert_eq!(modes, [0, 7, 0, 7]);
        fill_sub_blocks(&mut modes, 0, 2, 1, 3);
        assert_eq!(modes, [3, 3, 0, 7]);
        assert_eq!(sub_block_steps(BlockSize::B4x8), (1, 2));
        assert_eq!(sub_block_steps(BlockSize::B8x4), (2, 1));
        assert_eq!(sub_block_steps(BlockSize::B32x32), (2, 2));
    }

    #[test]
    fn test_frame_state_sizes() {
        let h = FrameHeader { width: 100, height: 50, ..FrameHeader::default() };
        let s = FrameState::new(&h).unwrap();
        assert_eq!((s.grid.rows(), s.grid.cols()), (7, 13));
        assert_eq!(s.above_nonzero[0].len(), 32);
        assert_eq!(s.above_nonzero[1].len(), 16);
        assert_eq!(s.above_partition.len(), 16);
        assert_eq!(s.frame.planes[0].width, 104);
    }
}
