//! Per 8x8 mode info storage and the neighbour-derived symbol contexts.

use crate::error::{try_alloc, Result};
use crate::types::*;

/// Row-major 2-D buffer addressed by `(row, col)`.
#[derive(Debug, Clone, Default)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Grid { rows, cols, data: try_alloc(rows * cols, "mode info grid")? })
    }

    #[inline]
    pub fn rows(&self) -> usize { self.rows }

    #[inline]
    pub fn cols(&self) -> usize { self.cols }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }

    pub fn fill(&mut self, v: T) {
        self.data.fill(v);
    }

    /// Write `v` over the `h` x `w` cells at `(row, col)`, clipped to the grid.
    pub fn fill_rect(&mut self, row: usize, col: usize, h: usize, w: usize, v: &T) {
        let r_end = (row + h).min(self.rows);
        let c_end = (col + w).min(self.cols);
        for r in row..r_end {
            self.data[r * self.cols + col..r * self.cols + c_end].fill(v.clone());
        }
    }

    pub fn same_size(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols
    }
}

/// Decoded mode info of one block, repeated over every 8x8 cell it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub size:             BlockSize,
    pub y_mode:           PredictionMode,
    /// Per 4x4 luma mode of sub-8x8 blocks; all equal to `y_mode` otherwise.
    pub sub_modes:        [PredictionMode; 4],
    pub uv_mode:          PredictionMode,
    pub ref_frame:        [RefFrame; 2],
    /// `[sub-block][reference]`; sub-block 3 holds the vector of the whole block.
    pub mv:               [[MotionVector; 2]; 4],
    pub interp_filter:    InterpFilter,
    pub tx_size:          TxSize,
    pub skip:             bool,
    pub segment_id:       u8,
    pub seg_id_predicted: bool,
}

impl Default for BlockInfo {
    fn default() -> Self {
        BlockInfo {
            size:             BlockSize::B8x8,
            y_mode:           DC_PRED,
            sub_modes:        [DC_PRED; 4],
            uv_mode:          DC_PRED,
            ref_frame:        [RefFrame::Intra, RefFrame::None],
            mv:               [[MotionVector::ZERO; 2]; 4],
            interp_filter:    InterpFilter::Switchable,
            tx_size:          TxSize::Tx4x4,
            skip:             false,
            segment_id:       0,
            seg_id_predicted: false,
        }
    }
}

impl BlockInfo {
    #[inline]
    pub fn is_inter(&self) -> bool { self.ref_frame[0].is_inter() }

    #[inline]
    pub fn is_compound(&self) -> bool { self.ref_frame[1].is_inter() }

    /// Block vector for reference slot `i`.
    #[inline]
    pub fn block_mv(&self, i: usize) -> MotionVector { self.mv[3][i] }

    /// Interpolation filter as seen by the filter context: 3 for intra.
    fn filter_ctx_value(&self) -> usize {
        if !self.is_inter() { return 3; }
        match self.interp_filter {
            InterpFilter::Regular => 0,
            InterpFilter::Smooth  => 1,
            InterpFilter::Sharp   => 2,
            _                     => 3,
        }
    }
}

/// Reference frames and vectors of one 8x8 cell kept for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrevMvInfo {
    pub ref_frame: [RefFrame; 2],
    pub mv:        [MotionVector; 2],
}

// ─── Contexts ────────────────────────────────────────────────────────────────

/// The above and left neighbours of the block being decoded, if available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    pub above: Option<&'a BlockInfo>,
    pub left:  Option<&'a BlockInfo>,
}

impl<'a> Neighbors<'a> {
    pub fn skip_ctx(&self) -> usize {
        self.above.map_or(0, |b| b.skip as usize) + self.left.map_or(0, |b| b.skip as usize)
    }

    pub fn tx_size_ctx(&self, max_tx: TxSize) -> usize {
        let max = max_tx as usize;
        let size_of = |b: Option<&BlockInfo>| match b {
            Some(b) if !b.skip => b.tx_size as usize,
            _ => max,
        };
        let mut above = size_of(self.above);
        let mut left = size_of(self.left);
        if self.left.is_none() { left = above; }
        if self.above.is_none() { above = left; }
        (above + left > max) as usize
    }

    pub fn is_inter_ctx(&self) -> usize {
        match (self.above, self.left) {
            (Some(a), Some(l)) => {
                let (ai, li) = (!a.is_inter(), !l.is_inter());
                if ai && li { 3 } else { (ai || li) as usize }
            }
            (Some(e), None) | (None, Some(e)) => 2 * !e.is_inter() as usize,
            (None, None) => 0,
        }
    }

    pub fn interp_filter_ctx(&self) -> usize {
        let left = self.left.map_or(3, |b| b.filter_ctx_value());
        let above = self.above.map_or(3, |b| b.filter_ctx_value());
        if left == above {
            left
        } else if left == 3 {
            above
        } else if above == 3 {
            left
        } else {
            3
        }
    }

    /// Context of the temporal segment id prediction flag.
    pub fn seg_id_predicted_ctx(&self) -> usize {
        self.above.map_or(0, |b| b.seg_id_predicted as usize)
            + self.left.map_or(0, |b| b.seg_id_predicted as usize)
    }

    pub fn comp_mode_ctx(&self, fixed: RefFrame) -> usize {
        match (self.above, self.left) {
            (Some(a), Some(l)) => {
                if !a.is_compound() && !l.is_compound() {
                    ((a.ref_frame[0] == fixed) ^ (l.ref_frame[0] == fixed)) as usize
                } else if !a.is_compound() {
                    2 + (a.ref_frame[0] == fixed || !a.is_inter()) as usize
                } else if !l.is_compound() {
                    2 + (l.ref_frame[0] == fixed || !l.is_inter()) as usize
                } else {
                    4
                }
            }
            (Some(e), None) | (None, Some(e)) => {
                if e.is_compound() { 3 } else { (e.ref_frame[0] == fixed) as usize }
            }
            (None, None) => 1,
        }
    }

    /// `var_idx` is the slot of the variable reference inside a compound pair.
    pub fn comp_ref_ctx(&self, fixed: RefFrame, var: [RefFrame; 2], var_idx: usize) -> usize {
        match (self.above, self.left) {
            (Some(a), Some(l)) => {
                let (ai, li) = (!a.is_inter(), !l.is_inter());
                if ai && li {
                    2
                } else if ai || li {
                    let e = if ai { l } else { a };
                    if !e.is_compound() {
                        1 + 2 * (e.ref_frame[0] != var[1]) as usize
                    } else {
                        1 + 2 * (e.ref_frame[var_idx] != var[1]) as usize
                    }
                } else {
                    let l_sg = !l.is_compound();
                    let a_sg = !a.is_compound();
                    let vrfa = if a_sg { a.ref_frame[0] } else { a.ref_frame[var_idx] };
                    let vrfl = if l_sg { l.ref_frame[0] } else { l.ref_frame[var_idx] };
                    if vrfa == vrfl && var[1] == vrfa {
                        0
                    } else if l_sg && a_sg {
                        if (vrfa == fixed && vrfl == var[0]) || (vrfl == fixed && vrfa == var[0]) {
                            4
                        } else if vrfa == vrfl {
                            3
                        } else {
                            1
                        }
                    } else if l_sg || a_sg {
                        let vrfc = if l_sg { vrfa } else { vrfl };
                        let rfs = if a_sg { vrfa } else { vrfl };
                        if vrfc == var[1] && rfs != var[1] {
                            1
                        } else if rfs == var[1] && vrfc != var[1] {
                            2
                        } else {
                            4
                        }
                    } else if vrfa == vrfl {
                        4
                    } else {
                        2
                    }
                }
            }
            (Some(e), None) | (None, Some(e)) => {
                if !e.is_inter() {
                    2
                } else if e.is_compound() {
                    4 * (e.ref_frame[var_idx] != var[1]) as usize
                } else {
                    3 * (e.ref_frame[0] != var[1]) as usize
                }
            }
            (None, None) => 2,
        }
    }

    pub fn single_ref_p1_ctx(&self) -> usize {
        const LAST: RefFrame = RefFrame::Last;
        let has_last = |b: &BlockInfo| b.ref_frame[0] == LAST || b.ref_frame[1] == LAST;
        match (self.above, self.left) {
            (Some(a), Some(l)) => {
                let (ai, li) = (!a.is_inter(), !l.is_inter());
                if ai && li {
                    2
                } else if ai || li {
                    let e = if ai { l } else { a };
                    if !e.is_compound() {
                        4 * (e.ref_frame[0] == LAST) as usize
                    } else {
                        1 + has_last(e) as usize
                    }
                } else {
                    let (a2, l2) = (a.is_compound(), l.is_compound());
                    if a2 && l2 {
                        1 + (has_last(a) || has_last(l)) as usize
                    } else if a2 || l2 {
                        let rfs = if !a2 { a.ref_frame[0] } else { l.ref_frame[0] };
                        let crf = if a2 { a } else { l };
                        if rfs == LAST {
                            3 + has_last(crf) as usize
                        } else {
                            has_last(crf) as usize
                        }
                    } else {
                        2 * (a.ref_frame[0] == LAST) as usize + 2 * (l.ref_frame[0] == LAST) as usize
                    }
                }
            }
            (Some(e), None) | (None, Some(e)) => {
                if !e.is_inter() {
                    2
                } else if !e.is_compound() {
                    4 * (e.ref_frame[0] == LAST) as usize
                } else {
                    1 + has_last(e) as usize
                }
            }
            (None, None) => 2,
        }
    }

    pub fn single_ref_p2_ctx(&self) -> usize {
        const LAST: RefFrame = RefFrame::Last;
        const GOLDEN: RefFrame = RefFrame::Golden;
        let has_golden = |b: &BlockInfo| b.ref_frame[0] == GOLDEN || b.ref_frame[1] == GOLDEN;
        match (self.above, self.left) {
            (Some(a), Some(l)) => {
                let (ai, li) = (!a.is_inter(), !l.is_inter());
                if ai && li {
                    2
                } else if ai || li {
                    let e = if ai { l } else { a };
                    if !e.is_compound() {
                        if e.ref_frame[0] == LAST { 3 } else { 4 * (e.ref_frame[0] == GOLDEN) as usize }
                    } else {
                        1 + 2 * has_golden(e) as usize
                    }
                } else {
                    let (a2, l2) = (a.is_compound(), l.is_compound());
                    let (a0, l0) = (a.ref_frame[0], l.ref_frame[0]);
                    if a2 && l2 {
                        if a0 == l0 && a.ref_frame[1] == l.ref_frame[1] {
                            3 * (has_golden(a) || has_golden(l)) as usize
                        } else {
                            2
                        }
                    } else if a2 || l2 {
                        let rfs = if !a2 { a0 } else { l0 };
                        let crf = if a2 { a } else { l };
                        if rfs == GOLDEN {
                            3 + has_golden(crf) as usize
                        } else if rfs == RefFrame::AltRef {
                            has_golden(crf) as usize
                        } else {
                            1 + 2 * has_golden(crf) as usize
                        }
                    } else if a0 == LAST && l0 == LAST {
                        3
                    } else if a0 == LAST || l0 == LAST {
                        let edge0 = if a0 == LAST { l0 } else { a0 };
                        4 * (edge0 == GOLDEN) as usize
                    } else {
                        2 * (a0 == GOLDEN) as usize + 2 * (l0 == GOLDEN) as usize
                    }
                }
            }
            (Some(e), None) | (None, Some(e)) => {
                if !e.is_inter() || (e.ref_frame[0] == LAST && !e.is_compound()) {
                    2
                } else if !e.is_compound() {
                    4 * (e.ref_frame[0] == GOLDEN) as usize
                } else {
                    3 * has_golden(e) as usize
                }
            }
            (None, None) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inter(r0: RefFrame, r1: RefFrame) -> BlockInfo {
        BlockInfo { ref_frame: [r0, r1], interp_filter: InterpFilter::Regular, ..BlockInfo::default() }
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut g: Grid<u8> = Grid::new(3, 5).unwrap();
        g.fill_rect(1, 3, 8, 8, &7);
        assert_eq!(*g.get(1, 3), 7);
        assert_eq!(*g.get(2, 4), 7);
        assert_eq!(*g.get(0, 4), 0);
        assert_eq!(*g.get(2, 2), 0);
    }

    #[test]
    fn test_skip_and_is_inter_ctx() {
        let intra = BlockInfo { skip: true, ..BlockInfo::default() };
        let last = inter(RefFrame::Last, RefFrame::None);
        let n = Neighbors { above: Some(&intra), left: Some(&intra) };
        assert_eq!(n.skip_ctx(), 2);
        assert_eq!(n.is_inter_ctx(), 3);
        let n = Neighbors { above: Some(&last), left: Some(&intra) };
        assert_eq!(n.skip_ctx(), 1);
        assert_eq!(n.is_inter_ctx(), 1);
        let n = Neighbors { above: None, left: Some(&intra) };
        assert_eq!(n.is_inter_ctx(), 2);
        assert_eq!(Neighbors::default().is_inter_ctx(), 0);
    }

    #[test]
    fn test_tx_size_ctx() {
        let big = BlockInfo { tx_size: TxSize::Tx32x32, ..BlockInfo::default() };
        let small = BlockInfo { tx_size: TxSize::Tx4x4, ..BlockInfo::default() };
        let n = Neighbors { above: Some(&big), left: Some(&small) };
        assert_eq!(n.tx_size_ctx(TxSize::Tx16x16), 1);
        let n = Neighbors { above: Some(&small), left: Some(&small) };
        assert_eq!(n.tx_size_ctx(TxSize::Tx16x16), 0);
        // missing neighbours count as the largest size
        assert_eq!(Neighbors::default().tx_size_ctx(TxSize::Tx8x8), 1);
        let skipped = BlockInfo { skip: true, ..small };
        let n = Neighbors { above: Some(&skipped), left: None };
        assert_eq!(n.tx_size_ctx(TxSize::Tx8x8), 1);
    }

    #[test]
    fn test_interp_filter_ctx() {
        let smooth = BlockInfo { interp_filter: InterpFilter::Smooth, ..inter(RefFrame::Last, RefFrame::None) };
        let sharp = BlockInfo { interp_filter: InterpFilter::Sharp, ..smooth };
        let intra = BlockInfo::default();
        assert_eq!(Neighbors { above: Some(&smooth), left: Some(&smooth) }.interp_filter_ctx(), 1);
        assert_eq!(Neighbors { above: Some(&sharp), left: Some(&intra) }.interp_filter_ctx(), 2);
        assert_eq!(Neighbors { above: Some(&sharp), left: Some(&smooth) }.interp_filter_ctx(), 3);
        assert_eq!(Neighbors::default().interp_filter_ctx(), 3);
    }

    #[test]
    fn test_reference_contexts() {
        let last = inter(RefFrame::Last, RefFrame::None);
        let golden = inter(RefFrame::Golden, RefFrame::None);
        let comp = inter(RefFrame::Last, RefFrame::AltRef);
        let n = Neighbors { above: Some(&last), left: Some(&last) };
        assert_eq!(n.single_ref_p1_ctx(), 4);
        assert_eq!(n.single_ref_p2_ctx(), 3);
        let n = Neighbors { above: Some(&golden), left: None };
        assert_eq!(n.single_ref_p1_ctx(), 0);
        assert_eq!(n.single_ref_p2_ctx(), 4);
        let n = Neighbors { above: Some(&comp), left: Some(&golden) };
        assert_eq!(n.comp_mode_ctx(RefFrame::AltRef), 2);
        assert_eq!(Neighbors::default().comp_mode_ctx(RefFrame::AltRef), 1);
        assert_eq!(Neighbors::default().comp_ref_ctx(RefFrame::AltRef, [RefFrame::Last, RefFrame::Golden], 0), 2);
        let n = Neighbors { above: Some(&comp), left: None };
        // compound with Last in the variable slot, Golden is the second variable ref
        assert_eq!(n.comp_ref_ctx(RefFrame::AltRef, [RefFrame::Last, RefFrame::Golden], 0), 4);
    }
}
