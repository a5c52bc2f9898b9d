//! Motion vector candidate search.

use crate::block_grid::{BlockInfo, Grid, PrevMvInfo};
use crate::tables::{COUNTER_TO_CONTEXT, MODE_2_COUNTER, MV_REF_BLOCKS};
use crate::types::*;

const MV_BORDER: i32 = 16 << 3;
const BEST_MV_BORDER: i32 = (160 - 4) << 3;
const COMPANDED_MVREF_THRESH: i32 = 8;

/// Sub-block of a left or above sub-8x8 neighbour that touches `block`.
const IDX_N_COLUMN_TO_SUBBLOCK: [[usize; 2]; 4] = [[1, 2], [1, 3], [3, 2], [3, 3]];

/// Where the block being decoded sits and what it may look at.
pub struct MvRefSearch<'a> {
    pub grid:       &'a Grid<BlockInfo>,
    /// Vectors of the previous frame, when they may be used.
    pub prev:       Option<&'a Grid<PrevMvInfo>>,
    pub sign_bias:  &'a [bool; 5],
    pub size:       BlockSize,
    pub mi_row:     usize,
    pub mi_col:     usize,
    pub mi_rows:    usize,
    pub mi_cols:    usize,
    pub tile_start: usize,
    pub tile_end:   usize,
}

/// Up to two candidates plus the inter mode context they imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MvCandidates {
    pub list:     [MotionVector; 2],
    pub mode_ctx: usize,
}

struct CandidateList {
    list:  [MotionVector; 2],
    count: usize,
}

impl CandidateList {
    /// Returns true once the list is full.
    fn add(&mut self, mv: MotionVector) -> bool {
        if self.count == 0 {
            self.list[0] = mv;
            self.count = 1;
            false
        } else if mv != self.list[0] {
            self.list[1] = mv;
            self.count = 2;
            true
        } else {
            false
        }
    }
}

impl<'a> MvRefSearch<'a> {
    fn candidate(&self, (dr, dc): (i32, i32)) -> Option<&'a BlockInfo> {
        let row = self.mi_row as i32 + dr;
        let col = self.mi_col as i32 + dc;
        if row < 0 || row >= self.mi_rows as i32 || col < self.tile_start as i32 || col >= self.tile_end as i32 {
            return None;
        }
        Some(self.grid.get(row as usize, col as usize))
    }

    fn scaled(&self, mv: MotionVector, cand_ref: RefFrame, ref_frame: RefFrame) -> MotionVector {
        if self.sign_bias[cand_ref as usize] != self.sign_bias[ref_frame as usize] { -mv } else { mv }
    }

    /// Collect the candidates for `ref_frame`. `block` is the sub-8x8 index
    /// being predicted, or `None` for the whole block.
    pub fn find_mv_refs(&self, ref_frame: RefFrame, block: Option<usize>) -> MvCandidates {
        let positions = &MV_REF_BLOCKS[self.size.index()];
        let mut out = CandidateList { list: [MotionVector::ZERO; 2], count: 0 };
        let mut counter = 0;
        let mut different_ref_found = false;
        let prev = self.prev.map(|p| *p.get(self.mi_row, self.mi_col));

        'search: {
            for (i, &pos) in positions.iter().enumerate() {
                let Some(cand) = self.candidate(pos) else { continue };
                different_ref_found = true;
                let sub = if i < 2 {
                    counter += MODE_2_COUNTER[cand.y_mode as usize];
                    match block {
                        Some(b) if cand.size < BlockSize::B8x8 => IDX_N_COLUMN_TO_SUBBLOCK[b][(pos.1 == 0) as usize],
                        _ => 3,
                    }
                } else {
                    3
                };
                for j in 0..2 {
                    if cand.ref_frame[j] == ref_frame {
                        if out.add(cand.mv[sub][j]) { break 'search; }
                        break;
                    }
                }
            }

            if let Some(p) = prev {
                for j in 0..2 {
                    if p.ref_frame[j] == ref_frame {
                        if out.add(p.mv[j]) { break 'search; }
                        break;
                    }
                }
            }

            if different_ref_found {
                for &pos in positions.iter() {
                    let Some(cand) = self.candidate(pos) else { continue };
                    if !cand.is_inter() { continue; }
                    if cand.ref_frame[0] != ref_frame {
                        let mv = self.scaled(cand.block_mv(0), cand.ref_frame[0], ref_frame);
                        if out.add(mv) { break 'search; }
                    }
                    if cand.is_compound()
                        && cand.ref_frame[1] != ref_frame
                        && cand.block_mv(1) != cand.block_mv(0)
                    {
                        let mv = self.scaled(cand.block_mv(1), cand.ref_frame[1], ref_frame);
                        if out.add(mv) { break 'search; }
                    }
                }
            }

            if let Some(p) = prev {
                if p.ref_frame[0] != ref_frame && p.ref_frame[0].is_inter() {
                    let mv = self.scaled(p.mv[0], p.ref_frame[0], ref_frame);
                    if out.add(mv) { break 'search; }
                }
                if p.ref_frame[1].is_inter() && p.ref_frame[1] != ref_frame && p.mv[1] != p.mv[0] {
                    let mv = self.scaled(p.mv[1], p.ref_frame[1], ref_frame);
                    out.add(mv);
                }
            }
        }

        let mut list = out.list;
        for mv in list.iter_mut() {
            *mv = self.clamp(*mv, MV_BORDER);
        }
        MvCandidates { list, mode_ctx: COUNTER_TO_CONTEXT[counter] }
    }

    fn clamp(&self, mv: MotionVector, border: i32) -> MotionVector {
        let bw = self.size.num_8x8_wide() as i32;
        let bh = self.size.num_8x8_high() as i32;
        let to_left = -(self.mi_col as i32 * 64);
        let to_right = (self.mi_cols as i32 - bw - self.mi_col as i32) * 64;
        let to_top = -(self.mi_row as i32 * 64);
        let to_bottom = (self.mi_rows as i32 - bh - self.mi_row as i32) * 64;
        MotionVector::new(
            mv.row.clamp(to_top - border, to_bottom + border),
            mv.col.clamp(to_left - border, to_right + border),
        )
    }

    /// Nearest and near vectors of the whole block.
    pub fn find_best_ref_mvs(&self, cands: &MvCandidates, allow_hp: bool) -> (MotionVector, MotionVector) {
        let fix = |mv: MotionVector| self.clamp(lower_mv_precision(mv, allow_hp), BEST_MV_BORDER);
        (fix(cands.list[0]), fix(cands.list[1]))
    }

    /// Nearest and near vectors of sub-8x8 block `block` for reference slot
    /// `r`, given the vectors already assigned to earlier sub-blocks.
    pub fn append_sub8x8_mvs(
        &self,
        ref_frame: RefFrame,
        block: usize,
        r: usize,
        assigned: &[[MotionVector; 2]; 4],
    ) -> (MotionVector, MotionVector) {
        let list = self.find_mv_refs(ref_frame, Some(block)).list;
        let first_other = |nearest: MotionVector, cands: &[MotionVector]| {
            cands.iter().copied().find(|&c| c != nearest).unwrap_or(MotionVector::ZERO)
        };
        match block {
            0 => (list[0], list[1]),
            1 | 2 => {
                let nearest = assigned[0][r];
                (nearest, first_other(nearest, &list))
            }
            _ => {
                let nearest = assigned[2][r];
                let cands = [assigned[1][r], assigned[0][r], list[0], list[1]];
                (nearest, first_other(nearest, &cands))
            }
        }
    }
}

#[inline]
pub fn use_mv_hp(mv: MotionVector) -> bool {
    (mv.row.abs() >> 3) < COMPANDED_MVREF_THRESH && (mv.col.abs() >> 3) < COMPANDED_MVREF_THRESH
}

fn lower_mv_precision(mut mv: MotionVector, allow_hp: bool) -> MotionVector {
    if !(allow_hp && use_mv_hp(mv)) {
        if mv.row & 1 != 0 { mv.row += if mv.row > 0 { -1 } else { 1 }; }
        if mv.col & 1 != 0 { mv.col += if mv.col > 0 { -1 } else { 1 }; }
    }
    mv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inter_block(r: RefFrame, mv: MotionVector) -> BlockInfo {
        BlockInfo {
            size: BlockSize::B8x8,
            y_mode: NEWMV,
            ref_frame: [r, RefFrame::None],
            mv: [[mv, MotionVector::ZERO]; 4],
            interp_filter: InterpFilter::Regular,
            ..BlockInfo::default()
        }
    }

    fn search<'a>(grid: &'a Grid<BlockInfo>, bias: &'a [bool; 5], row: usize, col: usize) -> MvRefSearch<'a> {
        MvRefSearch {
            grid,
            prev: None,
            sign_bias: bias,
            size: BlockSize::B8x8,
            mi_row: row,
            mi_col: col,
            mi_rows: grid.rows(),
            mi_cols: grid.cols(),
            tile_start: 0,
            tile_end: grid.cols(),
        }
    }

    #[test]
    fn test_no_neighbours() {
        let grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        let bias = [false; 5];
        let c = search(&grid, &bias, 0, 0).find_mv_refs(RefFrame::Last, None);
        assert_eq!(c.list, [MotionVector::ZERO; 2]);
        assert_eq!(c.mode_ctx, COUNTER_TO_CONTEXT[0]);
    }

    #[test]
    fn test_same_ref_neighbours_fill_list() {
        let mut grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        *grid.get_mut(0, 1) = inter_block(RefFrame::Last, MotionVector::new(8, 16));
        *grid.get_mut(1, 0) = inter_block(RefFrame::Last, MotionVector::new(-8, 4));
        let bias = [false; 5];
        let c = search(&grid, &bias, 1, 1).find_mv_refs(RefFrame::Last, None);
        assert_eq!(c.list, [MotionVector::new(8, 16), MotionVector::new(-8, 4)]);
        // two NEWMV neighbours
        assert_eq!(c.mode_ctx, COUNTER_TO_CONTEXT[2]);
    }

    #[test]
    fn test_duplicate_is_skipped_and_sign_bias_flips() {
        let mut grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        *grid.get_mut(0, 1) = inter_block(RefFrame::Last, MotionVector::new(8, 8));
        *grid.get_mut(1, 0) = inter_block(RefFrame::Last, MotionVector::new(8, 8));
        *grid.get_mut(0, 0) = inter_block(RefFrame::AltRef, MotionVector::new(2, 6));
        let mut bias = [false; 5];
        bias[RefFrame::AltRef as usize] = true;
        let c = search(&grid, &bias, 1, 1).find_mv_refs(RefFrame::Last, None);
        assert_eq!(c.list[0], MotionVector::new(8, 8));
        assert_eq!(c.list[1], MotionVector::new(-2, -6));
    }

    #[test]
    fn test_tile_boundary_hides_left() {
        let mut grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        *grid.get_mut(1, 1) = inter_block(RefFrame::Last, MotionVector::new(8, 8));
        let bias = [false; 5];
        let mut s = search(&grid, &bias, 1, 2);
        s.tile_start = 2;
        assert_eq!(s.find_mv_refs(RefFrame::Last, None).list[0], MotionVector::ZERO);
    }

    #[test]
    fn test_candidates_are_clamped() {
        let mut grid: Grid<BlockInfo> = Grid::new(2, 2).unwrap();
        *grid.get_mut(0, 1) = inter_block(RefFrame::Last, MotionVector::new(-4000, 4000));
        let bias = [false; 5];
        let s = search(&grid, &bias, 1, 1);
        let c = s.find_mv_refs(RefFrame::Last, None);
        assert_eq!(c.list[0], MotionVector::new(-64 - MV_BORDER, MV_BORDER));
    }

    #[test]
    fn test_best_lowers_precision() {
        let grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        let bias = [false; 5];
        let s = search(&grid, &bias, 1, 1);
        let cands = MvCandidates { list: [MotionVector::new(3, -5), MotionVector::new(100, 9)], mode_ctx: 0 };
        let (nearest, near) = s.find_best_ref_mvs(&cands, false);
        assert_eq!(nearest, MotionVector::new(2, -4));
        assert_eq!(near, MotionVector::new(100, 8));
        let (nearest, near) = s.find_best_ref_mvs(&cands, true);
        assert_eq!(nearest, MotionVector::new(3, -5));
        // large vectors never keep the 1/8 bit
        assert_eq!(near, MotionVector::new(100, 8));
    }

    #[test]
    fn test_append_sub8x8_block3() {
        let grid: Grid<BlockInfo> = Grid::new(4, 4).unwrap();
        let bias = [false; 5];
        let mut s = search(&grid, &bias, 1, 1);
        s.size = BlockSize::B4x4;
        let a = MotionVector::new(4, 4);
        let b = MotionVector::new(6, 2);
        let assigned = [[a, MotionVector::ZERO], [b, MotionVector::ZERO], [a, MotionVector::ZERO], [MotionVector::ZERO; 2]];
        let (nearest, near) = s.append_sub8x8_mvs(RefFrame::Last, 3, 0, &assigned);
        assert_eq!(nearest, a);
        assert_eq!(near, b);
        let (nearest, near) = s.append_sub8x8_mvs(RefFrame::Last, 1, 0, &assigned);
        assert_eq!(nearest, a);
        assert_eq!(near, MotionVector::ZERO);
    }
}
