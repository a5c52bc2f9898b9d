//! Intra and motion-compensated inter prediction.

use crate::frame::{clip_pixel, Plane};
use crate::refs::{ActiveRef, REF_SCALE_SHIFT};
use crate::tables::SUBPEL_FILTERS;
use crate::types::*;

// ─── Intra ───────────────────────────────────────────────────────────────────

/// Neighbour availability of one intra transform block.
#[derive(Debug, Clone, Copy)]
pub struct IntraEdges {
    pub have_left:    bool,
    pub have_above:   bool,
    pub not_on_right: bool,
}

#[inline(always)]
fn avg2(a: i32, b: i32) -> i32 {
    (a + b + 1) >> 1
}

#[inline(always)]
fn avg3(a: i32, b: i32, c: i32) -> i32 {
    (a + 2 * b + c + 2) >> 2
}

/// Predict the `tx` sized block at plane position `(x, y)` from the already
/// reconstructed samples above and to the left, writing the part inside the
/// plane.
pub fn predict_intra(
    plane: &mut Plane,
    x: usize,
    y: usize,
    tx: TxSize,
    mode: PredictionMode,
    edges: IntraEdges,
    bit_depth: u8,
) {
    let log2 = tx.log2_4x4() + 2;
    let size = 1usize << log2;
    let max_x = plane.width - 1;
    let max_y = plane.height - 1;
    let base = 1i32 << (bit_depth - 1);

    // above[0] is the sample above-left of the block
    let mut above = [0i32; 65];
    let mut left = [0i32; 32];

    if edges.have_above {
        for i in 0..size {
            above[i + 1] = plane.get((x + i).min(max_x), y - 1) as i32;
        }
    } else {
        above[1..=size].fill(base - 1);
    }
    if edges.have_above && edges.not_on_right && tx == TxSize::Tx4x4 {
        for i in size..2 * size {
            above[i + 1] = plane.get((x + i).min(max_x), y - 1) as i32;
        }
    } else {
        let last = above[size];
        above[size + 1..=2 * size].fill(last);
    }
    above[0] = match (edges.have_above, edges.have_left) {
        (true, true)  => plane.get((x - 1).min(max_x), y - 1) as i32,
        (true, false) => base + 1,
        _             => base - 1,
    };

    if edges.have_left {
        for (i, l) in left.iter_mut().take(size).enumerate() {
            *l = plane.get(x - 1, (y + i).min(max_y)) as i32;
        }
    } else {
        left[..size].fill(base + 1);
    }

    let a = |i: isize| above[(i + 1) as usize];
    let mut pred = [0i32; 1024];
    let at = |i: usize, j: usize| i * size + j;

    match mode {
        V_PRED => {
            for i in 0..size {
                for j in 0..size {
                    pred[at(i, j)] = a(j as isize);
                }
            }
        }
        H_PRED => {
            for i in 0..size {
                for j in 0..size {
                    pred[at(i, j)] = left[i];
                }
            }
        }
        D207_PRED => {
            for j in 0..size {
                pred[at(size - 1, j)] = left[size - 1];
            }
            for i in 0..size - 1 {
                pred[at(i, 0)] = avg2(left[i], left[i + 1]);
            }
            for i in 0..size - 2 {
                pred[at(i, 1)] = avg3(left[i], left[i + 1], left[i + 2]);
            }
            pred[at(size - 2, 1)] = (left[size - 2] + 3 * left[size - 1] + 2) >> 2;
            for i in (0..size - 1).rev() {
                for j in 2..size {
                    pred[at(i, j)] = pred[at(i + 1, j - 2)];
                }
            }
        }
        D45_PRED => {
            for i in 0..size {
                for j in 0..size {
                    let k = (i + j) as isize;
                    pred[at(i, j)] = if i + j + 2 < 2 * size {
                        avg3(a(k), a(k + 1), a(k + 2))
                    } else {
                        a(2 * size as isize - 1)
                    };
                }
            }
        }
        D63_PRED => {
            for i in 0..size {
                for j in 0..size {
                    let k = (i / 2 + j) as isize;
                    pred[at(i, j)] = if i & 1 != 0 {
                        avg3(a(k), a(k + 1), a(k + 2))
                    } else {
                        avg2(a(k), a(k + 1))
                    };
                }
            }
        }
        D117_PRED => {
            for j in 0..size {
                let j = j as isize;
                pred[at(0, j as usize)] = avg2(a(j - 1), a(j));
            }
            pred[at(1, 0)] = avg3(left[0], a(-1), a(0));
            for j in 1..size {
                let k = j as isize;
                pred[at(1, j)] = avg3(a(k - 2), a(k - 1), a(k));
            }
            pred[at(2, 0)] = avg3(a(-1), left[0], left[1]);
            for i in 3..size {
                pred[at(i, 0)] = avg3(left[i - 3], left[i - 2], left[i - 1]);
            }
            for i in 2..size {
                for j in 1..size {
                    pred[at(i, j)] = pred[at(i - 2, j - 1)];
                }
            }
        }
        D135_PRED => {
            pred[at(0, 0)] = avg3(left[0], a(-1), a(0));
            for j in 1..size {
                let k = j as isize;
                pred[at(0, j)] = avg3(a(k - 2), a(k - 1), a(k));
            }
            pred[at(1, 0)] = avg3(a(-1), left[0], left[1]);
            for i in 2..size {
                pred[at(i, 0)] = avg3(left[i - 2], left[i - 1], left[i]);
            }
            for i in 1..size {
                for j in 1..size {
                    pred[at(i, j)] = pred[at(i - 1, j - 1)];
                }
            }
        }
        D153_PRED => {
            pred[at(0, 0)] = avg2(left[0], a(-1));
            for i in 1..size {
                pred[at(i, 0)] = avg2(left[i - 1], left[i]);
            }
            pred[at(0, 1)] = avg3(left[0], a(-1), a(0));
            pred[at(1, 1)] = avg3(a(-1), left[0], left[1]);
            for i in 2..size {
                pred[at(i, 1)] = avg3(left[i - 2], left[i - 1], left[i]);
            }
            for j in 2..size {
                let k = j as isize;
                pred[at(0, j)] = avg3(a(k - 3), a(k - 2), a(k - 1));
            }
            for i in 1..size {
                for j in 2..size {
                    pred[at(i, j)] = pred[at(i - 1, j - 2)];
                }
            }
        }
        TM_PRED => {
            for i in 0..size {
                for j in 0..size {
                    pred[at(i, j)] = clip_pixel(bit_depth, a(j as isize) + left[i] - a(-1)) as i32;
                }
            }
        }
        _ => {
            let top: i32 = (0..size).map(|k| a(k as isize)).sum();
            let side: i32 = left[..size].iter().sum();
            let dc = match (edges.have_left, edges.have_above) {
                (true, true)  => (top + side + size as i32) >> (log2 + 1),
                (true, false) => (side + (1 << (log2 - 1))) >> log2,
                (false, true) => (top + (1 << (log2 - 1))) >> log2,
                _             => base,
            };
            pred[..size * size].fill(dc);
        }
    }

    let w = size.min(plane.width - x);
    let h = size.min(plane.height - y);
    for i in 0..h {
        for j in 0..w {
            plane.set(x + j, y + i, pred[at(i, j)] as u16);
        }
    }
}

// ─── Inter ───────────────────────────────────────────────────────────────────

const SUBPEL_BITS: u32 = 4;
const SUBPEL_MASK: i64 = 15;
const INTERP_EXTEND: i32 = 4;
const MAX_INTERMEDIATE_HEIGHT: usize = (((64 - 1) * 32 + 15) >> 4) + 8;

#[inline]
fn round_mv_q2(v: i32) -> i32 {
    (if v < 0 { v - 1 } else { v + 1 }) / 2
}

#[inline]
fn round_mv_q4(v: i32) -> i32 {
    (if v < 0 { v - 2 } else { v + 2 }) / 4
}

/// Motion vector used by 4x4 sub-block `b` in a subsampled plane of a
/// sub-8x8 block: the average of the luma vectors it covers.
pub fn chroma_sub8x8_mv(mvs: &[MotionVector; 4], b: usize, ssx: bool, ssy: bool) -> MotionVector {
    match (ssx, ssy) {
        (false, false) => mvs[b],
        (false, true) => {
            let s = mvs[b] + mvs[b + 2];
            MotionVector::new(round_mv_q2(s.row), round_mv_q2(s.col))
        }
        (true, false) => {
            let s = mvs[b] + mvs[b + 1];
            MotionVector::new(round_mv_q2(s.row), round_mv_q2(s.col))
        }
        (true, true) => {
            let s = mvs[0] + mvs[1] + mvs[2] + mvs[3];
            MotionVector::new(round_mv_q4(s.row), round_mv_q4(s.col))
        }
    }
}

/// Geometry of the block whose vector is being clamped, in 8x8 units.
#[derive(Debug, Clone, Copy)]
pub struct MvClampBlock {
    pub mi_row:  usize,
    pub mi_col:  usize,
    pub mi_rows: usize,
    pub mi_cols: usize,
    pub bw:      usize,
    pub bh:      usize,
}

/// Clamp `mv` so the prediction stays near the frame, returning it in
/// 1/16 sample units of the plane.
pub fn clamp_mv_to_umv_border(mv: MotionVector, blk: MvClampBlock, ssx: bool, ssy: bool) -> MotionVector {
    let (sx, sy) = (ssx as i32, ssy as i32);
    let (bw, bh) = (blk.bw as i32, blk.bh as i32);
    let to_top = -((blk.mi_row as i32 * 8) * 16) >> sy;
    let to_bottom = (((blk.mi_rows as i32 - bh - blk.mi_row as i32) * 8) * 16) >> sy;
    let to_left = -((blk.mi_col as i32 * 8) * 16) >> sx;
    let to_right = (((blk.mi_cols as i32 - bw - blk.mi_col as i32) * 8) * 16) >> sx;

    let spel_left = (INTERP_EXTEND + ((bw * 8) >> sx)) << SUBPEL_BITS;
    let spel_right = spel_left - (1 << SUBPEL_BITS);
    let spel_top = (INTERP_EXTEND + ((bh * 8) >> sy)) << SUBPEL_BITS;
    let spel_bottom = spel_top - (1 << SUBPEL_BITS);

    MotionVector::new(
        ((2 * mv.row) >> sy).clamp(to_top - spel_top, to_bottom + spel_bottom),
        ((2 * mv.col) >> sx).clamp(to_left - spel_left, to_right + spel_right),
    )
}

/// Where in one reference plane an inter block samples from.
#[derive(Debug, Clone, Copy)]
pub struct InterSource {
    pub plane:  usize,
    pub ssx:    bool,
    pub ssy:    bool,
    /// Plane position of the predicted block.
    pub x:      usize,
    pub y:      usize,
    pub w:      usize,
    pub h:      usize,
    /// Clamped vector in 1/16 sample units of the plane.
    pub mv:     MotionVector,
    pub filter: InterpFilter,
}

/// Eight-tap sub-pixel prediction of one block from `reference` into `out`
/// (`src.w * src.h`, row-major).
pub fn predict_inter_block(reference: &ActiveRef, src: &InterSource, bit_depth: u8, out: &mut [u16]) {
    let pic = &reference.picture;
    let ref_plane = &pic.planes[src.plane];
    let (sx, sy) = (src.ssx as u32, src.ssy as u32);
    let last_x = (((pic.width + sx) >> sx) as i64 - 1).min(ref_plane.width as i64 - 1);
    let last_y = (((pic.height + sy) >> sy) as i64 - 1).min(ref_plane.height as i64 - 1);

    let (xs, ys) = (reference.x_scale, reference.y_scale);
    let (x, y) = (src.x as i64, src.y as i64);
    let base_x = (x * xs) >> REF_SCALE_SHIFT;
    let base_y = (y * ys) >> REF_SCALE_SHIFT;
    let frac_x = ((16 * (x << sx) * xs) >> REF_SCALE_SHIFT) & SUBPEL_MASK;
    let frac_y = ((16 * (y << sy) * ys) >> REF_SCALE_SHIFT) & SUBPEL_MASK;
    let start_x = (base_x << SUBPEL_BITS) + ((src.mv.col as i64 * xs) >> REF_SCALE_SHIFT) + frac_x;
    let start_y = (base_y << SUBPEL_BITS) + ((src.mv.row as i64 * ys) >> REF_SCALE_SHIFT) + frac_y;
    let (x_step, y_step) = (reference.x_step, reference.y_step);

    let kernels = &SUBPEL_FILTERS[src.filter as usize & 3];
    let ih = ((((src.h as i64 - 1) * y_step + 15) >> 4) + 8) as usize;
    debug_assert!(ih <= MAX_INTERMEDIATE_HEIGHT);
    let mut intermediate = [0u16; 64 * MAX_INTERMEDIATE_HEIGHT];

    let row0 = (start_y >> 4) - 3;
    for r in 0..ih.min(MAX_INTERMEDIATE_HEIGHT) {
        let ry = (row0 + r as i64).clamp(0, last_y) as usize;
        let line = ref_plane.row(ry);
        for c in 0..src.w {
            let p = start_x + x_step * c as i64;
            let k = &kernels[(p & SUBPEL_MASK) as usize];
            let x0 = (p >> 4) - 3;
            let mut sum = 0i32;
            for (t, &tap) in k.iter().enumerate() {
                let rx = (x0 + t as i64).clamp(0, last_x) as usize;
                sum += tap * line[rx] as i32;
            }
            intermediate[r * 64 + c] = clip_pixel(bit_depth, (sum + 64) >> 7);
        }
    }

    for r in 0..src.h {
        let p = (start_y & SUBPEL_MASK) + y_step * r as i64;
        let k = &kernels[(p & SUBPEL_MASK) as usize];
        let r0 = (p >> 4) as usize;
        for c in 0..src.w {
            let mut sum = 0i32;
            for (t, &tap) in k.iter().enumerate() {
                sum += tap * intermediate[(r0 + t) * 64 + c] as i32;
            }
            out[r * src.w + c] = clip_pixel(bit_depth, (sum + 64) >> 7);
        }
    }
}
