//! Adaptive probability tables, the four saved frame contexts, forward
//! (delta) updates and backward adaptation from symbol counts.

use crate::bool_decoder::BoolDecoder;
use crate::counter::{SyntaxElementCounter, TOKEN_EOB, TOKEN_ONE, TOKEN_TWO, TOKEN_ZERO};
use crate::tables::*;

pub const COEF_COUNT_SAT: u32 = 24;
pub const COEF_MAX_UPDATE_FACTOR: u32 = 112;
pub const COEF_MAX_UPDATE_FACTOR_AFTER_KEY: u32 = 128;
pub const MODE_MV_COUNT_SAT: u32 = 20;
pub const MODE_MV_MAX_UPDATE_FACTOR: u32 = 128;

#[derive(Clone)]
pub struct MvComponentProbs {
    pub sign:      u8,
    pub classes:   [u8; 10],
    pub class0:    u8,
    pub bits:      [u8; 10],
    pub class0_fr: [[u8; 3]; 2],
    pub fr:        [u8; 3],
    pub class0_hp: u8,
    pub hp:        u8,
}

/// One complete set of adaptive probabilities.
#[derive(Clone)]
pub struct FrameProbs {
    pub tx8:           [[u8; 1]; 2],
    pub tx16:          [[u8; 2]; 2],
    pub tx32:          [[u8; 3]; 2],
    pub coef:          [CoefProbs; 4],
    pub skip:          [u8; 3],
    pub inter_mode:    [[u8; 3]; 7],
    pub interp_filter: [[u8; 2]; 4],
    pub is_inter:      [u8; 4],
    pub comp_mode:     [u8; 5],
    pub single_ref:    [[u8; 2]; 5],
    pub comp_ref:      [u8; 5],
    pub y_mode:        [[u8; 9]; 4],
    pub uv_mode:       [[u8; 9]; 10],
    pub partition:     [[u8; 3]; 16],
    pub mv_joint:      [u8; 3],
    pub mv_comp:       [MvComponentProbs; 2],
}

impl Default for FrameProbs {
    fn default() -> Self {
        let comp = |i: usize| MvComponentProbs {
            sign:      DEFAULT_MV_SIGN_PROBS[i],
            classes:   DEFAULT_MV_CLASS_PROBS[i],
            class0:    DEFAULT_MV_CLASS0_BIT_PROBS[i],
            bits:      DEFAULT_MV_BITS_PROBS[i],
            class0_fr: DEFAULT_MV_CLASS0_FR_PROBS[i],
            fr:        DEFAULT_MV_FR_PROBS[i],
            class0_hp: DEFAULT_MV_CLASS0_HP_PROBS[i],
            hp:        DEFAULT_MV_HP_PROBS[i],
        };
        FrameProbs {
            tx8:           DEFAULT_TX_PROBS_8X8,
            tx16:          DEFAULT_TX_PROBS_16X16,
            tx32:          DEFAULT_TX_PROBS_32X32,
            coef:          DEFAULT_COEF_PROBS,
            skip:          DEFAULT_SKIP_PROBS,
            inter_mode:    DEFAULT_INTER_MODE_PROBS,
            interp_filter: DEFAULT_INTERP_FILTER_PROBS,
            is_inter:      DEFAULT_IS_INTER_PROBS,
            comp_mode:     DEFAULT_COMP_MODE_PROBS,
            single_ref:    DEFAULT_SINGLE_REF_PROBS,
            comp_ref:      DEFAULT_COMP_REF_PROBS,
            y_mode:        DEFAULT_Y_MODE_PROBS,
            uv_mode:       DEFAULT_UV_MODE_PROBS,
            partition:     DEFAULT_PARTITION_PROBS,
            mv_joint:      DEFAULT_MV_JOINT_PROBS,
            mv_comp:       [comp(0), comp(1)],
        }
    }
}

/// Working probabilities plus the four saved frame contexts.
pub struct ProbabilityModel {
    pub current: FrameProbs,
    saved:       [FrameProbs; 4],
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityModel {
    pub fn new() -> Self {
        let d = FrameProbs::default();
        ProbabilityModel {
            current: d.clone(),
            saved:   [d.clone(), d.clone(), d.clone(), d],
        }
    }

    pub fn load_probs(&mut self, ctx: usize) {
        self.current = self.saved[ctx & 3].clone();
    }

    pub fn save_probs(&mut self, ctx: usize) {
        self.saved[ctx & 3] = self.current.clone();
    }

    pub fn saved(&self, ctx: usize) -> &FrameProbs {
        &self.saved[ctx & 3]
    }

    /// Put default probabilities in the working set.
    pub fn reset_current(&mut self) {
        self.current = FrameProbs::default();
    }

    pub fn save_all(&mut self) {
        for ctx in 0..4 {
            self.save_probs(ctx);
        }
    }

    /// Backward adaptation of the coefficient probabilities. `pre` is the
    /// saved context the frame started from.
    pub fn adapt_coef_probs(&mut self, ctx: usize, counts: &SyntaxElementCounter, update_factor: u32) {
        let pre = &self.saved[ctx & 3];
        for tx in 0..4 {
            for plane in 0..2 {
                for r in 0..2 {
                    for band in 0..6 {
                        let nctx = if band == 0 { 3 } else { 6 };
                        for c in 0..nctx {
                            let pre_p = &pre.coef[tx][plane][r][band][c];
                            let n     = &counts.coef[tx][plane][r][band][c];
                            let total = counts.eob_branch[tx][plane][r][band][c];
                            let neob  = n[TOKEN_EOB];
                            let branch = [
                                (neob, total.saturating_sub(neob)),
                                (n[TOKEN_ZERO], n[TOKEN_ONE] + n[TOKEN_TWO]),
                                (n[TOKEN_ONE], n[TOKEN_TWO]),
                            ];
                            let out = &mut self.current.coef[tx][plane][r][band][c];
                            for (i, &(c0, c1)) in branch.iter().enumerate() {
                                out[i] = merge_prob(pre_p[i], c0, c1, COEF_COUNT_SAT, update_factor);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Backward adaptation of mode, reference and motion vector probabilities.
    pub fn adapt_non_coef_probs(
        &mut self,
        ctx: usize,
        counts: &SyntaxElementCounter,
        switchable_interp: bool,
        tx_select: bool,
        allow_high_precision_mv: bool,
    ) {
        let pre = self.saved[ctx & 3].clone();
        let cur = &mut self.current;

        for i in 0..4 {
            cur.is_inter[i] = mode_mv_merge(pre.is_inter[i], counts.is_inter[i]);
        }
        for i in 0..5 {
            cur.comp_mode[i] = mode_mv_merge(pre.comp_mode[i], counts.comp_mode[i]);
            cur.comp_ref[i] = mode_mv_merge(pre.comp_ref[i], counts.comp_ref[i]);
            for j in 0..2 {
                cur.single_ref[i][j] = mode_mv_merge(pre.single_ref[i][j], counts.single_ref[i][j]);
            }
        }
        for i in 0..7 {
            cur.inter_mode[i] = pre.inter_mode[i];
            merge_tree_probs(&INTER_MODE_TREE, &mut cur.inter_mode[i], &counts.inter_mode[i]);
        }
        for i in 0..4 {
            cur.y_mode[i] = pre.y_mode[i];
            merge_tree_probs(&INTRA_MODE_TREE, &mut cur.y_mode[i], &counts.y_mode[i]);
        }
        for i in 0..10 {
            cur.uv_mode[i] = pre.uv_mode[i];
            merge_tree_probs(&INTRA_MODE_TREE, &mut cur.uv_mode[i], &counts.uv_mode[i]);
        }
        for i in 0..16 {
            cur.partition[i] = pre.partition[i];
            merge_tree_probs(&PARTITION_TREE, &mut cur.partition[i], &counts.partition[i]);
        }
        if switchable_interp {
            for i in 0..4 {
                cur.interp_filter[i] = pre.interp_filter[i];
                merge_tree_probs(&INTERP_FILTER_TREE, &mut cur.interp_filter[i], &counts.interp_filter[i]);
            }
        }
        if tx_select {
            for i in 0..2 {
                let c = counts.tx8[i];
                cur.tx8[i][0] = mode_mv_merge(pre.tx8[i][0], [c[0], c[1]]);

                let c = counts.tx16[i];
                cur.tx16[i][0] = mode_mv_merge(pre.tx16[i][0], [c[0], c[1] + c[2]]);
                cur.tx16[i][1] = mode_mv_merge(pre.tx16[i][1], [c[1], c[2]]);

                let c = counts.tx32[i];
                cur.tx32[i][0] = mode_mv_merge(pre.tx32[i][0], [c[0], c[1] + c[2] + c[3]]);
                cur.tx32[i][1] = mode_mv_merge(pre.tx32[i][1], [c[1], c[2] + c[3]]);
                cur.tx32[i][2] = mode_mv_merge(pre.tx32[i][2], [c[2], c[3]]);
            }
        }
        for i in 0..3 {
            cur.skip[i] = mode_mv_merge(pre.skip[i], counts.skip[i]);
        }

        cur.mv_joint = pre.mv_joint;
        merge_tree_probs(&MV_JOINT_TREE, &mut cur.mv_joint, &counts.mv_joint);
        for i in 0..2 {
            let p = &pre.mv_comp[i];
            let c = &counts.mv_comp[i];
            let o = &mut cur.mv_comp[i];
            o.sign = mode_mv_merge(p.sign, c.sign);
            o.classes = p.classes;
            merge_tree_probs(&MV_CLASS_TREE, &mut o.classes, &c.classes);
            o.class0 = mode_mv_merge(p.class0, c.class0);
            for j in 0..10 {
                o.bits[j] = mode_mv_merge(p.bits[j], c.bits[j]);
            }
            for j in 0..2 {
                o.class0_fr[j] = p.class0_fr[j];
                merge_tree_probs(&MV_FR_TREE, &mut o.class0_fr[j], &c.class0_fr[j]);
            }
            o.fr = p.fr;
            merge_tree_probs(&MV_FR_TREE, &mut o.fr, &c.fr);
            if allow_high_precision_mv {
                o.class0_hp = mode_mv_merge(p.class0_hp, c.class0_hp);
                o.hp = mode_mv_merge(p.hp, c.hp);
            }
        }
    }
}

// ─── Merge formulas ──────────────────────────────────────────────────────────

#[inline]
pub fn round_2(x: u32, n: u32) -> u32 {
    if n == 0 { x } else { (x + (1 << (n - 1))) >> n }
}

/// Blend `pre` toward the probability observed in the counts.
pub fn merge_prob(pre: u8, ct0: u32, ct1: u32, count_sat: u32, max_update_factor: u32) -> u8 {
    let den = ct0 + ct1;
    let prob = if den == 0 {
        128
    } else {
        let p = ((ct0 as u64 * 256 + (den as u64 >> 1)) / den as u64) as u32;
        p.clamp(1, 255)
    };
    let count = den.min(count_sat);
    let factor = max_update_factor * count / count_sat;
    round_2(pre as u32 * (256 - factor) + prob * factor, 8) as u8
}

#[inline]
fn mode_mv_merge(pre: u8, ct: [u32; 2]) -> u8 {
    merge_prob(pre, ct[0], ct[1], MODE_MV_COUNT_SAT, MODE_MV_MAX_UPDATE_FACTOR)
}

fn merge_tree_node(tree: &[i8], i: usize, probs: &mut [u8], counts: &[u32]) -> u32 {
    let mut side = |n: i8| if n <= 0 { counts[(-n) as usize] } else { merge_tree_node(tree, n as usize, probs, counts) };
    let left = side(tree[i]);
    let right = side(tree[i + 1]);
    let p = &mut probs[i >> 1];
    *p = mode_mv_merge(*p, [left, right]);
    left + right
}

/// Merge every node of `tree` bottom-up; `probs` holds the previous values
/// on entry and the adapted ones on return.
pub fn merge_tree_probs(tree: &[i8], probs: &mut [u8], counts: &[u32]) -> u32 {
    merge_tree_node(tree, 0, probs, counts)
}

// ─── Forward updates ─────────────────────────────────────────────────────────

const DIFF_UPDATE_PROB: u8 = 252;

fn inv_recenter_nonneg(v: u32, m: u32) -> u32 {
    if v > 2 * m { return v; }
    if v & 1 != 0 { m - ((v + 1) >> 1) } else { m + (v >> 1) }
}

pub fn inv_remap_prob(delta: u32, prob: u8) -> u8 {
    let v = INV_MAP_TABLE[delta.min(254) as usize] as u32;
    let m = prob as u32 - 1;
    if (m << 1) <= 255 {
        (1 + inv_recenter_nonneg(v, m)) as u8
    } else {
        (255 - inv_recenter_nonneg(v, 254 - m)) as u8
    }
}

fn decode_uniform(bd: &mut BoolDecoder<'_>) -> u32 {
    let v = bd.read_literal(7);
    if v < 65 { v } else { (v << 1) - 65 + bd.read_literal(1) }
}

fn decode_term_subexp(bd: &mut BoolDecoder<'_>) -> u32 {
    if !bd.read_flag() { return bd.read_literal(4); }
    if !bd.read_flag() { return bd.read_literal(4) + 16; }
    if !bd.read_flag() { return bd.read_literal(5) + 32; }
    decode_uniform(bd) + 64
}

/// Optionally replace `prob` with a delta-coded new value.
pub fn diff_update_prob(bd: &mut BoolDecoder<'_>, prob: &mut u8) {
    if bd.read_bool(DIFF_UPDATE_PROB) {
        let delta = decode_term_subexp(bd);
        *prob = inv_remap_prob(delta, *prob);
    }
}

/// Motion vector probabilities are sent as 7-bit values instead of deltas.
pub fn update_mv_prob(bd: &mut BoolDecoder<'_>, prob: &mut u8) {
    if bd.read_bool(DIFF_UPDATE_PROB) {
        *prob = ((bd.read_literal(7) << 1) | 1) as u8;
    }
}

/// Probability of coefficient tree node `node` (3..=10) given the pivot.
pub fn pareto_prob(pivot: u8, node: usize) -> u8 {
    let x = (pivot as usize - 1) / 2;
    let col = node - 3;
    if pivot & 1 != 0 {
        PARETO_TABLE[x][col]
    } else {
        ((PARETO_TABLE[x][col] as u32 + PARETO_TABLE[x + 1][col] as u32) >> 1) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prob_without_counts() {
        assert_eq!(merge_prob(128, 0, 0, 20, 128), 128);
        assert_eq!(merge_prob(37, 0, 0, 20, 128), 37);
    }

    #[test]
    fn test_merge_prob_saturated() {
        // 30 zeros, 10 ones: observed 192, full weight of 128/256
        assert_eq!(merge_prob(64, 30, 10, 20, 128), 128);
        // all zeros pins the observation at 255
        assert_eq!(merge_prob(255, 50, 0, 24, 112), 255);
    }

    #[test]
    fn test_merge_tree_sums_leaves() {
        let mut probs = [128u8; 3];
        let counts = [4u32, 0, 0, 0];
        let total = merge_tree_probs(&PARTITION_TREE, &mut probs, &counts);
        assert_eq!(total, 4);
        assert!(probs[0] > 128);
        // nodes without counts keep their value
        assert_eq!(probs[1], 128);
        assert_eq!(probs[2], 128);
    }

    #[test]
    fn test_inv_remap_prob() {
        // the first table entries recentre close to the old probability
        assert_eq!(inv_remap_prob(0, 128), 124);
        assert_eq!(inv_remap_prob(0, 10), 6);
        for p in 1..=255u8 {
            for d in [0u32, 5, 19, 20, 100, 254] {
                let r = inv_remap_prob(d, p);
                assert!(r >= 1, "p={p} d={d}");
            }
        }
    }

    #[test]
    fn test_pareto_interpolation() {
        assert_eq!(pareto_prob(1, 3), PARETO_TABLE[0][0]);
        assert_eq!(pareto_prob(255, 10), PARETO_TABLE[127][7]);
        let avg = (PARETO_TABLE[0][2] as u32 + PARETO_TABLE[1][2] as u32) / 2;
        assert_eq!(pareto_prob(2, 5) as u32, avg);
    }

    #[test]
    fn test_adapt_non_coef_gates() {
        let mut counts = SyntaxElementCounter::new();
        counts.tx8[0] = [0, 30];
        counts.tx32[1] = [0, 0, 0, 30];
        counts.interp_filter[2] = [0, 0, 40];
        counts.mv_comp[0].class0_hp = [0, 40];
        counts.mv_comp[1].hp = [40, 0];
        counts.skip[1] = [40, 0];

        let mut off = ProbabilityModel::new();
        off.adapt_non_coef_probs(0, &counts, false, false, false);
        assert_eq!(off.current.tx8, DEFAULT_TX_PROBS_8X8);
        assert_eq!(off.current.tx32, DEFAULT_TX_PROBS_32X32);
        assert_eq!(off.current.interp_filter, DEFAULT_INTERP_FILTER_PROBS);
        assert_eq!(off.current.mv_comp[0].class0_hp, DEFAULT_MV_CLASS0_HP_PROBS[0]);
        assert_eq!(off.current.mv_comp[1].hp, DEFAULT_MV_HP_PROBS[1]);
        // skip has no gate
        let skip = merge_prob(DEFAULT_SKIP_PROBS[1], 40, 0, MODE_MV_COUNT_SAT, MODE_MV_MAX_UPDATE_FACTOR);
        assert_eq!(off.current.skip[1], skip);

        let mut on = ProbabilityModel::new();
        on.adapt_non_coef_probs(0, &counts, true, true, true);
        let merged = |pre: u8, c0: u32, c1: u32| merge_prob(pre, c0, c1, MODE_MV_COUNT_SAT, MODE_MV_MAX_UPDATE_FACTOR);
        assert_eq!(on.current.tx8[0][0], merged(DEFAULT_TX_PROBS_8X8[0][0], 0, 30));
        assert_ne!(on.current.tx8[0][0], DEFAULT_TX_PROBS_8X8[0][0]);
        assert_eq!(on.current.tx8[1], DEFAULT_TX_PROBS_8X8[1]);
        assert_eq!(on.current.tx32[1][0], merged(DEFAULT_TX_PROBS_32X32[1][0], 0, 30));
        assert_eq!(on.current.tx32[1][2], merged(DEFAULT_TX_PROBS_32X32[1][2], 0, 30));
        assert_eq!(on.current.interp_filter[2][0], merged(DEFAULT_INTERP_FILTER_PROBS[2][0], 0, 40));
        assert_eq!(on.current.interp_filter[2][1], merged(DEFAULT_INTERP_FILTER_PROBS[2][1], 0, 40));
        assert_eq!(on.current.interp_filter[0], DEFAULT_INTERP_FILTER_PROBS[0]);
        assert_eq!(on.current.mv_comp[0].class0_hp, merged(DEFAULT_MV_CLASS0_HP_PROBS[0], 0, 40));
        assert_eq!(on.current.mv_comp[1].hp, merged(DEFAULT_MV_HP_PROBS[1], 40, 0));
        assert_eq!(on.current.skip[1], skip);
    }

    #[test]
    fn test_adapt_coef_probs_moves_toward_counts() {
        let mut model = ProbabilityModel::new();
        let mut counts = SyntaxElementCounter::new();
        counts.eob_branch[0][0][0][1][0] = 100;
        counts.coef[0][0][0][1][0][TOKEN_EOB] = 100;
        let before = model.current.coef[0][0][0][1][0][0];
        model.adapt_coef_probs(0, &counts, COEF_MAX_UPDATE_FACTOR);
        let after = model.current.coef[0][0][0][1][0][0];
        assert!(after > before);
        // untouched contexts keep the saved value
        assert_eq!(model.current.coef[3][1][1][5][5], DEFAULT_COEF_PROBS[3][1][1][5][5]);
    }
}
