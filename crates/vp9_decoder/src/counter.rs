//! Per-frame symbol counts feeding backward probability adaptation.

/// Counts of ZERO, ONE, TWO-or-more and end-of-block per coefficient context.
pub type CoefCounts = [[[[[[u32; 4]; 6]; 6]; 2]; 2]; 4];
pub type EobBranchCounts = [[[[[u32; 6]; 6]; 2]; 2]; 4];

pub const TOKEN_ZERO: usize = 0;
pub const TOKEN_ONE: usize = 1;
pub const TOKEN_TWO: usize = 2;
pub const TOKEN_EOB: usize = 3;

#[derive(Clone, Default)]
pub struct MvComponentCounts {
    pub sign:      [u32; 2],
    pub classes:   [u32; 11],
    pub class0:    [u32; 2],
    pub bits:      [[u32; 2]; 10],
    pub class0_fr: [[u32; 4]; 2],
    pub fr:        [u32; 4],
    pub class0_hp: [u32; 2],
    pub hp:        [u32; 2],
}

/// Reset at the start of every frame; read only by the adaptation step.
#[derive(Clone, Default)]
pub struct SyntaxElementCounter {
    pub y_mode:        [[u32; 10]; 4],
    pub uv_mode:       [[u32; 10]; 10],
    pub partition:     [[u32; 4]; 16],
    pub interp_filter: [[u32; 3]; 4],
    pub inter_mode:    [[u32; 4]; 7],
    pub tx8:           [[u32; 2]; 2],
    pub tx16:          [[u32; 3]; 2],
    pub tx32:          [[u32; 4]; 2],
    pub is_inter:      [[u32; 2]; 4],
    pub comp_mode:     [[u32; 2]; 5],
    pub single_ref:    [[[u32; 2]; 2]; 5],
    pub comp_ref:      [[u32; 2]; 5],
    pub skip:          [[u32; 2]; 3],
    pub mv_joint:      [u32; 4],
    pub mv_comp:       [MvComponentCounts; 2],
    pub coef:          Box<CoefCounts>,
    pub eob_branch:    Box<EobBranchCounts>,
}

impl SyntaxElementCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_everything() {
        let mut c = SyntaxElementCounter::new();
        c.skip[1][1] = 3;
        c.coef[2][1][0][5][5][TOKEN_EOB] = 9;
        c.mv_comp[1].bits[9][1] = 4;
        c.clear();
        assert_eq!(c.skip[1][1], 0);
        assert_eq!(c.coef[2][1][0][5][5][TOKEN_EOB], 0);
        assert_eq!(c.mv_comp[1].bits[9][1], 0);
    }
}
