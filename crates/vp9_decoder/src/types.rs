//! Shared enums and small value types of the VP9 syntax.

// ─── Frame level ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameType { #[default] Key, NonKey }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    Unknown,
    #[default]
    Bt601,
    Bt709,
    Smpte170,
    Smpte240,
    Bt2020,
    Reserved,
    Rgb,
}

impl ColorSpace {
    pub fn from_bits(v: u32) -> Self {
        match v {
            0 => ColorSpace::Unknown,
            1 => ColorSpace::Bt601,
            2 => ColorSpace::Bt709,
            3 => ColorSpace::Smpte170,
            4 => ColorSpace::Smpte240,
            5 => ColorSpace::Bt2020,
            6 => ColorSpace::Reserved,
            _ => ColorSpace::Rgb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRange { #[default] Studio, Full }

/// Sample format carried by every decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    pub bit_depth:     u8,
    pub color_space:   ColorSpace,
    pub color_range:   ColorRange,
    pub subsampling_x: bool,
    pub subsampling_y: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            bit_depth:     8,
            color_space:   ColorSpace::Bt601,
            color_range:   ColorRange::Studio,
            subsampling_x: true,
            subsampling_y: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpFilter { #[default] Regular, Smooth, Sharp, Bilinear, Switchable }

impl InterpFilter {
    /// Mapping of the 2-bit header literal.
    pub fn from_literal(v: u32) -> Self {
        match v {
            0 => InterpFilter::Smooth,
            1 => InterpFilter::Regular,
            2 => InterpFilter::Sharp,
            _ => InterpFilter::Bilinear,
        }
    }

    pub fn from_index(v: u8) -> Self {
        match v {
            0 => InterpFilter::Regular,
            1 => InterpFilter::Smooth,
            2 => InterpFilter::Sharp,
            _ => InterpFilter::Bilinear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TxMode { #[default] Only4x4, Allow8x8, Allow16x16, Allow32x32, Select }

impl TxMode {
    pub fn largest_tx(self) -> TxSize {
        match self {
            TxMode::Only4x4    => TxSize::Tx4x4,
            TxMode::Allow8x8   => TxSize::Tx8x8,
            TxMode::Allow16x16 => TxSize::Tx16x16,
            _                  => TxSize::Tx32x32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceMode { #[default] Single, Compound, Select }

// ─── Block level ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TxSize { #[default] Tx4x4, Tx8x8, Tx16x16, Tx32x32 }

impl TxSize {
    pub fn from_index(v: u8) -> Self {
        match v {
            0 => TxSize::Tx4x4,
            1 => TxSize::Tx8x8,
            2 => TxSize::Tx16x16,
            _ => TxSize::Tx32x32,
        }
    }

    /// log2 of the width in 4x4 units.
    #[inline]
    pub fn log2_4x4(self) -> usize { self as usize }

    #[inline]
    pub fn width_4x4(self) -> usize { 1 << self as usize }

    #[inline]
    pub fn width(self) -> usize { 4 << self as usize }
}

/// `AdstDct` is ADST vertically and DCT horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType { DctDct, AdstDct, DctAdst, AdstAdst }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition { None, Horizontal, Vertical, Split }

impl Partition {
    pub fn from_index(v: u8) -> Self {
        match v {
            0 => Partition::None,
            1 => Partition::Horizontal,
            2 => Partition::Vertical,
            _ => Partition::Split,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BlockSize {
    #[default]
    B4x4, B4x8, B8x4, B8x8, B8x16, B16x8, B16x16,
    B16x32, B32x16, B32x32, B32x64, B64x32, B64x64,
}

const B_WIDTH_LOG2:  [u8; 13] = [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4];
const B_HEIGHT_LOG2: [u8; 13] = [0, 1, 0, 1, 2, 1, 2, 3, 2, 3, 4, 3, 4];
const MI_WIDTH_LOG2: [u8; 13] = [0, 0, 0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3];
const MI_HEIGHT_LOG2:[u8; 13] = [0, 0, 0, 0, 1, 0, 1, 2, 1, 2, 3, 2, 3];
const SIZE_GROUP:    [u8; 13] = [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 3];

impl BlockSize {
    pub const ALL: [BlockSize; 13] = [
        BlockSize::B4x4, BlockSize::B4x8, BlockSize::B8x4, BlockSize::B8x8,
        BlockSize::B8x16, BlockSize::B16x8, BlockSize::B16x16, BlockSize::B16x32,
        BlockSize::B32x16, BlockSize::B32x32, BlockSize::B32x64, BlockSize::B64x32,
        BlockSize::B64x64,
    ];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Width in 4x4 units, log2.
    #[inline]
    pub fn width_log2(self) -> usize { B_WIDTH_LOG2[self as usize] as usize }

    #[inline]
    pub fn height_log2(self) -> usize { B_HEIGHT_LOG2[self as usize] as usize }

    #[inline]
    pub fn num_4x4_wide(self) -> usize { 1 << self.width_log2() }

    #[inline]
    pub fn num_4x4_high(self) -> usize { 1 << self.height_log2() }

    #[inline]
    pub fn num_8x8_wide(self) -> usize { 1 << MI_WIDTH_LOG2[self as usize] }

    #[inline]
    pub fn num_8x8_high(self) -> usize { 1 << MI_HEIGHT_LOG2[self as usize] }

    #[inline]
    pub fn size_group(self) -> usize { SIZE_GROUP[self as usize] as usize }

    pub fn max_tx_size(self) -> TxSize {
        match self {
            BlockSize::B4x4 | BlockSize::B4x8 | BlockSize::B8x4 => TxSize::Tx4x4,
            BlockSize::B8x8 | BlockSize::B8x16 | BlockSize::B16x8 => TxSize::Tx8x8,
            BlockSize::B16x16 | BlockSize::B16x32 | BlockSize::B32x16 => TxSize::Tx16x16,
            _ => TxSize::Tx32x32,
        }
    }

    pub fn subsize(self, p: Partition) -> Option<BlockSize> {
        use BlockSize::*;
        let s = match (p, self) {
            (Partition::None, b) => b,
            (Partition::Horizontal, B8x8)   => B8x4,
            (Partition::Horizontal, B16x16) => B16x8,
            (Partition::Horizontal, B32x32) => B32x16,
            (Partition::Horizontal, B64x64) => B64x32,
            (Partition::Vertical, B8x8)     => B4x8,
            (Partition::Vertical, B16x16)   => B8x16,
            (Partition::Vertical, B32x32)   => B16x32,
            (Partition::Vertical, B64x64)   => B32x64,
            (Partition::Split, B8x8)        => B4x4,
            (Partition::Split, B16x16)      => B8x8,
            (Partition::Split, B32x32)      => B16x16,
            (Partition::Split, B64x64)      => B32x32,
            _ => return None,
        };
        Some(s)
    }

    /// Size of this block in a plane subsampled by `(ssx, ssy)`.
    pub fn subsampled(self, ssx: bool, ssy: bool) -> Option<BlockSize> {
        use BlockSize::*;
        let s = match (self, ssx, ssy) {
            (b, false, false) => b,
            (B4x4, _, _) => return None,
            (B4x8, false, true) => B4x4,
            (B8x4, true, false) => B4x4,
            (B8x8, false, true) => B8x4,
            (B8x8, true, false) => B4x8,
            (B8x8, true, true) => B4x4,
            (B8x16, false, true) => B8x8,
            (B8x16, true, true) => B4x8,
            (B16x8, true, false) => B8x8,
            (B16x8, true, true) => B8x4,
            (B16x16, false, true) => B16x8,
            (B16x16, true, false) => B8x16,
            (B16x16, true, true) => B8x8,
            (B16x32, false, true) => B16x16,
            (B16x32, true, true) => B8x16,
            (B32x16, true, false) => B16x16,
            (B32x16, true, true) => B16x8,
            (B32x32, false, true) => B32x16,
            (B32x32, true, false) => B16x32,
            (B32x32, true, true) => B16x16,
            (B32x64, false, true) => B32x32,
            (B32x64, true, true) => B16x32,
            (B64x32, true, false) => B32x32,
            (B64x32, true, true) => B32x16,
            (B64x64, false, true) => B64x32,
            (B64x64, true, false) => B32x64,
            (B64x64, true, true) => B32x32,
            _ => return None,
        };
        Some(s)
    }

    /// Largest transform usable by the chroma planes of a block.
    pub fn uv_tx_size(self, tx: TxSize, ssx: bool, ssy: bool) -> TxSize {
        if self < BlockSize::B8x8 { return TxSize::Tx4x4; }
        match self.subsampled(ssx, ssy) {
            Some(uv) => tx.min(uv.max_tx_size()),
            None => TxSize::Tx4x4,
        }
    }
}

// ─── Prediction modes ────────────────────────────────────────────────────────

pub const DC_PRED: u8 = 0;
pub const V_PRED: u8 = 1;
pub const H_PRED: u8 = 2;
pub const D45_PRED: u8 = 3;
pub const D135_PRED: u8 = 4;
pub const D117_PRED: u8 = 5;
pub const D153_PRED: u8 = 6;
pub const D207_PRED: u8 = 7;
pub const D63_PRED: u8 = 8;
pub const TM_PRED: u8 = 9;
pub const NEARESTMV: u8 = 10;
pub const NEARMV: u8 = 11;
pub const ZEROMV: u8 = 12;
pub const NEWMV: u8 = 13;

/// Prediction mode of a block: intra modes 0..=9, inter modes 10..=13.
pub type PredictionMode = u8;

#[inline]
pub fn is_inter_mode(mode: PredictionMode) -> bool { mode >= NEARESTMV }

pub fn mode_to_tx_type(mode: PredictionMode) -> TxType {
    match mode {
        V_PRED | D117_PRED | D63_PRED => TxType::AdstDct,
        H_PRED | D153_PRED | D207_PRED => TxType::DctAdst,
        D45_PRED => TxType::DctDct,
        D135_PRED | TM_PRED => TxType::AdstAdst,
        _ => TxType::DctDct,
    }
}

// ─── References and motion vectors ───────────────────────────────────────────

/// `None` < `Intra` < inter references; the ordering is used by the
/// candidate search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RefFrame { #[default] None, Intra, Last, Golden, AltRef }

impl RefFrame {
    pub const INTER: [RefFrame; 3] = [RefFrame::Last, RefFrame::Golden, RefFrame::AltRef];

    #[inline]
    pub fn is_inter(self) -> bool { self > RefFrame::Intra }

    /// Index into the three active reference slots.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            RefFrame::Golden => 1,
            RefFrame::AltRef => 2,
            _ => 0,
        }
    }

    pub fn from_index(v: u32) -> Self {
        match v {
            0 => RefFrame::Intra,
            1 => RefFrame::Last,
            2 => RefFrame::Golden,
            _ => RefFrame::AltRef,
        }
    }
}

/// Motion vector in 1/8 pel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionVector {
    pub row: i32,
    pub col: i32,
}

impl MotionVector {
    pub const ZERO: MotionVector = MotionVector { row: 0, col: 0 };

    #[inline]
    pub fn new(row: i32, col: i32) -> Self { MotionVector { row, col } }

    #[inline]
    pub fn is_zero(self) -> bool { self.row == 0 && self.col == 0 }
}

impl std::ops::Add for MotionVector {
    type Output = MotionVector;

    fn add(self, o: MotionVector) -> MotionVector {
        MotionVector::new(self.row + o.row, self.col + o.col)
    }
}

impl std::ops::Neg for MotionVector {
    type Output = MotionVector;

    fn neg(self) -> MotionVector {
        MotionVector::new(-self.row, -self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsize_and_dimensions() {
        assert_eq!(BlockSize::B64x64.subsize(Partition::Horizontal), Some(BlockSize::B64x32));
        assert_eq!(BlockSize::B8x8.subsize(Partition::Split), Some(BlockSize::B4x4));
        assert_eq!(BlockSize::B16x8.subsize(Partition::Split), None);
        assert_eq!(BlockSize::B32x16.num_4x4_wide(), 8);
        assert_eq!(BlockSize::B32x16.num_8x8_high(), 2);
        assert_eq!(BlockSize::B4x8.num_8x8_wide(), 1);
    }

    #[test]
    fn test_uv_tx_size() {
        assert_eq!(BlockSize::B64x64.uv_tx_size(TxSize::Tx32x32, true, true), TxSize::Tx32x32);
        assert_eq!(BlockSize::B16x16.uv_tx_size(TxSize::Tx16x16, true, true), TxSize::Tx8x8);
        assert_eq!(BlockSize::B4x8.uv_tx_size(TxSize::Tx4x4, true, true), TxSize::Tx4x4);
        assert_eq!(BlockSize::B16x16.uv_tx_size(TxSize::Tx16x16, false, false), TxSize::Tx16x16);
    }

    #[test]
    fn test_ref_frame_order() {
        assert!(!RefFrame::Intra.is_inter());
        assert!(RefFrame::Last.is_inter());
        assert!(RefFrame::None < RefFrame::Intra);
        assert_eq!(RefFrame::AltRef.slot(), 2);
    }
}
