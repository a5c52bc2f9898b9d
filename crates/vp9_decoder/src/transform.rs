//! Inverse transforms.
//!
//! DCT and ADST are expressed as sequences of butterfly (`B`) and Hadamard
//! (`H`) rotations over a working row `T`, with 14-bit fixed point angles in
//! units of pi/128. The 2-D transform runs the row pass first, then the
//! column pass, then rounds to the residual scale.

use crate::types::TxType;

const COS64: [i32; 33] = [
    16384, 16364, 16305, 16207, 16069, 15893, 15679, 15426, 15137, 14811, 14449,
    14053, 13623, 13160, 12665, 12140, 11585, 11003, 10394,  9760,  9102,  8423,
     7723,  7005,  6270,  5520,  4756,  3981,  3196,  2404,  1606,   804,     0,
];

const SINPI_1_9: i64 = 5283;
const SINPI_2_9: i64 = 9929;
const SINPI_3_9: i64 = 13377;
const SINPI_4_9: i64 = 15212;

#[inline(always)]
fn round2(x: i64, n: u32) -> i32 {
    ((x + (1i64 << (n - 1))) >> n) as i32
}

fn cos64(angle: i32) -> i64 {
    let a = (angle & 127) as usize;
    let v = match a {
        0..=32  => COS64[a],
        33..=64 => -COS64[64 - a],
        65..=96 => -COS64[a - 64],
        _       => COS64[128 - a],
    };
    v as i64
}

#[inline(always)]
fn sin64(angle: i32) -> i64 {
    cos64(angle - 32)
}

/// Reverse the low `bits` bits of `x`.
#[inline(always)]
fn brev(bits: u32, x: usize) -> usize {
    x.reverse_bits() >> (usize::BITS - bits)
}

// ─── Rotations ───────────────────────────────────────────────────────────────

#[inline(always)]
fn butterfly(t: &mut [i32], a: usize, b: usize, angle: i32, flip: bool) {
    let (c, s) = (cos64(angle), sin64(angle));
    let x = t[a] as i64 * c - t[b] as i64 * s;
    let y = t[a] as i64 * s + t[b] as i64 * c;
    t[a] = round2(x, 14);
    t[b] = round2(y, 14);
    if flip {
        t.swap(a, b);
    }
}

#[inline(always)]
fn hadamard(t: &mut [i32], a: usize, b: usize, flip: bool) {
    let (a, b) = if flip { (b, a) } else { (a, b) };
    let (x, y) = (t[a], t[b]);
    t[a] = x.wrapping_add(y);
    t[b] = x.wrapping_sub(y);
}

/// Butterfly into the high precision array without rounding.
#[inline(always)]
fn butterfly_s(t: &[i32], s: &mut [i64], a: usize, b: usize, angle: i32, flip: bool) {
    let (c, si) = (cos64(angle), sin64(angle));
    let (x, y) = (t[a] as i64, t[b] as i64);
    s[a] = x * c - y * si;
    s[b] = x * si + y * c;
    if flip {
        s.swap(a, b);
    }
}

/// Hadamard rotation out of the high precision array, rounding back.
#[inline(always)]
fn hadamard_s(s: &[i64], t: &mut [i32], a: usize, b: usize) {
    let (x, y) = (s[a], s[b]);
    t[a] = round2(x + y, 14);
    t[b] = round2(x - y, 14);
}

// ─── DCT ─────────────────────────────────────────────────────────────────────

fn idct_permute(t: &mut [i32], n: usize) {
    let n0 = 1 << n;
    let mut copy = [0i32; 32];
    copy[..n0].copy_from_slice(&t[..n0]);
    for (i, v) in t.iter_mut().take(n0).enumerate() {
        *v = copy[brev(n as u32, i)];
    }
}

/// In-place inverse DCT of `1 << n` bit-reversed inputs.
fn idct(t: &mut [i32], n: usize) {
    let n0 = 1 << n;
    let n1 = n0 >> 1;
    let n2 = n1 >> 1;
    let n3 = n2 >> 1;

    if n == 2 {
        butterfly(t, 0, 1, 16, true);
    } else {
        idct(t, n - 1);
    }

    for i in 0..n2 {
        butterfly(t, n1 + i, n0 - 1 - i, 32 - brev(5, n1 + i) as i32, false);
    }

    if n >= 3 {
        for i in 0..n3 {
            for j in 0..2 {
                hadamard(t, n1 + 4 * i + 2 * j, n1 + 1 + 4 * i + 2 * j, j == 1);
            }
        }
    }

    if n == 5 {
        for i in 0..2 {
            for j in 0..2 {
                let angle = 28 - 16 * i as i32 + 56 * j as i32;
                butterfly(t, n0 - n + 3 - n2 * j - 4 * i, n1 + n - 4 + n2 * j + 4 * i, angle, true);
            }
        }
        for i in 0..2 {
            for j in 0..4 {
                hadamard(t, n1 + n3 * j + i, n1 + n2 - 5 + n3 * j - i, j & 1 == 1);
            }
        }
    }

    if n >= 4 {
        for i in 0..=(n == 5) as usize {
            for j in 0..2 {
                butterfly(t, n0 - n + 2 - i - n2 * j, n1 + n - 3 + i + n2 * j, 24 + 48 * j as i32, true);
            }
        }
        for i in 0..(2 * n - 6) {
            for j in 0..2 {
                hadamard(t, n1 + n2 * j + i, n1 + n2 - 1 + n2 * j - i, j & 1 == 1);
            }
        }
    }

    if n >= 3 {
        for i in 0..n3 {
            butterfly(t, n0 - n3 - 1 - i, n1 + n3 + i, 16, true);
        }
    }

    for i in 0..n1 {
        hadamard(t, i, n0 - 1 - i, false);
    }
}

// ─── ADST ────────────────────────────────────────────────────────────────────

fn adst_input_permute(t: &mut [i32], n0: usize) {
    let mut copy = [0i32; 16];
    copy[..n0].copy_from_slice(&t[..n0]);
    for i in (0..n0).step_by(2) {
        t[i] = copy[n0 - 1 - i];
        t[i + 1] = copy[i];
    }
}

fn adst_output_permute(t: &mut [i32], n: usize) {
    let mut copy = [0i32; 16];
    copy[..1 << n].copy_from_slice(&t[..1 << n]);
    if n == 4 {
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    for d in 0..2 {
                        t[8 * a + 4 * b + 2 * c + d] = copy[8 * (d ^ c) + 4 * (c ^ b) + 2 * (b ^ a) + a];
                    }
                }
            }
        }
    } else {
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    t[4 * a + 2 * b + c] = copy[4 * (c ^ b) + 2 * (b ^ a) + a];
                }
            }
        }
    }
}

fn iadst4(t: &mut [i32]) {
    let (t0, t1, t2, t3) = (t[0] as i64, t[1] as i64, t[2] as i64, t[3] as i64);
    let s0 = SINPI_1_9 * t0;
    let s1 = SINPI_2_9 * t0;
    let s2 = SINPI_3_9 * t1;
    let s3 = SINPI_4_9 * t2;
    let s4 = SINPI_1_9 * t2;
    let s5 = SINPI_2_9 * t3;
    let s6 = SINPI_4_9 * t3;
    let s7 = SINPI_3_9 * (t0 - t2 + t3);

    let x0 = s0 + s3 + s5;
    let x1 = s1 - s4 - s6;
    let x2 = s7;
    let x3 = s2;

    t[0] = round2(x0 + x3, 14);
    t[1] = round2(x1 + x3, 14);
    t[2] = round2(x2, 14);
    t[3] = round2(x0 + x1 - x3, 14);
}

fn iadst8(t: &mut [i32]) {
    let mut s = [0i64; 8];
    adst_input_permute(t, 8);

    for i in 0..4 {
        butterfly_s(t, &mut s, 2 * i, 1 + 2 * i, 30 - 8 * i as i32, true);
    }
    for i in 0..4 {
        hadamard_s(&s, t, i, 4 + i);
    }
    for i in 0..2 {
        butterfly_s(t, &mut s, 4 + 3 * i, 5 + i, 24 - 16 * i as i32, true);
    }
    for i in 0..2 {
        hadamard_s(&s, t, 4 + i, 6 + i);
    }
    for i in 0..2 {
        hadamard(t, i, 2 + i, false);
    }
    for i in 0..2 {
        butterfly(t, 2 + 4 * i, 3 + 4 * i, 16, true);
    }

    adst_output_permute(t, 3);
    for i in 0..4 {
        t[1 + 2 * i] = t[1 + 2 * i].wrapping_neg();
    }
}

fn iadst16(t: &mut [i32]) {
    let mut s = [0i64; 16];
    adst_input_permute(t, 16);

    for i in 0..8 {
        butterfly_s(t, &mut s, 2 * i, 1 + 2 * i, 31 - 4 * i as i32, true);
    }
    for i in 0..8 {
        hadamard_s(&s, t, i, 8 + i);
    }
    for i in 0..4 {
        butterfly_s(t, &mut s, 8 + 2 * i, 9 + 2 * i, 28 - 16 * i as i32, true);
    }
    for i in 0..4 {
        hadamard_s(&s, t, 8 + i, 12 + i);
    }
    for i in 0..4 {
        hadamard(t, i, 4 + i, false);
    }
    for i in 0..2 {
        for j in 0..2 {
            butterfly_s(t, &mut s, 4 + 8 * i + 3 * j, 5 + 8 * i + j, 24 - 16 * j as i32, true);
        }
    }
    for i in 0..2 {
        for j in 0..2 {
            hadamard_s(&s, t, 4 + 8 * j + i, 6 + 8 * j + i);
        }
    }
    for i in 0..2 {
        for j in 0..2 {
            hadamard(t, 8 * j + i, 2 + 8 * j + i, false);
        }
    }
    for i in 0..2 {
        for j in 0..2 {
            butterfly(t, 2 + 4 * j + 8 * i, 3 + 4 * j + 8 * i, 48 + 64 * (i ^ j) as i32, false);
        }
    }

    adst_output_permute(t, 4);
    for i in 0..2 {
        for j in 0..2 {
            let k = 1 + 12 * j + 2 * i;
            t[k] = t[k].wrapping_neg();
        }
    }
}

// ─── Walsh-Hadamard ──────────────────────────────────────────────────────────

fn iwht4(t: &mut [i32], shift: u32) {
    let mut a = t[0] >> shift;
    let mut c = t[1] >> shift;
    let mut d = t[2] >> shift;
    let mut b = t[3] >> shift;
    a += c;
    d -= b;
    let e = (a - d) >> 1;
    b = e - b;
    c = e - c;
    a -= b;
    d += c;
    t[0] = a;
    t[1] = b;
    t[2] = c;
    t[3] = d;
}

// ─── 2-D ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kernel { Dct, Adst }

fn kernels(tx_type: TxType) -> (Kernel, Kernel) {
    // (row, column)
    match tx_type {
        TxType::DctDct   => (Kernel::Dct, Kernel::Dct),
        TxType::AdstDct  => (Kernel::Dct, Kernel::Adst),
        TxType::DctAdst  => (Kernel::Adst, Kernel::Dct),
        TxType::AdstAdst => (Kernel::Adst, Kernel::Adst),
    }
}

fn transform_1d(t: &mut [i32], n: usize, kernel: Kernel) {
    match kernel {
        Kernel::Dct => {
            idct_permute(t, n);
            idct(t, n);
        }
        Kernel::Adst => match n {
            2 => iadst4(t),
            3 => iadst8(t),
            _ => iadst16(t),
        },
    }
}

#[inline]
fn fits_signed(v: i32, bits: u32) -> bool {
    let lim = 1i64 << (bits - 1);
    (-lim..lim).contains(&(v as i64))
}

/// Debug builds assert the `8 + bit_depth` signed bound on the output of a
/// 1-D pass.
#[inline]
fn debug_check_range(t: &[i32], bit_depth: u8) {
    debug_assert!(
        t.iter().all(|&v| fits_signed(v, 8 + bit_depth as u32)),
        "inverse transform value exceeds {} bits",
        8 + bit_depth
    );
}

/// Inverse transform a `(1 << n) x (1 << n)` row-major block in place,
/// leaving the residual to be added to the prediction.
///
/// `n` is 2..=5. Lossless frames only ever carry 4x4 Walsh-Hadamard blocks.
/// The range bound is checked on the outputs of every row and column pass,
/// not on each butterfly step inside a pass.
pub fn inverse_transform_2d(block: &mut [i32], n: usize, tx_type: TxType, lossless: bool, bit_depth: u8) {
    debug_assert!((2..=5).contains(&n));
    debug_assert!(!lossless || n == 2);
    debug_assert!(tx_type == TxType::DctDct || n <= 4);
    let n0 = 1usize << n;
    let (row_kernel, col_kernel) = kernels(tx_type);
    let mut t = [0i32; 32];

    for i in 0..n0 {
        let row = &mut block[i * n0..(i + 1) * n0];
        if row.iter().all(|&v| v == 0) {
            continue;
        }
        t[..n0].copy_from_slice(row);
        if lossless {
            iwht4(&mut t, 2);
        } else {
            transform_1d(&mut t, n, row_kernel);
        }
        debug_check_range(&t[..n0], bit_depth);
        row.copy_from_slice(&t[..n0]);
    }

    let shift = if lossless { 0 } else { (n as u32 + 2).min(6) };
    for j in 0..n0 {
        for i in 0..n0 {
            t[i] = block[i * n0 + j];
        }
        if lossless {
            iwht4(&mut t, 0);
        } else {
            transform_1d(&mut t, n, col_kernel);
        }
        debug_check_range(&t[..n0], bit_depth);
        for i in 0..n0 {
            block[i * n0 + j] = if shift == 0 { t[i] } else { round2(t[i] as i64, shift) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trig_tables() {
        assert_eq!(cos64(0), 16384);
        assert_eq!(cos64(64), -16384);
        assert_eq!(sin64(0), 0);
        assert_eq!(sin64(16), cos64(16));
        assert_eq!(cos64(28 - 32), cos64(124));
        assert_eq!(brev(5, 1), 16);
        assert_eq!(brev(3, 6), 3);
    }

    #[test]
    fn test_dc_only_4x4() {
        let mut block = [0i32; 16];
        block[0] = 64;
        inverse_transform_2d(&mut block, 2, TxType::DctDct, false, 8);
        assert!(block.iter().all(|&v| v == 2), "{block:?}");
    }

    #[test]
    fn test_dc_only_32x32() {
        let mut block = vec![0i32; 1024];
        block[0] = 1024;
        inverse_transform_2d(&mut block, 5, TxType::DctDct, false, 8);
        assert!(block.iter().all(|&v| v == 8));
    }

    #[test]
    fn test_dc_only_is_flat_for_every_dct_size() {
        for n in 2..=5 {
            let n0 = 1 << n;
            let mut block = vec![0i32; n0 * n0];
            block[0] = 512;
            inverse_transform_2d(&mut block, n, TxType::DctDct, false, 8);
            assert!(block.iter().all(|&v| v == block[0]), "size {n0}");
            assert!(block[0] > 0);
        }
    }

    #[test]
    fn test_zero_block_stays_zero() {
        for tx_type in [TxType::AdstDct, TxType::DctAdst, TxType::AdstAdst] {
            for n in 2..=4 {
                let mut block = vec![0i32; 1 << (2 * n)];
                inverse_transform_2d(&mut block, n, tx_type, false, 8);
                assert!(block.iter().all(|&v| v == 0));
            }
        }
    }

    #[test]
    fn test_adst_dc_is_not_flat() {
        let mut block = [0i32; 16];
        block[0] = 256;
        inverse_transform_2d(&mut block, 2, TxType::AdstAdst, false, 8);
        // the sine basis rises away from the top-left corner
        assert!(block[0] < block[15]);
        assert!(block[0] >= 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "inverse transform value exceeds 16 bits")]
    fn test_column_pass_overflow_is_caught() {
        // every row output (about 28284) fits in 16 bits, the column DCT of
        // four such values does not
        let mut block = [0i32; 16];
        for i in 0..4 {
            block[i * 4] = 40000;
        }
        inverse_transform_2d(&mut block, 2, TxType::DctDct, false, 8);
    }

    #[test]
    fn test_walsh_hadamard_dc() {
        let mut block = [0i32; 16];
        block[0] = 4;
        inverse_transform_2d(&mut block, 2, TxType::DctDct, true, 8);
        assert_eq!(block[0], 1);
        assert!(block[1..].iter().all(|&v| v == 0));
    }
}
