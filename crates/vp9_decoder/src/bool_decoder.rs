//! Boolean range decoder and binary tree symbol reader.

use crate::error::{DecoderError, Result};

const WINDOW: u32 = 64;

pub struct BoolDecoder<'a> {
    data:  &'a [u8],
    pos:   usize,
    /// Left-aligned window; the top 8 bits are the arithmetic value.
    value: u64,
    /// Valid bits held in `value`.
    bits:  u32,
    range: u32,
}

/// A syntax element is either coded with a tree or is implied by the context.
#[derive(Clone, Copy, Debug)]
pub enum TreeSelection<'t> {
    Tree(&'t [i8]),
    Single(u8),
}

impl<'a> BoolDecoder<'a> {
    /// Start decoding `size` bytes at the head of `data`.
    pub fn new(data: &'a [u8], size: usize) -> Result<Self> {
        if size == 0 || size > data.len() {
            return Err(DecoderError::corrupted(format!(
                "Range coder size {size} does not fit {} available bytes", data.len()
            )));
        }
        let mut bd = BoolDecoder { data: &data[..size], pos: 0, value: 0, bits: 0, range: 255 };
        bd.fill();
        if bd.read_bool(128) {
            return Err(DecoderError::corrupted("Range coder's first bool was non-zero"));
        }
        Ok(bd)
    }

    fn fill(&mut self) {
        while self.bits <= WINDOW - 8 {
            let byte = self.data.get(self.pos).copied().unwrap_or(0);
            self.pos += 1;
            self.value |= (byte as u64) << (WINDOW - 8 - self.bits);
            self.bits += 8;
        }
    }

    pub fn read_bool(&mut self, probability: u8) -> bool {
        let split = 1 + (((self.range - 1) * probability as u32) >> 8);
        let big_split = (split as u64) << (WINDOW - 8);
        let bit = if self.value >= big_split {
            self.range -= split;
            self.value -= big_split;
            true
        } else {
            self.range = split;
            false
        };
        let shift = self.range.leading_zeros().saturating_sub(24);
        if shift > 0 {
            if self.bits < 8 + shift { self.fill(); }
            self.range <<= shift;
            self.value <<= shift;
            self.bits  -= shift;
        }
        bit
    }

    pub fn read_literal(&mut self, n: u32) -> u32 {
        let mut v = 0;
        for _ in 0..n {
            v = (v << 1) | self.read_bool(128) as u32;
        }
        v
    }

    #[inline]
    pub fn read_flag(&mut self) -> bool {
        self.read_bool(128)
    }

    /// Walk `tree` from the root, asking `prob` for the probability of each
    /// node (the node index is the pair offset divided by two).
    pub fn read_tree(&mut self, sel: TreeSelection<'_>, mut prob: impl FnMut(usize) -> u8) -> u8 {
        match sel {
            TreeSelection::Single(v) => v,
            TreeSelection::Tree(tree) => {
                let mut n = 0usize;
                loop {
                    let bit = self.read_bool(prob(n >> 1)) as usize;
                    let next = tree[n + bit];
                    if next <= 0 { return (-next) as u8; }
                    n = next as usize;
                }
            }
        }
    }

    /// Check that every bit the range coder has not consumed is zero.
    pub fn exit(self) -> Result<()> {
        let pending = self.value << 8;
        let tail = self.data.get(self.pos..).unwrap_or(&[]);
        if pending != 0 || tail.iter().any(|&b| b != 0) {
            return Err(DecoderError::corrupted("Range coder padding was non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Boolean encoder used to build test streams.
    pub(crate) struct BoolEncoder {
        low:    u32,
        range:  u32,
        count:  i32,
        pub out: Vec<u8>,
    }

    impl BoolEncoder {
        pub(crate) fn new() -> Self {
            BoolEncoder { low: 0, range: 255, count: -24, out: Vec::new() }
        }

        pub(crate) fn put(&mut self, bit: bool, probability: u8) {
            let split = 1 + (((self.range - 1) * probability as u32) >> 8);
            let mut range = split;
            if bit {
                self.low += split;
                range = self.range - split;
            }
            let mut shift = range.leading_zeros() as i32 - 24;
            range <<= shift;
            self.count += shift;
            if self.count >= 0 {
                let offset = shift - self.count;
                if (self.low << (offset - 1)) & 0x8000_0000 != 0 {
                    let mut x = self.out.len();
                    while x > 0 && self.out[x - 1] == 0xff {
                        self.out[x - 1] = 0;
                        x -= 1;
                    }
                    if x > 0 { self.out[x - 1] += 1; }
                }
                self.out.push((self.low >> (24 - offset)) as u8);
                self.low <<= offset;
                shift = self.count;
                self.low &= 0xff_ffff;
                self.count -= 8;
            }
            self.low <<= shift;
            self.range = range;
        }

        pub(crate) fn put_literal(&mut self, v: u32, n: u32) {
            for i in (0..n).rev() {
                self.put((v >> i) & 1 != 0, 128);
            }
        }

        pub(crate) fn finish(mut self) -> Vec<u8> {
            for _ in 0..32 { self.put(false, 128); }
            self.out
        }
    }

    #[test]
    fn test_first_bool_must_be_zero() {
        let err = BoolDecoder::new(&[0xff, 0x00], 2).err().unwrap();
        match err {
            DecoderError::Corrupted(msg) => assert_eq!(msg, "Range coder's first bool was non-zero"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_size_larger_than_data() {
        assert!(BoolDecoder::new(&[0x00], 4).is_err());
        assert!(BoolDecoder::new(&[0x00], 0).is_err());
    }

    #[test]
    fn test_decodes_encoded_sequence() {
        let probs = [128u8, 1, 255, 30, 200, 77, 128, 5];
        let bits: Vec<bool> = (0..400).map(|i| (i * 7 + i / 3) % 5 < 2).collect();
        let mut enc = BoolEncoder::new();
        enc.put(false, 128);
        for (i, &b) in bits.iter().enumerate() {
            enc.put(b, probs[i % probs.len()]);
        }
        enc.put_literal(0x2a5, 10);
        let data = enc.finish();

        let mut dec = BoolDecoder::new(&data, data.len()).unwrap();
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(dec.read_bool(probs[i % probs.len()]), b, "bit {i}");
        }
        assert_eq!(dec.read_literal(10), 0x2a5);
    }

    #[test]
    fn test_read_tree() {
        // leaves 0, 1, 2 with the second level behind node pair 2
        let tree: [i8; 4] = [0, 2, -1, -2];
        let mut enc = BoolEncoder::new();
        enc.put(false, 128);
        enc.put(true, 100);
        enc.put(true, 50);
        enc.put(false, 100);
        let data = enc.finish();
        let mut dec = BoolDecoder::new(&data, data.len()).unwrap();
        let probs = [100u8, 50];
        assert_eq!(dec.read_tree(TreeSelection::Tree(&tree), |n| probs[n]), 2);
        assert_eq!(dec.read_tree(TreeSelection::Tree(&tree), |n| probs[n]), 0);
        assert_eq!(dec.read_tree(TreeSelection::Single(7), |_| 128), 7);
    }
}
