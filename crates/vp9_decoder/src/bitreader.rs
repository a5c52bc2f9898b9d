//! MSB-first bit reader for the uncompressed frame header.

use crate::error::{DecoderError, Result};

#[derive(Clone)]
pub struct BitReader<'a> {
    data:     &'a [u8],
    byte_pos: usize,
    bit_pos:  u8,
    current:  u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let current = data.first().copied().unwrap_or(0);
        BitReader { data, byte_pos: 0, bit_pos: 8, current }
    }

    /// Read `n` (<= 32) bits, most significant first.
    pub fn read_bits(&mut self, mut n: u8) -> Result<u32> {
        if n == 0 { return Ok(0); }
        let mut result = 0u32;
        while n > 0 {
            if self.byte_pos >= self.data.len() {
                return Err(DecoderError::corrupted("Ran out of header bits"));
            }
            let avail = self.bit_pos.min(n);
            let shift = self.bit_pos - avail;
            let mask  = ((1u16 << avail) - 1) as u8;
            result    = (result << avail) | ((self.current >> shift) & mask) as u32;
            self.bit_pos -= avail;
            n            -= avail;
            if self.bit_pos == 0 {
                self.byte_pos += 1;
                self.current   = self.data.get(self.byte_pos).copied().unwrap_or(0);
                self.bit_pos   = 8;
            }
        }
        Ok(result)
    }

    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        self.read_bits(1).map(|b| b != 0)
    }

    #[inline]
    pub fn read_f8(&mut self) -> Result<u8> {
        self.read_bits(8).map(|v| v as u8)
    }

    #[inline]
    pub fn read_f16(&mut self) -> Result<u16> {
        self.read_bits(16).map(|v| v as u16)
    }

    /// Magnitude followed by a sign bit.
    pub fn read_s(&mut self, n: u8) -> Result<i32> {
        let value = self.read_bits(n)? as i32;
        Ok(if self.read_bit()? { -value } else { value })
    }

    /// Bytes consumed so far, counting a partially read byte as consumed.
    pub fn bytes_consumed(&self) -> usize {
        if self.bit_pos < 8 { self.byte_pos + 1 } else { self.byte_pos }
    }

    pub fn bits_read(&self) -> usize {
        self.byte_pos * 8 + (8 - self.bit_pos as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_crosses_bytes() {
        let mut br = BitReader::new(&[0b1010_1100, 0b0101_0000]);
        assert_eq!(br.read_bits(3).unwrap(), 0b101);
        assert_eq!(br.read_bits(7).unwrap(), 0b0110_001);
        assert_eq!(br.bits_read(), 10);
        assert_eq!(br.bytes_consumed(), 2);
    }

    #[test]
    fn test_read_s_trailing_sign() {
        // value 5 in 4 bits, then sign 1
        let mut br = BitReader::new(&[0b0101_1000]);
        assert_eq!(br.read_s(4).unwrap(), -5);
    }

    #[test]
    fn test_exhaustion_is_corrupted() {
        let mut br = BitReader::new(&[0xff]);
        assert_eq!(br.read_f8().unwrap(), 0xff);
        assert!(matches!(br.read_bit(), Err(DecoderError::Corrupted(_))));
    }
}
