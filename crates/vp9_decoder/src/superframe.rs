//! Superframe index (several frames packed into one chunk).

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{DecoderError, Result};

const SUPERFRAME_MARKER_MASK: u8 = 0b1110_0000;
const SUPERFRAME_MARKER: u8 = 0b1100_0000;

/// Sizes of the frames packed in `chunk`, in decode order. An empty list
/// means the chunk holds a single frame.
pub fn parse_superframe_sizes(chunk: &[u8]) -> Result<Vec<usize>> {
    let Some(&last) = chunk.last() else {
        return Ok(Vec::new());
    };
    if last & SUPERFRAME_MARKER_MASK != SUPERFRAME_MARKER {
        return Ok(Vec::new());
    }

    let bytes_per_size = (((last >> 3) & 0b11) + 1) as usize;
    let frames = ((last & 0b111) + 1) as usize;
    let index_size = 2 + bytes_per_size * frames;
    if index_size > chunk.len() {
        log::warn!("vp9: superframe index of {index_size} bytes in a {} byte chunk", chunk.len());
        return Ok(Vec::new());
    }
    let index = &chunk[chunk.len() - index_size..];
    if index[0] != last {
        log::warn!("vp9: superframe marker {last:#04x} not repeated at the start of the index");
        return Ok(Vec::new());
    }

    let sizes: Vec<usize> = index[1..index_size - 1]
        .chunks_exact(bytes_per_size)
        .map(|b| LittleEndian::read_uint(b, bytes_per_size) as usize)
        .collect();
    let total = sizes.iter().try_fold(0usize, |acc, &s| acc.checked_add(s));
    match total {
        Some(t) if t <= chunk.len() - index_size => Ok(sizes),
        _ => Err(DecoderError::corrupted("Superframe size invalid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_frame_index() {
        let mut chunk = vec![0xaa; 5];
        chunk.extend_from_slice(&[0x11; 7]);
        chunk.extend_from_slice(&[0xc1, 5, 7, 0xc1]);
        let sizes = parse_superframe_sizes(&chunk).unwrap();
        assert_eq!(sizes, vec![5, 7]);
        assert_eq!(sizes.iter().sum::<usize>(), chunk.len() - 4);
    }

    #[test]
    fn test_multi_byte_sizes() {
        // two bytes per size, three frames
        let mut chunk = vec![0u8; 0x0102 + 3 + 1];
        chunk.extend_from_slice(&[0xca, 0x02, 0x01, 0x03, 0x00, 0x01, 0x00, 0xca]);
        assert_eq!(parse_superframe_sizes(&chunk).unwrap(), vec![0x0102, 3, 1]);
    }

    #[test]
    fn test_not_a_superframe() {
        assert!(parse_superframe_sizes(&[]).unwrap().is_empty());
        assert!(parse_superframe_sizes(&[0x82, 0x49, 0x83, 0x42, 0x00]).unwrap().is_empty());
        // marker at the end but not repeated
        assert!(parse_superframe_sizes(&[0, 0, 1, 1, 0xc1]).unwrap().is_empty());
        // index longer than the chunk
        assert!(parse_superframe_sizes(&[0x01, 0xc7]).unwrap().is_empty());
    }

    #[test]
    fn test_sizes_overrun_chunk() {
        let chunk = [0u8, 0, 0xc1, 9, 9, 0xc1];
        assert!(matches!(parse_superframe_sizes(&chunk), Err(DecoderError::Corrupted(_))));
    }
}
