//! IVF container reader.
//!
//! An IVF file is a 32-byte file header followed by frames, each prefixed
//! with a 4-byte size and an 8-byte timestamp. All fields are little-endian.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::{try_alloc, DecoderError, Result};

const IVF_SIGNATURE: &[u8; 4] = b"DKIF";
const IVF_HEADER_SIZE: u16 = 32;
const IVF_FRAME_HEADER_SIZE: usize = 12;
pub const FOURCC_VP9: [u8; 4] = *b"VP90";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvfHeader {
    pub fourcc:         [u8; 4],
    pub width:          u16,
    pub height:         u16,
    pub timebase_den:   u32,
    pub timebase_num:   u32,
    pub frame_count:    u32,
}

#[derive(Debug, Clone)]
pub struct IvfFrame {
    pub timestamp: u64,
    pub data:      Vec<u8>,
}

pub struct IvfReader<R: Read> {
    reader: R,
    header: IvfHeader,
}

impl<R: Read> IvfReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        if &signature != IVF_SIGNATURE {
            return Err(DecoderError::corrupted("Missing DKIF signature"));
        }
        let version = reader.read_u16::<LittleEndian>()?;
        if version != 0 {
            return Err(DecoderError::NotImplemented(format!("IVF version {version}")));
        }
        let header_size = reader.read_u16::<LittleEndian>()?;
        if header_size < IVF_HEADER_SIZE {
            return Err(DecoderError::corrupted(format!("IVF header size {header_size} is below 32")));
        }
        let mut fourcc = [0u8; 4];
        reader.read_exact(&mut fourcc)?;
        let header = IvfHeader {
            fourcc,
            width:        reader.read_u16::<LittleEndian>()?,
            height:       reader.read_u16::<LittleEndian>()?,
            timebase_den: reader.read_u32::<LittleEndian>()?,
            timebase_num: reader.read_u32::<LittleEndian>()?,
            frame_count:  reader.read_u32::<LittleEndian>()?,
        };
        // unused field plus any header extension
        let skip = (header_size - IVF_HEADER_SIZE) as u64 + 4;
        io::copy(&mut (&mut reader).take(skip), &mut io::sink())?;

        if header.fourcc != FOURCC_VP9 {
            log::warn!("ivf: fourcc {:?} is not VP90", String::from_utf8_lossy(&header.fourcc));
        }
        log::debug!(
            "ivf: {}x{} {}/{} fps, {} frames",
            header.width, header.height, header.timebase_den, header.timebase_num, header.frame_count
        );
        Ok(IvfReader { reader, header })
    }

    pub fn header(&self) -> &IvfHeader {
        &self.header
    }

    /// Next frame chunk, or `None` at the end of the file.
    pub fn next_frame(&mut self) -> Result<Option<IvfFrame>> {
        let mut fh = [0u8; IVF_FRAME_HEADER_SIZE];
        let mut filled = 0;
        while filled < fh.len() {
            match self.reader.read(&mut fh[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < fh.len() {
            return Err(DecoderError::corrupted("Truncated IVF frame header"));
        }

        let size = LittleEndian::read_u32(&fh[..4]) as usize;
        let timestamp = LittleEndian::read_u64(&fh[4..]);
        let mut data = try_alloc::<u8>(size, "IVF frame")?;
        self.reader.read_exact(&mut data)?;
        Ok(Some(IvfFrame { timestamp, data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn ivf_file(frames: &[&[u8]]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"DKIF");
        v.write_u16::<LittleEndian>(0).unwrap();
        v.write_u16::<LittleEndian>(32).unwrap();
        v.extend_from_slice(b"VP90");
        v.write_u16::<LittleEndian>(352).unwrap();
        v.write_u16::<LittleEndian>(288).unwrap();
        v.write_u32::<LittleEndian>(30).unwrap();
        v.write_u32::<LittleEndian>(1).unwrap();
        v.write_u32::<LittleEndian>(frames.len() as u32).unwrap();
        v.write_u32::<LittleEndian>(0).unwrap();
        for (i, f) in frames.iter().enumerate() {
            v.write_u32::<LittleEndian>(f.len() as u32).unwrap();
            v.write_u64::<LittleEndian>(i as u64 * 1000).unwrap();
            v.extend_from_slice(f);
        }
        v
    }

    #[test]
    fn test_read_frames() {
        let file = ivf_file(&[&[1, 2, 3], &[], &[9; 40]]);
        assert_eq!(file.len(), 32 + 3 * 12 + 43);
        let mut r = IvfReader::new(Cursor::new(file)).unwrap();
        assert_eq!(r.header().fourcc, FOURCC_VP9);
        assert_eq!((r.header().width, r.header().height), (352, 288));
        assert_eq!(r.header().frame_count, 3);

        let f = r.next_frame().unwrap().unwrap();
        assert_eq!(f.data, vec![1, 2, 3]);
        assert_eq!(f.timestamp, 0);
        assert!(r.next_frame().unwrap().unwrap().data.is_empty());
        let f = r.next_frame().unwrap().unwrap();
        assert_eq!((f.data.len(), f.timestamp), (40, 2000));
        assert!(r.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_bad_signature_and_version() {
        let mut file = ivf_file(&[]);
        file[0] = b'X';
        assert!(matches!(IvfReader::new(Cursor::new(file)), Err(DecoderError::Corrupted(_))));

        let mut file = ivf_file(&[]);
        file[4] = 1;
        assert!(matches!(IvfReader::new(Cursor::new(file)), Err(DecoderError::NotImplemented(_))));
    }

    #[test]
    fn test_truncated_frame() {
        let mut file = ivf_file(&[&[7; 10]]);
        file.truncate(file.len() - 4);
        let mut r = IvfReader::new(Cursor::new(file.clone())).unwrap();
        assert!(matches!(r.next_frame(), Err(DecoderError::Io(_))));

        file.truncate(32 + 5);
        let mut r = IvfReader::new(Cursor::new(file)).unwrap();
        assert!(matches!(r.next_frame(), Err(DecoderError::Corrupted(_))));
    }
}
