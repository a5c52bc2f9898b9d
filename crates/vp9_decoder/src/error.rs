use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecoderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted bitstream: {0}")]
    Corrupted(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

pub type Result<T> = std::result::Result<T, DecoderError>;

impl DecoderError {
    pub fn corrupted(msg: impl Into<String>) -> Self {
        DecoderError::Corrupted(msg.into())
    }
}

/// Allocate a zero-filled buffer, reporting allocation failure instead of aborting.
pub fn try_alloc<T: Clone + Default>(len: usize, what: &str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| DecoderError::OutOfMemory(format!("{what}: {len} elements")))?;
    v.resize(len, T::default());
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc_zero_fills() {
        let v: Vec<u16> = try_alloc(17, "plane").unwrap();
        assert_eq!(v.len(), 17);
        assert!(v.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_error_messages() {
        let e = DecoderError::corrupted("Frame marker must be 2");
        assert_eq!(e.to_string(), "Corrupted bitstream: Frame marker must be 2");
    }
}
