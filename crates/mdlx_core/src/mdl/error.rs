use thiserror::Error;

/// Errors that abort an MDL import.
///
/// Recoverable problems (an index past the end of its table, an ignored
/// section) are not errors: they are clamped or skipped and logged with
/// `log::warn!`.
#[derive(Error, Debug)]
pub enum MdlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Read of {wanted} bytes at offset {offset} overruns the {len} byte buffer")]
    BufferOverrun { offset: usize, wanted: usize, len: usize },

    #[error("Unknown MDL subformat, magic word is '{0}'")]
    UnknownSubformat(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Bone '{bone}' has a singular transform in frame {frame}")]
    DecompositionFailure { bone: String, frame: u32 },
}

pub type MdlResult<T> = Result<T, MdlError>;

/// Clamp an out of range table index to the last valid entry.
///
/// `count` must be non-zero; callers check that before reading indices.
pub(crate) fn clamp_index(index: usize, count: usize, what: &str) -> usize {
    if index < count {
        index
    } else {
        log::warn!("Index overflow in {} ({} >= {})", what, index, count);
        count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(1, 3, "test list"), 1);
        assert_eq!(clamp_index(3, 3, "test list"), 2);
        assert_eq!(clamp_index(500, 3, "test list"), 2);
    }

    #[test]
    fn test_error_messages() {
        let err = MdlError::BufferOverrun { offset: 80, wanted: 8, len: 84 };
        assert_eq!(
            err.to_string(),
            "Read of 8 bytes at offset 80 overruns the 84 byte buffer"
        );

        let err = MdlError::UnknownSubformat("ABCD".to_string());
        assert!(err.to_string().contains("ABCD"));
    }
}
