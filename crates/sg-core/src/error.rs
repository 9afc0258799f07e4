use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    InvalidStride,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected} pixels, got {actual}")
            }
            Self::InvalidStride => write!(f, "stride smaller than width"),
        }
    }
}

impl std::error::Error for Error {}
