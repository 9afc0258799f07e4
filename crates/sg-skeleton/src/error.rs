use core::fmt;

/// Fatal extraction errors. Topological irregularities are never fatal;
/// they are counted in [`crate::ExtractionStats`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    EmptyMask { width: usize, height: usize },
    InvalidStepLength(f64),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMask { width, height } => {
                write!(f, "skeleton mask has zero size ({width}x{height})")
            }
            Self::InvalidStepLength(v) => {
                write!(f, "step_length must be finite and > 0, got {v}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}
