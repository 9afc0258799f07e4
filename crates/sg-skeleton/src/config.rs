use serde::{Deserialize, Serialize};

use crate::ExtractError;

/// Tuning for skeleton tracing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Arc length (pixels) walked between two emitted path samples.
    pub step_length: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { step_length: 10.0 }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if !self.step_length.is_finite() || self.step_length <= 0.0 {
            return Err(ExtractError::InvalidStepLength(self.step_length));
        }
        Ok(())
    }
}
