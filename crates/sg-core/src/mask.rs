//! Conversion of 8-bit skeleton rasters into binary masks.

use serde::{Deserialize, Serialize};

use crate::image::{ImageView, PixelMask};

/// Which raw value marks a skeleton pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPolarity {
    /// Any value `> 0` is foreground (white strokes on black).
    #[default]
    NonZero,
    /// Value `0` is foreground (black strokes on white paper).
    Zero,
}

pub fn mask_from_u8(src: &ImageView<'_, u8>, polarity: MaskPolarity) -> PixelMask {
    match polarity {
        MaskPolarity::NonZero => src.to_image(|&v| v > 0),
        MaskPolarity::Zero => src.to_image(|&v| v == 0),
    }
}

#[cfg(test)]
mod tests {
    use super::{MaskPolarity, mask_from_u8};
    use crate::{GridPoint, Image};

    #[test]
    fn polarity_selects_foreground_value() {
        let img = Image::from_vec(3, 1, vec![0u8, 1, 255]).expect("valid image");

        let bright = mask_from_u8(&img.as_view(), MaskPolarity::NonZero);
        assert_eq!(bright.data(), &[false, true, true]);

        let dark = mask_from_u8(&img.as_view(), MaskPolarity::Zero);
        assert_eq!(dark.data(), &[true, false, false]);
        assert!(dark.is_foreground(GridPoint::new(0, 0)));
    }

    #[test]
    fn polarity_serializes_snake_case() {
        let json = serde_json::to_string(&MaskPolarity::NonZero).expect("serialize");
        assert_eq!(json, "\"non_zero\"");
    }
}
