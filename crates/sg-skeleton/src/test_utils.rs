use sg_core::PixelMask;

/// Builds a mask from ASCII rows; `#` is foreground, anything else background.
pub(crate) fn mask_from_rows(rows: &[&str]) -> PixelMask {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    let data = rows
        .iter()
        .flat_map(|r| {
            assert_eq!(r.len(), width, "ragged test mask");
            r.bytes().map(|b| b == b'#')
        })
        .collect();
    PixelMask::from_vec(width, height, data).expect("rectangular test mask")
}
