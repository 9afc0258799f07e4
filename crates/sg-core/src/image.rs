use crate::{Error, GridPoint};

/// Owned row-major raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Binary raster where `true` marks a foreground (skeleton) pixel.
pub type PixelMask = Image<bool>;

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn contains(&self, p: GridPoint) -> bool {
        p.col < self.width && p.row < self.height
    }

    pub fn get(&self, p: GridPoint) -> Option<&T> {
        if !self.contains(p) {
            return None;
        }
        self.data.get(p.row * self.width + p.col)
    }

    pub fn get_mut(&mut self, p: GridPoint) -> Option<&mut T> {
        if !self.contains(p) {
            return None;
        }
        self.data.get_mut(p.row * self.width + p.col)
    }

    /// Iterates over all pixels in row-major order together with their
    /// grid position.
    pub fn enumerate(&self) -> impl Iterator<Item = (GridPoint, &T)> {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (GridPoint::new(i / width, i % width), v))
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    /// Writes `value` at `p`; returns `false` when `p` lies outside the image.
    pub fn set(&mut self, p: GridPoint, value: T) -> bool {
        match self.get_mut(p) {
            Some(px) => {
                *px = value;
                true
            }
            None => false,
        }
    }
}

impl PixelMask {
    pub fn is_foreground(&self, p: GridPoint) -> bool {
        self.get(p).copied().unwrap_or(false)
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn foreground(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.enumerate().filter(|(_, v)| **v).map(|(p, _)| p)
    }
}

/// Borrowed raster with element stride, for reading padded or cropped
/// buffers without copying.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Copies the view into a contiguous owned image, converting each pixel.
    pub fn to_image<U>(&self, mut f: impl FnMut(&T) -> U) -> Image<U> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend(self.row(y).iter().map(&mut f));
        }

        Image {
            width: self.width,
            height: self.height,
            data: out,
        }
    }
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}
