use std::{fmt, str::FromStr};

use blurrer_image::ImageError;

use crate::error::FilterError;

/// A square grid of weights with shape (size, size, channels).
///
/// Every generator in this module writes the same weight to all channels; the
/// channel axis only mirrors the layout of the image being filtered.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Build a kernel by evaluating `f(row, col)` and broadcasting it to every channel.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero.
    pub fn from_fn(
        size: usize,
        channels: usize,
        f: impl Fn(usize, usize) -> f32,
    ) -> Result<Self, ImageError> {
        if size == 0 {
            return Err(ImageError::InvalidKernelSize(size));
        }

        let mut data = Vec::with_capacity(size * size * channels);
        for i in 0..size {
            for j in 0..size {
                let w = f(i, j);
                data.extend(std::iter::repeat(w).take(channels));
            }
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of channels of the kernel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The weights as a flat slice in (row, col, channel) order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The weight at `(row, col, ch)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize, ch: usize) -> Option<f32> {
        if row >= self.size || col >= self.size || ch >= self.channels {
            return None;
        }
        Some(self.data[(row * self.size + col) * self.channels + ch])
    }

    /// Sum of the weights of one channel.
    pub fn sum(&self, ch: usize) -> f32 {
        self.data
            .iter()
            .skip(ch)
            .step_by(self.channels.max(1))
            .sum()
    }

    /// A copy of the kernel divided by its per-channel sums.
    pub fn normalized(&self) -> Kernel {
        let sums = (0..self.channels).map(|ch| self.sum(ch)).collect::<Vec<_>>();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &w)| w / sums[i % self.channels])
            .collect();
        Kernel {
            size: self.size,
            channels: self.channels,
            data,
        }
    }
}

/// The direction of a motion blur kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionDirection {
    /// A vertical line in the first column.
    Vertical,
    /// A horizontal line in the first row.
    Horizontal,
    /// The main diagonal, top-left to bottom-right.
    Diagonal,
}

impl FromStr for MotionDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vertical" => Ok(MotionDirection::Vertical),
            "horizontal" => Ok(MotionDirection::Horizontal),
            "diagonal" => Ok(MotionDirection::Diagonal),
            _ => Err(FilterError::InvalidMotionDirection(s.to_string())),
        }
    }
}

impl fmt::Display for MotionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotionDirection::Vertical => "vertical",
            MotionDirection::Horizontal => "horizontal",
            MotionDirection::Diagonal => "diagonal",
        };
        f.write_str(name)
    }
}

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `size` - The size of the kernel.
/// * `channels` - The number of channels of the kernel.
///
/// # Returns
///
/// A kernel where every weight is `1 / size^2`.
pub fn box_kernel(size: usize, channels: usize) -> Result<Kernel, ImageError> {
    let value = 1.0 / (size * size) as f32;
    Kernel::from_fn(size, channels, |_, _| value)
}

/// Create a gaussian blur kernel.
///
/// The standard deviation is `max(size / 2, 1)` and the kernel is centered on
/// `(size - 1) / 2`. The grid is divided by the sum of its raw weights so it
/// always sums to one.
///
/// # Arguments
///
/// * `size` - The size of the kernel.
/// * `channels` - The number of channels of the kernel.
pub fn gaussian_kernel(size: usize, channels: usize) -> Result<Kernel, ImageError> {
    let sigma = (size as f64 / 2.0).max(1.0);
    let sigma_sq = sigma * sigma;
    let k = size.saturating_sub(1) / 2;
    let norm_const = 1.0 / (2.0 * std::f64::consts::PI * sigma_sq);

    // compute the raw weights
    let mut raw = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let di = i as f64 - k as f64;
            let dj = j as f64 - k as f64;
            raw.push((norm_const * (-(di * di + dj * dj) / (2.0 * sigma_sq)).exp()) as f32);
        }
    }

    // normalize the kernel
    let sum = raw.iter().map(|&w| w as f64).sum::<f64>();
    let kernel = Kernel::from_fn(size, channels, |i, j| {
        (raw[i * size + j] as f64 / sum) as f32
    })?;

    Ok(kernel)
}

/// Create the spatial kernel of a bilateral filter.
///
/// Weights are `exp(-d^2 / (2 sigma_space^2))` where `d` is the distance to
/// the center. The kernel is not normalized: the bilateral filter divides by
/// the combined spatial and range weights of each pixel instead.
///
/// # Errors
///
/// Returns an error if `size` is zero or `sigma_space` is not finite and positive.
pub fn bilateral_spatial_kernel(
    size: usize,
    sigma_space: f32,
    channels: usize,
) -> Result<Kernel, ImageError> {
    if !(sigma_space.is_finite() && sigma_space > 0.0) {
        return Err(ImageError::InvalidFilterParameter(
            "sigma_space",
            sigma_space,
        ));
    }

    let k = size.saturating_sub(1) / 2;
    let denom = 2.0 * sigma_space * sigma_space;
    Kernel::from_fn(size, channels, |i, j| {
        let di = i as f32 - k as f32;
        let dj = j as f32 - k as f32;
        (-(di * di + dj * dj) / denom).exp()
    })
}

/// Create a motion blur kernel.
///
/// All weights are zero except a line of `1 / size`: the first column for
/// [`MotionDirection::Vertical`], the first row for
/// [`MotionDirection::Horizontal`] and the main diagonal for
/// [`MotionDirection::Diagonal`].
pub fn motion_kernel(
    size: usize,
    direction: MotionDirection,
    channels: usize,
) -> Result<Kernel, ImageError> {
    let value = 1.0 / size as f32;
    Kernel::from_fn(size, channels, |i, j| {
        let on_line = match direction {
            MotionDirection::Vertical => j == 0,
            MotionDirection::Horizontal => i == 0,
            MotionDirection::Diagonal => i == j,
        };
        if on_line {
            value
        } else {
            0.0
        }
    })
}
