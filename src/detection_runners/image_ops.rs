//! Conversions between decoded images, `ColorImage` and the planar float layout darknet reads.
//!
//! The planar layout is channel-major: all red values row by row, then all green values, then
//! blue and, for 4 channels, alpha. Values are normalized to `0.0..=1.0`.

use std::io::Cursor;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, ImageFormat};
use ndarray::Array3;
use rayon::prelude::*;
use crate::common::{Color, ColorImage};
use crate::{Result, YoloError};

fn check_channels(channels: usize) -> Result<()> {
    if (1..=4).contains(&channels) {
        Ok(())
    } else {
        Err(YoloError::InvalidImageData(format!("unsupported channel count {}", channels)))
    }
}

/// Flat planar buffer reused across frames; only reallocated when the frame size changes.
#[derive(Debug, Default, Clone)]
pub struct PlanarBuffer {
    data: Vec<f32>,
}

impl PlanarBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `image` into the buffer in planar order and returns it.
    pub fn fill(&mut self, image: &ColorImage, channels: usize) -> Result<&[f32]> {
        check_channels(channels)?;
        let plane = image.len();
        let size = plane * channels;
        if self.data.len() != size {
            self.data = vec![0.; size];
        }
        if plane == 0 {
            return Ok(&self.data);
        }

        let colors = image.colors();
        self.data
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(channel, values)| {
                for (value, color) in values.iter_mut().zip(colors) {
                    *value = color.channel_value(channel);
                }
            });

        Ok(&self.data)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `image` as a `(channels, height, width)` array.
pub fn to_planar(image: &ColorImage, channels: usize) -> Result<Array3<f32>> {
    let mut buffer = PlanarBuffer::new();
    buffer.fill(image, channels)?;
    let (width, height) = image.dimensions();
    Ok(Array3::from_shape_vec(
        (channels, height as usize, width as usize),
        buffer.data,
    )?)
}

/// Inverse of [`to_planar`] for 3 or 4 channels. Missing alpha becomes opaque.
pub fn planar_to_color_image(planar: &Array3<f32>) -> Result<ColorImage> {
    let (channels, height, width) = planar.dim();
    if channels != 3 && channels != 4 {
        return Err(YoloError::InvalidImageData(format!("unsupported channel count {}", channels)));
    }

    let to_byte = |v: f32| (v * 255.).round().clamp(0., 255.) as u8;
    let mut colors = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let alpha = if channels == 4 { to_byte(planar[[3, y, x]]) } else { 255 };
            colors.push(Color::new(
                to_byte(planar[[0, y, x]]),
                to_byte(planar[[1, y, x]]),
                to_byte(planar[[2, y, x]]),
                alpha,
            ));
        }
    }

    ColorImage::from_colors(width as u32, height as u32, colors)
}

/// Encodes `image` in `format` (the byte form `detect_encoded` accepts).
pub fn image_to_bytes(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format)?;
    Ok(bytes.into_inner())
}

pub fn bytes_to_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resizes to the network input size. Resizing every frame is slow; prefer feeding frames that
/// already match the `.cfg` size.
pub fn fit_to_network(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

    let mut new_image = DynamicImage::new(width, height, image.color());
    if let Err(err) = resizer.resize(image, &mut new_image, &options) {
        log::warn!("Failed to use `fast_image_resize`: {}. Falling back.", err);
        new_image = image::imageops::resize(image, width, height, image::imageops::FilterType::Nearest).into();
    }
    new_image
}
