use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use crate::{utils, Result, YoloError};

/// One RGBA pixel, byte per component. Layout matches the native side (4 bytes, no padding).
#[repr(C)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const PURPLE: Color = Color::rgb(255, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT_BLACK: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn red_value(&self) -> f32 {
        self.r as f32 / 255.0
    }

    pub fn green_value(&self) -> f32 {
        self.g as f32 / 255.0
    }

    pub fn blue_value(&self) -> f32 {
        self.b as f32 / 255.0
    }

    pub fn alpha_value(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Normalized value of one channel in darknet order (0 = red, 1 = green, 2 = blue, else alpha).
    pub fn channel_value(&self, channel: usize) -> f32 {
        match channel {
            0 => self.red_value(),
            1 => self.green_value(),
            2 => self.blue_value(),
            _ => self.alpha_value(),
        }
    }
}

impl From<Rgb<u8>> for Color {
    fn from(p: Rgb<u8>) -> Self {
        Color::rgb(p[0], p[1], p[2])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Color::new(p[0], p[1], p[2], p[3])
    }
}

/// Width, height and a flat color array indexed `[y * width + x]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    colors: Vec<Color>,
}

impl ColorImage {
    /// Opaque black image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            colors: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn from_colors(width: u32, height: u32, colors: Vec<Color>) -> Result<Self> {
        let expected = utils::buffer_len(width, height, 1)?;
        if colors.len() != expected {
            return Err(YoloError::ColorCountMismatch { expected, actual: colors.len() });
        }
        Ok(Self { width, height, colors })
    }

    /// Reads packed pixels with 3 (RGB) or 4 (RGBA) bytes each, row after row.
    pub fn from_raw_bytes(width: u32, height: u32, bytes: &[u8], channels: usize) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(YoloError::InvalidImageData(format!("unsupported channel count {}", channels)));
        }
        let expected = utils::buffer_len(width, height, channels)?;
        if bytes.len() < expected {
            return Err(YoloError::BufferSizeMismatch { expected, actual: bytes.len() });
        }

        let colors = bytes[..expected]
            .chunks_exact(channels)
            .map(|p| match channels {
                4 => Color::new(p[0], p[1], p[2], p[3]),
                _ => Color::rgb(p[0], p[1], p[2]),
            })
            .collect();

        Ok(Self { width, height, colors })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut [Color] {
        &mut self.colors
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.colors.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        let raw = self.colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
        // Length is width * height * 4 by construction.
        RgbaImage::from_raw(self.width, self.height, raw).unwrap_or_default()
    }

    pub fn to_rgb8(&self) -> RgbImage {
        let raw = self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        RgbImage::from_raw(self.width, self.height, raw).unwrap_or_default()
    }

    pub fn into_dyn(self) -> DynamicImage {
        DynamicImage::from(self.to_rgba8())
    }
}

impl From<&RgbImage> for ColorImage {
    fn from(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            colors: image.pixels().map(|p| Color::from(*p)).collect(),
        }
    }
}

impl From<&RgbaImage> for ColorImage {
    fn from(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            colors: image.pixels().map(|p| Color::from(*p)).collect(),
        }
    }
}

impl From<&DynamicImage> for ColorImage {
    fn from(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => ColorImage::from(rgb),
            other => ColorImage::from(&other.to_rgba8()),
        }
    }
}

impl From<ColorImage> for DynamicImage {
    fn from(image: ColorImage) -> Self {
        image.into_dyn()
    }
}
