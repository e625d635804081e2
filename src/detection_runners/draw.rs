use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use crate::common::{Color, ColorImage, YoloItem};

/// Draws one-pixel rectangle outlines straight into a `ColorImage`.
#[derive(Debug, Clone, Copy)]
pub struct BoxPainter {
    color: Color,
}

impl Default for BoxPainter {
    fn default() -> Self {
        Self { color: Color::RED }
    }
}

impl BoxPainter {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn draw_bounding_boxes(&self, image: &mut ColorImage, items: &[YoloItem]) {
        for item in items {
            self.draw_object_frame(image, item.x, item.y, item.width, item.height);
        }
    }

    /// Outlines the box with top-left corner `(x, y)`. A zero coordinate or size draws nothing.
    /// Runs are clipped to the color buffer, not to rows, so a box crossing the right edge
    /// wraps into the next row.
    pub fn draw_object_frame(&self, image: &mut ColorImage, x: i32, y: i32, width: i32, height: i32) {
        if x == 0 || y == 0 || width == 0 || height == 0 {
            return;
        }
        self.draw_horizontal_line(image, x, y, width);
        self.draw_horizontal_line(image, x, y + height, width);
        self.draw_vertical_line(image, x, y, height);
        self.draw_vertical_line(image, x + width, y, height);
    }

    fn draw_horizontal_line(&self, image: &mut ColorImage, x: i32, y: i32, width: i32) {
        let stride = image.width() as i64;
        let colors = image.colors_mut();
        let len = colors.len() as i64;

        let mut pos = (x as i64 + y as i64 * stride).max(0);
        let stop = (pos + width as i64).min(len);
        while pos < stop {
            colors[pos as usize] = self.color;
            pos += 1;
        }
    }

    fn draw_vertical_line(&self, image: &mut ColorImage, x: i32, y: i32, height: i32) {
        let stride = image.width() as i64;
        let colors = image.colors_mut();
        let len = colors.len() as i64;

        let mut pos = (x as i64 + y as i64 * stride).max(0);
        let stop = (pos + height as i64 * stride).min(len);
        while pos < stop {
            colors[pos as usize] = self.color;
            pos += stride;
        }
    }
}

/// Fixed palette by class group (people, vehicles, animals, everything else).
pub fn class_colour(class_id: u32) -> Rgb<u8> {
    match class_id {
        0 => Rgb([128, 0, 128]),     // purple (people)
        1..=8 => Rgb([0, 255, 0]),   // green (vehicles)
        14..=23 => Rgb([255, 0, 0]), // red (animals)
        _ => Rgb([0, 0, 255])        // blue (everything else)
    }
}

/// Outlines every item on a decoded frame in its class colour.
pub fn annotate(image: &mut RgbImage, items: &[YoloItem]) {
    for item in items.iter().filter(|i| i.width > 0 && i.height > 0) {
        let rect = Rect::at(item.x, item.y).of_size(item.width as u32, item.height as u32);
        draw_hollow_rect_mut(image, rect, class_colour(item.class_id));
    }
}
