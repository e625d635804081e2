use image::{Rgb, RgbImage};
use fast_yolo::common::{Color, ColorImage, YoloItem};
use fast_yolo::detection_runners::draw::{annotate, class_colour};
use fast_yolo::detection_runners::BoxPainter;

fn red_indices(image: &ColorImage) -> Vec<usize> {
    image
        .colors()
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Color::RED)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn frame_starts_at_top_left_corner() {
    let mut image = ColorImage::new(10, 10);
    BoxPainter::default().draw_object_frame(&mut image, 5, 5, 3, 3);

    assert_eq!(image.colors()[55], Color::RED);
    assert_eq!(image.get(5, 5), Some(Color::RED));
    assert_eq!(image.get(8, 5), Some(Color::RED));
    assert_eq!(image.get(5, 8), Some(Color::RED));
    assert_eq!(image.get(6, 6), Some(Color::BLACK));
}

#[test]
fn frame_outline_pixels() {
    let mut image = ColorImage::new(10, 10);
    BoxPainter::default().draw_object_frame(&mut image, 1, 1, 2, 2);

    // Runs are `width` and `height` long, so the far corner stays unpainted.
    assert_eq!(red_indices(&image), vec![11, 12, 13, 21, 23, 31, 32]);
}

#[test]
fn zero_coordinate_draws_nothing() {
    let mut image = ColorImage::new(10, 10);
    let painter = BoxPainter::default();

    painter.draw_object_frame(&mut image, 0, 0, 1, 1);
    painter.draw_object_frame(&mut image, 5, 0, 3, 3);
    painter.draw_object_frame(&mut image, 5, 5, 0, 3);

    assert_eq!(image.colors()[55], Color::BLACK);
    assert!(red_indices(&image).is_empty());
}

#[test]
fn frame_is_clipped_to_the_buffer() {
    let mut image = ColorImage::new(4, 4);
    BoxPainter::default().draw_object_frame(&mut image, 3, 3, 10, 10);

    assert_eq!(red_indices(&image), vec![15]);
}

#[test]
fn bounding_boxes_use_painter_color() {
    let mut image = ColorImage::new(10, 10);
    let mut painter = BoxPainter::new(Color::GREEN);
    painter.set_color(Color::BLUE);

    let items = [
        YoloItem::new(1, 1, 2, 2, "person", 0.9),
        YoloItem::new(6, 6, 2, 2, "car", 0.8),
    ];
    painter.draw_bounding_boxes(&mut image, &items);

    assert_eq!(painter.color(), Color::BLUE);
    assert_eq!(image.get(1, 1), Some(Color::BLUE));
    assert_eq!(image.get(6, 6), Some(Color::BLUE));
    assert_eq!(image.get(4, 4), Some(Color::BLACK));
}

#[test]
fn class_colours_by_group() {
    assert_eq!(class_colour(0), Rgb([128, 0, 128]));
    assert_eq!(class_colour(2), Rgb([0, 255, 0]));
    assert_eq!(class_colour(16), Rgb([255, 0, 0]));
    assert_eq!(class_colour(40), Rgb([0, 0, 255]));
}

#[test]
fn annotate_outlines_items() {
    let mut image = RgbImage::new(20, 20);
    let items = [
        YoloItem::new(2, 2, 5, 5, "person", 0.9).with_class_id(0),
        YoloItem::new(10, 10, 0, 4, "empty", 0.9).with_class_id(2),
    ];

    annotate(&mut image, &items);

    assert_eq!(image.get_pixel(2, 2), &Rgb([128, 0, 128]));
    assert_eq!(image.get_pixel(6, 6), &Rgb([128, 0, 128]));
    assert_eq!(image.get_pixel(4, 4), &Rgb([0, 0, 0]));
    assert_eq!(image.get_pixel(10, 10), &Rgb([0, 0, 0]));
}
