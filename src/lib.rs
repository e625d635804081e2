//! Safe Rust binding to the darknet YOLO detection and tracking library.
//!
//! The network itself runs inside the prebuilt darknet binary (`yolo_cpp_dll.dll`,
//! `libdarknet_amd.so`, `libdarknet_arm.so`). This crate checks that the binary and its
//! CUDA/cuDNN/OpenCV dependencies are installed, loads it, converts frames into the planar float
//! layout it expects and maps its fixed-size result array back to [`common::YoloItem`]s.

mod error;
mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;

use std::time::Instant;
use image::DynamicImage;
use crate::common::{ModelConfig, YoloItem};
use crate::detection_runners::{DetectorBackend, YoloWrapper};

pub use error::YoloError;

pub type Result<T, E = YoloError> = std::result::Result<T, E>;

pub fn init_detector(model_details: &ModelConfig) -> anyhow::Result<YoloWrapper> {
    log::info!("Initializing darknet detector on ({}):\n{}", model_details.inference_device, model_details.to_string());
    let yolo = YoloWrapper::from_config(model_details)?;
    if let Some(device_name) = yolo.graphic_device_name() {
        log::info!("Graphic device: {}", device_name);
    }
    Ok(yolo)
}

/// Detects on a decoded frame, resizing it to the network input first when needed.
pub fn run_detection<B: DetectorBackend>(yolo: &mut YoloWrapper<B>, image: &DynamicImage) -> anyhow::Result<Vec<YoloItem>> {
    let now = Instant::now();

    let (width, height) = (yolo.network_width(), yolo.network_height());
    let detections = if width != 0 && height != 0 && (image.width(), image.height()) != (width, height) {
        let resized = detection_runners::image_ops::fit_to_network(image, width, height);
        let mut detections = yolo.detect_dynamic_image(&resized)?;
        rescale_items(&mut detections, (width, height), (image.width(), image.height()));
        detections
    } else {
        yolo.detect_dynamic_image(image)?
    };

    log::debug!("Processing time: {:?}, {} objects", now.elapsed(), detections.len());

    Ok(detections)
}

/// Maps boxes found on a `from`-sized frame back onto a `to`-sized frame.
fn rescale_items(items: &mut [YoloItem], from: (u32, u32), to: (u32, u32)) {
    let sx = to.0 as f64 / from.0 as f64;
    let sy = to.1 as f64 / from.1 as f64;
    for item in items {
        item.x = (item.x as f64 * sx).round() as i32;
        item.y = (item.y as f64 * sy).round() as i32;
        item.width = (item.width as f64 * sx).round() as i32;
        item.height = (item.height as f64 * sy).round() as i32;
    }
}
