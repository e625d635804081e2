
mod bbox_container;
mod color_image;
mod inference_device;
mod model_config;
mod yolo_item;

pub use bbox_container::*;
pub use color_image::*;
pub use inference_device::*;
pub use model_config::*;
pub use yolo_item::*;
