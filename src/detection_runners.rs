pub mod darknet_ffi;
pub mod detection_worker;
pub mod draw;
pub mod image_ops;
pub mod native_deps;
pub mod tracking;
pub mod yolo_wrapper;

pub use darknet_ffi::{DarknetLibrary, DetectorBackend};
pub use detection_worker::DetectionWorker;
pub use draw::BoxPainter;
pub use native_deps::NativeDependencies;
pub use tracking::ObjectTracker;
pub use yolo_wrapper::YoloWrapper;
