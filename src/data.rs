mod class_names;
mod configuration_detector;
mod filesystem_access;
mod image_analyzer;
mod network_shape;
mod time_calc;
pub mod send_channels;

pub use class_names::{ClassNames, UNKNOWN_CLASS};
pub use configuration_detector::ConfigurationDetector;
pub use image_analyzer::ImageAnalyzer;
pub use network_shape::NetworkShape;

pub use filesystem_access::FsAccess;
pub use time_calc::TimeCalc;
