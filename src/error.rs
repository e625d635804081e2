use std::path::PathBuf;

use thiserror::Error;

/// Every way a call into the darknet binding can fail.
#[derive(Debug, Error)]
pub enum YoloError {
    #[error("Can't find the file {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot find a pre-trained model in {}, check all config files are available (.cfg, .weights, .names)", .0.display())]
    ConfigurationNotFound(PathBuf),

    #[error("Can't find the {name}. {hint}")]
    MissingDependency { name: String, hint: String },

    #[error("An Nvidia GPU and CUDA 12.0 need to be installed! Please install CUDA https://developer.nvidia.com/cuda-downloads\nError details: {0}")]
    CudaNotAvailable(String),

    #[error("{0}")]
    UnsupportedPlatform(String),

    #[error("No graphic device is available")]
    NoGraphicDevice,

    #[error("Graphic device index {index} is out of range, {count} device(s) available")]
    DeviceIndexOutOfRange { index: usize, count: usize },

    #[error("Input image size: {width}x{height} is not same size as in configuration file: {network_width}x{network_height}")]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        network_width: u32,
        network_height: u32,
    },

    #[error("{0} has no OpenCV support")]
    NoOpenCvSupport(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    #[error("Invalid network configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Number of colors ({actual}) must match width * height ({expected})")]
    ColorCountMismatch { expected: usize, actual: usize },

    #[error("Buffer holds {actual} values, expected width * height * channels = {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Native call `{entry}` failed with code {code}")]
    NativeCall { entry: &'static str, code: i32 },

    #[error("Failed to load native library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
