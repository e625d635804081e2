use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::common::inference_device::InferenceDevice;
use crate::data::NetworkShape;
use crate::Result;

/// Environment variable naming the directory that holds the darknet binary.
pub const DARKNET_LIB_DIR_ENV: &str = "DARKNET_LIB_DIR";

/// The three files a darknet model consists of.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoloConfiguration {
    pub config_file: PathBuf,
    pub weights_file: PathBuf,
    pub names_file: PathBuf,
}

impl YoloConfiguration {
    pub fn new(config_file: impl Into<PathBuf>, weights_file: impl Into<PathBuf>, names_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            weights_file: weights_file.into(),
            names_file: names_file.into(),
        }
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub config_path: String,
    pub weights_path: String,
    pub labels_path: String,
    /// Directory holding the darknet binary and, on Windows, its sidecar DLLs.
    /// Empty means `DARKNET_LIB_DIR`, then the current directory.
    pub darknet_lib_dir: String,
    pub inference_device: InferenceDevice,
    pub batch_size: i32,
    pub width: u32,
    pub height: u32,
}

impl ModelConfig {
    pub fn new(config_path: String, weights_path: String, labels_path: String,
               darknet_lib_dir: String, inference_device: InferenceDevice,
               width: u32, height: u32) -> Self {
        Self {
            config_path,
            weights_path,
            labels_path,
            darknet_lib_dir,
            inference_device,
            batch_size: 1,
            width,
            height,
        }
    }

    /// Builds a config around discovered model files, reading the network size from the `.cfg`.
    pub fn from_configuration(configuration: &YoloConfiguration, inference_device: InferenceDevice) -> Result<Self> {
        let shape = NetworkShape::from_cfg(&configuration.config_file)?;
        Ok(Self::new(
            configuration.config_file.to_string_lossy().into_owned(),
            configuration.weights_file.to_string_lossy().into_owned(),
            configuration.names_file.to_string_lossy().into_owned(),
            String::new(),
            inference_device,
            shape.width,
            shape.height,
        ))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut config: ModelConfig = serde_json::from_str(&text)?;
        if config.batch_size < 1 {
            config.batch_size = 1;
        }
        Ok(config)
    }

    pub fn configuration(&self) -> YoloConfiguration {
        YoloConfiguration::new(&self.config_path, &self.weights_path, &self.labels_path)
    }

    pub fn set_device_type(&mut self, device_type: InferenceDevice) {
        self.inference_device = device_type;
    }

    /// Resolved library directory: explicit setting, then `DARKNET_LIB_DIR`, then `.`.
    pub fn lib_dir(&self) -> PathBuf {
        if !self.darknet_lib_dir.is_empty() {
            return PathBuf::from(&self.darknet_lib_dir);
        }
        match std::env::var(DARKNET_LIB_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from("."),
        }
    }

    pub fn to_string(&self) -> String {
        format!("Config File Path: {}\n\
        Weights File Path: {}\n\
        Labels Path: {}\n\
        Darknet Lib Dir: {}\n\
        Inference Device: {}\n\
        Batch Size: {}\n\
        Network Input Resolution: {}x{}",
                self.config_path, self.weights_path, self.labels_path,
                self.lib_dir().display(), self.inference_device, self.batch_size,
                self.width, self.height)
    }
}
