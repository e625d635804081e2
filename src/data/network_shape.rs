use std::path::Path;
use regex::Regex;
use crate::{Result, YoloError};

/// Input size declared in the `[net]` section of a darknet `.cfg` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkShape {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl NetworkShape {
    pub fn from_cfg(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(YoloError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_cfg_str(&text)
    }

    pub fn from_cfg_str(text: &str) -> Result<Self> {
        let section = Regex::new(r"^\s*\[(\w+)\]").map_err(invalid_cfg)?;
        let key_value = Regex::new(r"^\s*(\w+)\s*=\s*(\d+)").map_err(invalid_cfg)?;

        let mut in_net = false;
        let (mut width, mut height, mut channels) = (None, None, None);

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default();
            if let Some(caps) = section.captures(line) {
                if in_net {
                    // Only the first section describes the network input.
                    break;
                }
                in_net = matches!(&caps[1], "net" | "network");
                continue;
            }
            if !in_net {
                continue;
            }
            if let Some(caps) = key_value.captures(line) {
                let value = caps[2].parse::<u32>().ok();
                match &caps[1] {
                    "width" => width = value,
                    "height" => height = value,
                    "channels" => channels = value,
                    _ => {}
                }
            }
        }

        match (width, height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => Ok(Self {
                width,
                height,
                channels: channels.unwrap_or(3),
            }),
            _ => Err(YoloError::InvalidConfiguration("cfg has no [net] width/height".to_string())),
        }
    }
}

fn invalid_cfg(err: regex::Error) -> YoloError {
    YoloError::InvalidConfiguration(err.to_string())
}
