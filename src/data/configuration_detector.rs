use std::path::{Path, PathBuf};
use crate::common::YoloConfiguration;
use crate::data::FsAccess;
use crate::{Result, YoloError};

const CONFIG_EXTENSION: &str = ".cfg";
const WEIGHTS_EXTENSION: &str = ".weights";
const NAMES_EXTENSION: &str = ".names";

/// Finds the `.cfg`, `.weights` and `.names` triple of a darknet model in a directory.
pub struct ConfigurationDetector;

impl ConfigurationDetector {
    /// Scans only the top level of `dir`, matching on the file name suffix so a bare `.cfg` counts
    /// too. When several files share an extension the first one in file name order wins.
    pub fn check_configuration(dir: impl AsRef<Path>) -> Result<YoloConfiguration> {
        let dir = dir.as_ref();
        let files = Self::yolo_files(dir)?;

        let find = |extension: &str| files.iter().find(|f| has_suffix(f, extension)).cloned();

        match (find(CONFIG_EXTENSION), find(WEIGHTS_EXTENSION), find(NAMES_EXTENSION)) {
            (Some(config_file), Some(weights_file), Some(names_file)) => {
                log::info!("Found yolo configuration in {}", dir.display());
                Ok(YoloConfiguration { config_file, weights_file, names_file })
            }
            _ => Err(YoloError::ConfigurationNotFound(dir.to_path_buf())),
        }
    }

    /// Tries the current directory, then the `fast_yolo` config, cache and home directories.
    pub fn discover() -> Result<YoloConfiguration> {
        let mut searched = Vec::new();
        for access in FsAccess::SEARCH_ORDER {
            let Ok(dir) = access.lookup_path() else { continue };
            if !dir.is_dir() {
                continue;
            }
            match Self::check_configuration(&dir) {
                Ok(configuration) => return Ok(configuration),
                Err(_) => searched.push(dir),
            }
        }
        log::warn!("No yolo configuration in any of {:?}", searched);
        Err(YoloError::ConfigurationNotFound(searched.into_iter().next().unwrap_or_else(|| PathBuf::from("."))))
    }

    fn yolo_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|_| YoloError::ConfigurationNotFound(dir.to_path_buf()))? {
            let path = entry?.path();
            let is_yolo_file = path.is_file()
                && [CONFIG_EXTENSION, WEIGHTS_EXTENSION, NAMES_EXTENSION]
                    .iter()
                    .any(|extension| has_suffix(&path, extension));
            if is_yolo_file {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}
