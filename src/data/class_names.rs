use std::path::Path;
use crate::{utils, Result};

/// Returned for class ids the names file does not cover.
pub const UNKNOWN_CLASS: &str = "unknown key";

/// Class id to label table, one label per line of a darknet `.names` file.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let names = utils::file_to_vec(path.as_ref())?;
        log::debug!("Loaded {} class names from {}", names.len(), path.as_ref().display());
        Ok(Self { names })
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: lines.into_iter().map(Into::into).collect() }
    }

    pub fn resolve(&self, class_id: usize) -> &str {
        self.names.get(class_id).map(String::as_str).unwrap_or(UNKNOWN_CLASS)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
