//! File/code adapted from https://github.com/jamjamjon/usls
//!
//! Represents the directories searched for model files: Home, Cache, Config, and current directory.
#[derive(Debug, Clone, Copy)]
pub enum FsAccess {
    Home,
    Cache,
    Config,
    Current,
}

impl FsAccess {
    /// Search order used by model discovery.
    pub const SEARCH_ORDER: [FsAccess; 4] = [FsAccess::Current, FsAccess::Config, FsAccess::Cache, FsAccess::Home];

    /// Returns the `fast_yolo` directory for the directory type, without creating it.
    /// The current directory is returned as is.
    ///
    /// Examples:
    /// `~/.cache/fast_yolo`, `~/.config/fast_yolo`, `~/.fast_yolo`, `./`.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - The directory path.
    pub fn lookup_path(&self) -> anyhow::Result<std::path::PathBuf> {
        let base_path = match self {
            FsAccess::Home => dirs::home_dir(),
            FsAccess::Cache => dirs::cache_dir(),
            FsAccess::Config => dirs::config_dir(),
            FsAccess::Current => std::env::current_dir().ok(),
        };

        let mut path = base_path.ok_or_else(|| {
            anyhow::anyhow!("Unsupported operating system. Supported OS: Linux, MacOS, Windows.")
        })?;

        match self {
            FsAccess::Home => path.push(".fast_yolo"),
            FsAccess::Current => {}
            _ => path.push("fast_yolo"),
        }
        Ok(path)
    }
}
