//! Standard paths used by pomo

use std::path::{Path, PathBuf};

/// File name of the notification icon shipped next to the binary
pub const ICON_FILE: &str = "icon.png";

/// Standard pomo paths
pub struct Paths {
    /// Config directory (~/.config/pomo)
    pub config: PathBuf,
    /// Directory holding the running executable, if it can be resolved
    pub install: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pomo");

        let install = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self { config, install }
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Icon asset resolved relative to the install location.
    ///
    /// Returns `None` when the executable location is unknown or the asset
    /// was not installed alongside it.
    pub fn icon(&self) -> Option<PathBuf> {
        let icon = self.install.as_ref()?.join(ICON_FILE);
        icon.exists().then_some(icon)
    }
}
