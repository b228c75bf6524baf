use std::{env, path::PathBuf, str::FromStr};

use log::LevelFilter;

/// 默认的磁盘镜像文件
pub const DEFAULT_DISK_PATH: &str = "disk.dsk";

/// Disk signature written into every new MBR (fixed, not randomized)
pub const DISK_SIGNATURE: i64 = 123_456_789;

pub const REPORT_DOT_FILE: &str = "disk_structure.dot";
pub const REPORT_IMAGE_FILE: &str = "disk_structure.png";

/// Graphviz executable used by REP
pub const DEFAULT_GRAPHVIZ_BIN: &str = "dot";

pub const HISTORY_FILE: &str = ".mini_fdisk_history";
pub const HISTORY_SIZE: usize = 100;

pub const ENV_DISK: &str = "MINI_FDISK_DISK";
pub const ENV_REPORT_DIR: &str = "MINI_FDISK_REPORT_DIR";
pub const ENV_OPEN_REPORT: &str = "MINI_FDISK_OPEN_REPORT";
pub const ENV_LOG: &str = "MINI_FDISK_LOG";
pub const ENV_GRAPHVIZ: &str = "MINI_FDISK_DOT";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub disk_path: PathBuf,
    pub report_dir: PathBuf,
    /// Launch the platform image viewer after rendering a report
    pub open_report: bool,
    pub graphviz_bin: String,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disk_path: PathBuf::from(DEFAULT_DISK_PATH),
            report_dir: PathBuf::from("."),
            open_report: true,
            graphviz_bin: DEFAULT_GRAPHVIZ_BIN.to_string(),
            log_level: LevelFilter::Warn,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unknown or malformed
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DISK).filter(|p| !p.trim().is_empty()) {
            config.disk_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_REPORT_DIR).filter(|d| !d.trim().is_empty()) {
            config.report_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(ENV_OPEN_REPORT) {
            config.open_report = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Some(bin) = lookup(ENV_GRAPHVIZ).filter(|b| !b.trim().is_empty()) {
            config.graphviz_bin = bin.trim().to_string();
        }
        if let Some(level) = lookup(ENV_LOG) {
            if let Ok(level) = LevelFilter::from_str(level.trim()) {
                config.log_level = level;
            }
        }

        config
    }

    pub fn report_dot_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_DOT_FILE)
    }

    pub fn report_image_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_IMAGE_FILE)
    }
}
