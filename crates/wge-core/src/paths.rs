use std::path::{Path, PathBuf};

pub const WGE_DIR: &str = ".wge";
pub const CONFIG_FILE: &str = ".wge/config.yaml";

pub fn wge_dir(root: &Path) -> PathBuf {
    root.join(WGE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
