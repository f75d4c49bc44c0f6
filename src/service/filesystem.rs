use crate::Result;
use std::{env, fs::create_dir_all, path::PathBuf};

const DATA_DIR_ENV: &str = "ZONES_DATA_DIR";

/// `$ZONES_DATA_DIR` if set, `~/.local/share/delivery-zones` otherwise
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    #[allow(deprecated)]
    let home = env::home_dir().ok_or("Home directory does not exist")?;
    Ok(home.join(".local/share/delivery-zones"))
}

pub fn data_dir_file_path(file_name: &str) -> Result<PathBuf> {
    let data_dir = data_dir()?;
    if !data_dir.exists() {
        create_dir_all(&data_dir)?;
    }
    Ok(data_dir.join(file_name))
}
