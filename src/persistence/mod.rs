use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use crate::core::{
    Closet,
    TansuError,
    BOX_COUNT,
};

const APP_NAME: &str = "tansu";

/// Default file name for the closet document.
pub const DEFAULT_DOCUMENT_NAME: &str = "clothes.json";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn default_document_path() -> PathBuf {
    get_app_data_dir().join(DEFAULT_DOCUMENT_NAME)
}

/// Read and validate the whole closet document.
pub fn read_closet(path: &Path) -> Result<Closet, TansuError> {
    let json = fs::read_to_string(path)?;
    let closet: Closet = serde_json::from_str(&json)?;
    if closet.boxes.len() != BOX_COUNT {
        return Err(TansuError::Malformed(format!(
            "expected {} boxes, found {}",
            BOX_COUNT,
            closet.boxes.len()
        )));
    }
    Ok(closet)
}

/// Overwrite the closet document. The JSON is written to a sibling temp file
/// first and renamed into place, so a crash mid-write cannot leave a
/// truncated document behind.
pub fn write_closet(path: &Path, closet: &Closet) -> Result<(), TansuError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(closet)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    log::debug!("Closet saved to: {}", path.display());
    Ok(())
}
