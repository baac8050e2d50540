use chrono::NaiveDateTime;
use std::path::PathBuf;

pub const FILENAME_PREFIX: &str = "esp32cam";
pub const FILENAME_EXTENSION: &str = "jpg";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Builds `esp32cam_YYYYMMDD_HHMMSS.jpg`; a non-zero sequence is appended
/// before the extension to keep same-second uploads apart.
pub fn image_filename(timestamp: NaiveDateTime, sequence: u32) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    if sequence == 0 {
        format!("{FILENAME_PREFIX}_{stamp}.{FILENAME_EXTENSION}")
    } else {
        format!("{FILENAME_PREFIX}_{stamp}_{sequence}.{FILENAME_EXTENSION}")
    }
}
