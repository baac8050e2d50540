mod types;

pub use types::*;

use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, info, warn};

// Upper bound on same-second suffixes before giving up
const MAX_SEQUENCE: u32 = 1000;

/// Append-only sink for uploaded images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create upload directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        debug!("Upload directory ready: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(&self, data: &[u8]) -> Result<UploadedImage> {
        self.save_at(data, Local::now().naive_local()).await
    }

    pub async fn save_at(&self, data: &[u8], timestamp: NaiveDateTime) -> Result<UploadedImage> {
        if data.is_empty() {
            return Err(Error::EmptyUpload);
        }

        for sequence in 0..MAX_SEQUENCE {
            let filename = image_filename(timestamp, sequence);
            let path = self.dir.join(&filename);

            // create_new claims the name atomically, so concurrent uploads
            // in the same second never overwrite each other
            let file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} already exists, trying next suffix", filename);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            write_or_discard(file, &path, data).await?;

            info!("Image saved successfully: {} ({} bytes)", filename, data.len());
            return Ok(UploadedImage {
                filename,
                path,
                size: data.len(),
            });
        }

        Err(Error::storage(format!(
            "No free filename for timestamp {}",
            timestamp.format("%Y%m%d_%H%M%S")
        )))
    }
}

/// Writes the whole payload, removing the file again if any part fails so a
/// truncated image never stays behind under a claimed name.
async fn write_or_discard<W>(mut writer: W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(
                "Failed to remove partial upload {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e.into());
    }

    Ok(())
}
