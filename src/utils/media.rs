//! Attachment storage on the local file system.
//!
//! Files land in `<root>/bugs/<uuid>_<name>`. Rows keep only the path relative
//! to the root so the media directory can move between deployments.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::error::AppError;

const BUG_DIR: &str = "bugs";
const FALLBACK_NAME: &str = "attachment";
const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStore {
    pub async fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(root.join(BUG_DIR)).await?;
        info!("Media storage initialized at: {}", root.display());
        Ok(Self { root, max_bytes })
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Writes an uploaded attachment and returns its relative path.
    pub async fn save_bug_attachment(
        &self,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, AppError> {
        if content.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "attachment exceeds {} bytes",
                self.max_bytes
            )));
        }

        let file_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(original_name));
        let relative = format!("{BUG_DIR}/{file_name}");
        let path = self.root.join(BUG_DIR).join(&file_name);

        let mut file = fs::File::create(&path).await?;
        file.write_all(content).await?;
        file.flush().await?;

        debug!(path = %relative, bytes = content.len(), "attachment stored");
        Ok(relative)
    }

    /// Absolute path for a stored relative path. Refuses anything that would
    /// leave the media root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        let rel = Path::new(relative);
        if rel.as_os_str().is_empty()
            || !rel.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::BadRequest("invalid media path".to_string()));
        }
        Ok(self.root.join(rel))
    }

    pub async fn remove(&self, relative: &str) -> Result<(), AppError> {
        let path = self.resolve(relative)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %relative, "attachment removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the last path segment of a client-supplied name, restricted to
/// letters, digits, `.`, `-` and `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return FALLBACK_NAME.to_string();
    }

    // keep the extension when truncating
    if cleaned.len() > MAX_NAME_LEN {
        return match cleaned.rsplit_once('.') {
            Some((stem, ext)) if ext.len() < 16 => {
                let keep = MAX_NAME_LEN.saturating_sub(ext.len() + 1);
                format!("{}.{}", &stem[..keep.min(stem.len())], ext)
            }
            _ => cleaned[..MAX_NAME_LEN].to_string(),
        };
    }
    cleaned.to_string()
}
