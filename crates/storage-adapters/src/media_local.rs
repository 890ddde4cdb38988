//! Local filesystem implementation of `MediaStore`.
//!
//! Uploads land under a single root directory and are referenced by a
//! public path of the form `images/<uuid>-<original-name>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use tokio::fs;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::ports::MediaStore;

pub struct LocalMediaStore {
    /// Directory that receives the files (e.g. "./images").
    root: PathBuf,
    /// Public path prefix clients use to reference stored files
    /// (e.g. "images").
    prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    /// Keeps only characters that are safe in a filename; everything
    /// else becomes '_'. Path separators and parent components must
    /// never survive.
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let cleaned = cleaned.replace("..", "__");
        if cleaned.is_empty() {
            "upload".into()
        } else {
            cleaned
        }
    }

    /// Maps a stored public path back to the file under the root, or
    /// `None` if the path does not belong to this store.
    fn local_path(&self, stored: &str) -> Option<PathBuf> {
        let rest = stored.strip_prefix(&self.prefix)?.strip_prefix('/')?;
        // A stored path is always a single flat filename; anything with
        // separators or parent components is not ours.
        if rest.is_empty() || rest.contains('/') || rest.contains("..") {
            return None;
        }
        Some(self.root.join(rest))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, original_name: &str, _content_type: &Mime, data: Bytes) -> Result<String> {
        let filename = format!("{}-{}", Uuid::now_v7(), Self::sanitize(original_name));
        let target = self.root.join(&filename);

        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| DomainError::Internal(format!("media root unavailable: {err}")))?;
        fs::write(&target, &data)
            .await
            .map_err(|err| DomainError::Internal(format!("media write failed: {err}")))?;

        Ok(format!("{}/{}", self.prefix, filename))
    }

    async fn remove(&self, path: &str) {
        let Some(target) = self.local_path(path) else {
            tracing::warn!(%path, "refusing to remove path outside the media root");
            return;
        };
        if let Err(err) = fs::remove_file(&target).await {
            // Best effort: a missing file is not worth failing the
            // surrounding mutation over.
            tracing::warn!(path = %target.display(), error = %err, "media removal failed");
        }
    }
}

impl LocalMediaStore {
    /// The directory this store serves; the static-files route mounts it.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
