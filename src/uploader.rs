//! Image uploader with scoped preview references.
//!
//! Every selected file gets a preview URL minted by a [`PreviewStore`]. The
//! URL is wrapped in a [`PreviewHandle`] that revokes it when released or
//! dropped, and the uploader owns all handles in one list. Replacing the
//! selection releases every previous handle before new ones are minted.

use std::fmt;
use std::sync::Arc;

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Default cap on the number of selected images.
pub const DEFAULT_MAX_IMAGES: usize = 5;

// ---

/// Metadata of a file chosen by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    #[serde(default)]
    pub size_bytes: u64,
}

impl SelectedFile {
    /// Whether the declared MIME type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.content_type
            .parse::<mime::Mime>()
            .map(|m| m.type_() == mime::IMAGE)
            .unwrap_or(false)
    }
}

/// Mints and revokes preview URLs.
pub trait PreviewStore: Send + Sync {
    fn create(&self, file: &SelectedFile) -> String;
    fn revoke(&self, url: &str);
}

/// In-process preview store that tracks which URLs are still live.
#[derive(Debug, Default)]
pub struct BlobPreviews {
    live: DashSet<String>,
}

impl BlobPreviews {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }
}

impl PreviewStore for BlobPreviews {
    fn create(&self, _file: &SelectedFile) -> String {
        // ---
        let url = format!("blob:riverguard/{}", Uuid::new_v4());
        self.live.insert(url.clone());
        url
    }

    fn revoke(&self, url: &str) {
        self.live.remove(url);
    }
}

/// A live preview URL. Revoked exactly once, on release or drop.
pub struct PreviewHandle {
    url: String,
    store: Arc<dyn PreviewStore>,
    released: bool,
}

impl PreviewHandle {
    fn mint(store: &Arc<dyn PreviewStore>, file: &SelectedFile) -> Self {
        Self {
            url: store.create(file),
            store: Arc::clone(store),
            released: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn release(mut self) {
        self.revoke();
    }

    fn revoke(&mut self) {
        if !self.released {
            self.store.revoke(&self.url);
            self.released = true;
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// How a batch of files arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadSource {
    /// Manual file picker (the `accept` attribute already limited types).
    #[default]
    Picker,
    /// Drag and drop; non-image files are discarded.
    Drop,
}

/// Ordered, capped selection of images with their previews.
pub struct ImageUploader {
    files: Vec<SelectedFile>,
    previews: Vec<PreviewHandle>,
    max_images: usize,
    store: Arc<dyn PreviewStore>,
}

impl ImageUploader {
    pub fn new(store: Arc<dyn PreviewStore>, max_images: usize) -> Self {
        Self {
            files: Vec::new(),
            previews: Vec::new(),
            max_images,
            store,
        }
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn preview_urls(&self) -> Vec<&str> {
        self.previews.iter().map(PreviewHandle::url).collect()
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn can_add_more(&self) -> bool {
        self.files.len() < self.max_images
    }

    /// Append a batch, keeping the earliest files up to the cap.
    ///
    /// Returns how many of the offered files were kept.
    pub fn add(&mut self, batch: Vec<SelectedFile>, source: UploadSource) -> usize {
        // ---
        let batch: Vec<SelectedFile> = match source {
            UploadSource::Picker => batch,
            UploadSource::Drop => batch.into_iter().filter(SelectedFile::is_image).collect(),
        };
        let before = self.files.len();

        self.files.extend(batch);
        self.files.truncate(self.max_images);
        self.replace_previews();

        let kept = self.files.len() - before;
        tracing::debug!(
            "Uploader holds {} of max {} images ({} added)",
            self.files.len(),
            self.max_images,
            kept
        );
        kept
    }

    /// Remove the file at `index`; later files shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<SelectedFile> {
        // ---
        if index >= self.files.len() {
            return Err(AppError::NotFound("image", index.to_string()));
        }
        self.previews.remove(index).release();
        Ok(self.files.remove(index))
    }

    /// Release every preview and clear the selection.
    pub fn clear(&mut self) {
        self.files.clear();
        self.previews.drain(..).for_each(PreviewHandle::release);
    }

    fn replace_previews(&mut self) {
        // ---
        self.previews.drain(..).for_each(PreviewHandle::release);
        self.previews = self
            .files
            .iter()
            .map(|f| PreviewHandle::mint(&self.store, f))
            .collect();
    }
}

impl fmt::Debug for ImageUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUploader")
            .field("files", &self.files)
            .field("previews", &self.previews)
            .field("max_images", &self.max_images)
            .finish()
    }
}
