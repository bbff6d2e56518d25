//! Product image storage.
//!
//! Images live on the local filesystem under `MEDIA_ROOT`, which the
//! storefront serves at `/media`. Layout:
//!
//! ```text
//! {business folder}/{product id}/{unix millis}.{ext}   product images
//! {business folder}/{unix millis}.{ext}                uploads without a product
//! ```
//!
//! The business folder is the business name with whitespace removed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use luxe_core::ProductId;

/// Extensions accepted for upload (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];

/// Attempts at finding a free timestamped name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Errors from the media store.
#[derive(Debug, Error)]
pub enum MediaError {
    /// File extension is not an accepted image type.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// A path component is empty or could escape the media root.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The upload was empty.
    #[error("empty upload")]
    Empty,

    /// The image does not exist.
    #[error("image not found")]
    NotFound,

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored image and where the public can fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// File name within its folder.
    pub name: String,
    /// Path relative to the media root, `/`-separated.
    pub path: String,
    pub url: String,
}

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: String,
}

impl MediaStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an upload under a fresh timestamped name.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnsupportedType` unless `file_name` carries an
    /// image extension, `MediaError::Empty` for an empty body, or an I/O error.
    pub async fn save(
        &self,
        folder: &str,
        product_id: Option<ProductId>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, MediaError> {
        let ext = image_extension(file_name)?;
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        let segments = folder_segments(folder, product_id)?;
        let dir = self.dir_for(&segments);
        tokio::fs::create_dir_all(&dir).await?;

        let millis = chrono::Utc::now().timestamp_millis();
        for offset in 0..MAX_NAME_ATTEMPTS {
            let name = format!("{}.{ext}", millis + offset);
            let path = dir.join(&name);
            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(bytes).await?;
            file.flush().await?;

            tracing::info!(path = %path.display(), size = bytes.len(), "Image stored");
            return Ok(self.stored(&segments, name));
        }

        Err(MediaError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free file name",
        )))
    }

    /// Images in a folder, sorted by name. Dotfiles and subdirectories are
    /// skipped; a missing folder lists as empty.
    ///
    /// # Errors
    ///
    /// Returns an I/O error other than "not found".
    pub async fn list(
        &self,
        folder: &str,
        product_id: Option<ProductId>,
    ) -> Result<Vec<StoredImage>, MediaError> {
        let segments = folder_segments(folder, product_id)?;
        let mut entries = match tokio::fs::read_dir(self.dir_for(&segments)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| self.stored(&segments, name))
            .collect())
    }

    /// Delete one image.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::NotFound` if the file does not exist, or
    /// `MediaError::InvalidName` if `name` is not a plain file name.
    pub async fn delete(
        &self,
        folder: &str,
        product_id: Option<ProductId>,
        name: &str,
    ) -> Result<(), MediaError> {
        check_segment(name)?;
        let segments = folder_segments(folder, product_id)?;
        let path = self.dir_for(&segments).join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Image deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(MediaError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Public URL of a media-relative path, each segment percent-encoded.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }

    fn dir_for(&self, segments: &[String]) -> PathBuf {
        segments
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    fn stored(&self, segments: &[String], name: String) -> StoredImage {
        let mut parts = segments.to_vec();
        parts.push(name.clone());
        let path = parts.join("/");
        StoredImage {
            url: self.public_url(&path),
            name,
            path,
        }
    }
}

/// Lowercased extension of an image file name.
fn image_extension(file_name: &str) -> Result<String, MediaError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(MediaError::UnsupportedType(file_name.to_owned()))
    }
}

fn folder_segments(
    folder: &str,
    product_id: Option<ProductId>,
) -> Result<Vec<String>, MediaError> {
    check_segment(folder)?;
    let mut segments = vec![folder.to_owned()];
    if let Some(id) = product_id {
        segments.push(id.to_string());
    }
    Ok(segments)
}

/// A single path component that stays inside its parent.
fn check_segment(segment: &str) -> Result<(), MediaError> {
    let bad = segment.is_empty()
        || segment.starts_with('.')
        || segment.contains(['/', '\\'])
        || segment.chars().any(char::is_control);
    if bad {
        return Err(MediaError::InvalidName(segment.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store(dir: &TempDir) -> MediaStore {
        MediaStore::new(dir.path(), "https://cdn.luxe.shop/media/")
    }

    #[tokio::test]
    async fn test_save_under_product_folder() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);

        let image = media
            .save("LuxeBoutique", Some(ProductId::new(12)), "Tote Front.JPG", b"jpeg")
            .await
            .unwrap();

        assert!(image.path.starts_with("LuxeBoutique/12/"));
        assert!(image.name.ends_with(".jpg"));
        assert_eq!(
            image.url,
            format!("https://cdn.luxe.shop/media/{}", image.path)
        );
        let on_disk = dir.path().join("LuxeBoutique").join("12").join(&image.name);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_save_without_product() {
        let dir = TempDir::new().unwrap();
        let image = store(&dir)
            .save("Luxe", None, "banner.webp", b"webp")
            .await
            .unwrap();
        assert_eq!(image.path.matches('/').count(), 1);
        assert!(image.path.starts_with("Luxe/"));
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_get_distinct_names() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        let a = media.save("Luxe", None, "a.png", b"1").await.unwrap();
        let b = media.save("Luxe", None, "b.png", b"2").await.unwrap();
        assert_ne!(a.name, b.name);
    }

    #[tokio::test]
    async fn test_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        assert!(matches!(
            media.save("Luxe", None, "invoice.pdf", b"%PDF").await,
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            media.save("Luxe", None, "noext", b"x").await,
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            media.save("Luxe", None, "empty.png", b"").await,
            Err(MediaError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_list_skips_dotfiles_and_missing_folders() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        let product = Some(ProductId::new(3));

        assert!(media.list("Luxe", product).await.unwrap().is_empty());

        media.save("Luxe", product, "one.png", b"1").await.unwrap();
        let folder = dir.path().join("Luxe").join("3");
        std::fs::write(folder.join(".emptyFolderPlaceholder"), b"").unwrap();
        std::fs::create_dir(folder.join("thumbs")).unwrap();

        let images = media.list("Luxe", product).await.unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = TempDir::new().unwrap();
        let media = store(&dir);
        let product = Some(ProductId::new(4));
        let image = media.save("Luxe", product, "x.gif", b"gif").await.unwrap();

        media.delete("Luxe", product, &image.name).await.unwrap();
        assert!(matches!(
            media.delete("Luxe", product, &image.name).await,
            Err(MediaError::NotFound)
        ));
        assert!(matches!(
            media.delete("Luxe", product, "../../etc/passwd").await,
            Err(MediaError::InvalidName(_))
        ));
    }

    #[test]
    fn test_public_url_encodes_segments() {
        let media = MediaStore::new("media", "http://localhost:3000/media");
        assert_eq!(
            media.public_url("Café/1/a b.png"),
            "http://localhost:3000/media/Caf%C3%A9/1/a%20b.png"
        );
    }

    #[test]
    fn test_folder_must_stay_inside_root() {
        assert!(folder_segments("..", None).is_err());
        assert!(folder_segments("a/b", None).is_err());
        assert!(folder_segments("", None).is_err());
        assert_eq!(
            folder_segments("Luxe", Some(ProductId::new(9))).unwrap(),
            vec!["Luxe".to_owned(), "9".to_owned()]
        );
    }
}
