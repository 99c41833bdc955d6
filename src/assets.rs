//! # Shared Image Loading
//!
//! Process-wide memoized image loading, used for the logo composited onto
//! every QR code. Each source path is loaded at most once; all consumers —
//! including those that ask while the first load is still in flight — await
//! the same completion and share the decoded pixels.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

use crate::error::EtiquetaError;

/// Memoized image cache keyed by source path.
///
/// The per-key [`OnceCell`] is the completion signal: concurrent callers for
/// a path that hasn't finished loading all attach to the same initialization
/// future, so no request is ever dropped. A failed load leaves the cell
/// empty and is retried on the next request.
#[derive(Default)]
pub struct ImageCache {
    entries: RwLock<HashMap<PathBuf, Arc<OnceCell<Arc<RgbaImage>>>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the decoded image for `path`, loading it on first use.
    pub async fn get_or_load(&self, path: &Path) -> Result<Arc<RgbaImage>, EtiquetaError> {
        let cell = {
            let mut entries = self.entries.write().await;
            entries.entry(path.to_path_buf()).or_default().clone()
        };

        cell.get_or_try_init(|| async {
            let bytes = tokio::fs::read(path).await?;
            let decoded = image::load_from_memory(&bytes).map_err(|e| {
                EtiquetaError::Image(format!("failed to decode {}: {}", path.display(), e))
            })?;
            Ok::<_, EtiquetaError>(Arc::new(decoded.to_rgba8()))
        })
        .await
        .map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_test_png(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_loads_once_and_shares() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path());

        let cache = ImageCache::new();
        let first = cache.get_or_load(&path).await.unwrap();
        let second = cache.get_or_load(&path).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.dimensions(), (8, 8));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path());

        let cache = Arc::new(ImageCache::new());
        let (a, b) = tokio::join!(
            cache.get_or_load(&path),
            cache.get_or_load(&path),
        );
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test]
    async fn test_missing_file_errors() {
        let cache = ImageCache::new();
        let result = cache.get_or_load(Path::new("/nonexistent/logo.png")).await;
        assert!(result.is_err());
    }
}
