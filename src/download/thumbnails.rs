use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Materialize inline artwork to `<dir>/<source_id>.jpg`.
///
/// Artwork is cosmetic: every failure (bad base64, unwritable directory) is
/// logged and reported as "no thumbnail" so the download itself never fails
/// because of it. A `data:*;base64,` prefix, when present, is stripped first.
pub async fn save_thumbnail(
    inline: Option<&str>,
    source_id: &str,
    thumbnail_dir: &Path,
) -> Option<PathBuf> {
    let raw = inline?.trim();
    if raw.is_empty() {
        return None;
    }

    let encoded = match raw.split_once("base64,") {
        Some((_, rest)) => rest,
        None => raw,
    };

    let bytes = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to decode thumbnail for {}: {}", source_id, e);
            return None;
        }
    };

    let path = thumbnail_dir.join(format!("{}.jpg", source_id));
    if let Err(e) = tokio::fs::create_dir_all(thumbnail_dir).await {
        warn!("Failed to create thumbnail directory: {}", e);
        return None;
    }
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        warn!("Failed to write thumbnail {}: {}", path.display(), e);
        return None;
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    const JPEG_STUB: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

    #[tokio::test]
    async fn writes_plain_base64_to_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = STANDARD.encode(JPEG_STUB);

        let path = save_thumbnail(Some(&encoded), "abc123", dir.path())
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "abc123.jpg");
        assert_eq!(std::fs::read(&path).unwrap(), JPEG_STUB);
    }

    #[tokio::test]
    async fn strips_data_uri_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let inline = format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_STUB));

        let path = save_thumbnail(Some(&inline), "abc123", dir.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), JPEG_STUB);
    }

    #[tokio::test]
    async fn absent_or_blank_inline_yields_none() {
        let dir = tempfile::tempdir().unwrap();

        assert!(save_thumbnail(None, "abc123", dir.path()).await.is_none());
        assert!(save_thumbnail(Some("   "), "abc123", dir.path())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn invalid_base64_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();

        let result = save_thumbnail(Some("%%% not base64 %%%"), "abc123", dir.path()).await;

        assert!(result.is_none());
        assert!(!dir.path().join("abc123.jpg").exists());
    }
}
