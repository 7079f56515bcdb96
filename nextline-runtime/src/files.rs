use anyhow::Context;
use nextline_core::screenshot::Screenshot;
use std::fs;
use std::path::Path;

/// Guesses an image mime type from the file extension.
///
/// Returns `application/octet-stream` for anything that is not a known image.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Reads a screenshot from disk, rejecting files that are not images.
pub fn load_screenshot(path: &Path) -> anyhow::Result<Screenshot> {
    let mime = mime_for_path(path);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".into());

    let bytes = fs::read(path).with_context(|| format!("read screenshot: {}", path.display()))?;
    let shot = Screenshot::new(filename, mime, bytes)
        .with_context(|| format!("select screenshot: {}", path.display()))?;
    Ok(shot)
}

pub fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = fs::remove_file(&backup);
        fs::rename(dst, &backup)
            .with_context(|| format!("failed rename {} -> {}", dst.display(), backup.display()))?;
    }

    if let Err(e) = fs::rename(tmp, dst) {
        // Put the old file back if we moved it aside.
        if backup.exists() {
            let _ = fs::rename(&backup, dst);
        }
        let _ = fs::remove_file(tmp);
        return Err(anyhow::Error::new(e).context(format!(
            "failed rename {} -> {}",
            tmp.display(),
            dst.display()
        )));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextline_core::form::FormError;

    #[test]
    fn mime_from_extension_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("dir/b.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("c.txt")), "application/octet-stream");
        assert_eq!(mime_for_path(Path::new("no_ext")), "application/octet-stream");
    }

    #[test]
    fn loads_image_with_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.png");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let shot = load_screenshot(&path).unwrap();
        assert_eq!(shot.filename, "chat.png");
        assert_eq!(shot.mime_type, "image/png");
        assert_eq!(shot.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn refuses_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let err = load_screenshot(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormError>(),
            Some(FormError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_screenshot(&dir.path().join("gone.png")).unwrap_err();
        assert!(err.to_string().contains("read screenshot"));
    }

    #[test]
    fn replace_file_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("config.json");
        let tmp = dir.path().join("config.json.tmp");
        fs::write(&dst, b"old").unwrap();
        fs::write(&tmp, b"new").unwrap();

        replace_file(&tmp, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
        assert!(!tmp.exists());
        assert!(!dst.with_extension("bak").exists());
    }
}
