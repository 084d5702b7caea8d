//! File helpers shared by commands.

use std::io;
use std::path::Path;

use crate::errors::CliError;

/// Read an input image, mapping a missing file to a not-found error.
pub fn read_image(path: &Path, role: &str) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::not_found(
            format!("No {} image found at {}", role, path.display()),
            "Check the path",
        )
        .into(),
        _ => anyhow::anyhow!("Failed to read {} image {}: {}", role, path.display(), e),
    })
}

/// Media type for common image extensions.
pub fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(media_type)
}

/// Refuse to clobber an existing file unless `force` is set.
pub fn ensure_writable(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(CliError::invalid_input_with_hint(
            format!("{} already exists", path.display()),
            "Pass --force to overwrite it",
        )
        .into());
    }
    Ok(())
}
