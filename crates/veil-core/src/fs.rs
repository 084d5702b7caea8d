//! Reading and writing package files and revealed images.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! reader never observes a half-written file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::container::{VeilPackage, PACKAGE_EXTENSION};
use crate::error::{Result, VeilError};

/// Default file name for a package with the given stem, e.g. `moon.veil.json`.
pub fn package_file_name(stem: &str) -> String {
    format!("{}.{}", stem, PACKAGE_EXTENSION)
}

/// Serialize `package` as pretty JSON and write it atomically to `path`.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `VeilError::Io` if the directory, temp file or rename fails.
pub fn write_package(path: &Path, package: &VeilPackage) -> Result<()> {
    let json = package.to_json_pretty()?;
    write_atomic(path, json.as_bytes(), false)?;
    debug!(path = %path.display(), bytes = json.len(), "package written");
    Ok(())
}

/// Write revealed plaintext atomically, readable by the owner only.
///
/// On Unix the temp file is restricted to `0600` before any bytes reach
/// it, so the plaintext is never visible under a wider mode.
pub fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic(path, bytes, true)?;
    debug!(path = %path.display(), bytes = bytes.len(), "private file written");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8], private: bool) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let mut file = fs::File::create(&temp_path)?;
    let written = restrict_permissions(&file, private)
        .and_then(|_| file.write_all(bytes))
        .and_then(|_| file.sync_all());
    if let Err(err) = written {
        drop(file);
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(file);

    rename_with_fallback(&temp_path, path)
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File, private: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if private {
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File, _private: bool) -> io::Result<()> {
    Ok(())
}

/// Read and parse the package stored at `path`.
///
/// # Errors
///
/// - `VeilError::NotFound` if no file exists at `path`
/// - `VeilError::Io` for other read failures
/// - `VeilError::MalformedContainer` if parsing fails
pub fn read_package(path: &Path) -> Result<VeilPackage> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => VeilError::NotFound(path.display().to_string()),
        _ => VeilError::Io { source: err },
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "package read");
    VeilPackage::from_slice(&bytes)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "package".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Rename, removing an existing destination and retrying on platforms
/// where rename refuses to overwrite. The temp file is removed on failure.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{PackageRequest, VeilEngine};
    use crate::crypto::{AesGcmCipher, KdfParams};
    use crate::random::SeededRandom;
    use secrecy::SecretString;
    use tempfile::tempdir;

    fn package() -> VeilPackage {
        VeilEngine::with_parts(AesGcmCipher, SeededRandom::new(3))
            .with_kdf_params(KdfParams::new(1_000, 256))
            .build(
                &PackageRequest::new()
                    .base_image(vec![1, 2, 3])
                    .hidden_image(vec![4, 5, 6]),
                &SecretString::from("unseen-walk"),
            )
            .unwrap()
    }

    #[test]
    fn test_package_file_name() {
        assert_eq!(package_file_name("moon"), "moon.veil.json");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("moon.veil.json");
        let package = package();

        write_package(&path, &package).unwrap();
        assert_eq!(read_package(&path).unwrap(), package);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("moon.veil.json");

        write_package(&path, &package()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_overwrites_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("moon.veil.json");
        fs::write(&path, "old").unwrap();

        write_package(&path, &package()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(fs::read_to_string(&path).unwrap().contains("\"formatVersion\""));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_package(&dir.path().join("absent.veil.json"));
        assert!(matches!(result, Err(VeilError::NotFound(_))));
    }

    #[test]
    fn test_read_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.veil.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            read_package(&path),
            Err(VeilError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_read_bad_base64_is_malformed_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("moon.veil.json");
        let json = package().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["hiddenCiphertext"] = serde_json::Value::String("AQ*DBA==".to_string());
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            read_package(&path),
            Err(VeilError::MalformedContainer(_))
        ));
    }

    #[test]
    fn test_write_private_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hidden.png");
        fs::write(&path, "old").unwrap();

        write_private(&path, b"revealed").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"revealed");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("hidden.png");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&path, b"revealed").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");
        fs::write(&dest, "old").unwrap();
        fs::write(&temp, "new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }
}
