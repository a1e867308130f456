// JSON files backing local-file mode
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::db::{StoreError, StoreResult};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reads and parses `path`. A missing file is `Ok(None)`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::MalformedFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Replaces the contents of `path` with `value`.
///
/// The bytes land in a unique sibling file first and are renamed over `path`,
/// so readers see either the old or the new document, never a partial one.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let body = serde_json::to_vec(value).map_err(StoreError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let temp = temp_sibling(path);
    if let Err(source) = tokio::fs::write(&temp, &body).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(StoreError::Io { path: temp, source });
    }

    if let Err(source) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path.with_file_name(name)
}
