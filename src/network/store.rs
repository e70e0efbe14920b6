use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tokio::{fs, task};

use crate::core::LocalImagesError;

/// Writes `data` to `path`, creating intermediate directories
///
/// The bytes land in a hidden `.part` sibling first and are renamed into
/// place, so the final name never refers to a half-written file. An existing
/// file is replaced.
pub async fn store(path: &Path, data: &[u8]) -> Result<(), LocalImagesError> {
    let parent = path
        .parent()
        .ok_or_else(|| LocalImagesError::persistence(path, "path has no parent directory"))?;

    fs::create_dir_all(parent)
        .await
        .map_err(|e| LocalImagesError::persistence(parent, e.to_string()))?;

    let directory = parent.to_path_buf();
    let target = path.to_path_buf();
    let data = data.to_vec();

    task::spawn_blocking(move || write_and_persist(&directory, &target, &data))
        .await
        .map_err(|e| LocalImagesError::persistence(path, e.to_string()))?
}

/// Every write gets its own uniquely named temporary file, so concurrent
/// stores of the same asset never share one.
fn write_and_persist(directory: &Path, path: &Path, data: &[u8]) -> Result<(), LocalImagesError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temporary = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".part")
        .tempfile_in(directory)
        .map_err(|e| LocalImagesError::persistence(directory, e.to_string()))?;

    temporary
        .write_all(data)
        .map_err(|e| LocalImagesError::persistence(temporary.path(), e.to_string()))?;

    temporary
        .persist(path)
        .map_err(|e| LocalImagesError::persistence(path, e.error.to_string()))?;

    Ok(())
}

/// Looks for a previously stored asset named `stem` or `stem.{extension}`
///
/// Entries are compared in name order, so the answer does not depend on the
/// order the filesystem lists them in. A missing directory means nothing was
/// stored yet.
pub async fn find_existing(dir: &Path, stem: &str) -> io::Result<Option<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut candidates: Vec<String> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if is_stored_variant(&file_name, stem) {
            candidates.push(file_name);
        }
    }

    candidates.sort();

    Ok(candidates.into_iter().next().map(|name| dir.join(name)))
}

fn is_stored_variant(file_name: &str, stem: &str) -> bool {
    if file_name == stem {
        return true;
    }

    match file_name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        Some(extension) => !extension.is_empty() && !extension.contains('.'),
        None => false,
    }
}
