use crate::error::AppError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the image files directly inside `dir`, in directory enumeration order.
///
/// Only regular files whose lower-cased extension is in `allowed_extensions`
/// are yielded. A missing directory is reported as `AppError::NotFound`.
pub fn scan_directory(
    dir: &Path,
    allowed_extensions: HashSet<String>,
) -> Result<impl Iterator<Item = PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!("Directory not found: {}", dir.display())));
    }

    log::info!("Starting file discovery in {}", dir.display());
    log::debug!("Configured allowed extensions: {:?}", allowed_extensions);

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter_map(move |entry| {
            let path = entry.path();
            if !entry.file_type().is_file() {
                log::trace!("Skipping non-file entry: {:?}", path);
                return None;
            }
            match path.extension().and_then(|s| s.to_str()) {
                Some(ext) if allowed_extensions.contains(&ext.to_lowercase()) => {
                    log::debug!("Discovered image file: {:?}", path);
                    Some(path.to_path_buf())
                }
                Some(_) => {
                    log::trace!("Skipping file due to unsupported extension: {:?}", path);
                    None
                }
                None => {
                    log::trace!("Skipping file with no extension: {:?}", path);
                    None
                }
            }
        });

    Ok(entries)
}
