use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

use crate::Error;
use crate::config::Ordering;

/// Extensions the discoverer recognizes, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// One discovered screenshot. Immutable once discovered; the sequence
/// index is its position in the chosen ordering, before any skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub sequence_index: usize,
}

fn is_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

fn file_name_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Birth time where the filesystem records it, modification time otherwise.
fn creation_key(path: &Path) -> SystemTime {
    let Ok(meta) = std::fs::metadata(path) else {
        warn!(path = %path.display(), "failed to stat, ordering it first");
        return SystemTime::UNIX_EPOCH;
    };
    meta.created()
        .or_else(|_| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// List every recognized image in `dir`, ordered by the configured
/// strategy. An empty directory is an error: a report without figures is
/// not worth assembling.
pub fn discover(dir: &Path, ordering: Ordering) -> Result<Vec<ImageAsset>, Error> {
    let pattern = format!("{}/*.*", glob::Pattern::escape(&dir.to_string_lossy()));
    let entries = glob::glob(&pattern).map_err(|source| Error::ScanDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() && is_image(&path) => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!(%e, "skipping unreadable directory entry");
                None
            }
        })
        .collect();

    match ordering {
        Ordering::Filename => paths.sort_by_key(|path| file_name_key(path)),
        // Tie-break on the name so equal timestamps stay deterministic.
        Ordering::CreationTime => {
            paths.sort_by_key(|path| (creation_key(path), file_name_key(path)))
        }
    }

    if paths.is_empty() {
        return Err(Error::NoAssetsFound {
            dir: dir.to_path_buf(),
        });
    }

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(sequence_index, path)| ImageAsset {
            path,
            sequence_index,
        })
        .collect())
}
