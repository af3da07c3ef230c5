use std::path::{Path, PathBuf};

use tracing::warn;

use crate::Error;

/// Why a template menu selection was rejected; the prompt layer reprompts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("that is not a number")]
    NotANumber,
    #[error("enter a number between 1 and {max}")]
    OutOfRange { max: usize },
}

fn is_template(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // "~$" files are editor locks left by an open document.
    if name.starts_with("~$") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Candidate template documents in `dir`, in stable name order. Zero
/// candidates is fatal: there is nothing to assemble into.
pub fn find_templates(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    // The glob stays extension-agnostic; `is_template` filters
    // case-insensitively, so "Shablon.DOCX" is found too.
    let pattern = format!("{}/*.*", glob::Pattern::escape(&dir.to_string_lossy()));
    let entries = glob::glob(&pattern).map_err(|source| Error::ScanDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() && is_template(&path) => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!(%e, "skipping unreadable directory entry");
                None
            }
        })
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        return Err(Error::TemplateNotFound {
            dir: dir.to_path_buf(),
        });
    }
    Ok(candidates)
}

/// Resolve a 1-based menu selection over the candidate list.
pub fn select<'a>(candidates: &'a [PathBuf], raw: &str) -> Result<&'a Path, SelectError> {
    let choice: usize = raw.trim().parse().map_err(|_| SelectError::NotANumber)?;
    if !(1..=candidates.len()).contains(&choice) {
        return Err(SelectError::OutOfRange {
            max: candidates.len(),
        });
    }
    Ok(&candidates[choice - 1])
}
