use std::path::PathBuf;

pub mod assemble;
pub mod assets;
pub mod caption;
pub mod config;
pub mod document;
pub mod metadata;
pub mod naming;
pub mod placeholders;
pub mod template;
pub mod text;
pub mod ui;

#[cfg(test)]
mod tests;

/// Conditions that make the final report unproducible. Anything softer
/// (a malformed field, a single unreadable screenshot) is handled where it
/// occurs, by reprompt or by omission.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no images found in {} (supported: png, jpg, jpeg, gif)", .dir.display())]
    NoAssetsFound { dir: PathBuf },
    #[error("no report template (*.docx) found in {}", .dir.display())]
    TemplateNotFound { dir: PathBuf },
    #[error("failed to scan {}: {source}", .dir.display())]
    ScanDir {
        dir: PathBuf,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to load template {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: document::LoadError,
    },
    #[error("failed to save report to {} (is the file open elsewhere?): {source}", .path.display())]
    DocumentSave {
        path: PathBuf,
        #[source]
        source: document::SaveError,
    },
}
