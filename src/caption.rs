use tracing::info;

use crate::assets::ImageAsset;
use crate::config::CaptionConfig;
use crate::text::capitalize_first;

/// A screenshot that made it into the report: caption text plus the number
/// it is displayed under. Display numbers count non-skipped figures only,
/// so they are always the contiguous sequence 1..=N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub asset: ImageAsset,
    pub caption: String,
    pub display_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    /// The asset is excluded from the report entirely.
    Skip,
    Caption(String),
}

/// Turn free-text input into a caption.
///
/// The skip marker excludes the asset. Otherwise trailing periods are
/// stripped, the first character is uppercased, an empty remainder falls
/// back to "{label} {fallback_number}", and exactly one period is
/// appended. Idempotent: formatting an already-formatted caption returns
/// it unchanged.
pub fn format_caption(
    input: &str,
    fallback_number: usize,
    config: &CaptionConfig,
) -> CaptionOutcome {
    let input = input.trim();
    if input == config.skip_marker {
        return CaptionOutcome::Skip;
    }
    let stripped = input.trim_end_matches('.');
    let body = if stripped.is_empty() {
        format!("{} {}", config.label, fallback_number)
    } else {
        capitalize_first(stripped)
    };
    CaptionOutcome::Caption(format!("{body}."))
}

/// Supplies the free-text input for one asset. The interactive prompt
/// lives behind this seam so the pairing logic stays testable.
pub trait CaptionSource {
    /// `position` and `total` describe the asset's place in the discovery
    /// order, for display purposes only.
    fn caption_for(&mut self, asset: &ImageAsset, position: usize, total: usize) -> String;
}

/// Pair every asset with a caption, dropping skipped ones. The fallback
/// number handed to the formatter is the figure's prospective display
/// number, so default captions never reference a skipped slot.
pub fn collect<S: CaptionSource>(
    assets: &[ImageAsset],
    source: &mut S,
    config: &CaptionConfig,
) -> Vec<Figure> {
    let total = assets.len();
    let mut figures: Vec<Figure> = Vec::with_capacity(total);
    for (index, asset) in assets.iter().enumerate() {
        let raw = source.caption_for(asset, index + 1, total);
        let display_number = figures.len() + 1;
        match format_caption(&raw, display_number, config) {
            CaptionOutcome::Skip => {
                info!(asset = %asset.path.display(), "excluded from the report");
            }
            CaptionOutcome::Caption(caption) => figures.push(Figure {
                asset: asset.clone(),
                caption,
                display_number,
            }),
        }
    }
    figures
}
