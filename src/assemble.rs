use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::caption::Figure;
use crate::config::Config;
use crate::document::{EMU_PER_INCH, ReportDocument};
use crate::metadata::ReportMetadata;
use crate::{Error, naming, placeholders};

/// Everything the assembler needs; collected up front so the assembly
/// itself runs without further interaction.
pub struct Assembly<'a> {
    /// Directory the report is written into (the screenshot directory).
    pub directory: &'a Path,
    pub template: &'a Path,
    pub metadata: &'a ReportMetadata,
    pub figures: &'a [Figure],
    pub config: &'a Config,
}

/// Run the whole assembly: load the template, substitute placeholders,
/// normalize styles, append the figure block behind a page break, append
/// any closing headings on a fresh page, and save. A figure that cannot
/// be inserted is logged and dropped; everything else is fatal.
pub fn assemble(assembly: Assembly<'_>) -> Result<PathBuf, Error> {
    let Assembly {
        directory,
        template,
        metadata,
        figures,
        config,
    } = assembly;

    let mut document = ReportDocument::load(template).map_err(|source| Error::TemplateLoad {
        path: template.to_path_buf(),
        source,
    })?;

    document.replace_text(&placeholders::build(metadata));
    document.normalize_styles(&config.styles);

    document.push_page_break();
    for heading in &config.opening_headings {
        document.push_heading(heading, &config.styles);
    }

    let width_emu = (config.figure_width_in * EMU_PER_INCH as f32) as u32;
    for figure in figures {
        if let Err(e) = document.push_figure(figure, &config.caption, width_emu) {
            warn!(
                asset = %figure.asset.path.display(),
                %e,
                "could not insert figure, leaving it out"
            );
        }
    }

    if !config.closing_headings.is_empty() {
        document.push_page_break();
        for heading in &config.closing_headings {
            document.push_heading(heading, &config.styles);
        }
    }

    let file_name = naming::output_file_name(metadata, &config.disciplines, &config.report_marker);
    let output = directory.join(file_name);
    document.save(&output).map_err(|source| Error::DocumentSave {
        path: output.clone(),
        source,
    })?;

    info!(path = %output.display(), figures = figures.len(), "report assembled");
    Ok(output)
}
