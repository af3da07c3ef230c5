//! Operations on the report document itself: loading the template,
//! substituting placeholder tokens across its text-bearing nodes,
//! normalizing styles, appending the figure block, and saving.
//!
//! The document is held as an owned value and mutated in place; `save`
//! consumes it, so the handle is released on every exit path.

use std::path::Path;

use docx_rs::{
    AlignmentType, Bold, BreakType, Docx, Document, DocumentChild, LineSpacing, LineSpacingType,
    Paragraph, ParagraphChild, Pic, Run, RunChild, RunFonts, Style, StyleType, Table, TableCellContent,
    TableChild, TableRowChild, read_docx,
};
use image::GenericImageView as _;

use crate::caption::Figure;
use crate::config::{CaptionConfig, StyleConfig};
use crate::placeholders::PlaceholderMap;

pub const EMU_PER_INCH: u32 = 914_400;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read: {0}")]
    Read(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(docx_rs::ReaderError),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("encode: {0}")]
    Encode(String),
    #[error("write: {0}")]
    Write(#[from] std::io::Error),
}

/// Why one figure could not be inserted. The assembler logs it and moves
/// on to the next figure.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    #[error("read: {0}")]
    Read(#[from] std::io::Error),
    #[error("decode: {0}")]
    Decode(#[from] image::ImageError),
}

pub struct ReportDocument {
    docx: Docx,
}

impl ReportDocument {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let buf = std::fs::read(path)?;
        Self::from_bytes(&buf)
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, LoadError> {
        let docx = read_docx(buf).map_err(LoadError::Parse)?;
        Ok(Self { docx })
    }

    /// Replace every occurrence of every token, in paragraphs and in every
    /// table cell's paragraphs. The replacement works on a node's flattened
    /// text: when a token matched, the whole text lands in the node's first
    /// text run, so formatting finer than that run does not survive across
    /// the edited span.
    pub fn replace_text(&mut self, map: &PlaceholderMap) {
        for child in &mut self.docx.document.children {
            match child {
                DocumentChild::Paragraph(paragraph) => replace_in_paragraph(paragraph, map),
                DocumentChild::Table(table) => replace_in_table(table, map),
                _ => {}
            }
        }
    }

    /// Document-wide typography: the base style and both heading levels get
    /// the configured typeface, size and line spacing, with no extra space
    /// after paragraphs; headings additionally lose their bold. Replaces any
    /// previous definition of the same styles, so re-running it is a no-op.
    pub fn normalize_styles(&mut self, cfg: &StyleConfig) {
        for (id, name, unbold) in [
            ("Normal", "Normal", false),
            ("Heading1", "heading 1", true),
            ("Heading2", "heading 2", true),
        ] {
            upsert_style(
                &mut self.docx.styles.styles,
                normalized_style(id, name, cfg, unbold),
            );
        }
    }

    pub fn push_page_break(&mut self) {
        self.push_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
    }

    /// Structural headings stay bold regardless of the normalized heading
    /// style, so the run carries an explicit override.
    pub fn push_heading(&mut self, text: &str, cfg: &StyleConfig) {
        let run = Run::new()
            .add_text(text)
            .fonts(base_fonts(cfg))
            .size(half_points(cfg))
            .bold();
        self.push_paragraph(Paragraph::new().style("Heading1").add_run(run));
    }

    /// One figure: the image centered at the requested display width (height
    /// follows the aspect ratio), a centered caption line under it, and a
    /// spacer paragraph.
    pub fn push_figure(
        &mut self,
        figure: &Figure,
        caption: &CaptionConfig,
        width_emu: u32,
    ) -> Result<(), FigureError> {
        let bytes = std::fs::read(&figure.asset.path)?;
        let (px_w, px_h) = image::load_from_memory(&bytes)?.dimensions();
        let height_emu = (u64::from(width_emu) * u64::from(px_h) / u64::from(px_w.max(1))) as u32;

        let picture = Paragraph::new()
            .add_run(Run::new().add_image(Pic::new(&bytes).size(width_emu, height_emu)))
            .align(AlignmentType::Center);
        let caption_line = format!(
            "{} {}{}{}",
            caption.label, figure.display_number, caption.separator, figure.caption
        );
        let caption_paragraph = Paragraph::new()
            .add_run(Run::new().add_text(caption_line))
            .align(AlignmentType::Center);

        self.push_paragraph(picture);
        self.push_paragraph(caption_paragraph);
        self.push_paragraph(Paragraph::new());
        Ok(())
    }

    /// Serialize fully in memory first, then write the file in one go, so
    /// an encoding failure leaves no half-written artifact behind.
    pub fn save(mut self, path: &Path) -> Result<(), SaveError> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut buf)
            .map_err(|e| SaveError::Encode(e.to_string()))?;
        std::fs::write(path, buf.into_inner())?;
        Ok(())
    }

    /// Flattened text of every body paragraph, in document order.
    pub fn body_text(&self) -> Vec<String> {
        self.docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .collect()
    }

    /// Flattened text of every table cell paragraph, in document order.
    pub fn table_text(&self) -> Vec<String> {
        let mut out = Vec::new();
        for child in &self.docx.document.children {
            if let DocumentChild::Table(table) = child {
                collect_table_text(table, &mut out);
            }
        }
        out
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) {
        let document = std::mem::replace(&mut self.docx.document, Document::new());
        self.docx.document = document.add_paragraph(paragraph);
    }
}

fn half_points(cfg: &StyleConfig) -> usize {
    (cfg.size_pt * 2) as usize
}

fn base_fonts(cfg: &StyleConfig) -> RunFonts {
    RunFonts::new()
        .ascii(&cfg.font)
        .hi_ansi(&cfg.font)
        .east_asia(&cfg.font)
        .cs(&cfg.font)
}

fn normalized_style(id: &str, name: &str, cfg: &StyleConfig, unbold: bool) -> Style {
    // Line spacing is expressed in 240ths of a line, space-after in twips.
    let spacing = LineSpacing::new()
        .line_rule(LineSpacingType::Auto)
        .line((cfg.line_spacing * 240.0) as _)
        .after(0);
    let mut style = Style::new(id, StyleType::Paragraph).name(name);
    style.run_property = style
        .run_property
        .size(half_points(cfg))
        .fonts(base_fonts(cfg));
    style.paragraph_property = style.paragraph_property.line_spacing(spacing);
    if unbold {
        style.run_property.bold = Some(Bold::new().disable());
    }
    style
}

fn upsert_style(styles: &mut Vec<Style>, style: Style) {
    styles.retain(|existing| existing.style_id != style.style_id);
    styles.push(style);
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut flat = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for piece in &run.children {
                if let RunChild::Text(text) = piece {
                    flat.push_str(&text.text);
                }
            }
        }
    }
    flat
}

fn replace_in_paragraph(paragraph: &mut Paragraph, map: &PlaceholderMap) {
    let flat = paragraph_text(paragraph);
    if !map.keys().any(|token| flat.contains(token.as_str())) {
        return;
    }
    let mut replaced = flat;
    for (token, value) in map {
        replaced = replaced.replace(token.as_str(), value);
    }
    // The whole replaced text goes into the first text run; the remaining
    // text runs are blanked rather than removed.
    let mut remaining = Some(replaced);
    for child in &mut paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for piece in &mut run.children {
                if let RunChild::Text(text) = piece {
                    text.text = remaining.take().unwrap_or_default();
                }
            }
        }
    }
}

fn replace_in_table(table: &mut Table, map: &PlaceholderMap) {
    for row in &mut table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &mut row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &mut cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => replace_in_paragraph(paragraph, map),
                    TableCellContent::Table(nested) => replace_in_table(nested, map),
                    _ => {}
                }
            }
        }
    }
}

fn collect_table_text(table: &Table, out: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => out.push(paragraph_text(paragraph)),
                    TableCellContent::Table(nested) => collect_table_text(nested, out),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
    use indexmap::IndexMap;

    use super::*;
    use crate::assets::ImageAsset;
    use crate::caption::Figure;
    use crate::config::{CaptionConfig, StyleConfig};

    fn roundtrip(build: impl FnOnce(Docx) -> Docx) -> ReportDocument {
        let mut buf = Cursor::new(Vec::new());
        build(Docx::new()).build().pack(&mut buf).unwrap();
        ReportDocument::from_bytes(buf.get_ref()).unwrap()
    }

    fn map(pairs: &[(&str, &str)]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<IndexMap<_, _>>()
    }

    fn paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn replaces_every_occurrence_in_one_node() {
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("ЛР №%NUM%, вариант %NUM%")));
        doc.replace_text(&map(&[("%NUM%", "4")]));
        assert_eq!(doc.body_text(), vec!["ЛР №4, вариант 4".to_string()]);
    }

    #[test]
    fn replaces_inside_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(paragraph("Группа: %GROUP%")),
            TableCell::new().add_paragraph(paragraph("без токенов")),
        ])]);
        let mut doc = roundtrip(|d| d.add_table(table));
        doc.replace_text(&map(&[("%GROUP%", "АБ-12-34")]));
        assert_eq!(
            doc.table_text(),
            vec!["Группа: АБ-12-34".to_string(), "без токенов".to_string()]
        );
    }

    #[test]
    fn token_free_document_is_untouched() {
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("обычный текст %UNKNOWN%")));
        let before = doc.body_text();
        doc.replace_text(&map(&[("%NUM%", "4")]));
        assert_eq!(doc.body_text(), before);
    }

    #[test]
    fn style_normalization_is_idempotent() {
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("текст")));
        let cfg = StyleConfig::default();
        doc.normalize_styles(&cfg);
        doc.normalize_styles(&cfg);
        let normals = doc
            .docx
            .styles
            .styles
            .iter()
            .filter(|s| s.style_id == "Normal")
            .count();
        assert_eq!(normals, 1);
        let headings = doc
            .docx
            .styles
            .styles
            .iter()
            .filter(|s| s.style_id == "Heading1" || s.style_id == "Heading2")
            .count();
        assert_eq!(headings, 2);
    }

    #[test]
    fn figure_block_appends_image_caption_and_spacer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let img = image::RgbaImage::new(4, 2);
        img.save(&path).unwrap();

        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("шапка")));
        let figure = Figure {
            asset: ImageAsset {
                path,
                sequence_index: 0,
            },
            caption: "Схема стенда.".into(),
            display_number: 1,
        };
        doc.push_figure(&figure, &CaptionConfig::default(), 2 * EMU_PER_INCH)
            .unwrap();

        let body = doc.body_text();
        assert_eq!(body.len(), 4);
        assert_eq!(body[1], "");
        assert_eq!(body[2], "Рисунок 1 — Схема стенда.");
        assert_eq!(body[3], "");
    }

    #[test]
    fn unreadable_image_is_reported_not_inserted() {
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("шапка")));
        let figure = Figure {
            asset: ImageAsset {
                path: PathBuf::from("missing.png"),
                sequence_index: 0,
            },
            caption: "Пусто.".into(),
            display_number: 1,
        };
        let before = doc.body_text().len();
        assert!(matches!(
            doc.push_figure(&figure, &CaptionConfig::default(), EMU_PER_INCH),
            Err(FigureError::Read(_))
        ));
        assert_eq!(doc.body_text().len(), before);
    }

    #[test]
    fn undecodable_image_is_reported_not_inserted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("шапка")));
        let figure = Figure {
            asset: ImageAsset {
                path,
                sequence_index: 0,
            },
            caption: "Пусто.".into(),
            display_number: 1,
        };
        assert!(matches!(
            doc.push_figure(&figure, &CaptionConfig::default(), EMU_PER_INCH),
            Err(FigureError::Decode(_))
        ));
    }

    #[test]
    fn page_break_and_heading_append_in_order() {
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("шапка")));
        doc.push_page_break();
        doc.push_heading("Выполнение работы", &StyleConfig::default());
        let body = doc.body_text();
        assert_eq!(body.last().unwrap(), "Выполнение работы");
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn saved_document_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.docx");
        let mut doc = roundtrip(|d| d.add_paragraph(paragraph("%NUM%")));
        doc.replace_text(&map(&[("%NUM%", "7")]));
        doc.save(&out).unwrap();

        let reloaded = ReportDocument::load(&out).unwrap();
        assert_eq!(reloaded.body_text(), vec!["7".to_string()]);
    }
}
