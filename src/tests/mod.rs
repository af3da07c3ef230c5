use std::path::Path;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

use crate::assemble::{Assembly, assemble};
use crate::assets::{self, ImageAsset};
use crate::caption::{self, CaptionSource};
use crate::config::Config;
use crate::document::ReportDocument;
use crate::metadata::ReportMetadata;
use crate::template;

fn paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// Replays a fixed list of caption inputs, one per screenshot.
struct Scripted(std::vec::IntoIter<String>);

impl Scripted {
    fn new(inputs: &[&str]) -> Self {
        Self(
            inputs
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        )
    }
}

impl CaptionSource for Scripted {
    fn caption_for(&mut self, _: &ImageAsset, _: usize, _: usize) -> String {
        self.0.next().unwrap_or_default()
    }
}

fn write_template(path: &Path) {
    let table = Table::new(vec![TableRow::new(vec![
        TableCell::new().add_paragraph(paragraph("Группа %GROUP%")),
        TableCell::new().add_paragraph(paragraph("Дисциплина: %DISCIPLINE%")),
    ])]);
    let file = std::fs::File::create(path).unwrap();
    Docx::new()
        .add_paragraph(paragraph("ЛР №%NUM% — %TITLE%"))
        .add_paragraph(paragraph("Выполнил: %SURNAME% %NAME% %PATRONYMIC%"))
        .add_table(table)
        .build()
        .pack(file)
        .unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::new(width, height).save(path).unwrap();
}

fn metadata() -> ReportMetadata {
    ReportMetadata {
        surname: "Иванов".into(),
        first_name: "Пётр".into(),
        patronymic: Some("Петрович".into()),
        group: "АБ-12-34".into(),
        number: "4".into(),
        title: "Изучение планировщика".into(),
        discipline: "Операционные системы".into(),
    }
}

#[test]
fn assembles_a_report_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_template(&dir.path().join("shablon.docx"));
    write_png(&dir.path().join("b.png"), 8, 4);
    write_png(&dir.path().join("a.png"), 4, 4);
    write_png(&dir.path().join("c.png"), 4, 4);

    let config = Config::default();
    let assets = assets::discover(dir.path(), config.ordering).unwrap();
    let names: Vec<_> = assets
        .iter()
        .map(|a| a.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["a.png", "b.png", "c.png"]);

    let candidates = template::find_templates(dir.path()).unwrap();
    assert_eq!(candidates.len(), 1);

    // Second screenshot skipped, third captioned by default.
    let mut source = Scripted::new(&["схема стенда", "-", ""]);
    let figures = caption::collect(&assets, &mut source, &config.caption);
    assert_eq!(figures.len(), 2);

    let metadata = metadata();
    let output = assemble(Assembly {
        directory: dir.path(),
        template: &candidates[0],
        metadata: &metadata,
        figures: &figures,
        config: &config,
    })
    .unwrap();

    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "ИвановПП_ЛР4_АБ-12-34_ОС.docx"
    );

    let report = ReportDocument::load(&output).unwrap();
    let body = report.body_text();
    assert!(body.contains(&"ЛР №4 — Изучение планировщика".to_string()));
    assert!(body.contains(&"Выполнил: Иванов Пётр Петрович".to_string()));
    assert!(body.contains(&"Выполнение работы".to_string()));
    assert!(body.contains(&"Рисунок 1 — Схема стенда.".to_string()));
    // The skipped screenshot left no gap in the numbering.
    assert!(body.contains(&"Рисунок 2 — Рисунок 2.".to_string()));
    assert!(body.iter().all(|p| !p.contains('%')));

    let cells = report.table_text();
    assert!(cells.contains(&"Группа АБ-12-34".to_string()));
    assert!(cells.contains(&"Дисциплина: Операционные системы".to_string()));
}

#[test]
fn broken_screenshot_degrades_to_a_shorter_report() {
    let dir = tempfile::tempdir().unwrap();
    write_template(&dir.path().join("shablon.docx"));
    write_png(&dir.path().join("a.png"), 4, 4);
    std::fs::write(dir.path().join("b.png"), b"not an image").unwrap();

    let config = Config::default();
    let assets = assets::discover(dir.path(), config.ordering).unwrap();
    let mut source = Scripted::new(&["", ""]);
    let figures = caption::collect(&assets, &mut source, &config.caption);
    assert_eq!(figures.len(), 2);

    let metadata = metadata();
    let output = assemble(Assembly {
        directory: dir.path(),
        template: &candidates_for(dir.path())[0],
        metadata: &metadata,
        figures: &figures,
        config: &config,
    })
    .unwrap();

    let report = ReportDocument::load(&output).unwrap();
    let body = report.body_text();
    // The decodable screenshot made it in; the broken one was dropped
    // without aborting the run.
    assert!(body.contains(&"Рисунок 1 — Рисунок 1.".to_string()));
    assert!(!body.iter().any(|p| p == "Рисунок 2 — Рисунок 2."));
}

#[test]
fn closing_headings_land_behind_a_page_break() {
    let dir = tempfile::tempdir().unwrap();
    write_template(&dir.path().join("shablon.docx"));
    write_png(&dir.path().join("a.png"), 4, 4);

    let mut config = Config::default();
    config.closing_headings = vec!["Вывод".into()];

    let assets = assets::discover(dir.path(), config.ordering).unwrap();
    let mut source = Scripted::new(&[""]);
    let figures = caption::collect(&assets, &mut source, &config.caption);

    let metadata = metadata();
    let output = assemble(Assembly {
        directory: dir.path(),
        template: &candidates_for(dir.path())[0],
        metadata: &metadata,
        figures: &figures,
        config: &config,
    })
    .unwrap();

    let report = ReportDocument::load(&output).unwrap();
    let body = report.body_text();
    assert_eq!(body.last().unwrap(), "Вывод");
}

fn candidates_for(dir: &Path) -> Vec<std::path::PathBuf> {
    template::find_templates(dir).unwrap()
}
