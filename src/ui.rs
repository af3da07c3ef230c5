//! The interactive boundary: blocking, human-paced prompts over the
//! terminal. Validation itself lives in the pure modules; this layer only
//! prints, reads, and retries until a validator accepts.

use std::io;
use std::path::{Path, PathBuf};

use console::Term;
use tracing::debug;

use crate::assets::ImageAsset;
use crate::caption::CaptionSource;
use crate::config::{CaptionConfig, Config};
use crate::metadata::{
    self, DisciplineChoice, FieldError, ReportMetadata, validate_group, validate_name,
    validate_number, validate_patronymic, validate_title,
};
use crate::template;

pub struct Console {
    term: Term,
    preview: bool,
}

impl Console {
    pub fn new(preview: bool) -> Self {
        Self {
            term: Term::stderr(),
            preview,
        }
    }

    fn prompt(&self, label: &str) -> io::Result<String> {
        self.term.write_str(&format!("{label}: "))?;
        self.term.read_line()
    }

    /// Ask until the validator accepts. There is no retry bound: the run
    /// waits for the human for as long as it takes.
    fn prompt_validated<T>(
        &self,
        label: &str,
        validate: impl Fn(&str) -> Result<T, FieldError>,
    ) -> io::Result<T> {
        loop {
            let raw = self.prompt(label)?;
            match validate(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => self.term.write_line(&format!("❌ {e}"))?,
            }
        }
    }

    fn prompt_discipline(&self, config: &Config) -> io::Result<String> {
        self.term.write_line("\n📚 Дисциплина:")?;
        for (index, entry) in config.disciplines.iter().enumerate() {
            self.term
                .write_line(&format!("  {}. {}", index + 1, entry.name))?;
        }
        self.term.write_line(&format!(
            "  {}. другая (ввести вручную)",
            config.disciplines.len() + 1
        ))?;

        let choice = self.prompt_validated("Номер дисциплины", |raw| {
            metadata::select_discipline(raw, config.disciplines.len())
        })?;
        match choice {
            DisciplineChoice::Listed(index) => Ok(config.disciplines[index].name.clone()),
            DisciplineChoice::Other => self.prompt_validated("Название дисциплины", validate_title),
        }
    }

    /// Collect the full report record, field by field. Every rejection
    /// reprompts just that field; accepted fields are kept.
    pub fn collect_metadata(&self, config: &Config) -> io::Result<ReportMetadata> {
        self.term.write_line("\n📋 Данные отчёта")?;
        let surname = self.prompt_validated("Фамилия", validate_name)?;
        let first_name = self.prompt_validated("Имя", validate_name)?;
        let patronymic =
            self.prompt_validated("Отчество (Enter — пропустить)", validate_patronymic)?;
        let group = self.prompt_validated("Группа (например АБ-12-34)", validate_group)?;
        let number = self.prompt_validated("Номер работы", validate_number)?;
        let title = self.prompt_validated("Тема работы", validate_title)?;
        let discipline = self.prompt_discipline(config)?;

        Ok(ReportMetadata {
            surname,
            first_name,
            patronymic,
            group,
            number,
            title,
            discipline,
        })
    }

    /// A single candidate is taken as-is; several become an enumerated
    /// menu with strict 1-based selection.
    pub fn choose_template(&self, candidates: &[PathBuf]) -> io::Result<PathBuf> {
        if let [only] = candidates {
            self.term
                .write_line(&format!("📄 Шаблон: {}", only.display()))?;
            return Ok(only.clone());
        }

        self.term.write_line("\n📄 Найдено несколько шаблонов:")?;
        for (index, path) in candidates.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.term.write_line(&format!("  {}. {name}", index + 1))?;
        }
        loop {
            let raw = self.prompt("Номер шаблона")?;
            match template::select(candidates, &raw) {
                Ok(path) => return Ok(path.to_path_buf()),
                Err(e) => self.term.write_line(&format!("❌ {e}"))?,
            }
        }
    }

    pub fn captions(&self, caption: &CaptionConfig) -> ConsoleCaptions<'_> {
        ConsoleCaptions {
            console: self,
            caption: caption.clone(),
        }
    }
}

/// Caption input straight from the terminal, one prompt per screenshot,
/// with a best-effort viewer launch so the user sees what they are
/// captioning.
pub struct ConsoleCaptions<'a> {
    console: &'a Console,
    caption: CaptionConfig,
}

impl CaptionSource for ConsoleCaptions<'_> {
    fn caption_for(&mut self, asset: &ImageAsset, position: usize, total: usize) -> String {
        let term = &self.console.term;
        if self.console.preview {
            spawn_viewer(&asset.path);
        }
        let name = asset
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| asset.path.display().to_string());
        let _ = term.write_line(&format!("\n🖼  Изображение {position}/{total}: {name}"));
        let _ = term.write_line(&format!(
            "   Enter — подпись по умолчанию, \"{}\" — исключить",
            self.caption.skip_marker
        ));
        self.console.prompt("Подпись").unwrap_or_default()
    }
}

/// Fire-and-forget: the viewer is never waited on, the run only waits for
/// the caption the human types afterwards.
fn spawn_viewer(path: &Path) {
    let launcher = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    };
    if let Err(e) = std::process::Command::new(launcher).arg(path).spawn() {
        debug!(%e, path = %path.display(), "viewer launch failed");
    }
}
