use serde::Deserialize;

/// How discovered screenshots are ordered before numbering. A deployment
/// should pick one and keep it: figure numbers follow this order.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Ordering {
    /// Case-normalized lexicographic order of the file name.
    #[default]
    Filename,
    /// Filesystem creation time, falling back to modification time on
    /// filesystems that do not record birth time.
    CreationTime,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CaptionConfig {
    /// Caption line prefix: rendered as "{label} {number}{separator}{text}".
    pub label: String,
    pub separator: String,
    /// Input that excludes a screenshot from the report entirely.
    pub skip_marker: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            label: "Рисунок".into(),
            separator: " — ".into(),
            skip_marker: "-".into(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StyleConfig {
    pub font: String,
    pub size_pt: u32,
    pub line_spacing: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font: "Times New Roman".into(),
            size_pt: 14,
            line_spacing: 1.5,
        }
    }
}

/// A discipline the metadata prompt offers, with the short code used when
/// composing the output file name.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DisciplineEntry {
    pub name: String,
    pub short: String,
}

fn entry(name: &str, short: &str) -> DisciplineEntry {
    DisciplineEntry {
        name: name.into(),
        short: short.into(),
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub ordering: Ordering,
    pub caption: CaptionConfig,
    pub styles: StyleConfig,
    /// Display width of inserted screenshots, in inches.
    pub figure_width_in: f32,
    /// Headings inserted before the figure block, e.g. "Выполнение работы".
    pub opening_headings: Vec<String>,
    /// Headings inserted on a fresh page after the figure block.
    pub closing_headings: Vec<String>,
    pub disciplines: Vec<DisciplineEntry>,
    /// Report-type marker in the output file name, combined with the
    /// report number ("ЛР" + "4" -> "ЛР4").
    pub report_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ordering: Ordering::default(),
            caption: CaptionConfig::default(),
            styles: StyleConfig::default(),
            figure_width_in: 6.0,
            opening_headings: vec!["Выполнение работы".into()],
            closing_headings: Vec::new(),
            disciplines: vec![
                entry("Программирование", "Прог"),
                entry("Базы данных", "БД"),
                entry("Операционные системы", "ОС"),
                entry("Компьютерные сети", "КС"),
                entry("Информационная безопасность", "ИБ"),
                entry("Теория вероятностей", "ТВ"),
            ],
            report_marker: "ЛР".into(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.caption.label.trim().is_empty() {
            return Err("caption label must not be empty".into());
        }
        if self.caption.skip_marker.trim().is_empty() {
            return Err("skip marker must not be empty".into());
        }
        if !(self.figure_width_in > 0.0) {
            return Err("figure width must be positive".into());
        }
        if self.styles.size_pt == 0 {
            return Err("font size must be positive".into());
        }
        if !(self.styles.line_spacing > 0.0) {
            return Err("line spacing must be positive".into());
        }
        if self.disciplines.is_empty() {
            return Err("discipline list must not be empty".into());
        }
        Ok(())
    }
}
