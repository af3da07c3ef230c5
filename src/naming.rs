use crate::config::DisciplineEntry;
use crate::metadata::ReportMetadata;

/// Characters that never survive into a file name.
const INVALID: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Upper bound on the sanitized base name, before the extension.
const MAX_BASE_LEN: usize = 50;

const EXTENSION: &str = ".docx";

fn discipline_code<'a>(metadata: &'a ReportMetadata, table: &'a [DisciplineEntry]) -> &'a str {
    table
        .iter()
        .find(|entry| entry.name == metadata.discipline)
        .map(|entry| entry.short.as_str())
        .unwrap_or(&metadata.discipline)
}

/// Compose the output file name: surname, initials, report marker and
/// number, group code, discipline code. Reserved characters are stripped
/// first, then the base name is truncated to its length bound, then the
/// extension is appended.
pub fn output_file_name(
    metadata: &ReportMetadata,
    table: &[DisciplineEntry],
    marker: &str,
) -> String {
    let base = format!(
        "{}{}_{}{}_{}_{}",
        metadata.surname,
        metadata.initials(),
        marker,
        metadata.number,
        metadata.group,
        discipline_code(metadata, table),
    );
    let mut bounded: String = base
        .chars()
        .filter(|c| !INVALID.contains(c))
        .take(MAX_BASE_LEN)
        .collect();
    bounded.push_str(EXTENSION);
    bounded
}
