use std::sync::LazyLock;

use regex::Regex;

use crate::text::{capitalize_first, capitalize_name};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}-]+$").expect("name pattern"));
static GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}]{2}-[0-9]{2}-[0-9]{2}$").expect("group pattern"));

/// Why a field value was rejected. The prompt layer prints the message and
/// asks again; nothing here terminates the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("value must not be empty")]
    Empty,
    #[error("only letters and hyphens are allowed")]
    BadNameAlphabet,
    #[error("expected a group code like АБ-12-34")]
    BadGroupFormat,
    #[error("expected digits only")]
    BadNumber,
    #[error("enter a number between 1 and {max}")]
    BadChoice { max: usize },
}

/// The validated report record. Built by the prompt layer exclusively from
/// validator outputs and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub surname: String,
    pub first_name: String,
    pub patronymic: Option<String>,
    pub group: String,
    pub number: String,
    pub title: String,
    pub discipline: String,
}

impl ReportMetadata {
    /// Initials for the output file name: first-name initial plus the
    /// patronymic initial when present, no separators.
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for part in [Some(&self.first_name), self.patronymic.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Some(first) = part.chars().next() {
                initials.extend(first.to_uppercase());
            }
        }
        initials
    }
}

pub fn validate_name(input: &str) -> Result<String, FieldError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FieldError::Empty);
    }
    if !NAME_RE.is_match(input) {
        return Err(FieldError::BadNameAlphabet);
    }
    Ok(capitalize_name(input))
}

/// Empty input means "no patronymic"; anything else follows the name rule.
pub fn validate_patronymic(input: &str) -> Result<Option<String>, FieldError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    validate_name(input).map(Some)
}

pub fn validate_group(input: &str) -> Result<String, FieldError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FieldError::Empty);
    }
    if !GROUP_RE.is_match(input) {
        return Err(FieldError::BadGroupFormat);
    }
    Ok(input.chars().flat_map(char::to_uppercase).collect())
}

pub fn validate_number(input: &str) -> Result<String, FieldError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FieldError::Empty);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::BadNumber);
    }
    Ok(input.to_string())
}

pub fn validate_title(input: &str) -> Result<String, FieldError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FieldError::Empty);
    }
    Ok(capitalize_first(input))
}

/// What the user picked from the discipline menu: one of the listed
/// entries, or the trailing "other" item that asks for free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisciplineChoice {
    Listed(usize),
    Other,
}

/// Resolve a 1-based menu selection over `count` listed disciplines plus
/// the "other" item. Non-numeric and out-of-range input is rejected, never
/// defaulted.
pub fn select_discipline(raw: &str, count: usize) -> Result<DisciplineChoice, FieldError> {
    let max = count + 1;
    let choice: usize = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::BadChoice { max })?;
    match choice {
        n if (1..=count).contains(&n) => Ok(DisciplineChoice::Listed(n - 1)),
        n if n == max => Ok(DisciplineChoice::Other),
        _ => Err(FieldError::BadChoice { max }),
    }
}
