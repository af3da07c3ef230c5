//! The reserved template tokens and their metadata-derived values.
//!
//! Tokens are flat `%`-delimited literals, replaced by exact substring
//! match. Tokens the template does not contain are simply unused, and
//! unknown tokens in the template are left untouched.

use indexmap::IndexMap;

use crate::metadata::ReportMetadata;

pub const DISCIPLINE: &str = "%DISCIPLINE%";
pub const NUMBER: &str = "%NUM%";
pub const TITLE: &str = "%TITLE%";
pub const SURNAME: &str = "%SURNAME%";
pub const FIRST_NAME: &str = "%NAME%";
pub const PATRONYMIC: &str = "%PATRONYMIC%";
pub const GROUP: &str = "%GROUP%";

pub type PlaceholderMap = IndexMap<String, String>;

/// The fixed token set, in substitution order. A missing patronymic maps
/// to the empty string so the token disappears from the document.
pub fn build(metadata: &ReportMetadata) -> PlaceholderMap {
    IndexMap::from([
        (DISCIPLINE.to_string(), metadata.discipline.clone()),
        (NUMBER.to_string(), metadata.number.clone()),
        (TITLE.to_string(), metadata.title.clone()),
        (SURNAME.to_string(), metadata.surname.clone()),
        (FIRST_NAME.to_string(), metadata.first_name.clone()),
        (
            PATRONYMIC.to_string(),
            metadata.patronymic.clone().unwrap_or_default(),
        ),
        (GROUP.to_string(), metadata.group.clone()),
    ])
}
