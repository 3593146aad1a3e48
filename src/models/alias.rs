use std::collections::HashMap;

use serde::Serialize;

use crate::config::AliasVersion;

/// An alias split once into its version marker and the remaining body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub version: String,
    pub body: String,
}

impl Alias {
    /// Splits off the first two characters as the version; the body is the
    /// trimmed remainder. Strings shorter than two characters carry no
    /// version and yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.char_indices();
        chars.next()?;
        let (second, ch) = chars.next()?;
        let split = second + ch.len_utf8();

        Some(Self {
            version: raw[..split].to_string(),
            body: raw[split..].trim().to_string(),
        })
    }

    pub fn matches(&self, version: &AliasVersion) -> bool {
        self.version == version.as_str()
    }
}

/// Raw aliases returned for one course. Lives only while aliases resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAliasRecord {
    pub course_id: String,
    pub aliases: Vec<String>,
}

/// Both directions of the alias mapping.
///
/// `course_aliases` keeps every qualifying alias; `course_ids` keeps one alias
/// per course, the last one inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasIndex {
    pub course_aliases: HashMap<String, String>,
    pub course_ids: HashMap<String, String>,
}

impl AliasIndex {
    pub fn insert(&mut self, alias: &str, course_id: &str) {
        self.course_aliases
            .insert(alias.to_string(), course_id.to_string());
        self.course_ids
            .insert(course_id.to_string(), alias.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_version_and_trims_body() {
        let alias = Alias::parse("d: abc ").unwrap();
        assert_eq!(alias.version, "d:");
        assert_eq!(alias.body, "abc");
    }

    #[test]
    fn parse_handles_short_and_multibyte_input() {
        assert_eq!(Alias::parse(""), None);
        assert_eq!(Alias::parse("d"), None);

        let alias = Alias::parse("é:math").unwrap();
        assert_eq!(alias.version, "é:");
        assert_eq!(alias.body, "math");

        let bare = Alias::parse("d:").unwrap();
        assert_eq!(bare.body, "");
    }

    #[test]
    fn index_keeps_last_alias_per_course() {
        let mut index = AliasIndex::default();
        index.insert("abc", "c1");
        index.insert("def", "c1");

        assert_eq!(index.course_aliases.get("abc").map(String::as_str), Some("c1"));
        assert_eq!(index.course_aliases.get("def").map(String::as_str), Some("c1"));
        assert_eq!(index.course_ids.get("c1").map(String::as_str), Some("def"));
    }
}
