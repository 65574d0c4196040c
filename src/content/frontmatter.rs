//! Front-matter parsing
//!
//! A post file has three regions separated by `---`: an ignored preamble
//! (normally empty), a YAML block and the markdown body.

use serde::{Deserialize, Deserializer, Serialize};

use super::LoadError;
use crate::helpers::parse_display_date;

/// Separator between the regions of a post file
const SEPARATOR: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    /// Display date, e.g. "January 15, 2024"
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Split a post file into its YAML block and its (trimmed) body
    pub fn split(content: &str) -> Result<(&str, &str), LoadError> {
        let mut regions = content.splitn(3, SEPARATOR);
        let _preamble = regions.next();
        match (regions.next(), regions.next()) {
            (Some(yaml), Some(body)) => Ok((yaml, body.trim())),
            _ => Err(LoadError::MissingSeparators),
        }
    }

    /// Parse a YAML front-matter block
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        let fm: FrontMatter = serde_yaml::from_str(yaml)?;
        if parse_display_date(&fm.date).is_none() {
            return Err(LoadError::InvalidDate(fm.date));
        }
        Ok(fm)
    }

    /// Parse front-matter from a whole post file
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), LoadError> {
        let (yaml, body) = Self::split(content)?;
        Ok((Self::from_yaml(yaml)?, body))
    }
}
