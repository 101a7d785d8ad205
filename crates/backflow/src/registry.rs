//! Filter registry: names resolved to filter kinds at pipeline-build time.

use std::fmt;
use std::str::FromStr;

use backflow_compress::{Compress, DEFAULT_LEVEL, Decompress};
use backflow_crypto::{CryptoHash, HashType};
use backflow_io::{BoxedFilter, SizeFilter};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Every filter a pipeline can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterKind {
    Hash(HashType),
    Size,
    Compress,
    Decompress,
}

static REGISTRY: &[(&str, FilterKind)] = &[
    ("md5", FilterKind::Hash(HashType::Md5)),
    ("sha1", FilterKind::Hash(HashType::Sha1)),
    ("sha256", FilterKind::Hash(HashType::Sha256)),
    ("sha512", FilterKind::Hash(HashType::Sha512)),
    ("size", FilterKind::Size),
    ("compress", FilterKind::Compress),
    ("decompress", FilterKind::Decompress),
];

impl FilterKind {
    pub fn from_name(name: &str) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Hash(hash_type) => hash_type.as_str(),
            FilterKind::Size => SizeFilter::NAME,
            FilterKind::Compress => Compress::NAME,
            FilterKind::Decompress => Decompress::NAME,
        }
    }

    /// Registered filter names, in registry order.
    pub fn names() -> impl Iterator<Item = &'static str> { REGISTRY.iter().map(|(key, _)| *key) }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::from_name(s) }
}

impl TryFrom<String> for FilterKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> { Self::from_name(&s) }
}

impl From<FilterKind> for String {
    fn from(kind: FilterKind) -> Self { kind.name().to_string() }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Description of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(rename = "type")]
    pub kind:  FilterKind,
    /// Result key, when two filters of one kind share a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Compression level, for `compress` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl FilterSpec {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            label: None,
            level: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Parse the short form `name[:argument]`, e.g. `sha1` or `compress:3`.
    pub fn parse(s: &str) -> Result<Self> {
        let (name, argument) = match s.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (s.trim(), None),
        };

        let mut spec = Self::new(FilterKind::from_name(name)?);
        if let Some(argument) = argument {
            match (spec.kind, argument.parse::<u32>()) {
                (FilterKind::Compress, Ok(level)) => spec.level = Some(level),
                _ => {
                    return Err(Error::InvalidArgument {
                        filter:   name.to_string(),
                        argument: argument.to_string(),
                    });
                }
            }
        }
        Ok(spec)
    }

    /// Construct the filter this spec describes.
    pub fn build(&self) -> Result<BoxedFilter> {
        if let (Some(level), false) = (self.level, self.kind == FilterKind::Compress) {
            return Err(Error::InvalidArgument {
                filter:   self.kind.name().to_string(),
                argument: level.to_string(),
            });
        }

        let label = self.label.as_deref().unwrap_or(self.kind.name());
        let filter: BoxedFilter = match self.kind {
            FilterKind::Hash(hash_type) => CryptoHash::with_type(hash_type).named(label).into(),
            FilterKind::Size => SizeFilter::named(label).into(),
            FilterKind::Compress => Compress::new(self.level.unwrap_or(DEFAULT_LEVEL))?
                .named(label)
                .into(),
            FilterKind::Decompress => Decompress::new().named(label).into(),
        };
        Ok(filter)
    }
}

impl FromStr for FilterSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_round_trips() {
        for name in FilterKind::names() {
            assert_eq!(FilterKind::from_name(name).unwrap().name(), name);
        }
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let err = FilterKind::from_name("BOGUS").unwrap_err();
        assert_eq!(err.to_string(), "unknown filter 'BOGUS'");
    }

    #[test]
    fn parse_short_form() {
        assert_eq!(
            FilterSpec::parse("SHA256").unwrap(),
            FilterSpec::new(FilterKind::Hash(HashType::Sha256))
        );

        let spec = FilterSpec::parse("compress:3").unwrap();
        assert_eq!(spec.kind, FilterKind::Compress);
        assert_eq!(spec.level, Some(3));
    }

    #[test]
    fn arguments_only_for_compress() {
        assert!(matches!(
            FilterSpec::parse("size:3"),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            FilterSpec::parse("compress:fast"),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn build_applies_label_and_level() {
        let filter = FilterSpec::new(FilterKind::Size).label("repo-size").build().unwrap();
        assert_eq!(filter.name(), "repo-size");

        let err = FilterSpec::parse("compress:12").unwrap().build().err().unwrap();
        assert!(matches!(
            err,
            Error::Compress(backflow_compress::Error::InvalidLevel(12))
        ));
    }
}
