use std::fmt;
use std::str::FromStr;

use digest::{Digest, DynDigest};

use crate::{Error, Result};

/// Closed set of digest algorithms a hash filter can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashType {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashType {
    pub const ALL: [HashType; 4] = [HashType::Md5, HashType::Sha1, HashType::Sha256, HashType::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Md5 => "md5",
            HashType::Sha1 => "sha1",
            HashType::Sha256 => "sha256",
            HashType::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            HashType::Md5 => 16,
            HashType::Sha1 => 20,
            HashType::Sha256 => 32,
            HashType::Sha512 => 64,
        }
    }

    /// Resolve an algorithm by name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    pub(crate) fn context(&self) -> Box<dyn DynDigest + Send> {
        match self {
            HashType::Md5 => Box::new(md5::Md5::new()),
            HashType::Sha1 => Box::new(sha1::Sha1::new()),
            HashType::Sha256 => Box::new(sha2::Sha256::new()),
            HashType::Sha512 => Box::new(sha2::Sha512::new()),
        }
    }
}

impl FromStr for HashType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { Self::from_name(s) }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(HashType::from_name("SHA256").unwrap(), HashType::Sha256);
        assert_eq!("md5".parse::<HashType>().unwrap(), HashType::Md5);
    }

    #[test]
    fn context_output_matches_digest_len() {
        for hash_type in HashType::ALL {
            assert_eq!(hash_type.context().output_size(), hash_type.digest_len());
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = HashType::from_name("BOGUS").unwrap_err();
        assert_eq!(err.to_string(), "unable to load hash 'BOGUS'");
    }
}
