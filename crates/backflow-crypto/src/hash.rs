//! Cryptographic hash sink filter.

use backflow_io::{BoxedFilter, Filter, FilterValue, Input, Progress, SinkFilter};
use digest::DynDigest;

use crate::{HashType, Result};

/// Running digest over every byte fed to it.
///
/// The digest is finalized by the first call to [`CryptoHash::hash`] (or
/// [`Filter::result`]) and cached; later calls return the same bytes.
pub struct CryptoHash {
    hash_type: HashType,
    name:      String,
    context:   Option<Box<dyn DynDigest + Send>>,
    digest:    Option<Vec<u8>>,
    done:      bool,
}

impl CryptoHash {
    /// Create a hash of the named algorithm.
    ///
    /// Fails before anything is allocated if the name is not a known algorithm.
    pub fn new(algorithm: &str) -> Result<Self> { Ok(Self::with_type(HashType::from_name(algorithm)?)) }

    pub fn with_type(hash_type: HashType) -> Self {
        Self {
            hash_type,
            name: hash_type.as_str().to_string(),
            context: Some(hash_type.context()),
            digest: None,
            done: false,
        }
    }

    /// Key the filter's result under `name` instead of the algorithm name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn hash_type(&self) -> HashType { self.hash_type }

    pub fn is_finalized(&self) -> bool { self.digest.is_some() }

    /// Feed bytes into the running digest.
    ///
    /// # Panics
    ///
    /// Panics if the digest was already finalized or the context released.
    pub fn update(&mut self, data: &[u8]) {
        assert!(
            self.digest.is_none(),
            "hash '{}' updated after finalization",
            self.name
        );
        match self.context.as_mut() {
            Some(context) => context.update(data),
            None => panic!("hash '{}' updated after release", self.name),
        }
    }

    /// Finalize on first call and return the cached digest.
    ///
    /// # Panics
    ///
    /// Panics if the context was released before the digest was computed.
    pub fn hash(&mut self) -> &[u8] {
        let (name, context) = (&self.name, &mut self.context);
        self.digest.get_or_insert_with(|| match context.take() {
            Some(context) => context.finalize().into_vec(),
            None => panic!("hash '{name}' released before finalization"),
        })
    }

    /// Lowercase hex of the finalized digest.
    pub fn hex(&mut self) -> String { hex::encode(self.hash()) }
}

impl Filter for CryptoHash {
    fn name(&self) -> &str { &self.name }

    fn is_done(&self) -> bool { self.done || self.digest.is_some() }

    fn result(&mut self) -> Option<FilterValue> { Some(FilterValue::Bytes(self.hash().to_vec())) }

    fn release(&mut self) { self.context = None; }
}

impl SinkFilter for CryptoHash {
    fn process(&mut self, input: Input<'_>) -> backflow_io::Result<Progress> {
        match input {
            Input::Data(bytes) => {
                self.update(bytes);
                Ok(Progress::new(bytes.len(), 0))
            }
            Input::End => {
                self.done = true;
                Ok(Progress::default())
            }
        }
    }
}

impl From<CryptoHash> for BoxedFilter {
    fn from(hash: CryptoHash) -> Self { BoxedFilter::sink(hash) }
}

/// Digest `data` in one call.
pub fn hash_once(algorithm: &str, data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let mut hash = CryptoHash::new(algorithm)?;
    hash.update(data.as_ref());
    let digest = hash.hash().to_vec();
    hash.release();
    Ok(digest)
}
