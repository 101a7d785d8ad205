//! Cryptographic hash filter and one-shot digest helpers.
//!
//! [`CryptoHash`] is a sink filter: placed anywhere in a
//! [`FilterGroup`](backflow_io::FilterGroup) it observes the stream at that
//! point and exposes the digest as its result. Algorithms are resolved by
//! name from a closed set at construction time.
//!
//! # Example
//!
//! ```
//! use backflow_crypto::{CryptoHash, hash_once};
//!
//! let mut hash = CryptoHash::new("sha1").unwrap();
//! hash.update(b"123");
//! hash.update(b"45");
//!
//! assert_eq!(hash.hash(), hash_once("sha1", "12345").unwrap());
//! ```

pub use self::error::{Error, Result};
pub use self::hash::{CryptoHash, hash_once};
pub use self::hash_type::HashType;
pub use self::mac::hmac_once;

mod error;
mod hash;
mod hash_type;
mod mac;
