//! zlib compression filters.
//!
//! Both filters are transforms with unbounded expansion or shrink ratios,
//! which is what the group's backpressure handling exists for: a decompressor
//! may fill many destination buffers from one input byte, and a compressor
//! may swallow a whole segment before producing its first byte.

pub use self::compress::{Compress, DEFAULT_LEVEL};
pub use self::decompress::Decompress;
pub use self::error::{Error, Result};

mod compress;
mod decompress;
mod error;
