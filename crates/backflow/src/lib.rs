//! Streaming filter pipelines for backup data movement.
//!
//! A backup moves each file from its source to the repository once. On the
//! way it is hashed, sized and compressed by a [`FilterGroup`] built from a
//! [`PipelineConfig`], so no intermediate copy is ever materialized.
//!
//! # Architecture
//!
//! - [`backflow_io`] - Buffers, the filter contract and the group driver
//! - [`backflow_crypto`] - Hash filter and one-shot digests
//! - [`backflow_compress`] - zlib filters
//! - `registry.rs` - Filter names resolved to constructors
//! - `config.rs` - Pipeline description
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use backflow::{FilterWriter, PipelineConfig};
//!
//! let group = PipelineConfig::from_filter_list("sha1,size").unwrap().build().unwrap();
//! let mut writer = FilterWriter::new(Vec::new(), group);
//! writer.write_all(b"12345").unwrap();
//!
//! let (copy, results) = writer.finish().unwrap();
//! assert_eq!(copy, b"12345");
//! assert_eq!(results.get("sha1").unwrap().to_string(), "8cb2237d0679ca88db6464eac60da96345513964");
//! assert_eq!(results.get("size").unwrap().as_count(), Some(5));
//! ```

pub use backflow_compress::{Compress, DEFAULT_LEVEL, Decompress};
pub use backflow_crypto::{CryptoHash, HashType, hash_once, hmac_once};
pub use backflow_io::{
    BoxedFilter, Buffer, DEFAULT_BUFFER_SIZE, Filter, FilterGroup, FilterGroupBuilder,
    FilterResults, FilterValue, FilterWriter, Input, Progress, SinkFilter, SizeFilter,
    TransformFilter,
};

pub use self::config::PipelineConfig;
pub use self::error::{Error, Result};
pub use self::registry::{FilterKind, FilterSpec};

mod config;
mod error;
mod registry;
