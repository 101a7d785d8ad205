//! Buffers, filters and the filter group that chains them.
//!
//! Bytes moving between a backup source and its repository pass through a
//! [`FilterGroup`] once. Each filter hashes, counts or rewrites the stream at
//! its own rate, and the group guarantees that every byte reaches every stage
//! exactly once and in order, whatever the chunk boundaries.
//!
//! # Architecture
//!
//! - `buffer.rs` - Fixed-capacity [`Buffer`]
//! - `filter.rs` - [`Filter`] contract, [`SinkFilter`] and [`TransformFilter`] shapes
//! - `group.rs` - [`FilterGroup`] pump, flush and result aggregation
//! - `size.rs` - Pass-through byte counter
//! - `write.rs` - [`std::io::Write`] adapter driving a group
//!
//! # Example
//!
//! ```
//! use backflow_io::{Buffer, FilterGroup, Input, SizeFilter};
//!
//! let mut group = FilterGroup::builder().transform(SizeFilter::new()).build().unwrap();
//! let mut output = Buffer::new(64);
//!
//! group.process(Input::Data(b"pg_control"), &mut output).unwrap();
//! while !group.is_done() {
//!     group.process(Input::End, &mut output).unwrap();
//! }
//!
//! assert_eq!(output.as_slice(), b"pg_control");
//! assert_eq!(group.result().get("size").unwrap().as_count(), Some(10));
//! ```

pub use self::buffer::Buffer;
pub use self::error::{Error, Result};
pub use self::filter::{
    BoxedFilter, Filter, FilterValue, Input, Progress, SinkFilter, TransformFilter,
};
pub use self::group::{DEFAULT_BUFFER_SIZE, FilterGroup, FilterGroupBuilder};
pub use self::result::FilterResults;
pub use self::size::SizeFilter;
pub use self::write::FilterWriter;

mod buffer;
mod error;
mod filter;
mod group;
mod result;
mod size;
mod write;
