//! The filter contract shared by every stage of a [`FilterGroup`](crate::FilterGroup).
//!
//! A filter is either a [`SinkFilter`], which observes every byte handed to it
//! and produces nothing, or a [`TransformFilter`], which writes output into a
//! destination buffer at its own rate. Pass-through observers such as the size
//! counter are transforms that copy their input unchanged.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{Buffer, Result};

/// Input handed to a filter on each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// More stream bytes. May be empty.
    Data(&'a [u8]),
    /// No more input will ever arrive; flush whatever is buffered.
    End,
}

impl Input<'_> {
    pub fn is_end(&self) -> bool { matches!(self, Input::End) }
}

/// Bytes consumed from the input and written to the output by one call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub consumed: usize,
    pub produced: usize,
}

impl Progress {
    pub fn new(consumed: usize, produced: usize) -> Self { Self { consumed, produced } }

    pub fn is_stalled(&self) -> bool { self.consumed == 0 && self.produced == 0 }
}

/// Terminal value exposed by a filter once it is done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// Digest or other opaque byte result.
    Bytes(Vec<u8>),
    /// Byte count or other tally.
    Count(u64),
}

impl FilterValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FilterValue::Bytes(bytes) => Some(bytes),
            FilterValue::Count(_) => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            FilterValue::Count(n) => Some(*n),
            FilterValue::Bytes(_) => None,
        }
    }

    /// Lowercase hex of a byte result, as written to backup manifests.
    pub fn to_hex(&self) -> Option<String> { self.as_bytes().map(hex::encode) }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bytes(bytes) => f.write_str(&hex::encode(bytes)),
            FilterValue::Count(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FilterValue::Bytes(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            FilterValue::Count(n) => serializer.serialize_u64(*n),
        }
    }
}

/// State and lifecycle common to every filter shape.
pub trait Filter: Send {
    /// Name the filter's result is keyed by.
    fn name(&self) -> &str;

    /// True once the filter will produce no further output for any call.
    fn is_done(&self) -> bool;

    /// Terminal value, for filters that have one.
    ///
    /// Only called after [`Filter::is_done`] reports true. Filters that
    /// finalize lazily do so on the first call and return the cached value
    /// afterwards.
    fn result(&mut self) -> Option<FilterValue> { None }

    /// Free any algorithm context. Must be safe to call repeatedly and on a
    /// filter that never saw input.
    fn release(&mut self) {}
}

/// Filter that consumes everything it is given and emits nothing.
pub trait SinkFilter: Filter {
    /// Observe `input`. Must consume all of [`Input::Data`].
    fn process(&mut self, input: Input<'_>) -> Result<Progress>;
}

/// Filter that writes output into a destination buffer.
pub trait TransformFilter: Filter {
    /// Consume a prefix of `input` and append output to `output`.
    ///
    /// Given non-empty data (or [`Input::End`] before done) and an output
    /// buffer with free space, the call must consume or produce at least one
    /// byte. It may consume less than all of `input` when `output` fills up.
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress>;
}

/// A filter of either shape, as stored by a group.
pub enum BoxedFilter {
    Sink(Box<dyn SinkFilter>),
    Transform(Box<dyn TransformFilter>),
}

impl BoxedFilter {
    pub fn sink(filter: impl SinkFilter + 'static) -> Self { Self::Sink(Box::new(filter)) }

    pub fn transform(filter: impl TransformFilter + 'static) -> Self {
        Self::Transform(Box::new(filter))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Sink(f) => f.name(),
            Self::Transform(f) => f.name(),
        }
    }

    pub fn is_done(&self) -> bool {
        match self {
            Self::Sink(f) => f.is_done(),
            Self::Transform(f) => f.is_done(),
        }
    }

    pub fn result(&mut self) -> Option<FilterValue> {
        match self {
            Self::Sink(f) => f.result(),
            Self::Transform(f) => f.result(),
        }
    }

    pub fn release(&mut self) {
        match self {
            Self::Sink(f) => f.release(),
            Self::Transform(f) => f.release(),
        }
    }
}

impl fmt::Debug for BoxedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Sink(_) => "Sink",
            Self::Transform(_) => "Transform",
        };
        f.debug_struct(shape)
            .field("name", &self.name())
            .field("done", &self.is_done())
            .finish()
    }
}
