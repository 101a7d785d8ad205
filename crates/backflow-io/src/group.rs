//! Filter group: drives a byte stream through an ordered chain of filters.
//!
//! Every transform stage owns a scratch buffer holding output that the rest
//! of the chain has not accepted yet. A pump cycle drains that buffer before
//! the filter is offered more input, so a stall anywhere downstream stops
//! consumption upstream instead of dropping or reordering bytes. Sink stages
//! observe exactly the bytes the downstream part of the chain accepted.

use tracing::{debug, trace};

use crate::filter::{SinkFilter, TransformFilter};
use crate::{BoxedFilter, Buffer, Error, FilterResults, Input, Progress, Result};

/// Scratch buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Output of a transform stage waiting to be accepted downstream.
struct Pending {
    buffer: Buffer,
    read:   usize,
}

impl Pending {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Buffer::new(capacity),
            read:   0,
        }
    }

    fn unread(&self) -> &[u8] { &self.buffer.as_slice()[self.read..] }

    fn is_drained(&self) -> bool { self.read == self.buffer.len() }

    fn consume(&mut self, n: usize) {
        self.read += n;
        if self.is_drained() {
            self.buffer.clear();
            self.read = 0;
        }
    }
}

enum Stage {
    Sink(Box<dyn SinkFilter>),
    Transform {
        filter:  Box<dyn TransformFilter>,
        pending: Pending,
    },
}

impl Stage {
    fn new(filter: BoxedFilter, buffer_size: usize) -> Self {
        match filter {
            BoxedFilter::Sink(filter) => Stage::Sink(filter),
            BoxedFilter::Transform(filter) => Stage::Transform {
                filter,
                pending: Pending::new(buffer_size),
            },
        }
    }

    fn name(&self) -> &str {
        match self {
            Stage::Sink(filter) => filter.name(),
            Stage::Transform { filter, .. } => filter.name(),
        }
    }

    fn is_done(&self) -> bool {
        match self {
            Stage::Sink(filter) => filter.is_done(),
            Stage::Transform { filter, pending } => filter.is_done() && pending.is_drained(),
        }
    }

    fn result(&mut self) -> Option<crate::FilterValue> {
        match self {
            Stage::Sink(filter) => filter.result(),
            Stage::Transform { filter, .. } => filter.result(),
        }
    }

    fn release(&mut self) {
        match self {
            Stage::Sink(filter) => filter.release(),
            Stage::Transform { filter, .. } => filter.release(),
        }
    }
}

/// Push `input` into the first of `stages`, returning how much of it was accepted.
fn feed(stages: &mut [Stage], input: Input<'_>, output: &mut Buffer) -> Result<usize> {
    let Some((stage, rest)) = stages.split_first_mut() else {
        return Ok(match input {
            Input::Data(bytes) => output.append_partial(bytes),
            Input::End => 0,
        });
    };

    match stage {
        Stage::Sink(filter) => feed_sink(filter.as_mut(), rest, input, output),
        Stage::Transform { filter, pending } => {
            feed_transform(filter.as_mut(), pending, rest, input, output)
        }
    }
}

fn feed_sink(
    filter: &mut dyn SinkFilter,
    rest: &mut [Stage],
    input: Input<'_>,
    output: &mut Buffer,
) -> Result<usize> {
    match input {
        Input::Data(bytes) => {
            let accepted = feed(rest, input, output)?;
            if accepted > 0 {
                let progress = filter.process(Input::Data(&bytes[..accepted]))?;
                assert_eq!(
                    progress.consumed,
                    accepted,
                    "sink filter '{}' did not consume all of its input",
                    filter.name()
                );
            }
            Ok(accepted)
        }
        Input::End => {
            feed(rest, Input::End, output)?;
            if !filter.is_done() {
                filter.process(Input::End)?;
            }
            Ok(0)
        }
    }
}

fn feed_transform(
    filter: &mut dyn TransformFilter,
    pending: &mut Pending,
    rest: &mut [Stage],
    input: Input<'_>,
    output: &mut Buffer,
) -> Result<usize> {
    let mut consumed = 0;

    loop {
        if !pending.is_drained() {
            let accepted = feed(rest, Input::Data(pending.unread()), output)?;
            pending.consume(accepted);
            if !pending.is_drained() {
                return Ok(consumed);
            }
        }

        let progress = match input {
            Input::Data(bytes) => {
                if consumed == bytes.len() {
                    return Ok(consumed);
                }
                filter.process(Input::Data(&bytes[consumed..]), &mut pending.buffer)?
            }
            Input::End => {
                if filter.is_done() {
                    feed(rest, Input::End, output)?;
                    return Ok(0);
                }
                filter.process(Input::End, &mut pending.buffer)?
            }
        };

        assert!(
            !progress.is_stalled() || (input.is_end() && filter.is_done()),
            "filter '{}' made no progress",
            filter.name()
        );
        consumed += progress.consumed;
    }
}

/// Ordered chain of filters driven as one unit.
///
/// The group is fed by repeated [`FilterGroup::process`] calls with
/// [`Input::Data`], then with [`Input::End`] until [`FilterGroup::is_done`].
/// Each call writes whatever it can into the caller's destination buffer and
/// reports how much of the source it accepted; the caller resubmits the rest.
pub struct FilterGroup {
    stages:      Vec<Stage>,
    buffer_size: usize,
    ended:       bool,
    released:    bool,
    results:     Option<FilterResults>,
}

impl FilterGroup {
    pub fn new(filters: Vec<BoxedFilter>) -> Result<Self> {
        Self::with_buffer_size(filters, DEFAULT_BUFFER_SIZE)
    }

    /// Build a group whose transform stages get `buffer_size` bytes of scratch each.
    pub fn with_buffer_size(filters: Vec<BoxedFilter>, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(Error::ZeroBufferSize);
        }

        for (i, filter) in filters.iter().enumerate() {
            if filters[..i].iter().any(|f| f.name() == filter.name()) {
                return Err(Error::DuplicateName(filter.name().to_string()));
            }
        }

        let stages: Vec<Stage> = filters
            .into_iter()
            .map(|filter| Stage::new(filter, buffer_size))
            .collect();

        debug!(
            filters = ?stages.iter().map(Stage::name).collect::<Vec<_>>(),
            buffer_size,
            "filter group created"
        );

        Ok(Self {
            stages,
            buffer_size,
            ended: false,
            released: false,
            results: None,
        })
    }

    pub fn builder() -> FilterGroupBuilder { FilterGroupBuilder::new() }

    pub fn buffer_size(&self) -> usize { self.buffer_size }

    pub fn len(&self) -> usize { self.stages.len() }

    pub fn is_empty(&self) -> bool { self.stages.is_empty() }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> { self.stages.iter().map(Stage::name) }

    /// Run one pump cycle.
    ///
    /// # Panics
    ///
    /// Panics if data is submitted after [`Input::End`], if the group was
    /// released, or if a filter breaks its progress contract.
    pub fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress> {
        assert!(!self.released, "filter group used after release");

        let before = output.len();
        let consumed = match input {
            Input::Data(_) => {
                assert!(!self.ended, "data submitted after end of stream");
                feed(&mut self.stages, input, output)?
            }
            Input::End => {
                let first = !self.ended;
                self.ended = true;
                if first {
                    debug!("end of stream signalled");
                }
                if self.stages.iter().all(Stage::is_done) {
                    0
                } else {
                    feed(&mut self.stages, input, output)?
                }
            }
        };

        let progress = Progress::new(consumed, output.len() - before);
        trace!(
            consumed = progress.consumed,
            produced = progress.produced,
            end = input.is_end(),
            "pump cycle"
        );
        Ok(progress)
    }

    /// True once end of stream was signalled and every stage has flushed.
    pub fn is_done(&self) -> bool { self.ended && self.stages.iter().all(Stage::is_done) }

    /// Terminal values of every filter that exposes one, in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if the group is not done.
    pub fn result(&mut self) -> &FilterResults {
        assert!(
            self.is_done(),
            "filter group result requested before the group is done"
        );

        let stages = &mut self.stages;
        self.results.get_or_insert_with(|| {
            let mut results = FilterResults::default();
            for stage in stages.iter_mut() {
                if let Some(value) = stage.result() {
                    results.push(stage.name(), value);
                }
            }
            debug!(results = results.len(), "filter group results collected");
            results
        })
    }

    /// Release every filter once, in declaration order.
    ///
    /// Results of a finished group are captured first so they stay readable.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        if self.is_done() {
            self.result();
        }
        for stage in &mut self.stages {
            stage.release();
        }
        self.released = true;
        debug!(done = self.is_done(), "filter group released");
    }
}

impl Drop for FilterGroup {
    fn drop(&mut self) { self.release(); }
}

/// Builder collecting filters in pipeline order.
pub struct FilterGroupBuilder {
    filters:     Vec<BoxedFilter>,
    buffer_size: usize,
}

impl Default for FilterGroupBuilder {
    fn default() -> Self { Self::new() }
}

impl FilterGroupBuilder {
    pub fn new() -> Self {
        Self {
            filters:     vec![],
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn filter(mut self, filter: impl Into<BoxedFilter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn sink<F: SinkFilter + 'static>(self, filter: F) -> Self { self.filter(BoxedFilter::sink(filter)) }

    pub fn transform<F: TransformFilter + 'static>(self, filter: F) -> Self {
        self.filter(BoxedFilter::transform(filter))
    }

    pub fn build(self) -> Result<FilterGroup> { FilterGroup::with_buffer_size(self.filters, self.buffer_size) }
}
