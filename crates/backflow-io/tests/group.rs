use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backflow_io::{
    Buffer, Filter, FilterGroup, FilterValue, Input, Progress, Result, SinkFilter, SizeFilter,
    TransformFilter,
};
use proptest::prelude::*;

/// Sink recording every byte it observes.
struct Capture {
    name:     String,
    bytes:    Vec<u8>,
    done:     bool,
    releases: Arc<AtomicUsize>,
}

impl Capture {
    fn named(name: &str) -> Self {
        Self {
            name:     name.to_string(),
            bytes:    vec![],
            done:     false,
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Filter for Capture {
    fn name(&self) -> &str { &self.name }

    fn is_done(&self) -> bool { self.done }

    fn result(&mut self) -> Option<FilterValue> { Some(FilterValue::Bytes(self.bytes.clone())) }

    fn release(&mut self) { self.releases.fetch_add(1, Ordering::SeqCst); }
}

impl SinkFilter for Capture {
    fn process(&mut self, input: Input<'_>) -> Result<Progress> {
        assert!(!self.done, "capture fed after end of stream");
        match input {
            Input::Data(bytes) => {
                self.bytes.extend_from_slice(bytes);
                Ok(Progress::new(bytes.len(), 0))
            }
            Input::End => {
                self.done = true;
                Ok(Progress::default())
            }
        }
    }
}

/// Emits every input byte twice, carrying half a pair across calls.
#[derive(Default)]
struct Doubler {
    carry: Option<u8>,
    done:  bool,
}

impl Filter for Doubler {
    fn name(&self) -> &str { "double" }

    fn is_done(&self) -> bool { self.done }
}

impl TransformFilter for Doubler {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress> {
        let mut produced = 0;
        if let Some(byte) = self.carry {
            if output.append_partial(&[byte]) == 1 {
                self.carry = None;
                produced += 1;
            }
        }

        let mut consumed = 0;
        match input {
            Input::Data(bytes) => {
                while self.carry.is_none() && consumed < bytes.len() && output.remaining() > 0 {
                    let byte = bytes[consumed];
                    consumed += 1;
                    produced += output.append_partial(&[byte]);
                    if output.append_partial(&[byte]) == 1 {
                        produced += 1;
                    } else {
                        self.carry = Some(byte);
                    }
                }
            }
            Input::End => self.done = self.carry.is_none(),
        }
        Ok(Progress::new(consumed, produced))
    }
}

/// Keeps every other byte of the stream.
#[derive(Default)]
struct Halver {
    index: u64,
    done:  bool,
}

impl Filter for Halver {
    fn name(&self) -> &str { "halve" }

    fn is_done(&self) -> bool { self.done }
}

impl TransformFilter for Halver {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress> {
        let Input::Data(bytes) = input else {
            self.done = true;
            return Ok(Progress::default());
        };

        let (mut consumed, mut produced) = (0, 0);
        while consumed < bytes.len() {
            if self.index % 2 == 0 {
                if output.append_partial(&bytes[consumed..consumed + 1]) == 0 {
                    break;
                }
                produced += 1;
            }
            consumed += 1;
            self.index += 1;
        }
        Ok(Progress::new(consumed, produced))
    }
}

/// Holds the whole stream back until end of stream, then drains it.
#[derive(Default)]
struct Hold {
    stored:  Vec<u8>,
    emitted: usize,
    done:    bool,
}

impl Filter for Hold {
    fn name(&self) -> &str { "hold" }

    fn is_done(&self) -> bool { self.done }
}

impl TransformFilter for Hold {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress> {
        match input {
            Input::Data(bytes) => {
                self.stored.extend_from_slice(bytes);
                Ok(Progress::new(bytes.len(), 0))
            }
            Input::End => {
                let n = output.append_partial(&self.stored[self.emitted..]);
                self.emitted += n;
                self.done = self.emitted == self.stored.len();
                Ok(Progress::new(0, n))
            }
        }
    }
}

fn chain(buffer_size: usize) -> FilterGroup {
    FilterGroup::builder()
        .buffer_size(buffer_size)
        .sink(Capture::named("source"))
        .transform(Doubler::default())
        .transform(SizeFilter::named("doubled-size"))
        .transform(Hold::default())
        .sink(Capture::named("held"))
        .transform(Halver::default())
        .transform(SizeFilter::new())
        .build()
        .unwrap()
}

/// Caller loop: submit chunks, resubmitting what the group did not accept,
/// then flush end of stream. Returns everything the group emitted.
fn drive(group: &mut FilterGroup, data: &[u8], chunk_sizes: &[usize], output_size: usize) -> Vec<u8> {
    let mut output = Buffer::new(output_size);
    let mut emitted = vec![];

    let mut offset = 0;
    let mut sizes = chunk_sizes.iter().cycle();
    while offset < data.len() {
        let size = *sizes.next().unwrap();
        let end = (offset + size).min(data.len());
        let mut chunk = &data[offset..end];
        while !chunk.is_empty() {
            let progress = group.process(Input::Data(chunk), &mut output).unwrap();
            chunk = &chunk[progress.consumed..];
            emitted.extend_from_slice(output.as_slice());
            output.clear();
        }
        offset = end;
    }

    while !group.is_done() {
        group.process(Input::End, &mut output).unwrap();
        emitted.extend_from_slice(output.as_slice());
        output.clear();
    }
    emitted
}

#[test]
fn reference_chain_results() {
    let mut group = chain(4096);
    let emitted = drive(&mut group, b"abc", &[3], 4096);

    assert_eq!(emitted, b"abc");
    let results = group.result();
    assert_eq!(
        results.names().collect::<Vec<_>>(),
        ["source", "doubled-size", "held", "size"]
    );
    assert_eq!(results.get("source"), Some(&FilterValue::Bytes(b"abc".to_vec())));
    assert_eq!(results.get("held"), Some(&FilterValue::Bytes(b"aabbcc".to_vec())));
    assert_eq!(results.get("doubled-size"), Some(&FilterValue::Count(6)));
    assert_eq!(results.get("size"), Some(&FilterValue::Count(3)));
}

#[test]
fn flush_takes_several_end_calls_with_tiny_buffers() {
    let mut group = FilterGroup::builder()
        .buffer_size(2)
        .transform(Hold::default())
        .build()
        .unwrap();
    let mut output = Buffer::new(1);

    let progress = group.process(Input::Data(b"wal"), &mut output).unwrap();
    assert_eq!(progress, Progress::new(3, 0));

    let mut emitted = vec![];
    let mut calls = 0;
    while !group.is_done() {
        group.process(Input::End, &mut output).unwrap();
        emitted.extend_from_slice(output.as_slice());
        output.clear();
        calls += 1;
    }
    assert_eq!(emitted, b"wal");
    assert!(calls >= 3);

    // Further End calls on a finished group are no-ops.
    let progress = group.process(Input::End, &mut output).unwrap();
    assert_eq!(progress, Progress::default());
}

#[test]
fn backpressure_retains_unconsumed_input() {
    let mut group = FilterGroup::builder()
        .buffer_size(1)
        .transform(Doubler::default())
        .build()
        .unwrap();
    let mut output = Buffer::new(1);

    let progress = group.process(Input::Data(b"xy"), &mut output).unwrap();
    assert!(progress.consumed < 2);
    assert_eq!(output.as_slice(), b"x");
}

#[test]
fn release_calls_each_filter_once() {
    let first = Capture::named("first");
    let second = Capture::named("second");
    let counters = [first.releases.clone(), second.releases.clone()];

    let mut group = FilterGroup::builder().sink(first).sink(second).build().unwrap();
    let mut output = Buffer::new(8);
    group.process(Input::Data(b"partial"), &mut output).unwrap();

    group.release();
    group.release();
    drop(group);

    for counter in &counters {
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn dropping_an_unused_group_releases_filters() {
    let capture = Capture::named("unused");
    let counter = capture.releases.clone();
    drop(FilterGroup::builder().sink(capture).build().unwrap());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn results_serialize_as_manifest_entries() {
    let mut group = FilterGroup::builder()
        .sink(Capture::named("raw"))
        .transform(SizeFilter::new())
        .build()
        .unwrap();
    drive(&mut group, &[0xde, 0xad], &[1], 8);

    let json = serde_json::to_string(group.result()).unwrap();
    assert_eq!(json, r#"{"raw":"dead","size":2}"#);
}

proptest! {
    #[test]
    fn output_and_results_are_chunking_invariant(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        chunk_sizes in proptest::collection::vec(1usize..64, 1..16),
        buffer_size in 1usize..16,
        output_size in 1usize..16,
    ) {
        let mut reference = chain(4096);
        let expected = drive(&mut reference, &data, &[data.len().max(1)], 4096);

        let mut group = chain(buffer_size);
        let emitted = drive(&mut group, &data, &chunk_sizes, output_size);

        prop_assert_eq!(emitted, expected);
        prop_assert_eq!(group.result(), reference.result());
    }
}
