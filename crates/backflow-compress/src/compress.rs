use backflow_io::{BoxedFilter, Buffer, Filter, Input, Progress, TransformFilter};
use flate2::{Compression, FlushCompress, Status};

use crate::{Error, Result};

pub const DEFAULT_LEVEL: u32 = 6;

/// Deflate the stream into zlib format.
pub struct Compress {
    name:   String,
    stream: Option<flate2::Compress>,
    done:   bool,
}

impl Compress {
    pub const NAME: &'static str = "compress";

    pub fn new(level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidLevel(level));
        }
        Ok(Self {
            name:   Self::NAME.to_string(),
            stream: Some(flate2::Compress::new(Compression::new(level), true)),
            done:   false,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Filter for Compress {
    fn name(&self) -> &str { &self.name }

    fn is_done(&self) -> bool { self.done }

    fn release(&mut self) { self.stream = None; }
}

impl TransformFilter for Compress {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> backflow_io::Result<Progress> {
        let Some(stream) = self.stream.as_mut() else {
            panic!("compress filter '{}' used after release", self.name);
        };

        let (data, flush) = match input {
            Input::Data(bytes) => (bytes, FlushCompress::None),
            Input::End => (&[][..], FlushCompress::Finish),
        };

        let (in_before, out_before) = (stream.total_in(), stream.total_out());
        let status = stream
            .compress(data, output.spare_mut(), flush)
            .map_err(|e| backflow_io::Error::process(&self.name, e))?;
        let consumed = (stream.total_in() - in_before) as usize;
        let produced = (stream.total_out() - out_before) as usize;
        output.commit(produced);

        if input.is_end() && status == Status::StreamEnd {
            self.done = true;
        }
        Ok(Progress::new(consumed, produced))
    }
}

impl From<Compress> for BoxedFilter {
    fn from(filter: Compress) -> Self { BoxedFilter::transform(filter) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_level() {
        assert!(matches!(Compress::new(10), Err(Error::InvalidLevel(10))));
        assert!(Compress::new(0).is_ok());
    }

    #[test]
    fn finish_emits_zlib_stream() {
        let mut filter = Compress::new(DEFAULT_LEVEL).unwrap();
        let mut output = Buffer::new(256);

        let progress = filter.process(Input::Data(b"aaaaaaaaaa"), &mut output).unwrap();
        assert_eq!(progress.consumed, 10);
        while !filter.is_done() {
            filter.process(Input::End, &mut output).unwrap();
        }

        // zlib header for the default window, followed by the deflate body.
        assert_eq!(output.as_slice()[0], 0x78);
        assert!(output.len() > 2);
    }
}
