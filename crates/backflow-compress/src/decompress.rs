use backflow_io::{BoxedFilter, Buffer, Filter, Input, Progress, TransformFilter};
use flate2::{FlushDecompress, Status};

/// Inflate a zlib stream.
///
/// The filter is done once the stream's end marker is reached. Data after
/// the marker, or end of input before it, fails with a processing error.
pub struct Decompress {
    name:   String,
    stream: Option<flate2::Decompress>,
    done:   bool,
}

impl Default for Decompress {
    fn default() -> Self { Self::new() }
}

impl Decompress {
    pub const NAME: &'static str = "decompress";

    pub fn new() -> Self {
        Self {
            name:   Self::NAME.to_string(),
            stream: Some(flate2::Decompress::new(true)),
            done:   false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn error(&self, message: &str) -> backflow_io::Error { backflow_io::Error::process(&self.name, message) }
}

impl Filter for Decompress {
    fn name(&self) -> &str { &self.name }

    fn is_done(&self) -> bool { self.done }

    fn release(&mut self) { self.stream = None; }
}

impl TransformFilter for Decompress {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> backflow_io::Result<Progress> {
        if self.done {
            return match input {
                Input::Data(bytes) if !bytes.is_empty() => {
                    Err(self.error("unexpected data after end of compressed stream"))
                }
                _ => Ok(Progress::default()),
            };
        }

        let Some(stream) = self.stream.as_mut() else {
            panic!("decompress filter '{}' used after release", self.name);
        };

        let (data, flush) = match input {
            Input::Data(bytes) => (bytes, FlushDecompress::None),
            Input::End => (&[][..], FlushDecompress::Finish),
        };

        let (in_before, out_before) = (stream.total_in(), stream.total_out());
        let status = stream
            .decompress(data, output.spare_mut(), flush)
            .map_err(|e| backflow_io::Error::process(&self.name, e))?;
        let consumed = (stream.total_in() - in_before) as usize;
        let produced = (stream.total_out() - out_before) as usize;
        output.commit(produced);

        if status == Status::StreamEnd {
            self.done = true;
        } else if input.is_end() && produced == 0 {
            return Err(self.error("compressed stream is truncated"));
        }
        Ok(Progress::new(consumed, produced))
    }
}

impl From<Decompress> for BoxedFilter {
    fn from(filter: Decompress) -> Self { BoxedFilter::transform(filter) }
}
