use std::io::{self, Write};

use crate::{Buffer, FilterGroup, FilterResults, Input};

/// Writer that pushes everything written to it through a filter group and
/// forwards the group's output to an inner writer.
///
/// The group never touches `inner` itself; this adapter is the caller loop
/// that moves the destination buffer to the sink between pump cycles.
pub struct FilterWriter<W: Write> {
    inner:  W,
    group:  FilterGroup,
    output: Buffer,
}

impl<W: Write> FilterWriter<W> {
    pub fn new(inner: W, group: FilterGroup) -> Self {
        let output = Buffer::new(group.buffer_size());
        Self {
            inner,
            group,
            output,
        }
    }

    pub fn get_ref(&self) -> &W { &self.inner }

    fn drain(&mut self) -> io::Result<()> {
        if !self.output.is_empty() {
            self.inner.write_all(self.output.as_slice())?;
            self.output.clear();
        }
        Ok(())
    }

    /// Flush end of stream through the group and return the inner writer
    /// together with the group's results.
    pub fn finish(mut self) -> io::Result<(W, FilterResults)> {
        while !self.group.is_done() {
            self.group.process(Input::End, &mut self.output)?;
            self.drain()?;
        }
        self.inner.flush()?;

        let results = self.group.result().clone();
        self.group.release();
        Ok((self.inner, results))
    }
}

impl<W: Write> Write for FilterWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            let progress = self.group.process(Input::Data(&buf[written..]), &mut self.output)?;
            written += progress.consumed;
            if progress.is_stalled() && self.output.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "filter group accepted no input",
                ));
            }
            self.drain()?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.inner.flush()
    }
}
