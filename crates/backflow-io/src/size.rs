use crate::{Buffer, Filter, FilterValue, Input, Progress, Result, TransformFilter};

/// Pass-through filter counting the bytes that flow through it.
#[derive(Debug, Clone)]
pub struct SizeFilter {
    name: String,
    size: u64,
    done: bool,
}

impl Default for SizeFilter {
    fn default() -> Self { Self::new() }
}

impl SizeFilter {
    pub const NAME: &'static str = "size";

    pub fn new() -> Self { Self::named(Self::NAME) }

    /// Size filter with a custom result key, e.g. to count both raw and
    /// compressed bytes in one group.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            done: false,
        }
    }

    pub fn size(&self) -> u64 { self.size }
}

impl Filter for SizeFilter {
    fn name(&self) -> &str { &self.name }

    fn is_done(&self) -> bool { self.done }

    fn result(&mut self) -> Option<FilterValue> { Some(FilterValue::Count(self.size)) }
}

impl TransformFilter for SizeFilter {
    fn process(&mut self, input: Input<'_>, output: &mut Buffer) -> Result<Progress> {
        match input {
            Input::Data(bytes) => {
                let n = output.append_partial(bytes);
                self.size += n as u64;
                Ok(Progress::new(n, n))
            }
            Input::End => {
                self.done = true;
                Ok(Progress::default())
            }
        }
    }
}

impl From<SizeFilter> for crate::BoxedFilter {
    fn from(filter: SizeFilter) -> Self { Self::transform(filter) }
}
