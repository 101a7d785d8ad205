use backflow_io::{DEFAULT_BUFFER_SIZE, FilterGroup};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{FilterSpec, Result};

/// Pipeline description, typically loaded from TOML:
///
/// ```toml
/// buffer_size = 65536
///
/// [[filter]]
/// type = "sha1"
///
/// [[filter]]
/// type = "compress"
/// level = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub buffer_size: usize,
    #[serde(rename = "filter")]
    pub filters:     Vec<FilterSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            filters:     vec![],
        }
    }
}

impl PipelineConfig {
    pub fn new(filters: Vec<FilterSpec>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> { Ok(toml::from_str(s)?) }

    /// Parse a comma-separated filter list such as `sha1,size,compress:6`.
    pub fn from_filter_list(list: &str) -> Result<Self> {
        let filters = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(FilterSpec::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(filters))
    }

    /// Construct every filter and assemble the group.
    ///
    /// Nothing is constructed past the first invalid spec.
    pub fn build(&self) -> Result<FilterGroup> {
        let filters = self
            .filters
            .iter()
            .map(FilterSpec::build)
            .collect::<Result<Vec<_>>>()?;
        debug!(filters = self.filters.len(), buffer_size = self.buffer_size, "building pipeline");
        Ok(FilterGroup::with_buffer_size(filters, self.buffer_size)?)
    }
}
