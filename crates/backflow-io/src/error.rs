use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("buffer capacity exceeded: {requested} bytes requested, {remaining} remaining")]
    Capacity { requested: usize, remaining: usize },

    #[error("filter buffer size must be greater than zero")]
    ZeroBufferSize,

    #[error("duplicate filter name '{0}' in group")]
    DuplicateName(String),

    #[error("filter '{filter}' failed: {source}")]
    Process {
        filter: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Tag an algorithm failure with the name of the filter that raised it.
    pub fn process(
        filter: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Process {
            filter: filter.into(),
            source: source.into(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
