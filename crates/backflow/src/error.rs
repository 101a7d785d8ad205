//! Error types for backflow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("filter '{filter}' does not accept argument '{argument}'")]
    InvalidArgument { filter: String, argument: String },

    #[error("invalid pipeline config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Crypto(#[from] backflow_crypto::Error),

    #[error(transparent)]
    Compress(#[from] backflow_compress::Error),

    #[error(transparent)]
    Filter(#[from] backflow_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
