#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to load hash '{0}'")]
    UnknownAlgorithm(String),

    #[error("invalid hmac key: {0}")]
    InvalidKey(#[from] digest::InvalidLength),
}

pub type Result<T> = std::result::Result<T, Error>;
