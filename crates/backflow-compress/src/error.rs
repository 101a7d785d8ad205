#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid compression level {0}: expected 0..=9")]
    InvalidLevel(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
