//! Error kinds shared across the conditioning pipeline.
//!
//! Three kinds only, per the request/response boundary the rest of the
//! crate is built around: a caller either gave us something we can't act
//! on (`BadInput`), asked for a handle we don't have (`NotFound`), or hit
//! a failure that isn't the caller's fault (`Internal`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Error::BadInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
