//! Error types for the memoization cache
//!
//! Provides unified error handling using thiserror.

use std::convert::Infallible;

use thiserror::Error;

// == Memo Error Enum ==
/// Unified error type for the memoization cache.
///
/// `E` is the error type of the wrapped computation. Operations that never run
/// the computation (configuration, key derivation helpers) use the default
/// `Infallible`.
#[derive(Error, Debug)]
pub enum MemoError<E = Infallible> {
    /// Call arguments could not be canonically serialized into a key
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// The wrapped computation failed; the inner error is passed through untouched
    #[error("{0}")]
    Computation(E),

    /// Invalid cache options, reported when the computation is wrapped
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl<E> MemoError<E> {
    // == Into Computation ==
    /// Returns the wrapped computation's error, if that is what this is.
    pub fn into_computation(self) -> Option<E> {
        match self {
            MemoError::Computation(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true for errors raised by the wrapped computation.
    pub fn is_computation(&self) -> bool {
        matches!(self, MemoError::Computation(_))
    }

    // == Widen ==
    /// Re-types a cache-side error so it can be returned from a call site
    /// whose computation fails with `E`.
    pub fn widen(err: MemoError) -> Self {
        match err {
            MemoError::KeyDerivation(msg) => MemoError::KeyDerivation(msg),
            MemoError::Configuration(msg) => MemoError::Configuration(msg),
            MemoError::Computation(never) => match never {},
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the memoization cache.
pub type Result<T, E = Infallible> = std::result::Result<T, MemoError<E>>;
