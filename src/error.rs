//! Cache error taxonomy.
//!
//! Only two things can go wrong: a group can be misconfigured at
//! construction time, or a loader can fail while producing a value on a
//! cache miss. An absent key is not an error (the loader path is normal
//! operation), and an empty key is a benign no-op at the group layer.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;

/// A type-erased error produced by a [`Loader`](crate::Loader).
pub type BoxedError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Cache error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Group construction rejected (empty name or duplicate registration).
    #[error("group config error: {0}")]
    Config(String),

    /// The loader failed to produce a value for a key.
    ///
    /// The loader's error is propagated verbatim; nothing is cached for the
    /// key, and a subsequent lookup will invoke the loader again.
    #[error(transparent)]
    Load(#[from] BoxedError),
}

/// Cache result.
pub type Result<T> = core::result::Result<T, Error>;
