//! [`Database`]-related implementations.

#[cfg(feature = "lake")]
pub mod content_lake;
#[cfg(test)]
pub(crate) mod mock;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "lake")]
pub use self::content_lake::ContentLake;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "lake")]
    /// [`ContentLake`] error.
    ContentLake(content_lake::Error),

    /// Document store cannot be reached.
    #[display("Document store is unavailable")]
    Unavailable,
}
