//! Per-entity [`Database`] implementations over the [`ContentLake`].
//!
//! [`ContentLake`]: super::ContentLake
//! [`Database`]: crate::infra::Database

mod catalog;
mod horse;
mod join_request;
mod listing;
mod order;
mod provider;
mod rating;
mod refs;
mod reservation;
mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracerr::Traced;

use crate::infra::database::{self, content_lake};

/// Deserializes a query result into a list of boundary documents.
///
/// A non-conforming response is rejected here rather than speculatively
/// probed.
pub(super) fn docs<T: DeserializeOwned>(
    result: Value,
) -> Result<Vec<T>, Traced<database::Error>> {
    serde_json::from_value(result).map_err(|e| {
        tracerr::new!(database::Error::ContentLake(
            content_lake::Error::Malformed(e.to_string()),
        ))
    })
}

/// Builds a malformed-document error out of a boundary conversion failure.
pub(super) fn invalid(e: impl ToString) -> Traced<database::Error> {
    tracerr::new!(database::Error::ContentLake(
        content_lake::Error::Malformed(e.to_string()),
    ))
}
