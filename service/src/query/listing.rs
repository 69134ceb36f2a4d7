//! [`Query`] collection related to a single [`ServiceListing`].

use common::operations::By;

use crate::domain::{listing, ServiceListing};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`ServiceListing`] by its ID.
pub type ById = DatabaseQuery<By<Option<ServiceListing>, listing::Id>>;
