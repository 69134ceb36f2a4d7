//! [`Query`] collection related to multiple [`ServiceListing`]s.

use common::operations::By;

use crate::{domain::ServiceListing, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a page of [`ServiceListing`]s.
pub type List = DatabaseQuery<
    By<read::listing::list::Page, read::listing::list::Selector>,
>;

/// Queries the full [`ServiceListing`] collection matching a [`Filter`],
/// as the view-state controller consumes it.
///
/// [`Filter`]: read::listing::Filter
pub type Snapshot =
    DatabaseQuery<By<Vec<ServiceListing>, read::listing::Filter>>;
