//! [`Query`] collection related to [`Wishlist`]s.
//!
//! [`Wishlist`]: crate::domain::user::Wishlist

use common::operations::By;

use crate::domain::{listing, ServiceListing};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Resolves wishlisted [`ServiceListing`] references into whole documents
/// for the dashboard.
pub type Resolve =
    DatabaseQuery<By<Vec<ServiceListing>, Vec<listing::Id>>>;
