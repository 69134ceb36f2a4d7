//! [`Query`] collection related to [`Order`]s.

use common::operations::By;

use crate::domain::{user, Order};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Order`]s placed by a [`User`].
///
/// [`User`]: crate::domain::User
pub type ByUser = DatabaseQuery<By<Vec<Order>, user::Id>>;
