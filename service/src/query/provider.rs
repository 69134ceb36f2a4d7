//! [`Query`] collection related to a single [`Provider`].

use common::operations::By;

use crate::domain::{provider, user, Provider};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Provider`] by its ID.
pub type ById = DatabaseQuery<By<Option<Provider>, provider::Id>>;

/// Queries the [`Provider`] owned by a [`User`].
///
/// [`User`]: crate::domain::User
pub type ByUser = DatabaseQuery<By<Option<Provider>, user::Id>>;
