//! [`Query`] collection related to [`Horse`]s.

use common::operations::By;

use crate::domain::{horse, user, Horse};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Horse`] by its ID.
pub type ById = DatabaseQuery<By<Option<Horse>, horse::Id>>;

/// Queries all [`Horse`]s of an owner.
pub type ByOwner = DatabaseQuery<By<Vec<Horse>, user::Id>>;
