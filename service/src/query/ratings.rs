//! [`Query`] collection related to [`Rating`]s.

use common::operations::By;

use crate::domain::{rating, Rating};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Rating`]s left on a [`Subject`].
///
/// [`Subject`]: rating::Subject
pub type BySubject = DatabaseQuery<By<Vec<Rating>, rating::Subject>>;
