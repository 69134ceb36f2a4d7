//! [`Query`] collection related to [`Course`]s.

use common::operations::By;

use crate::domain::{course, Course};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Course`] by its ID.
pub type ById = DatabaseQuery<By<Option<Course>, course::Id>>;

/// Queries [`Course`]s, optionally narrowed to one category.
///
/// Passing the category of an already loaded [`Course`] yields its
/// related-by-category siblings.
pub type List = DatabaseQuery<By<Vec<Course>, Option<course::Category>>>;
