//! [`Query`] collection related to [`Book`]s.

use common::operations::By;

use crate::domain::{book, Book};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Book`] by its ID.
pub type ById = DatabaseQuery<By<Option<Book>, book::Id>>;

/// Queries [`Book`]s, optionally narrowed to one category.
///
/// Passing the category of an already loaded [`Book`] yields its
/// related-by-category siblings.
pub type List = DatabaseQuery<By<Vec<Book>, Option<book::Category>>>;
