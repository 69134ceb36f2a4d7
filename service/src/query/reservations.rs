//! [`Query`] collection related to [`Reservation`]s.

use common::operations::By;

use crate::domain::{provider, reservation, user, HorseReservation, Reservation};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Reservation`] by its ID.
pub type ById = DatabaseQuery<By<Option<Reservation>, reservation::Id>>;

/// Queries all [`Reservation`]s of a [`Provider`].
///
/// [`Provider`]: crate::domain::Provider
pub type ByProvider = DatabaseQuery<By<Vec<Reservation>, provider::Id>>;

/// Queries all [`Reservation`]s requested by a [`User`].
///
/// [`User`]: crate::domain::User
pub type ByUser = DatabaseQuery<By<Vec<Reservation>, user::Id>>;

/// Queries all [`HorseReservation`]s requested by a [`User`].
///
/// [`User`]: crate::domain::User
pub type HorsesByUser = DatabaseQuery<By<Vec<HorseReservation>, user::Id>>;
