//! [`HorseReservation`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{horse, user};

use super::{PaymentStatus, Status};

/// Reservation of a rentable [`Horse`] made by a [`User`].
///
/// Only horses listed for rent accept these.
///
/// [`Horse`]: crate::domain::Horse
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct HorseReservation {
    /// ID of this [`HorseReservation`].
    pub id: Id,

    /// Reserved [`Horse`].
    ///
    /// [`Horse`]: crate::domain::Horse
    pub horse: horse::Id,

    /// [`User`] who requested this [`HorseReservation`].
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,

    /// [`Status`] of this [`HorseReservation`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`HorseReservation`].
    pub payment: PaymentStatus,

    /// [`DateTime`] when this [`HorseReservation`] was requested.
    pub created_at: CreationDateTime,
}

/// ID of a [`HorseReservation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`HorseReservation`] was requested.
pub type CreationDateTime = DateTimeOf<(HorseReservation, unit::Creation)>;
