//! [`Order`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    book, course,
    reservation::{PaymentStatus, Status},
    user,
};

/// Order of a [`Book`] or a [`Course`] made by a [`User`].
///
/// [`Book`]: crate::domain::Book
/// [`Course`]: crate::domain::Course
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// Ordered [`Subject`].
    pub subject: Subject,

    /// [`User`] who placed this [`Order`].
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,

    /// Price of the [`Subject`] at the moment of ordering.
    pub price: Money,

    /// [`Status`] of this [`Order`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Order`].
    pub payment: PaymentStatus,

    /// [`DateTime`] when this [`Order`] was placed.
    pub created_at: CreationDateTime,
}

/// ID of an [`Order`].
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

/// Orderable subject an [`Order`] points at.
#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum Subject {
    /// A [`Book`].
    ///
    /// [`Book`]: crate::domain::Book
    Book(book::Id),

    /// A [`Course`].
    ///
    /// [`Course`]: crate::domain::Course
    Course(course::Id),
}

/// Operation completing an [`Order`] of a free-of-charge [`Subject`].
///
/// Sets both the [`Status`] to completed and the [`PaymentStatus`] to paid.
#[derive(Clone, Copy, Debug)]
pub struct Complete {
    /// ID of the [`Order`] to complete.
    pub order: Id,
}

/// [`DateTime`] when an [`Order`] was placed.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;
