//! [`Reservation`] definitions.

pub mod horse;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{listing, provider, user};

pub use self::horse::HorseReservation;

/// Reservation of a [`ServiceListing`] made by a [`User`].
///
/// [`ServiceListing`]: crate::domain::ServiceListing
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// Reserved [`ServiceListing`].
    ///
    /// Detached when the listing is deleted from under the reservation.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub service: Option<listing::Id>,

    /// [`Provider`] the reserved listing belongs to.
    ///
    /// [`Provider`]: crate::domain::Provider
    pub provider: Option<provider::Id>,

    /// [`User`] who requested this [`Reservation`].
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,

    /// [`Status`] of this [`Reservation`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Reservation`].
    pub payment: PaymentStatus,

    /// [`DateTime`] when this [`Reservation`] was requested.
    pub created_at: CreationDateTime,
}

/// ID of a [`Reservation`].
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

define_kind! {
    #[doc = "Status of a [`Reservation`] or an order."]
    enum Status {
        #[doc = "Waiting for the provider's decision."]
        Pending = 1,

        #[doc = "Approved by the provider."]
        Approved = 2,

        #[doc = "Rejected by the provider."]
        Rejected = 3,

        #[doc = "Fulfilled."]
        Completed = 4,
    }
}

impl Status {
    /// Indicates whether this [`Status`] still blocks deletion of the
    /// provider it belongs to.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Indicates whether this [`Status`] may legally become the `next` one.
    ///
    /// `Rejected` and `Completed` are terminal.
    #[must_use]
    pub fn can_become(self, next: Self) -> bool {
        match self {
            Self::Pending => {
                matches!(next, Self::Approved | Self::Rejected | Self::Completed)
            }
            Self::Approved => matches!(next, Self::Completed),
            Self::Rejected | Self::Completed => false,
        }
    }
}

define_kind! {
    #[doc = "Payment status of a [`Reservation`] or an order."]
    enum PaymentStatus {
        #[doc = "Payment not received yet."]
        Pending = 1,

        #[doc = "Payment received."]
        Paid = 2,
    }
}

/// Operation replacing the [`Status`] of a [`Reservation`].
#[derive(Clone, Copy, Debug)]
pub struct StatusChange {
    /// ID of the [`Reservation`] to transition.
    pub reservation: Id,

    /// New [`Status`].
    pub status: Status,
}

/// Operation completing a free-of-charge [`Reservation`] right away.
#[derive(Clone, Copy, Debug)]
pub struct Complete {
    /// ID of the [`Reservation`] to complete.
    pub reservation: Id,
}

/// Operation unsetting the [`ServiceListing`] reference of a
/// [`Reservation`].
///
/// [`ServiceListing`]: crate::domain::ServiceListing
#[derive(Clone, Copy, Debug)]
pub struct DetachService {
    /// ID of the [`Reservation`] to detach the reference from.
    pub reservation: Id,
}

/// [`DateTime`] when a [`Reservation`] was requested.
pub type CreationDateTime = DateTimeOf<(Reservation, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn terminal_statuses_never_transition() {
        for next in [
            Status::Pending,
            Status::Approved,
            Status::Rejected,
            Status::Completed,
        ] {
            assert!(!Status::Rejected.can_become(next));
            assert!(!Status::Completed.can_become(next));
        }
    }

    #[test]
    fn pending_reaches_every_decision() {
        assert!(Status::Pending.can_become(Status::Approved));
        assert!(Status::Pending.can_become(Status::Rejected));
        assert!(Status::Pending.can_become(Status::Completed));
        assert!(!Status::Pending.can_become(Status::Pending));
    }

    #[test]
    fn only_active_statuses_block_provider_deletion() {
        assert!(Status::Pending.is_active());
        assert!(Status::Approved.is_active());
        assert!(!Status::Rejected.is_active());
        assert!(!Status::Completed.is_active());
    }
}
