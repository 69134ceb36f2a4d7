//! [`Reservation`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A reservation of a service listing.
#[derive(Clone, Debug, From)]
pub struct Reservation(domain::Reservation);

/// A reservation of a service listing.
#[graphql_object(context = Context)]
impl Reservation {
    /// Unique identifier of this `Reservation`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Reserved `Listing`, unless it was deleted from under the
    /// reservation.
    #[must_use]
    pub fn service(&self) -> Option<api::Listing> {
        self.0.service.map(|id| {
            #[expect(
                unsafe_code,
                reason = "reference loaded from the reservation document"
            )]
            unsafe {
                api::Listing::new_unchecked(id)
            }
        })
    }

    /// `User` who requested this `Reservation`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "reference loaded from the reservation document"
        )]
        unsafe {
            api::User::new_unchecked(self.0.user)
        }
    }

    /// Status of this `Reservation`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Payment status of this `Reservation`.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.payment.into()
    }

    /// `DateTime` when this `Reservation` was requested.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Reservation`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::reservation::Id)]
#[into(domain::reservation::Id)]
#[graphql(name = "ReservationId", transparent)]
pub struct Id(Uuid);

/// Status of a `Reservation` or an order.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ReservationStatus")]
pub enum Status {
    /// Waiting for the provider's decision.
    Pending,

    /// Approved by the provider.
    Approved,

    /// Rejected by the provider.
    Rejected,

    /// Fulfilled.
    Completed,
}

impl From<domain::reservation::Status> for Status {
    fn from(status: domain::reservation::Status) -> Self {
        use domain::reservation::Status as S;

        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
            S::Completed => Self::Completed,
        }
    }
}

impl From<Status> for domain::reservation::Status {
    fn from(status: Status) -> Self {
        use Status as S;

        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
            S::Completed => Self::Completed,
        }
    }
}

/// Payment status of a `Reservation` or an order.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum PaymentStatus {
    /// Payment not received yet.
    Pending,

    /// Payment received.
    Paid,
}

impl From<domain::reservation::PaymentStatus> for PaymentStatus {
    fn from(status: domain::reservation::PaymentStatus) -> Self {
        use domain::reservation::PaymentStatus as S;

        match status {
            S::Pending => Self::Pending,
            S::Paid => Self::Paid,
        }
    }
}

/// A reservation of a rentable horse.
#[derive(Clone, Debug, From)]
pub struct HorseReservation(domain::HorseReservation);

/// A reservation of a rentable horse.
#[graphql_object(context = Context)]
impl HorseReservation {
    /// Unique identifier of this `HorseReservation`.
    #[must_use]
    pub fn id(&self) -> HorseReservationId {
        self.0.id.into()
    }

    /// Reserved `Horse`.
    #[must_use]
    pub fn horse(&self) -> api::Horse {
        #[expect(
            unsafe_code,
            reason = "reference loaded from the reservation document"
        )]
        unsafe {
            api::Horse::new_unchecked(self.0.horse)
        }
    }

    /// Status of this `HorseReservation`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Payment status of this `HorseReservation`.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.payment.into()
    }

    /// `DateTime` when this `HorseReservation` was requested.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `HorseReservation`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::reservation::horse::Id)]
#[into(domain::reservation::horse::Id)]
#[graphql(transparent)]
pub struct HorseReservationId(Uuid);
