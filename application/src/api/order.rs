//! [`Order`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, reservation},
    Context,
};

/// An order of a book or a course.
#[derive(Clone, Debug, From)]
pub struct Order(domain::Order);

/// An order of a book or a course.
#[graphql_object(context = Context)]
impl Order {
    /// Unique identifier of this `Order`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Ordered `Book`, if the order is for a book.
    #[must_use]
    pub fn book(&self) -> Option<api::Book> {
        match self.0.subject {
            domain::order::Subject::Book(id) => {
                #[expect(
                    unsafe_code,
                    reason = "reference loaded from the order document"
                )]
                Some(unsafe { api::Book::new_unchecked(id) })
            }
            domain::order::Subject::Course(_) => None,
        }
    }

    /// Ordered `Course`, if the order is for a course.
    #[must_use]
    pub fn course(&self) -> Option<api::Course> {
        match self.0.subject {
            domain::order::Subject::Course(id) => {
                #[expect(
                    unsafe_code,
                    reason = "reference loaded from the order document"
                )]
                Some(unsafe { api::Course::new_unchecked(id) })
            }
            domain::order::Subject::Book(_) => None,
        }
    }

    /// Price of the ordered subject at the moment of ordering.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.0.price.amount.to_f64().unwrap_or_default()
    }

    /// ISO 4217 currency code of the price.
    #[must_use]
    pub fn currency(&self) -> String {
        self.0.price.currency.code().to_owned()
    }

    /// Status of this `Order`.
    #[must_use]
    pub fn status(&self) -> reservation::Status {
        self.0.status.into()
    }

    /// Payment status of this `Order`.
    #[must_use]
    pub fn payment_status(&self) -> reservation::PaymentStatus {
        self.0.payment.into()
    }

    /// `DateTime` when this `Order` was placed.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of an `Order`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::order::Id)]
#[into(domain::order::Id)]
#[graphql(name = "OrderId", transparent)]
pub struct Id(Uuid);
