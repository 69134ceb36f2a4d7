//! [`Rating`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// An individual rating left on a rateable subject.
#[derive(Clone, Debug, From)]
pub struct Rating(domain::Rating);

/// An individual rating left on a rateable subject.
#[graphql_object(context = Context)]
impl Rating {
    /// Unique identifier of this `Rating`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Value of this `Rating`, between 1 and 5.
    #[must_use]
    pub fn value(&self) -> i32 {
        i32::from(self.0.value.get())
    }

    /// Message accompanying this `Rating`, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.0.message.as_ref().map(ToString::to_string)
    }

    /// `User` who left this `Rating`.
    #[must_use]
    pub fn author(&self) -> api::User {
        #[expect(
            unsafe_code,
            reason = "reference loaded from the rating document"
        )]
        unsafe {
            api::User::new_unchecked(self.0.author)
        }
    }

    /// `DateTime` when this `Rating` was left.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Rating`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::rating::Id)]
#[into(domain::rating::Id)]
#[graphql(name = "RatingId", transparent)]
pub struct Id(Uuid);

/// Denormalized rating aggregate of a rateable subject.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "RatingAggregate")]
pub struct Aggregate {
    /// Mean of all rating values left on the subject.
    pub average: f64,

    /// Count of all ratings left on the subject.
    pub count: i32,
}

impl From<domain::rating::Aggregate> for Aggregate {
    fn from(aggregate: domain::rating::Aggregate) -> Self {
        Self {
            average: aggregate.average,
            count: aggregate.count,
        }
    }
}
