//! GraphQL API definitions.

pub mod book;
pub mod course;
pub mod horse;
pub mod listing;
mod mutation;
pub mod order;
pub mod provider;
mod query;
pub mod rating;
pub mod reservation;
pub mod scalar;
mod subscription;
pub mod user;

use crate::define_error;

pub use self::{
    book::Book, course::Course, horse::Horse, listing::Listing,
    mutation::Mutation, order::Order, provider::Provider, query::Query,
    rating::Rating, reservation::Reservation, subscription::Subscription,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

define_error! {
    enum PrivilegeError {
        #[code = "NOT_PROVIDER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must own a provider"]
        Provider,
    }
}
