//! Domain definitions.

pub mod book;
pub mod course;
pub mod horse;
pub mod join_request;
pub mod listing;
pub mod order;
pub mod provider;
pub mod rating;
pub mod refs;
pub mod reservation;
pub mod user;

pub use self::{
    book::Book, course::Course, horse::Horse, join_request::JoinRequest,
    listing::ServiceListing, order::Order, provider::Provider, rating::Rating,
    reservation::{HorseReservation, Reservation},
    user::User,
};
