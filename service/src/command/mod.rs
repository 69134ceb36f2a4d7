//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_horse_reservation;
pub mod create_order;
pub mod create_reservation;
pub mod create_service_listing;
pub mod create_user;
pub mod create_user_session;
pub mod delete_provider;
pub mod delete_service_listing;
pub mod request_password_reset;
pub mod reset_password;
pub mod submit_rating;
pub mod toggle_wishlist;
pub mod update_reservation_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_horse_reservation::CreateHorseReservation,
    create_order::CreateOrder, create_reservation::CreateReservation,
    create_service_listing::CreateServiceListing, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_provider::DeleteProvider,
    delete_service_listing::DeleteServiceListing,
    request_password_reset::RequestPasswordReset,
    reset_password::ResetPassword, submit_rating::SubmitRating,
    toggle_wishlist::ToggleWishlist,
    update_reservation_status::UpdateReservationStatus,
};
