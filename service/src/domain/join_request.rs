//! [`JoinRequest`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{listing, provider};

/// Pending request of one [`Provider`] to join another's
/// [`ServiceListing`].
///
/// Deleted wholesale whenever either side's provider is deleted.
///
/// [`Provider`]: crate::domain::Provider
/// [`ServiceListing`]: crate::domain::ServiceListing
#[derive(Clone, Debug)]
pub struct JoinRequest {
    /// ID of this [`JoinRequest`].
    pub id: Id,

    /// Requesting [`Provider`].
    ///
    /// [`Provider`]: crate::domain::Provider
    pub requester: provider::Id,

    /// Receiving [`Provider`].
    ///
    /// [`Provider`]: crate::domain::Provider
    pub receiver: provider::Id,

    /// [`ServiceListing`] the request is about.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub service: listing::Id,

    /// [`DateTime`] when this [`JoinRequest`] was made.
    pub created_at: CreationDateTime,
}

/// ID of a [`JoinRequest`].
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

/// [`DateTime`] when a [`JoinRequest`] was made.
pub type CreationDateTime = DateTimeOf<(JoinRequest, unit::Creation)>;
