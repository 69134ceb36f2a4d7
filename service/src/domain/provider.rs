//! [`Provider`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Bilingual, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{join_request, listing, user};

/// Service-offering actor, distinct from the underlying [`User`] account.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Provider {
    /// ID of this [`Provider`].
    pub id: Id,

    /// Name of this [`Provider`] in both locales.
    pub name: Bilingual,

    /// [`User`] owning this [`Provider`].
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,

    /// Main [`ServiceListing`] of this [`Provider`].
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub main_service: Option<listing::Id>,

    /// Additional [`ServiceListing`]s of this [`Provider`].
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub services: Vec<listing::Id>,

    /// Pending [`JoinRequest`]s involving this [`Provider`].
    ///
    /// [`JoinRequest`]: crate::domain::JoinRequest
    pub pending_requests: Vec<join_request::Id>,

    /// [`DateTime`] when this [`Provider`] was created.
    pub created_at: CreationDateTime,
}

impl Provider {
    /// Returns IDs of all [`ServiceListing`]s owned by this [`Provider`].
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub fn owned_services(&self) -> impl Iterator<Item = listing::Id> + '_ {
        self.main_service.into_iter().chain(self.services.iter().copied())
    }
}

/// ID of a [`Provider`].
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

/// Operation setting the main [`ServiceListing`] of a [`Provider`].
///
/// [`ServiceListing`]: crate::domain::ServiceListing
#[derive(Clone, Copy, Debug)]
pub struct SetMainService {
    /// ID of the [`Provider`] to patch.
    pub provider: Id,

    /// [`ServiceListing`] to set as the main one.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub listing: listing::Id,
}

/// Operation appending an additional [`ServiceListing`] to a [`Provider`].
///
/// [`ServiceListing`]: crate::domain::ServiceListing
#[derive(Clone, Copy, Debug)]
pub struct AddService {
    /// ID of the [`Provider`] to patch.
    pub provider: Id,

    /// [`ServiceListing`] to append.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub listing: listing::Id,
}

/// Operation detaching a [`ServiceListing`] from a [`Provider`].
///
/// Unsets the main reference when it matches and removes the listing from
/// the additional services collection.
///
/// [`ServiceListing`]: crate::domain::ServiceListing
#[derive(Clone, Copy, Debug)]
pub struct DetachService {
    /// ID of the [`Provider`] to patch.
    pub provider: Id,

    /// [`ServiceListing`] to detach.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub listing: listing::Id,

    /// Indicator whether the listing is the provider's main service, so the
    /// scalar reference must be unset as well.
    pub is_main: bool,
}

/// Operation stripping references a foreign [`Provider`] holds towards a
/// deleted one.
///
/// Applied to every other provider still pointing at the deleted provider's
/// listings or pending requests during the deletion cascade.
#[derive(Clone, Debug)]
pub struct StripForeignRefs {
    /// ID of the foreign [`Provider`] to patch.
    pub provider: Id,

    /// Indicator whether the foreign provider's main service reference
    /// points at one of the deleted provider's listings and must be unset.
    pub unset_main: bool,

    /// [`ServiceListing`]s of the deleted provider.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub services: Vec<listing::Id>,

    /// [`JoinRequest`]s of the deleted provider.
    ///
    /// [`JoinRequest`]: crate::domain::JoinRequest
    pub requests: Vec<join_request::Id>,
}

/// [`DateTime`] when a [`Provider`] was created.
pub type CreationDateTime = DateTimeOf<(Provider, unit::Creation)>;
