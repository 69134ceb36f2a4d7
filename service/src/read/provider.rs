//! [`Provider`]-related read definitions.

#[cfg(doc)]
use crate::domain::Provider;
use crate::domain::{join_request, listing, provider};

/// Selector of foreign [`Provider`]s holding references towards a deleted
/// one.
///
/// Matches providers whose main/additional service references point at any
/// of the deleted provider's listings, or whose pending requests include
/// any of its join requests.
#[derive(Clone, Debug)]
pub struct ForeignReferrers {
    /// ID of the [`Provider`] being deleted.
    pub provider: provider::Id,

    /// [`ServiceListing`]s owned by the deleted provider.
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    pub services: Vec<listing::Id>,

    /// [`JoinRequest`]s involving the deleted provider.
    ///
    /// [`JoinRequest`]: crate::domain::JoinRequest
    pub requests: Vec<join_request::Id>,
}
