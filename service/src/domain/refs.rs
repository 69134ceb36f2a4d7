//! Reference graph between document types.
//!
//! The provider deletion cascade and its completeness test both walk the
//! same table, so an edge added here is automatically covered by both.

use derive_more::Display;

#[cfg(doc)]
use crate::domain::{Provider, ServiceListing};

/// Document type holding references to other documents.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum DocType {
    /// A user document.
    #[display("user")]
    User,

    /// A provider document.
    #[display("provider")]
    Provider,

    /// A service listing document.
    #[display("serviceListing")]
    ServiceListing,

    /// A reservation document.
    #[display("reservation")]
    Reservation,

    /// A service join request document.
    #[display("joinRequest")]
    JoinRequest,
}

/// What an inbound reference points at, relative to a deleted [`Provider`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
    /// The provider document itself.
    Provider,

    /// A [`ServiceListing`] owned by the provider.
    OwnedService,

    /// A pending join request involving the provider.
    PendingRequest,
}

/// Edge of the reference graph: a field on a referencing document type
/// pointing at a [`Target`].
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    /// Referencing document type.
    pub from: DocType,

    /// Field path holding the reference.
    pub field: &'static str,

    /// What the reference points at.
    pub target: Target,
}

/// Inbound edges that must be detached or deleted before a [`Provider`]
/// document may be removed, in cascade order.
pub const PROVIDER_INBOUND: &[Edge] = &[
    Edge {
        from: DocType::User,
        field: "provider",
        target: Target::Provider,
    },
    Edge {
        from: DocType::ServiceListing,
        field: "providerRef",
        target: Target::Provider,
    },
    Edge {
        from: DocType::Reservation,
        field: "providerRef",
        target: Target::Provider,
    },
    Edge {
        from: DocType::Provider,
        field: "mainServiceRef",
        target: Target::OwnedService,
    },
    Edge {
        from: DocType::Provider,
        field: "servicesRef",
        target: Target::OwnedService,
    },
    Edge {
        from: DocType::Provider,
        field: "pendingRequests",
        target: Target::PendingRequest,
    },
    Edge {
        from: DocType::JoinRequest,
        field: "requesterRef",
        target: Target::Provider,
    },
    Edge {
        from: DocType::JoinRequest,
        field: "receiverRef",
        target: Target::Provider,
    },
];

impl DocType {
    /// Parses a [`DocType`] from its document type tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(Self::User),
            "provider" => Some(Self::Provider),
            "serviceListing" => Some(Self::ServiceListing),
            "reservation" => Some(Self::Reservation),
            "joinRequest" => Some(Self::JoinRequest),
            _ => None,
        }
    }
}

/// Returns field paths of the provided document type that hold a direct
/// reference to a provider document.
///
/// The final cascade sweep unsets exactly these.
pub fn sweep_fields(
    doc_type: DocType,
) -> impl Iterator<Item = &'static str> {
    PROVIDER_INBOUND.iter().filter_map(move |e| {
        (e.from == doc_type && e.target == Target::Provider)
            .then_some(e.field)
    })
}

/// Remaining inbound reference found by the final cascade sweep.
#[derive(Clone, Debug)]
pub struct Inbound {
    /// Raw ID of the referencing document.
    pub document: String,

    /// Field path holding the reference.
    pub field: String,
}

/// Operation stripping a single leftover reference off a document.
#[derive(Clone, Debug)]
pub struct Strip {
    /// Raw ID of the document to strip.
    pub document: String,

    /// Field path to unset.
    pub field: String,
}
