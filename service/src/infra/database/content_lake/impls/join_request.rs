//! [`JoinRequest`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Delete, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{join_request, listing, provider, JoinRequest},
    infra::{
        database::{
            self,
            content_lake::{ContentLake, Query},
        },
        Database,
    },
};

use super::docs;

/// Projection of a [`JoinRequest`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"requesterRef\": requesterRef._ref, \
    \"receiverRef\": receiverRef._ref, \
    \"serviceRef\": serviceRef._ref}";

/// [`JoinRequest`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: join_request::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: join_request::CreationDateTime,

    /// Requesting provider reference.
    requester_ref: provider::Id,

    /// Receiving provider reference.
    receiver_ref: provider::Id,

    /// Service reference.
    service_ref: listing::Id,
}

impl From<Doc> for JoinRequest {
    fn from(doc: Doc) -> Self {
        let Doc {
            id,
            created_at,
            requester_ref,
            receiver_ref,
            service_ref,
        } = doc;

        Self {
            id,
            requester: requester_ref,
            receiver: receiver_ref,
            service: service_ref,
            created_at,
        }
    }
}

impl Database<Select<By<Vec<JoinRequest>, provider::Id>>> for ContentLake {
    type Ok = Vec<JoinRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<JoinRequest>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider = by.into_inner();
        Ok(docs::<Doc>(
            self.fetch(
                Query::new("joinRequest", PROJECTION)
                    .clause(
                        "(requesterRef._ref == $provider \
                         || receiverRef._ref == $provider)",
                    )
                    .bind("provider", provider),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?
        .into_iter()
        .map(Into::into)
        .collect())
    }
}

impl Database<Delete<join_request::Id>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<join_request::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(id).await.map_err(tracerr::wrap!())
    }
}
