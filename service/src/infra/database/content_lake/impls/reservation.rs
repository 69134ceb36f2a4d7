//! [`Reservation`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Create, Delete, Patch, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{
        horse, listing, provider,
        reservation::{self, horse as horse_reservation},
        user, HorseReservation, Reservation,
    },
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
};

use super::docs;

/// Projection of a [`Reservation`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"serviceRef\": serviceRef._ref, \
    \"providerRef\": providerRef._ref, \
    \"userRef\": userRef._ref, \
    status, paymentStatus}";

/// [`Reservation`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: reservation::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: reservation::CreationDateTime,

    /// Reserved service reference.
    service_ref: Option<listing::Id>,

    /// Provider reference.
    provider_ref: Option<provider::Id>,

    /// Requesting user reference.
    user_ref: user::Id,

    /// Status tag.
    status: reservation::Status,

    /// Payment status tag.
    payment_status: reservation::PaymentStatus,
}

impl From<Doc> for Reservation {
    fn from(doc: Doc) -> Self {
        let Doc {
            id,
            created_at,
            service_ref,
            provider_ref,
            user_ref,
            status,
            payment_status,
        } = doc;

        Self {
            id,
            service: service_ref,
            provider: provider_ref,
            user: user_ref,
            status,
            payment: payment_status,
            created_at,
        }
    }
}

impl ContentLake {
    /// Fetches [`Reservation`]s matching the provided query.
    async fn reservations(
        &self,
        query: Query,
    ) -> Result<Vec<Reservation>, Traced<database::Error>> {
        Ok(docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Database<Select<By<Option<Reservation>, reservation::Id>>>
    for ContentLake
{
    type Ok = Option<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Reservation>, reservation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .reservations(
                Query::new("reservation", PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Vec<Reservation>, provider::Id>>> for ContentLake {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider = by.into_inner();
        self.reservations(
            Query::new("reservation", PROJECTION)
                .clause("providerRef._ref == $provider")
                .bind("provider", provider),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<Vec<Reservation>, user::Id>>> for ContentLake {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user = by.into_inner();
        self.reservations(
            Query::new("reservation", PROJECTION)
                .clause("userRef._ref == $user")
                .bind("user", user),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<Vec<Reservation>, listing::Id>>> for ContentLake {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing = by.into_inner();
        self.reservations(
            Query::new("reservation", PROJECTION)
                .clause("serviceRef._ref == $service")
                .bind("service", listing),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Create<Reservation>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(reservation): Create<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Reservation {
            id,
            service,
            provider,
            user,
            status,
            payment,
            created_at,
        } = reservation;

        self.create(serde_json::json!({
            "_id": id,
            "_type": "reservation",
            "_createdAt": created_at.to_rfc3339(),
            "serviceRef": service.map(|s| serde_json::json!({ "_ref": s })),
            "providerRef": provider.map(|p| serde_json::json!({ "_ref": p })),
            "userRef": { "_ref": user },
            "status": status,
            "paymentStatus": payment,
        }))
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<reservation::StatusChange>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let reservation::StatusChange {
            reservation,
            status,
        } = op;
        self.mutate(vec![patch::Patch::new(reservation)
            .set("status", status)
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<reservation::Complete>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::Complete>,
    ) -> Result<Self::Ok, Self::Err> {
        let reservation::Complete { reservation } = op;
        self.mutate(vec![patch::Patch::new(reservation)
            .set("status", reservation::Status::Completed)
            .set("paymentStatus", reservation::PaymentStatus::Paid)
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<reservation::DetachService>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::DetachService>,
    ) -> Result<Self::Ok, Self::Err> {
        let reservation::DetachService { reservation } = op;
        self.mutate(vec![patch::Patch::new(reservation)
            .unset("serviceRef")
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Delete<reservation::Id>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<reservation::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(id).await.map_err(tracerr::wrap!())
    }
}

/// Projection of a [`HorseReservation`] document.
const HORSE_PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"horseRef\": horseRef._ref, \
    \"userRef\": userRef._ref, \
    status, paymentStatus}";

/// [`HorseReservation`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HorseDoc {
    /// ID of the document.
    id: horse_reservation::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: horse_reservation::CreationDateTime,

    /// Reserved horse reference.
    horse_ref: horse::Id,

    /// Requesting user reference.
    user_ref: user::Id,

    /// Status tag.
    status: reservation::Status,

    /// Payment status tag.
    payment_status: reservation::PaymentStatus,
}

impl From<HorseDoc> for HorseReservation {
    fn from(doc: HorseDoc) -> Self {
        let HorseDoc {
            id,
            created_at,
            horse_ref,
            user_ref,
            status,
            payment_status,
        } = doc;

        Self {
            id,
            horse: horse_ref,
            user: user_ref,
            status,
            payment: payment_status,
            created_at,
        }
    }
}

impl Database<Select<By<Vec<HorseReservation>, user::Id>>> for ContentLake {
    type Ok = Vec<HorseReservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<HorseReservation>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user = by.into_inner();
        Ok(docs::<HorseDoc>(
            self.fetch(
                Query::new("horseReservation", HORSE_PROJECTION)
                    .clause("userRef._ref == $user")
                    .bind("user", user),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?
        .into_iter()
        .map(Into::into)
        .collect())
    }
}

impl Database<Create<HorseReservation>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(reservation): Create<HorseReservation>,
    ) -> Result<Self::Ok, Self::Err> {
        let HorseReservation {
            id,
            horse,
            user,
            status,
            payment,
            created_at,
        } = reservation;

        self.create(serde_json::json!({
            "_id": id,
            "_type": "horseReservation",
            "_createdAt": created_at.to_rfc3339(),
            "horseRef": { "_ref": horse },
            "userRef": { "_ref": user },
            "status": status,
            "paymentStatus": payment,
        }))
        .await
        .map_err(tracerr::wrap!())
    }
}
