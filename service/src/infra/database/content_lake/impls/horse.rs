//! [`Horse`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{horse, listing, user, Horse},
    infra::{
        database::{
            self,
            content_lake::{ContentLake, Query},
        },
        Database,
    },
};

use super::{docs, invalid};

/// Projection of a [`Horse`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"ownerRef\": ownerRef._ref, \
    name, breed, images, purpose}";

/// [`Horse`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: horse::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: horse::CreationDateTime,

    /// Owner reference.
    owner_ref: user::Id,

    /// Name of the horse.
    name: String,

    /// Breed of the horse.
    breed: String,

    /// Images.
    #[serde(default)]
    images: Vec<listing::Image>,

    /// Listing purpose tag.
    purpose: horse::Purpose,
}

impl TryFrom<Doc> for Horse {
    type Error = &'static str;

    fn try_from(doc: Doc) -> Result<Self, Self::Error> {
        let Doc {
            id,
            created_at,
            owner_ref,
            name,
            breed,
            images,
            purpose,
        } = doc;

        Ok(Self {
            id,
            owner: owner_ref,
            name: horse::Name::new(name).ok_or("invalid `horse.name`")?,
            breed: horse::Breed::new(breed).ok_or("invalid `horse.breed`")?,
            images,
            purpose,
            created_at,
        })
    }
}

impl ContentLake {
    /// Fetches [`Horse`]s matching the provided query.
    async fn horses(
        &self,
        query: Query,
    ) -> Result<Vec<Horse>, Traced<database::Error>> {
        docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| Horse::try_from(d).map_err(invalid))
            .collect()
    }
}

impl Database<Select<By<Option<Horse>, horse::Id>>> for ContentLake {
    type Ok = Option<Horse>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Horse>, horse::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .horses(
                Query::new("horse", PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Vec<Horse>, user::Id>>> for ContentLake {
    type Ok = Vec<Horse>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Horse>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner = by.into_inner();
        self.horses(
            Query::new("horse", PROJECTION)
                .clause("ownerRef._ref == $owner")
                .bind("owner", owner),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}
