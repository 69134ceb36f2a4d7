//! [`Horse`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A horse listed on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Horse {
    /// ID of this [`Horse`].
    id: Id,

    /// Underlying [`domain::Horse`].
    horse: OnceCell<domain::Horse>,
}

impl From<domain::Horse> for Horse {
    fn from(horse: domain::Horse) -> Self {
        Self {
            id: horse.id.into(),
            horse: OnceCell::new_with(Some(horse)),
        }
    }
}

impl Horse {
    /// Creates a new [`Horse`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Horse`] with the provided ID exists,
    /// otherwise accessing this [`Horse`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            horse: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Horse`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Horse`] doesn't exist.
    async fn horse(&self, ctx: &Context) -> Result<&domain::Horse, Error> {
        let id = self.id.into();
        self.horse
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::horses::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|h| {
                        future::ready(h.ok_or_else(|| {
                            api::query::HorseError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A horse listed on the marketplace.
#[graphql_object(context = Context)]
impl Horse {
    /// Unique identifier of this `Horse`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Horse`.
    pub async fn name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.horse(ctx).await?.name.to_string())
    }

    /// Breed of this `Horse`.
    pub async fn breed(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.horse(ctx).await?.breed.to_string())
    }

    /// `User` owning this `Horse`.
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.horse(ctx).await?.owner;
        #[expect(
            unsafe_code,
            reason = "reference loaded from the horse document"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Images of this `Horse`.
    pub async fn images(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::listing::Image>, Error> {
        Ok(self
            .horse(ctx)
            .await?
            .images
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Purpose this `Horse` is listed for.
    pub async fn purpose(&self, ctx: &Context) -> Result<Purpose, Error> {
        Ok(self.horse(ctx).await?.purpose.into())
    }

    /// Indicator whether this `Horse` accepts reservations.
    pub async fn is_reservable(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.horse(ctx).await?.is_reservable())
    }

    /// `DateTime` when this `Horse` was listed.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.horse(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Horse`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::horse::Id)]
#[into(domain::horse::Id)]
#[graphql(name = "HorseId", transparent)]
pub struct Id(Uuid);

/// Purpose a `Horse` is listed for.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "HorsePurpose")]
pub enum Purpose {
    /// Available for rent.
    Rent,

    /// Offered for sale.
    Sale,

    /// Shown for breeding.
    Breeding,
}

impl From<domain::horse::Purpose> for Purpose {
    fn from(purpose: domain::horse::Purpose) -> Self {
        use domain::horse::Purpose as P;

        match purpose {
            P::Rent => Self::Rent,
            P::Sale => Self::Sale,
            P::Breeding => Self::Breeding,
        }
    }
}
