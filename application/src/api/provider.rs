//! [`Provider`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A service-offering provider.
#[derive(Clone, Debug, From)]
pub struct Provider {
    /// ID of this [`Provider`].
    id: Id,

    /// Underlying [`domain::Provider`].
    provider: OnceCell<domain::Provider>,
}

impl From<domain::Provider> for Provider {
    fn from(provider: domain::Provider) -> Self {
        Self {
            id: provider.id.into(),
            provider: OnceCell::new_with(Some(provider)),
        }
    }
}

impl Provider {
    /// Creates a new [`Provider`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Provider`] with the provided ID exists,
    /// otherwise accessing this [`Provider`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            provider: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Provider`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Provider`] doesn't exist.
    async fn provider(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Provider, Error> {
        let id = self.id.into();
        self.provider
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::provider::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::ProviderError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A service-offering provider.
#[graphql_object(context = Context)]
impl Provider {
    /// Unique identifier of this `Provider`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Provider` in both locales.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.provider(ctx).await?.name.clone())
    }

    /// `User` owning this `Provider`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.provider(ctx).await?.user;
        #[expect(
            unsafe_code,
            reason = "reference loaded from the provider document"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Main `Listing` of this `Provider`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.mainService",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn main_service(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Listing>, Error> {
        Ok(self.provider(ctx).await?.main_service.map(|id| {
            #[expect(
                unsafe_code,
                reason = "reference loaded from the provider document"
            )]
            unsafe {
                api::Listing::new_unchecked(id)
            }
        }))
    }

    /// Additional `Listing`s of this `Provider`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.services",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn services(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Listing>, Error> {
        Ok(self
            .provider(ctx)
            .await?
            .services
            .iter()
            .map(|id| {
                #[expect(
                    unsafe_code,
                    reason = "reference loaded from the provider document"
                )]
                unsafe {
                    api::Listing::new_unchecked(*id)
                }
            })
            .collect())
    }

    /// `DateTime` when this `Provider` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Provider.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.provider(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Provider`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::provider::Id)]
#[into(domain::provider::Id)]
#[graphql(name = "ProviderId", transparent)]
pub struct Id(Uuid);
