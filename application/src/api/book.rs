//! [`Book`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A book sold on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Book {
    /// ID of this [`Book`].
    id: Id,

    /// Underlying [`domain::Book`].
    book: OnceCell<domain::Book>,
}

impl From<domain::Book> for Book {
    fn from(book: domain::Book) -> Self {
        Self {
            id: book.id.into(),
            book: OnceCell::new_with(Some(book)),
        }
    }
}

impl Book {
    /// Creates a new [`Book`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Book`] with the provided ID exists,
    /// otherwise accessing this [`Book`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            book: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Book`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Book`] doesn't exist.
    async fn book(&self, ctx: &Context) -> Result<&domain::Book, Error> {
        let id = self.id.into();
        self.book
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::books::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A book sold on the marketplace.
#[graphql_object(context = Context)]
impl Book {
    /// Unique identifier of this `Book`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Title of this `Book` in both locales.
    pub async fn title(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.book(ctx).await?.title.clone())
    }

    /// Description of this `Book` in both locales.
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.book(ctx).await?.description.clone())
    }

    /// `User` who wrote this `Book`.
    pub async fn author(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.book(ctx).await?.author;
        #[expect(
            unsafe_code,
            reason = "reference loaded from the book document"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Price of this `Book`.
    pub async fn price(&self, ctx: &Context) -> Result<f64, Error> {
        Ok(self.book(ctx).await?.price.amount.to_f64().unwrap_or_default())
    }

    /// ISO 4217 currency code of the price.
    pub async fn currency(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.book(ctx).await?.price.currency.code().to_owned())
    }

    /// Category of this `Book`.
    pub async fn category(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.book(ctx).await?.category.to_string())
    }

    /// Cover images of this `Book`.
    pub async fn images(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::listing::Image>, Error> {
        Ok(self
            .book(ctx)
            .await?
            .images
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Rating aggregate of this `Book`.
    pub async fn rating(
        &self,
        ctx: &Context,
    ) -> Result<api::rating::Aggregate, Error> {
        Ok(self.book(ctx).await?.rating.into())
    }

    /// Individual ratings left on this `Book`.
    pub async fn ratings(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Rating>, Error> {
        ctx.service()
            .execute(query::ratings::BySubject::by(
                domain::rating::Subject::Book(self.id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ratings| ratings.into_iter().map(Into::into).collect())
    }

    /// Other `Book`s sharing this `Book`'s category.
    pub async fn related(&self, ctx: &Context) -> Result<Vec<Book>, Error> {
        let category = self.book(ctx).await?.category.clone();
        ctx.service()
            .execute(query::books::List::by(Some(category)))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|books| {
                books
                    .into_iter()
                    .filter(|b| b.id != self.id.into())
                    .map(Into::into)
                    .collect()
            })
    }

    /// `DateTime` when this `Book` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.book(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Book`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::book::Id)]
#[into(domain::book::Id)]
#[graphql(name = "BookId", transparent)]
pub struct Id(Uuid);
