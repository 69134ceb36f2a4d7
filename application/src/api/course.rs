//! [`Course`]-related definitions.

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

/// A training course sold on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Course {
    /// ID of this [`Course`].
    id: Id,

    /// Underlying [`domain::Course`].
    course: OnceCell<domain::Course>,
}

impl From<domain::Course> for Course {
    fn from(course: domain::Course) -> Self {
        Self {
            id: course.id.into(),
            course: OnceCell::new_with(Some(course)),
        }
    }
}

impl Course {
    /// Creates a new [`Course`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Course`] with the provided ID exists,
    /// otherwise accessing this [`Course`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            course: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Course`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Course`] doesn't exist.
    async fn course(&self, ctx: &Context) -> Result<&domain::Course, Error> {
        let id = self.id.into();
        self.course
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::courses::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CourseError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A training course sold on the marketplace.
#[graphql_object(context = Context)]
impl Course {
    /// Unique identifier of this `Course`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Title of this `Course` in both locales.
    pub async fn title(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.course(ctx).await?.title.clone())
    }

    /// Description of this `Course` in both locales.
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.course(ctx).await?.description.clone())
    }

    /// `User` who teaches this `Course`.
    pub async fn instructor(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.course(ctx).await?.instructor;
        #[expect(
            unsafe_code,
            reason = "reference loaded from the course document"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Price of this `Course`.
    pub async fn price(&self, ctx: &Context) -> Result<f64, Error> {
        Ok(self
            .course(ctx)
            .await?
            .price
            .amount
            .to_f64()
            .unwrap_or_default())
    }

    /// ISO 4217 currency code of the price.
    pub async fn currency(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.course(ctx).await?.price.currency.code().to_owned())
    }

    /// Category of this `Course`.
    pub async fn category(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.course(ctx).await?.category.to_string())
    }

    /// Images of this `Course`.
    pub async fn images(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::listing::Image>, Error> {
        Ok(self
            .course(ctx)
            .await?
            .images
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Rating aggregate of this `Course`.
    pub async fn rating(
        &self,
        ctx: &Context,
    ) -> Result<api::rating::Aggregate, Error> {
        Ok(self.course(ctx).await?.rating.into())
    }

    /// Individual ratings left on this `Course`.
    pub async fn ratings(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Rating>, Error> {
        ctx.service()
            .execute(query::ratings::BySubject::by(
                domain::rating::Subject::Course(self.id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ratings| ratings.into_iter().map(Into::into).collect())
    }

    /// Other `Course`s sharing this `Course`'s category.
    pub async fn related(&self, ctx: &Context) -> Result<Vec<Course>, Error> {
        let category = self.course(ctx).await?.category.clone();
        ctx.service()
            .execute(query::courses::List::by(Some(category)))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|courses| {
                courses
                    .into_iter()
                    .filter(|c| c.id != self.id.into())
                    .map(Into::into)
                    .collect()
            })
    }

    /// `DateTime` when this `Course` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.course(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Course`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::course::Id)]
#[into(domain::course::Id)]
#[graphql(name = "CourseId", transparent)]
pub struct Id(Uuid);
