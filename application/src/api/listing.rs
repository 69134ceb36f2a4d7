//! [`Listing`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A service listing.
#[derive(Clone, Debug, From)]
pub struct Listing {
    /// ID of this [`Listing`].
    id: Id,

    /// Underlying [`domain::ServiceListing`].
    listing: OnceCell<domain::ServiceListing>,
}

impl From<domain::ServiceListing> for Listing {
    fn from(listing: domain::ServiceListing) -> Self {
        Self {
            id: listing.id.into(),
            listing: OnceCell::new_with(Some(listing)),
        }
    }
}

impl Listing {
    /// Creates a new [`Listing`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Listing`] with the provided ID exists,
    /// otherwise accessing this [`Listing`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            listing: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::ServiceListing`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::ServiceListing`] doesn't exist.
    async fn listing(
        &self,
        ctx: &Context,
    ) -> Result<&domain::ServiceListing, Error> {
        let id = self.id.into();
        self.listing
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::listing::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.ok_or_else(|| {
                            api::query::ListingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A service listing.
#[graphql_object(context = Context)]
impl Listing {
    /// Unique identifier of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Listing` in both locales.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<common::Bilingual, Error> {
        Ok(self.listing(ctx).await?.name.clone())
    }

    /// Description of this `Listing` in both locales.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<common::Bilingual, Error> {
        Ok(self.listing(ctx).await?.description.clone())
    }

    /// Kind of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.listing(ctx).await?.kind.into())
    }

    /// Price of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Price, Error> {
        Ok(self.listing(ctx).await?.price.into())
    }

    /// Indicator whether this `Listing` passed both approvals.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.isPublic",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_public(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.listing(ctx).await?.is_public())
    }

    /// Images of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.images",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn images(&self, ctx: &Context) -> Result<Vec<Image>, Error> {
        Ok(self
            .listing(ctx)
            .await?
            .images
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Location of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        let location = &self.listing(ctx).await?.location;
        Ok(Location {
            country: location.country.to_string(),
            region: location.region.as_ref().map(ToString::to_string),
            city: location.city.to_string(),
        })
    }

    /// `Provider` offering this `Listing`, if attached.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.provider",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn provider(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Provider>, Error> {
        Ok(self.listing(ctx).await?.provider.map(|id| {
            #[expect(
                unsafe_code,
                reason = "reference loaded from the listing document"
            )]
            unsafe {
                api::Provider::new_unchecked(id)
            }
        }))
    }

    /// Kind-specific details of this `Listing` as a raw JSON string.
    ///
    /// The shape is owned by the content lake schema and passed through
    /// untouched.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.details",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn details(
        &self,
        ctx: &Context,
    ) -> Result<Option<String>, Error> {
        Ok(self
            .listing(ctx)
            .await?
            .details
            .clone()
            .map(|d| serde_json::Value::from(d).to_string()))
    }

    /// Rating aggregate of this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(
        &self,
        ctx: &Context,
    ) -> Result<api::rating::Aggregate, Error> {
        Ok(self.listing(ctx).await?.rating.into())
    }

    /// Individual ratings left on this `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.ratings",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ratings(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Rating>, Error> {
        ctx.service()
            .execute(query::ratings::BySubject::by(
                domain::rating::Subject::Listing(self.id.into()),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ratings| ratings.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Listing` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Listing.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.listing(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Listing`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::listing::Id)]
#[into(domain::listing::Id)]
#[graphql(name = "ListingId", transparent)]
pub struct Id(Uuid);

/// Kind of a `Listing`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ListingKind")]
pub enum Kind {
    /// Stable renting out boxes.
    Stable,

    /// Veterinary service.
    Veterinary,

    /// Competition organization.
    Competition,

    /// Horse housing.
    Housing,

    /// Trip coordination.
    TripCoordinator,

    /// Catering.
    Catering,

    /// Horse transport.
    Transport,

    /// Contractor works.
    Contractor,

    /// Equipment and feed supply.
    Supplier,

    /// Horse training.
    Trainer,

    /// Hoof trimming.
    HoofTrimmer,

    /// Horse grooming.
    Grooming,

    /// Event judging.
    EventJudging,

    /// Marketing services.
    Marketing,

    /// Event commentary.
    EventCommentary,

    /// Consulting.
    Consulting,

    /// Photography.
    Photography,
}

impl From<domain::listing::Kind> for Kind {
    fn from(kind: domain::listing::Kind) -> Self {
        use domain::listing::Kind as K;

        match kind {
            K::Stable => Self::Stable,
            K::Veterinary => Self::Veterinary,
            K::Competition => Self::Competition,
            K::Housing => Self::Housing,
            K::TripCoordinator => Self::TripCoordinator,
            K::Catering => Self::Catering,
            K::Transport => Self::Transport,
            K::Contractor => Self::Contractor,
            K::Supplier => Self::Supplier,
            K::Trainer => Self::Trainer,
            K::HoofTrimmer => Self::HoofTrimmer,
            K::Grooming => Self::Grooming,
            K::EventJudging => Self::EventJudging,
            K::Marketing => Self::Marketing,
            K::EventCommentary => Self::EventCommentary,
            K::Consulting => Self::Consulting,
            K::Photography => Self::Photography,
        }
    }
}

impl From<Kind> for domain::listing::Kind {
    fn from(kind: Kind) -> Self {
        use Kind as K;

        match kind {
            K::Stable => Self::Stable,
            K::Veterinary => Self::Veterinary,
            K::Competition => Self::Competition,
            K::Housing => Self::Housing,
            K::TripCoordinator => Self::TripCoordinator,
            K::Catering => Self::Catering,
            K::Transport => Self::Transport,
            K::Contractor => Self::Contractor,
            K::Supplier => Self::Supplier,
            K::Trainer => Self::Trainer,
            K::HoofTrimmer => Self::HoofTrimmer,
            K::Grooming => Self::Grooming,
            K::EventJudging => Self::EventJudging,
            K::Marketing => Self::Marketing,
            K::EventCommentary => Self::EventCommentary,
            K::Consulting => Self::Consulting,
            K::Photography => Self::Photography,
        }
    }
}

/// Price of a `Listing`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "ListingPrice")]
pub struct Price {
    /// Amount of the price.
    pub amount: f64,

    /// ISO 4217 currency code of the price.
    pub currency: String,

    /// Unit the price is applied per.
    pub unit: PriceUnit,
}

impl From<domain::listing::Price> for Price {
    fn from(price: domain::listing::Price) -> Self {
        Self {
            amount: price.money.amount.to_f64().unwrap_or_default(),
            currency: price.money.currency.code().to_owned(),
            unit: price.unit.into(),
        }
    }
}

/// Unit a `ListingPrice` is applied per.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum PriceUnit {
    /// Per whole service.
    PerService,

    /// Per hour.
    PerHour,

    /// Per day.
    PerDay,

    /// Per month.
    PerMonth,
}

impl From<domain::listing::Unit> for PriceUnit {
    fn from(unit: domain::listing::Unit) -> Self {
        use domain::listing::Unit as U;

        match unit {
            U::PerService => Self::PerService,
            U::PerHour => Self::PerHour,
            U::PerDay => Self::PerDay,
            U::PerMonth => Self::PerMonth,
        }
    }
}

impl From<PriceUnit> for domain::listing::Unit {
    fn from(unit: PriceUnit) -> Self {
        use PriceUnit as U;

        match unit {
            U::PerService => Self::PerService,
            U::PerHour => Self::PerHour,
            U::PerDay => Self::PerDay,
            U::PerMonth => Self::PerMonth,
        }
    }
}

/// Image of a `Listing`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ListingImage")]
pub struct Image {
    /// Key of the image in the collection.
    pub key: String,

    /// CDN asset reference of the image, resolved to a URL by the front
    /// end's image helper.
    pub asset: String,
}

impl From<domain::listing::Image> for Image {
    fn from(image: domain::listing::Image) -> Self {
        Self {
            key: image.key,
            asset: image.asset,
        }
    }
}

/// Location of a `Listing`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ListingLocation")]
pub struct Location {
    /// Country of the location.
    pub country: String,

    /// Region of the location.
    pub region: Option<String>,

    /// City of the location.
    pub city: String,
}

/// Sort applied over a fetched `Listing` collection.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum SortBy {
    /// Cheapest first.
    PriceLowToHigh,

    /// Most expensive first.
    PriceHighToLow,

    /// Best rated first.
    RatingHighToLow,

    /// Most recently created first.
    Newest,

    /// Original relevance order.
    Relevance,
}

impl From<SortBy> for service::read::listing::SortKey {
    fn from(sort: SortBy) -> Self {
        use SortBy as S;

        match sort {
            S::PriceLowToHigh => Self::PriceLowToHigh,
            S::PriceHighToLow => Self::PriceHighToLow,
            S::RatingHighToLow => Self::RatingHighToLow,
            S::Newest => Self::Newest,
            S::Relevance => Self::Relevance,
        }
    }
}

pub mod list {
    //! Definitions related to [`Listing`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use crate::{api::scalar, Context};

    use super::{Id, Listing};

    /// Cursor for the `Listing` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::listing::list::Cursor)]
    #[graphql(
        name = "ListingListCursor",
        with = scalar::Via::<read::listing::list::Cursor>,
    )]
    pub struct Cursor(pub read::listing::list::Cursor);

    /// Edge in the [`Listing`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::listing::list::Edge);

    /// Edge in the `Listing` list.
    #[graphql_object(name = "ListingListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ListingListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ListingListEdge`.
        #[must_use]
        pub fn node(&self) -> Listing {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Listing` \
                          existence"
            )]
            unsafe {
                Listing::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Listing`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::listing::list::Connection);

    /// Connection of the `Listing` list.
    #[graphql_object(name = "ListingListConnection", context = Context)]
    impl Connection {
        /// Edges in this `ListingListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            self.0.page_info().into()
        }
    }

    /// Information about a page of [`Listing`]s.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct PageInfo(read::listing::list::PageInfo);

    /// Information about a page of `Listing`s.
    #[graphql_object(name = "ListingListPageInfo", context = Context)]
    impl PageInfo {
        /// Last cursor on the page.
        #[must_use]
        pub fn end_cursor(&self) -> Option<Cursor> {
            self.0.end_cursor.map(Into::into)
        }

        /// Indicator whether a next page exists.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.0.has_next_page
        }

        /// Indicator whether a previous page exists.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.0.has_previous_page
        }
    }
}
