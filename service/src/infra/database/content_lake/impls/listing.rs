//! [`ServiceListing`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::{
    money,
    operations::{By, Create, Delete, Patch, Select},
    Bilingual, Money,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracerr::Traced;

use crate::{
    domain::{listing, provider, rating, ServiceListing},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, MatchPattern, Query},
        },
        Database,
    },
    read,
};

use super::{docs, invalid};

/// Projection of a [`ServiceListing`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    name, description, price, currency, priceUnit, kind, \
    approvedByAdmin, approvedByProvider, images, \
    country, region, city, \
    \"providerRef\": providerRef._ref, \
    details, averageRating, ratingCount}";

/// [`ServiceListing`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: listing::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: listing::CreationDateTime,

    /// Bilingual name.
    #[serde(default)]
    name: Bilingual,

    /// Bilingual description.
    #[serde(default)]
    description: Bilingual,

    /// Price amount.
    price: Decimal,

    /// ISO 4217 currency code.
    currency: String,

    /// Unit the price is applied per.
    price_unit: listing::Unit,

    /// Kind tag.
    kind: listing::Kind,

    /// Administrator approval flag.
    #[serde(default)]
    approved_by_admin: bool,

    /// Provider approval flag.
    #[serde(default)]
    approved_by_provider: bool,

    /// Images collection.
    #[serde(default)]
    images: Vec<listing::Image>,

    /// Country of the location.
    country: String,

    /// Region of the location.
    region: Option<String>,

    /// City of the location.
    city: String,

    /// Provider reference, if any.
    provider_ref: Option<provider::Id>,

    /// Kind-specific details.
    details: Option<Value>,

    /// Denormalized average rating.
    average_rating: Option<f64>,

    /// Denormalized rating count.
    rating_count: Option<i32>,
}

impl TryFrom<Doc> for ServiceListing {
    type Error = String;

    fn try_from(doc: Doc) -> Result<Self, Self::Error> {
        let Doc {
            id,
            created_at,
            name,
            description,
            price,
            currency,
            price_unit,
            kind,
            approved_by_admin,
            approved_by_provider,
            images,
            country,
            region,
            city,
            provider_ref,
            details,
            average_rating,
            rating_count,
        } = doc;

        Ok(Self {
            id,
            name,
            description,
            price: listing::Price {
                money: Money {
                    amount: price,
                    currency: money::Currency::from_code(&currency)
                        .ok_or_else(|| {
                            format!("invalid `currency`: {currency}")
                        })?,
                },
                unit: price_unit,
            },
            kind,
            approval: listing::Approval {
                by_admin: approved_by_admin,
                by_provider: approved_by_provider,
            },
            images,
            location: listing::Location {
                country: listing::Country::new(country)
                    .ok_or("invalid `country`")?,
                region: region
                    .map(|r| {
                        listing::Region::new(r).ok_or("invalid `region`")
                    })
                    .transpose()?,
                city: listing::City::new(city).ok_or("invalid `city`")?,
            },
            provider: provider_ref,
            details: details.map(Into::into),
            rating: rating::Aggregate {
                average: average_rating.unwrap_or_default(),
                count: rating_count.unwrap_or_default(),
            },
            created_at,
        })
    }
}

impl ContentLake {
    /// Fetches [`ServiceListing`]s matching the provided query.
    async fn listings(
        &self,
        query: Query,
    ) -> Result<Vec<ServiceListing>, Traced<database::Error>> {
        docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| ServiceListing::try_from(d).map_err(invalid))
            .collect()
    }
}

/// Applies the provided [`Filter`] clauses to a [`Query`].
///
/// [`Filter`]: read::listing::Filter
fn filtered(mut query: Query, filter: &read::listing::Filter) -> Query {
    if filter.public_only {
        query = query.clause("approvedByAdmin && approvedByProvider");
    }
    if let Some(kind) = filter.kind {
        query = query.clause("kind == $kind").bind("kind", kind);
    }
    if let Some(min) = filter.min_rating {
        query = query
            .clause("defined(averageRating) && averageRating >= $minRating")
            .bind("minRating", min.get());
    }
    // An empty term never reaches here: `SearchTerm` is non-empty by
    // construction, and an unset one omits the clause entirely.
    if let Some(term) = &filter.search {
        query = query
            .clause("(name.en match $term || name.ar match $term)")
            .bind("term", MatchPattern::new(term.as_ref()).to_string());
    }
    query
}

impl Database<Select<By<Option<ServiceListing>, listing::Id>>>
    for ContentLake
{
    type Ok = Option<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ServiceListing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .listings(
                Query::new("serviceListing", PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Vec<ServiceListing>, read::listing::Filter>>>
    for ContentLake
{
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, read::listing::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.listings(
            filtered(Query::new("serviceListing", PROJECTION), &filter)
                .order("_createdAt desc"),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<read::listing::list::Page, read::listing::list::Selector>>>
    for ContentLake
{
    type Ok = read::listing::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::listing::list::Page, read::listing::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector { arguments, filter } =
            by.into_inner();

        let mut query =
            filtered(Query::new("serviceListing", "{\"id\": _id}"), &filter);
        if let Some(cursor) = arguments.cursor() {
            query = query
                .clause(format!("_id {} $cursor", arguments.kind().operator()))
                .bind("cursor", *cursor);
        }
        let order = match arguments.kind().order() {
            common::pagination::Order::Ascending => "_id asc",
            common::pagination::Order::Descending => "_id desc",
        };

        /// Identifier-only row of a paginated query.
        #[derive(Deserialize)]
        struct Row {
            /// ID of the matched document.
            id: listing::Id,
        }

        let limit = arguments.limit();
        // One extra row indicates whether more pages exist.
        let mut ids = docs::<Row>(
            self.fetch(query.order(order).limit(limit + 1))
                .await
                .map_err(tracerr::wrap!())?,
        )?
        .into_iter()
        .map(|r| r.id)
        .collect::<Vec<_>>();

        let has_more = ids.len() > limit;
        ids.truncate(limit);

        Ok(read::listing::list::Page::new(
            &arguments,
            ids.into_iter().map(|id| (id, id)),
            has_more,
        ))
    }
}

impl Database<Select<By<Vec<ServiceListing>, provider::Id>>> for ContentLake {
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider = by.into_inner();
        self.listings(
            Query::new("serviceListing", PROJECTION)
                .clause("providerRef._ref == $provider")
                .bind("provider", provider),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<Vec<ServiceListing>, Vec<listing::Id>>>>
    for ContentLake
{
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, Vec<listing::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.listings(
            Query::new("serviceListing", PROJECTION)
                .clause("_id in $ids")
                .bind("ids", ids),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Create<ServiceListing>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(listing): Create<ServiceListing>,
    ) -> Result<Self::Ok, Self::Err> {
        let ServiceListing {
            id,
            name,
            description,
            price,
            kind,
            approval,
            images,
            location,
            provider,
            details,
            rating,
            created_at,
        } = listing;

        self.create(serde_json::json!({
            "_id": id,
            "_type": "serviceListing",
            "_createdAt": created_at.to_rfc3339(),
            "name": name,
            "description": description,
            "price": price.money.amount,
            "currency": price.money.currency.code(),
            "priceUnit": price.unit,
            "kind": kind,
            "approvedByAdmin": approval.by_admin,
            "approvedByProvider": approval.by_provider,
            "images": images,
            "country": location.country.to_string(),
            "region": location.region.map(|r| r.to_string()),
            "city": location.city.to_string(),
            "providerRef": provider
                .map(|p| serde_json::json!({ "_ref": p })),
            "details": details.map(Value::from),
            "averageRating": (rating.count > 0).then_some(rating.average),
            "ratingCount": (rating.count > 0).then_some(rating.count),
        }))
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<listing::DetachProvider>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<listing::DetachProvider>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing::DetachProvider { listing } = op;
        self.mutate(vec![patch::Patch::new(listing)
            .unset("providerRef")
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Delete<listing::Id>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<listing::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(id).await.map_err(tracerr::wrap!())
    }
}
