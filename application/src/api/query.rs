//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Listing` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "listing",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn listing(
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        ctx.service()
            .execute(query::listing::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ListingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of publicly visible `Listing`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `INVALID_MIN_RATING` - the `minRating` is outside 1..=5.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "listings",
            kind = ?kind,
            last = ?last,
            min_rating = ?min_rating,
            otel.name = Self::SPAN_NAME,
            search = ?search,
        ),
    )]
    pub async fn listings(
        first: Option<i32>,
        after: Option<api::listing::list::Cursor>,
        last: Option<i32>,
        before: Option<api::listing::list::Cursor>,
        kind: Option<api::listing::Kind>,
        search: Option<String>,
        min_rating: Option<i32>,
        ctx: &Context,
    ) -> Result<api::listing::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 12;

        let arguments = read::listing::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::listings::List::by(
                read::listing::list::Selector {
                    arguments,
                    filter: filter(kind, search, min_rating)
                        .map_err(ctx.error())?,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the whole publicly visible `Listing` collection matching the
    /// filter, sorted client-side the way a listing page renders it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_MIN_RATING` - the `minRating` is outside 1..=5.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "searchListings",
            kind = ?kind,
            min_rating = ?min_rating,
            otel.name = Self::SPAN_NAME,
            search = ?search,
            sort_by = ?sort_by,
        ),
    )]
    pub async fn search_listings(
        kind: Option<api::listing::Kind>,
        search: Option<String>,
        min_rating: Option<i32>,
        sort_by: Option<api::listing::SortBy>,
        ctx: &Context,
    ) -> Result<Vec<api::Listing>, Error> {
        let mut listings = ctx
            .service()
            .execute(query::listings::Snapshot::by(
                filter(kind, search, min_rating).map_err(ctx.error())?,
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        read::listing::SortKey::from(
            sort_by.unwrap_or(api::listing::SortBy::Relevance),
        )
        .apply(&mut listings);

        Ok(listings.into_iter().map(Into::into).collect())
    }

    /// Returns the `Provider` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROVIDER_NOT_EXISTS` - the `Provider` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "provider",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn provider(
        id: api::provider::Id,
        ctx: &Context,
    ) -> Result<api::Provider, Error> {
        ctx.service()
            .execute(query::provider::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProviderError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Provider` owned by the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProvider",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_provider(ctx: &Context) -> Result<api::Provider, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Book` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOK_NOT_EXISTS` - the `Book` with the specified ID does not
    ///                       exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "book",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn book(
        id: api::book::Id,
        ctx: &Context,
    ) -> Result<api::Book, Error> {
        ctx.service()
            .execute(query::books::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches `Book`s, optionally narrowed to one category.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "books",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn books(
        category: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::Book>, Error> {
        let category = category
            .map(domain::book::Category::new)
            .map(|c| c.ok_or_else(|| Error::from(FilterError::Category)))
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::books::List::by(category))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|books| books.into_iter().map(Into::into).collect())
    }

    /// Returns the `Course` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `COURSE_NOT_EXISTS` - the `Course` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "course",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn course(
        id: api::course::Id,
        ctx: &Context,
    ) -> Result<api::Course, Error> {
        ctx.service()
            .execute(query::courses::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CourseError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches `Course`s, optionally narrowed to one category.
    #[tracing::instrument(
        skip_all,
        fields(
            category = ?category,
            gql.name = "courses",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn courses(
        category: Option<String>,
        ctx: &Context,
    ) -> Result<Vec<api::Course>, Error> {
        let category = category
            .map(domain::course::Category::new)
            .map(|c| c.ok_or_else(|| Error::from(FilterError::Category)))
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::courses::List::by(category))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|courses| courses.into_iter().map(Into::into).collect())
    }

    /// Returns the `Horse` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HORSE_NOT_EXISTS` - the `Horse` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "horse",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn horse(
        id: api::horse::Id,
        ctx: &Context,
    ) -> Result<api::Horse, Error> {
        ctx.service()
            .execute(query::horses::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| HorseError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the `Horse`s owned by the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myHorses",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_horses(ctx: &Context) -> Result<Vec<api::Horse>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::horses::ByOwner::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|horses| horses.into_iter().map(Into::into).collect())
    }

    /// Fetches the `Reservation`s requested by the currently authenticated
    /// `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myReservations",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_reservations(
        ctx: &Context,
    ) -> Result<Vec<api::Reservation>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::reservations::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Fetches the `HorseReservation`s requested by the currently
    /// authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myHorseReservations",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_horse_reservations(
        ctx: &Context,
    ) -> Result<Vec<api::reservation::HorseReservation>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::reservations::HorsesByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Fetches the `Reservation`s received by the provider of the currently
    /// authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myProviderReservations",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_provider_reservations(
        ctx: &Context,
    ) -> Result<Vec<api::Reservation>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let provider = ctx
            .service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::reservations::ByProvider::by(provider.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Fetches the `Order`s placed by the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myOrders",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_orders(ctx: &Context) -> Result<Vec<api::Order>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::orders::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|orders| orders.into_iter().map(Into::into).collect())
    }

    /// Resolves a wishlist collection of the currently authenticated `User`
    /// into whole `Listing`s.
    #[tracing::instrument(
        skip_all,
        fields(
            collection = ?collection,
            gql.name = "myWishlist",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_wishlist(
        collection: api::user::WishlistCollection,
        ctx: &Context,
    ) -> Result<Vec<api::Listing>, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let user = ctx
            .service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())?;

        let ids = user
            .wishlist
            .collection(domain::user::Collection::from(collection))
            .to_vec();
        ctx.service()
            .execute(query::wishlist::Resolve::by(ids))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listings| listings.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`read::listing::Filter`] out of the raw query arguments.
fn filter(
    kind: Option<api::listing::Kind>,
    search: Option<String>,
    min_rating: Option<i32>,
) -> Result<read::listing::Filter, Error> {
    Ok(read::listing::Filter {
        kind: kind.map(Into::into),
        // An empty term omits the clause rather than matching everything.
        search: search.as_deref().and_then(read::listing::SearchTerm::new),
        min_rating: min_rating
            .map(|v| {
                domain::rating::Value::try_from(v)
                    .map_err(|_| Error::from(FilterError::MinRating))
            })
            .transpose()?,
        public_only: true,
    })
}

define_error! {
    enum BookError {
        #[code = "BOOK_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Book` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CourseError {
        #[code = "COURSE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Course` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum FilterError {
        #[code = "INVALID_MIN_RATING"]
        #[status = BAD_REQUEST]
        #[message = "`minRating` must be between 1 and 5"]
        MinRating,

        #[code = "INVALID_CATEGORY"]
        #[status = BAD_REQUEST]
        #[message = "`category` must be a non-empty string"]
        Category,
    }
}

define_error! {
    enum HorseError {
        #[code = "HORSE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Horse` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Listing` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ProviderError {
        #[code = "PROVIDER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Provider` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
