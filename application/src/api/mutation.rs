//! GraphQL [`Mutation`]s definitions.

use common::{money, Bilingual, Money};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
};
use rust_decimal::{prelude::FromPrimitive as _, Decimal};
use service::{command, domain, query, Command as _, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials and contact info.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = %email,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        email: api::user::Email,
        password: api::user::Password,
        phone: Option<api::user::Phone>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(crate::Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials do not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            email = %email,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(crate::Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Toggles a `Listing` in a wishlist collection of the authenticated
    /// `User`.
    ///
    /// Toggling the same pair twice returns the wishlist to its original
    /// state.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the toggled `Listing` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            collection = ?collection,
            gql.name = "toggleWishlist",
            listing_id = %listing_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn toggle_wishlist(
        collection: api::user::WishlistCollection,
        listing_id: api::listing::Id,
        ctx: &Context,
    ) -> Result<WishlistToggleResult, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(command::ToggleWishlist {
                user_id: my_id.into(),
                collection: collection.into(),
                item: listing_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits a rating on a `Listing`, a `Book` or a `Course`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_RATING_SUBJECT` - not exactly one subject reference is
    ///                                provided;
    /// - `RATING_VALUE_OUT_OF_RANGE` - the value is outside 1..=5;
    /// - `INVALID_RATING_MESSAGE` - the message is empty or too long;
    /// - `ALREADY_RATED` - the authenticated `User` already rated the
    ///                     subject.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "submitRating",
            otel.name = Self::SPAN_NAME,
            value = value,
        ),
    )]
    pub async fn submit_rating(
        subject: RatingSubject,
        value: i32,
        message: Option<String>,
        ctx: &Context,
    ) -> Result<api::Rating, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let value = domain::rating::Value::try_from(value)
            .map_err(|_| Error::from(RatingError::ValueOutOfRange))
            .map_err(ctx.error())?;
        let message = message
            .map(|m| {
                domain::rating::Message::new(m)
                    .ok_or_else(|| Error::from(RatingError::InvalidMessage))
            })
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::SubmitRating {
                subject: subject.resolve().map_err(ctx.error())?,
                author: my_id.into(),
                value,
                message,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a `Reservation` of a `Listing` for the authenticated `User`.
    ///
    /// A free-of-charge service completes the reservation right away;
    /// priced ones stay pending for the external payment flow.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the reserved `Listing` does not exist or is
    ///                          not public.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createReservation",
            otel.name = Self::SPAN_NAME,
            service_id = %service_id,
        ),
    )]
    pub async fn create_reservation(
        service_id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(command::CreateReservation {
                service: service_id.into(),
                user: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Transitions a `Reservation` received by the authenticated `User`'s
    /// provider.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider;
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` does not exist or
    ///                              belongs to another provider;
    /// - `ILLEGAL_STATUS_TRANSITION` - the requested transition is not
    ///                                 legal.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateReservationStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_reservation_status(
        id: api::reservation::Id,
        status: api::reservation::Status,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let provider = ctx
            .service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())?;

        let reservation = ctx
            .service()
            .execute(query::reservations::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|r| r.provider == Some(provider.id))
            .ok_or_else(|| ReservationError::NotExists.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateReservationStatus {
                reservation: reservation.id,
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Places an `Order` of a `Book` or a `Course` for the authenticated
    /// `User`.
    ///
    /// A free-of-charge subject completes the order right away; priced ones
    /// stay pending for the external payment flow.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_ORDER_SUBJECT` - not exactly one subject reference is
    ///                               provided;
    /// - `ORDER_SUBJECT_NOT_EXISTS` - the ordered subject does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createOrder",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_order(
        subject: OrderSubject,
        ctx: &Context,
    ) -> Result<api::Order, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(command::CreateOrder {
                subject: subject.resolve().map_err(ctx.error())?,
                user: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a `HorseReservation` for the authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `HORSE_NOT_EXISTS` - the reserved `Horse` does not exist;
    /// - `HORSE_NOT_FOR_RENT` - the `Horse` is not listed for rent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createHorseReservation",
            horse_id = %horse_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_horse_reservation(
        horse_id: api::horse::Id,
        ctx: &Context,
    ) -> Result<api::reservation::HorseReservation, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(command::CreateHorseReservation {
                horse: horse_id.into(),
                user: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a `Listing` on behalf of the authenticated `User`'s
    /// provider.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider;
    /// - `INVALID_PRICE` - the price is negative or not representable;
    /// - `INVALID_CURRENCY` - the currency code is unknown;
    /// - `INVALID_LOCATION` - a location part is empty or too long;
    /// - `INVALID_DETAILS` - the details are not valid JSON.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createListing",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_listing(
        input: CreateListingInput,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let provider = ctx
            .service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())?;

        let cmd = input
            .into_command(provider.id)
            .map_err(ctx.error())?;
        ctx.service()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes a `Listing` of the authenticated `User`'s provider,
    /// detaching provider and reservation references first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider;
    /// - `LISTING_NOT_EXISTS` - the `Listing` does not exist or belongs to
    ///                          another provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteListing",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_listing(
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let provider = ctx
            .service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())?;

        let owned = ctx
            .service()
            .execute(query::listing::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .is_some_and(|l| l.provider == Some(provider.id));
        if !owned {
            return Err(ctx.error()(api::query::ListingError::NotExists
                .into()));
        }

        ctx.service()
            .execute(command::DeleteServiceListing { listing: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Deletes the authenticated `User`'s provider with the full reference
    /// cascade.
    ///
    /// The outcome is always a structured result: a pending or approved
    /// reservation aborts the cascade and is reported through
    /// `referencingDocumentId` rather than thrown.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_PROVIDER` - the current `User` owns no provider.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProvider",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_provider(
        ctx: &Context,
    ) -> Result<DeleteProviderResult, Error> {
        use command::delete_provider::ExecutionError as E;

        let my_id = ctx.current_session().await?.user_id;
        let provider = ctx
            .service()
            .execute(query::provider::ByUser::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::PrivilegeError::Provider.into())
            .map_err(ctx.error())?;

        match ctx
            .service()
            .execute(command::DeleteProvider {
                provider: provider.id,
            })
            .await
        {
            Ok(()) => Ok(DeleteProviderResult {
                success: true,
                message: None,
                referencing_document_id: None,
            }),
            Err(e) => match e.as_ref() {
                E::ActiveReservation(_) | E::ProviderNotExists(_) => {
                    Ok(DeleteProviderResult {
                        success: false,
                        message: Some(e.as_ref().to_string()),
                        referencing_document_id: e
                            .as_ref()
                            .referencing_document_id(),
                    })
                }
                E::Db(_) => {
                    Err(ctx.error()(AsError::into_error(e)))
                }
            },
        }
    }
}

/// Outcome of a wishlist toggle.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum WishlistToggleResult {
    /// Item has been added to the wishlist.
    Added,

    /// Item has been removed from the wishlist.
    Removed,
}

impl From<command::toggle_wishlist::Output> for WishlistToggleResult {
    fn from(output: command::toggle_wishlist::Output) -> Self {
        match output {
            command::toggle_wishlist::Output::Added => Self::Added,
            command::toggle_wishlist::Output::Removed => Self::Removed,
        }
    }
}

/// Reference to the rated subject.
///
/// Exactly one of the fields must be provided.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct RatingSubject {
    /// Rated `Listing`.
    pub listing_id: Option<api::listing::Id>,

    /// Rated `Book`.
    pub book_id: Option<api::book::Id>,

    /// Rated `Course`.
    pub course_id: Option<api::course::Id>,
}

impl RatingSubject {
    /// Resolves this input into a [`domain::rating::Subject`].
    ///
    /// # Errors
    ///
    /// Errors unless exactly one reference is provided.
    fn resolve(self) -> Result<domain::rating::Subject, Error> {
        let Self {
            listing_id,
            book_id,
            course_id,
        } = self;

        match (listing_id, book_id, course_id) {
            (Some(l), None, None) => {
                Ok(domain::rating::Subject::Listing(l.into()))
            }
            (None, Some(b), None) => {
                Ok(domain::rating::Subject::Book(b.into()))
            }
            (None, None, Some(c)) => {
                Ok(domain::rating::Subject::Course(c.into()))
            }
            _ => Err(RatingError::AmbiguousSubject.into()),
        }
    }
}

/// Reference to the ordered subject.
///
/// Exactly one of the fields must be provided.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct OrderSubject {
    /// Ordered `Book`.
    pub book_id: Option<api::book::Id>,

    /// Ordered `Course`.
    pub course_id: Option<api::course::Id>,
}

impl OrderSubject {
    /// Resolves this input into a [`domain::order::Subject`].
    ///
    /// # Errors
    ///
    /// Errors unless exactly one reference is provided.
    fn resolve(self) -> Result<domain::order::Subject, Error> {
        let Self { book_id, course_id } = self;

        match (book_id, course_id) {
            (Some(b), None) => Ok(domain::order::Subject::Book(b.into())),
            (None, Some(c)) => Ok(domain::order::Subject::Course(c.into())),
            _ => Err(OrderError::AmbiguousSubject.into()),
        }
    }
}

/// Input of the `createListing` mutation.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct CreateListingInput {
    /// English name of the listing.
    pub name_en: String,

    /// Arabic name of the listing.
    pub name_ar: String,

    /// English description of the listing.
    pub description_en: String,

    /// Arabic description of the listing.
    pub description_ar: String,

    /// Price amount of the listing.
    pub price: f64,

    /// ISO 4217 currency code of the price; SAR when omitted.
    pub currency: Option<String>,

    /// Unit the price is applied per.
    pub price_unit: api::listing::PriceUnit,

    /// Kind of the listing.
    pub kind: api::listing::Kind,

    /// Country of the listing.
    pub country: String,

    /// Region of the listing.
    pub region: Option<String>,

    /// City of the listing.
    pub city: String,

    /// Kind-specific details as a raw JSON string.
    pub details: Option<String>,
}

impl CreateListingInput {
    /// Builds a [`command::CreateServiceListing`] out of this input.
    ///
    /// # Errors
    ///
    /// Errors if any of the parts fail validation.
    fn into_command(
        self,
        provider: domain::provider::Id,
    ) -> Result<command::CreateServiceListing, Error> {
        use ListingInputError as E;

        let Self {
            name_en,
            name_ar,
            description_en,
            description_ar,
            price,
            currency,
            price_unit,
            kind,
            country,
            region,
            city,
            details,
        } = self;

        let amount = Decimal::from_f64(price)
            .filter(|d| !d.is_sign_negative())
            .ok_or_else(|| Error::from(E::Price))?;
        let currency = currency.map_or(Ok(money::Currency::Sar), |c| {
            money::Currency::from_code(&c).ok_or_else(|| {
                Error::from(E::Currency)
            })
        })?;
        let details = details
            .map(|d| {
                serde_json::from_str::<serde_json::Value>(&d)
                    .map(domain::listing::Details::from)
                    .map_err(|_| Error::from(E::Details))
            })
            .transpose()?;

        Ok(command::CreateServiceListing {
            provider,
            name: Bilingual::new(name_en, name_ar),
            description: Bilingual::new(description_en, description_ar),
            price: domain::listing::Price {
                money: Money { amount, currency },
                unit: price_unit.into(),
            },
            kind: kind.into(),
            images: Vec::new(),
            location: domain::listing::Location {
                country: domain::listing::Country::new(country)
                    .ok_or_else(|| Error::from(E::Location))?,
                region: region
                    .map(|r| {
                        domain::listing::Region::new(r)
                            .ok_or_else(|| Error::from(E::Location))
                    })
                    .transpose()?,
                city: domain::listing::City::new(city)
                    .ok_or_else(|| Error::from(E::Location))?,
            },
            details,
        })
    }
}

/// Structured outcome of the `deleteProvider` mutation.
#[derive(Clone, Debug, GraphQLObject)]
pub struct DeleteProviderResult {
    /// Indicator whether the cascade completed.
    pub success: bool,

    /// Reason the cascade aborted, if it did.
    pub message: Option<String>,

    /// ID of the referencing document that blocked the cascade, if one
    /// did.
    pub referencing_document_id: Option<String>,
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(UserError::EmailOccupied.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) | Self::UserNotExists(_) => None,
            Self::WrongCredentials => {
                Some(UserError::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::toggle_wishlist::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(api::query::ListingError::NotExists.into())
            }
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::submit_rating::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyRated(_) => Some(RatingError::AlreadyRated.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(api::query::ListingError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_reservation_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IllegalTransition { .. } => Some(Error {
                code: "ILLEGAL_STATUS_TRANSITION",
                status_code: http::StatusCode::BAD_REQUEST,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::ReservationNotExists(_) => {
                Some(ReservationError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SubjectNotExists => Some(OrderError::SubjectNotExists.into()),
        }
    }
}

impl AsError for command::create_horse_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::HorseNotExists(_) => {
                Some(api::query::HorseError::NotExists.into())
            }
            Self::NotListedForRent(_) => {
                Some(HorseReservationError::NotForRent.into())
            }
        }
    }
}

impl AsError for command::create_service_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProviderNotExists(_) => None,
        }
    }
}

impl AsError for command::delete_service_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(api::query::ListingError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_provider::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ActiveReservation(_) | Self::ProviderNotExists(_) => None,
        }
    }
}

define_error! {
    enum HorseReservationError {
        #[code = "HORSE_NOT_FOR_RENT"]
        #[status = BAD_REQUEST]
        #[message = "`Horse` is not listed for rent"]
        NotForRent,
    }
}

define_error! {
    enum ListingInputError {
        #[code = "INVALID_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must be a non-negative number"]
        Price,

        #[code = "INVALID_CURRENCY"]
        #[status = BAD_REQUEST]
        #[message = "Unknown currency code"]
        Currency,

        #[code = "INVALID_LOCATION"]
        #[status = BAD_REQUEST]
        #[message = "Location parts must be non-empty strings"]
        Location,

        #[code = "INVALID_DETAILS"]
        #[status = BAD_REQUEST]
        #[message = "Details must be a valid JSON document"]
        Details,
    }
}

define_error! {
    enum OrderError {
        #[code = "AMBIGUOUS_ORDER_SUBJECT"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one order subject must be provided"]
        AmbiguousSubject,

        #[code = "ORDER_SUBJECT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Ordered subject does not exist"]
        SubjectNotExists,
    }
}

define_error! {
    enum RatingError {
        #[code = "AMBIGUOUS_RATING_SUBJECT"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one rating subject must be provided"]
        AmbiguousSubject,

        #[code = "RATING_VALUE_OUT_OF_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Rating value must be between 1 and 5"]
        ValueOutOfRange,

        #[code = "INVALID_RATING_MESSAGE"]
        #[status = BAD_REQUEST]
        #[message = "Rating message must be a non-empty string"]
        InvalidMessage,

        #[code = "ALREADY_RATED"]
        #[status = BAD_REQUEST]
        #[message = "This subject has already been rated by the `User`"]
        AlreadyRated,
    }
}

define_error! {
    enum ReservationError {
        #[code = "RESERVATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Reservation` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "EMAIL_OCCUPIED"]
        #[status = BAD_REQUEST]
        #[message = "Provided email is occupied by another `User`"]
        EmailOccupied,

        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Provided credentials do not match any `User`"]
        WrongCredentials,
    }
}
