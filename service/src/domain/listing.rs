//! [`ServiceListing`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Bilingual, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{provider, rating};

/// Service offered on the marketplace.
#[derive(Clone, Debug)]
pub struct ServiceListing {
    /// ID of this [`ServiceListing`].
    pub id: Id,

    /// Name of this [`ServiceListing`] in both locales.
    pub name: Bilingual,

    /// Description of this [`ServiceListing`] in both locales.
    pub description: Bilingual,

    /// [`Price`] of this [`ServiceListing`].
    pub price: Price,

    /// [`Kind`] of this [`ServiceListing`].
    pub kind: Kind,

    /// [`Approval`] flags of this [`ServiceListing`].
    pub approval: Approval,

    /// [`Image`]s of this [`ServiceListing`].
    pub images: Vec<Image>,

    /// [`Location`] of this [`ServiceListing`].
    pub location: Location,

    /// [`Provider`] offering this [`ServiceListing`].
    ///
    /// Detached while a provider deletion cascade is in flight.
    ///
    /// [`Provider`]: crate::domain::Provider
    pub provider: Option<provider::Id>,

    /// Kind-specific [`Details`] of this [`ServiceListing`].
    pub details: Option<Details>,

    /// Rating [`Aggregate`] of this [`ServiceListing`].
    ///
    /// [`Aggregate`]: rating::Aggregate
    pub rating: rating::Aggregate,

    /// [`DateTime`] when this [`ServiceListing`] was created.
    pub created_at: CreationDateTime,
}

impl ServiceListing {
    /// Indicates whether this [`ServiceListing`] is visible to end users.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.approval.by_admin && self.approval.by_provider
    }
}

/// ID of a [`ServiceListing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`ServiceListing`]."]
    enum Kind {
        #[doc = "Stable renting out boxes."]
        Stable = 1,

        #[doc = "Veterinary service."]
        Veterinary = 2,

        #[doc = "Competition organization."]
        Competition = 3,

        #[doc = "Horse housing."]
        Housing = 4,

        #[doc = "Trip coordination."]
        TripCoordinator = 5,

        #[doc = "Catering."]
        Catering = 6,

        #[doc = "Horse transport."]
        Transport = 7,

        #[doc = "Contractor works."]
        Contractor = 8,

        #[doc = "Equipment and feed supply."]
        Supplier = 9,

        #[doc = "Horse training."]
        Trainer = 10,

        #[doc = "Hoof trimming."]
        HoofTrimmer = 11,

        #[doc = "Horse grooming."]
        Grooming = 12,

        #[doc = "Event judging."]
        EventJudging = 13,

        #[doc = "Marketing services."]
        Marketing = 14,

        #[doc = "Event commentary."]
        EventCommentary = 15,

        #[doc = "Consulting."]
        Consulting = 16,

        #[doc = "Photography."]
        Photography = 17,
    }
}

/// Price of a [`ServiceListing`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Price {
    /// [`Money`] amount of this [`Price`].
    pub money: Money,

    /// [`Unit`] this [`Price`] is applied per.
    pub unit: Unit,
}

define_kind! {
    #[doc = "Unit a [`Price`] is applied per."]
    enum Unit {
        #[doc = "Per whole service."]
        PerService = 1,

        #[doc = "Per hour."]
        PerHour = 2,

        #[doc = "Per day."]
        PerDay = 3,

        #[doc = "Per month."]
        PerMonth = 4,
    }
}

/// Approval flags gating visibility of a [`ServiceListing`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Approval {
    /// Approval by an administrator, granted out-of-band.
    pub by_admin: bool,

    /// Approval by the offering provider.
    pub by_provider: bool,
}

/// Image of a [`ServiceListing`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Image {
    /// Key of this [`Image`] in the images collection.
    #[serde(rename = "_key")]
    pub key: String,

    /// Reference to the image asset in the CDN.
    #[serde(rename = "assetRef")]
    pub asset: String,
}

/// Geographic location of a [`ServiceListing`].
#[derive(Clone, Debug)]
pub struct Location {
    /// [`Country`] of the location.
    pub country: Country,

    /// [`Region`] of the location.
    pub region: Option<Region>,

    /// [`City`] of the location.
    pub city: City,
}

/// Country of a [`Location`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Country(String);

impl Country {
    /// Creates a new [`Country`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `country` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(country: impl Into<String>) -> Self {
        Self(country.into())
    }

    /// Creates a new [`Country`] if the given `country` is valid.
    #[must_use]
    pub fn new(country: impl Into<String>) -> Option<Self> {
        let country = country.into();
        Self::check(&country).then_some(Self(country))
    }

    /// Checks whether the given `country` is a valid [`Country`].
    fn check(country: impl AsRef<str>) -> bool {
        let country = country.as_ref();
        country.trim() == country && !country.is_empty() && country.len() <= 512
    }
}

impl FromStr for Country {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Country`")
    }
}

/// Region of a [`Location`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Region(String);

impl Region {
    /// Creates a new [`Region`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `region` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Creates a new [`Region`] if the given `region` is valid.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Option<Self> {
        let region = region.into();
        Self::check(&region).then_some(Self(region))
    }

    /// Checks whether the given `region` is a valid [`Region`].
    fn check(region: impl AsRef<str>) -> bool {
        let region = region.as_ref();
        region.trim() == region && !region.is_empty() && region.len() <= 512
    }
}

impl FromStr for Region {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Region`")
    }
}

/// City of a [`Location`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 512
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Kind-specific details of a [`ServiceListing`].
///
/// The shape is owned by the content lake schema and varies per [`Kind`],
/// so it's carried opaquely and never interpreted here.
#[derive(Clone, Debug, Deserialize, From, Into, Serialize)]
pub struct Details(serde_json::Value);

/// Operation unsetting the [`Provider`] reference of a [`ServiceListing`].
///
/// [`Provider`]: crate::domain::Provider
#[derive(Clone, Copy, Debug)]
pub struct DetachProvider {
    /// ID of the [`ServiceListing`] to detach the reference from.
    pub listing: Id,
}

/// [`DateTime`] when a [`ServiceListing`] was created.
pub type CreationDateTime = DateTimeOf<(ServiceListing, unit::Creation)>;
