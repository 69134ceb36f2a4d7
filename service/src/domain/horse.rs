//! [`Horse`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{listing, user};

/// Horse listed on the marketplace by its owner.
#[derive(Clone, Debug)]
pub struct Horse {
    /// ID of this [`Horse`].
    pub id: Id,

    /// [`User`] owning this [`Horse`].
    ///
    /// [`User`]: crate::domain::User
    pub owner: user::Id,

    /// [`Name`] of this [`Horse`].
    pub name: Name,

    /// [`Breed`] of this [`Horse`].
    pub breed: Breed,

    /// [`Image`]s of this [`Horse`].
    ///
    /// [`Image`]: listing::Image
    pub images: Vec<listing::Image>,

    /// [`Purpose`] this [`Horse`] is listed for.
    ///
    /// Only [`Purpose::Rent`] makes the horse reservable.
    pub purpose: Purpose,

    /// [`DateTime`] when this [`Horse`] was listed.
    pub created_at: CreationDateTime,
}

impl Horse {
    /// Indicates whether this [`Horse`] accepts reservations.
    #[must_use]
    pub fn is_reservable(&self) -> bool {
        matches!(self.purpose, Purpose::Rent)
    }
}

/// ID of a [`Horse`].
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
    PartialEq,
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
    #[doc = "Purpose a [`Horse`] is listed for."]
    enum Purpose {
        #[doc = "Available for rent."]
        Rent = 1,

        #[doc = "Offered for sale."]
        Sale = 2,

        #[doc = "Shown for breeding."]
        Breeding = 3,
    }
}

/// Name of a [`Horse`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Breed of a [`Horse`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Breed(String);

impl Breed {
    /// Creates a new [`Breed`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `breed` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(breed: impl Into<String>) -> Self {
        Self(breed.into())
    }

    /// Creates a new [`Breed`] if the given `breed` is valid.
    #[must_use]
    pub fn new(breed: impl Into<String>) -> Option<Self> {
        let breed = breed.into();
        Self::check(&breed).then_some(Self(breed))
    }

    /// Checks whether the given `breed` is a valid [`Breed`].
    fn check(breed: impl AsRef<str>) -> bool {
        let breed = breed.as_ref();
        breed.trim() == breed && !breed.is_empty() && breed.len() <= 512
    }
}

impl FromStr for Breed {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Breed`")
    }
}

/// [`DateTime`] when a [`Horse`] was listed.
pub type CreationDateTime = DateTimeOf<(Horse, unit::Creation)>;
