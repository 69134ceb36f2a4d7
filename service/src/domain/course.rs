//! [`Course`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Bilingual, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{listing, rating, user};

/// Training course sold on the marketplace.
#[derive(Clone, Debug)]
pub struct Course {
    /// ID of this [`Course`].
    pub id: Id,

    /// Title of this [`Course`] in both locales.
    pub title: Bilingual,

    /// Description of this [`Course`] in both locales.
    pub description: Bilingual,

    /// Instructor of this [`Course`].
    pub instructor: user::Id,

    /// Price of this [`Course`].
    pub price: Money,

    /// [`Category`] of this [`Course`], linking related courses together.
    pub category: Category,

    /// [`Image`]s of this [`Course`].
    ///
    /// [`Image`]: listing::Image
    pub images: Vec<listing::Image>,

    /// Rating [`Aggregate`] of this [`Course`].
    ///
    /// [`Aggregate`]: rating::Aggregate
    pub rating: rating::Aggregate,

    /// [`DateTime`] when this [`Course`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Course`].
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

/// Category of a [`Course`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `category` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    /// Creates a new [`Category`] if the given `category` is valid.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        Self::check(&category).then_some(Self(category))
    }

    /// Checks whether the given `category` is a valid [`Category`].
    fn check(category: impl AsRef<str>) -> bool {
        let category = category.as_ref();
        category.trim() == category
            && !category.is_empty()
            && category.len() <= 512
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// [`DateTime`] when a [`Course`] was created.
pub type CreationDateTime = DateTimeOf<(Course, unit::Creation)>;
