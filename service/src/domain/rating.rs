//! [`Rating`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{book, course, listing, user};

/// Individual rating left by a [`User`] on a rateable subject.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Rating {
    /// ID of this [`Rating`].
    pub id: Id,

    /// [`Subject`] this [`Rating`] is left on.
    pub subject: Subject,

    /// [`User`] who left this [`Rating`].
    ///
    /// [`User`]: crate::domain::User
    pub author: user::Id,

    /// [`Value`] of this [`Rating`].
    pub value: Value,

    /// Optional [`Message`] accompanying this [`Rating`].
    pub message: Option<Message>,

    /// [`DateTime`] when this [`Rating`] was left.
    pub created_at: CreationDateTime,
}

/// ID of a [`Rating`].
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

/// Rateable subject a [`Rating`] points at.
#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum Subject {
    /// A [`ServiceListing`].
    ///
    /// [`ServiceListing`]: crate::domain::ServiceListing
    Listing(listing::Id),

    /// A [`Book`].
    ///
    /// [`Book`]: crate::domain::Book
    Book(book::Id),

    /// A [`Course`].
    ///
    /// [`Course`]: crate::domain::Course
    Course(course::Id),
}

/// Value of a [`Rating`].
///
/// Only values from 1 to 5 are representable.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Value(u8);

impl Value {
    /// Creates a new [`Value`] if the given `value` is within the 1..=5
    /// range.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    /// Returns the numeric representation of this [`Value`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Value {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or("`Rating` value must be between 1 and 5")
    }
}

/// Message accompanying a [`Rating`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `message` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Creates a new [`Message`] if the given `message` is valid.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        Self::check(&message).then_some(Self(message))
    }

    /// Checks whether the given `message` is a valid [`Message`].
    fn check(message: impl AsRef<str>) -> bool {
        let message = message.as_ref();
        message.trim() == message
            && !message.is_empty()
            && message.len() <= 2048
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// Rating aggregate denormalized onto a rateable subject.
///
/// Must equal the mean of all individual [`Value`]s whenever both are
/// present.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aggregate {
    /// Average of all [`Value`]s left on the subject.
    pub average: f64,

    /// Count of all [`Rating`]s left on the subject.
    pub count: i32,
}

impl Aggregate {
    /// Recomputes an [`Aggregate`] from the full set of [`Value`]s.
    #[expect(
        clippy::cast_precision_loss,
        reason = "rating counts stay far below 2^52"
    )]
    #[must_use]
    pub fn recompute(values: impl IntoIterator<Item = Value>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0_u64, 0_i32), |(sum, count), v| {
                (sum + u64::from(v.get()), count + 1)
            });
        if count == 0 {
            return Self::default();
        }
        Self {
            average: sum as f64 / f64::from(count),
            count,
        }
    }
}

/// Operation replacing the denormalized [`Aggregate`] of a [`Subject`].
#[derive(Clone, Copy, Debug)]
pub struct Reaggregate {
    /// [`Subject`] to patch.
    pub subject: Subject,

    /// New [`Aggregate`] of the [`Subject`].
    pub aggregate: Aggregate,
}

/// [`DateTime`] when a [`Rating`] was left.
pub type CreationDateTime = DateTimeOf<(Rating, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Aggregate, Value};

    fn value(v: u8) -> Value {
        Value::new(v).unwrap()
    }

    #[test]
    fn value_rejects_out_of_range() {
        assert!(Value::new(0).is_none());
        assert!(Value::new(6).is_none());
        assert!(Value::new(1).is_some());
        assert!(Value::new(5).is_some());
    }

    #[test]
    fn aggregate_is_arithmetic_mean() {
        let agg = Aggregate::recompute([value(5), value(4), value(3)]);
        assert!((agg.average - 4.0).abs() < f64::EPSILON);
        assert_eq!(agg.count, 3);

        let agg = Aggregate::recompute([value(2), value(5)]);
        assert!((agg.average - 3.5).abs() < f64::EPSILON);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn aggregate_of_no_ratings_is_zero() {
        let agg = Aggregate::recompute([]);
        assert!(agg.average.abs() < f64::EPSILON);
        assert_eq!(agg.count, 0);
    }
}
