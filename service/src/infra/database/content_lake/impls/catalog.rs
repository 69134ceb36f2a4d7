//! [`Book`]- and [`Course`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::{
    money,
    operations::{By, Select},
    Bilingual, Money,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{book, course, listing, rating, user, Book, Course},
    infra::{
        database::{
            self,
            content_lake::{ContentLake, Query},
        },
        Database,
    },
};

use super::{docs, invalid};

/// Projection of a [`Book`] document.
const BOOK_PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    title, description, \
    \"authorRef\": authorRef._ref, \
    price, currency, category, images, \
    averageRating, ratingCount}";

/// [`Book`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookDoc {
    /// ID of the document.
    id: book::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: book::CreationDateTime,

    /// Bilingual title.
    #[serde(default)]
    title: Bilingual,

    /// Bilingual description.
    #[serde(default)]
    description: Bilingual,

    /// Author reference.
    author_ref: user::Id,

    /// Price amount.
    price: Decimal,

    /// ISO 4217 currency code.
    currency: String,

    /// Category tag.
    category: String,

    /// Cover images.
    #[serde(default)]
    images: Vec<listing::Image>,

    /// Denormalized average rating.
    average_rating: Option<f64>,

    /// Denormalized rating count.
    rating_count: Option<i32>,
}

impl TryFrom<BookDoc> for Book {
    type Error = String;

    fn try_from(doc: BookDoc) -> Result<Self, Self::Error> {
        let BookDoc {
            id,
            created_at,
            title,
            description,
            author_ref,
            price,
            currency,
            category,
            images,
            average_rating,
            rating_count,
        } = doc;

        Ok(Self {
            id,
            title,
            description,
            author: author_ref,
            price: Money {
                amount: price,
                currency: money::Currency::from_code(&currency)
                    .ok_or_else(|| format!("invalid `currency`: {currency}"))?,
            },
            category: book::Category::new(category)
                .ok_or("invalid `category`")?,
            images,
            rating: rating::Aggregate {
                average: average_rating.unwrap_or_default(),
                count: rating_count.unwrap_or_default(),
            },
            created_at,
        })
    }
}

impl Database<Select<By<Option<Book>, book::Id>>> for ContentLake {
    type Ok = Option<Book>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Book>, book::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        docs::<BookDoc>(
            self.fetch(
                Query::new("book", BOOK_PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?
        .pop()
        .map(|d| Book::try_from(d).map_err(invalid))
        .transpose()
    }
}

impl Database<Select<By<Vec<Book>, Option<book::Category>>>> for ContentLake {
    type Ok = Vec<Book>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Book>, Option<book::Category>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut query =
            Query::new("book", BOOK_PROJECTION).order("_createdAt desc");
        if let Some(category) = by.into_inner() {
            query = query
                .clause("category == $category")
                .bind("category", category.to_string());
        }
        docs::<BookDoc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| Book::try_from(d).map_err(invalid))
            .collect()
    }
}

/// Projection of a [`Course`] document.
const COURSE_PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    title, description, \
    \"instructorRef\": instructorRef._ref, \
    price, currency, category, images, \
    averageRating, ratingCount}";

/// [`Course`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDoc {
    /// ID of the document.
    id: course::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: course::CreationDateTime,

    /// Bilingual title.
    #[serde(default)]
    title: Bilingual,

    /// Bilingual description.
    #[serde(default)]
    description: Bilingual,

    /// Instructor reference.
    instructor_ref: user::Id,

    /// Price amount.
    price: Decimal,

    /// ISO 4217 currency code.
    currency: String,

    /// Category tag.
    category: String,

    /// Images.
    #[serde(default)]
    images: Vec<listing::Image>,

    /// Denormalized average rating.
    average_rating: Option<f64>,

    /// Denormalized rating count.
    rating_count: Option<i32>,
}

impl TryFrom<CourseDoc> for Course {
    type Error = String;

    fn try_from(doc: CourseDoc) -> Result<Self, Self::Error> {
        let CourseDoc {
            id,
            created_at,
            title,
            description,
            instructor_ref,
            price,
            currency,
            category,
            images,
            average_rating,
            rating_count,
        } = doc;

        Ok(Self {
            id,
            title,
            description,
            instructor: instructor_ref,
            price: Money {
                amount: price,
                currency: money::Currency::from_code(&currency)
                    .ok_or_else(|| format!("invalid `currency`: {currency}"))?,
            },
            category: course::Category::new(category)
                .ok_or("invalid `category`")?,
            images,
            rating: rating::Aggregate {
                average: average_rating.unwrap_or_default(),
                count: rating_count.unwrap_or_default(),
            },
            created_at,
        })
    }
}

impl Database<Select<By<Option<Course>, course::Id>>> for ContentLake {
    type Ok = Option<Course>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Course>, course::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        docs::<CourseDoc>(
            self.fetch(
                Query::new("course", COURSE_PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?
        .pop()
        .map(|d| Course::try_from(d).map_err(invalid))
        .transpose()
    }
}

impl Database<Select<By<Vec<Course>, Option<course::Category>>>>
    for ContentLake
{
    type Ok = Vec<Course>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Course>, Option<course::Category>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut query =
            Query::new("course", COURSE_PROJECTION).order("_createdAt desc");
        if let Some(category) = by.into_inner() {
            query = query
                .clause("category == $category")
                .bind("category", category.to_string());
        }
        docs::<CourseDoc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| Course::try_from(d).map_err(invalid))
            .collect()
    }
}
