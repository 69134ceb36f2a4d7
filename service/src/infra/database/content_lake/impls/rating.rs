//! [`Rating`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Create, Patch, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{book, course, listing, rating, user, Rating},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
};

use super::{docs, invalid};

/// Projection of a [`Rating`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"listingRef\": listingRef._ref, \
    \"bookRef\": bookRef._ref, \
    \"courseRef\": courseRef._ref, \
    \"authorRef\": authorRef._ref, \
    value, message}";

/// [`Rating`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: rating::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: rating::CreationDateTime,

    /// Rated listing reference, if the subject is a listing.
    listing_ref: Option<listing::Id>,

    /// Rated book reference, if the subject is a book.
    book_ref: Option<book::Id>,

    /// Rated course reference, if the subject is a course.
    course_ref: Option<course::Id>,

    /// Author reference.
    author_ref: user::Id,

    /// Rating value.
    value: u8,

    /// Optional message.
    message: Option<String>,
}

impl TryFrom<Doc> for Rating {
    type Error = &'static str;

    fn try_from(doc: Doc) -> Result<Self, Self::Error> {
        let Doc {
            id,
            created_at,
            listing_ref,
            book_ref,
            course_ref,
            author_ref,
            value,
            message,
        } = doc;

        let subject = match (listing_ref, book_ref, course_ref) {
            (Some(l), None, None) => rating::Subject::Listing(l),
            (None, Some(b), None) => rating::Subject::Book(b),
            (None, None, Some(c)) => rating::Subject::Course(c),
            _ => return Err("ambiguous `rating` subject"),
        };

        Ok(Self {
            id,
            subject,
            author: author_ref,
            value: rating::Value::new(value).ok_or("invalid `rating.value`")?,
            message: message
                .map(|m| {
                    rating::Message::new(m).ok_or("invalid `rating.message`")
                })
                .transpose()?,
            created_at,
        })
    }
}

/// Returns the subject reference field and raw ID of a [`rating::Subject`].
fn subject_ref(subject: rating::Subject) -> (&'static str, String) {
    match subject {
        rating::Subject::Listing(id) => ("listingRef", id.to_string()),
        rating::Subject::Book(id) => ("bookRef", id.to_string()),
        rating::Subject::Course(id) => ("courseRef", id.to_string()),
    }
}

impl Database<Select<By<Vec<Rating>, rating::Subject>>> for ContentLake {
    type Ok = Vec<Rating>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rating>, rating::Subject>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (field, id) = subject_ref(by.into_inner());
        docs::<Doc>(
            self.fetch(
                Query::new("rating", PROJECTION)
                    .clause(format!("{field}._ref == $subject"))
                    .bind("subject", id),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?
        .into_iter()
        .map(|d| Rating::try_from(d).map_err(invalid))
        .collect()
    }
}

impl Database<Create<Rating>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(rating): Create<Rating>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rating {
            id,
            subject,
            author,
            value,
            message,
            created_at,
        } = rating;

        let (field, subject_id) = subject_ref(subject);
        let mut doc = serde_json::json!({
            "_id": id,
            "_type": "rating",
            "_createdAt": created_at.to_rfc3339(),
            "authorRef": { "_ref": author },
            "value": value.get(),
            "message": message.map(|m| m.to_string()),
        });
        drop(
            doc.as_object_mut()
                .expect("object literal")
                .insert(
                    field.to_owned(),
                    serde_json::json!({ "_ref": subject_id }),
                ),
        );

        self.create(doc).await.map_err(tracerr::wrap!())
    }
}

impl Database<Patch<rating::Reaggregate>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<rating::Reaggregate>,
    ) -> Result<Self::Ok, Self::Err> {
        let rating::Reaggregate { subject, aggregate } = op;
        let (_, subject_id) = subject_ref(subject);
        self.mutate(vec![patch::Patch::new(subject_id)
            .set("averageRating", aggregate.average)
            .set("ratingCount", aggregate.count)
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}
