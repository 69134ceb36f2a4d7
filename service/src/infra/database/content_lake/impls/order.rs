//! [`Order`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::{
    money,
    operations::{By, Create, Patch, Select},
    Money,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{book, course, order, reservation, user, Order},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
    read,
};

use super::{docs, invalid};

/// Projection of an [`Order`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    \"bookRef\": bookRef._ref, \
    \"courseRef\": courseRef._ref, \
    \"userRef\": userRef._ref, \
    price, currency, status, paymentStatus}";

/// [`Order`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: order::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: order::CreationDateTime,

    /// Ordered book reference, if the subject is a book.
    book_ref: Option<book::Id>,

    /// Ordered course reference, if the subject is a course.
    course_ref: Option<course::Id>,

    /// Ordering user reference.
    user_ref: user::Id,

    /// Price amount at the moment of ordering.
    price: Decimal,

    /// ISO 4217 currency code.
    currency: String,

    /// Status tag.
    status: reservation::Status,

    /// Payment status tag.
    payment_status: reservation::PaymentStatus,
}

impl TryFrom<Doc> for Order {
    type Error = String;

    fn try_from(doc: Doc) -> Result<Self, Self::Error> {
        let Doc {
            id,
            created_at,
            book_ref,
            course_ref,
            user_ref,
            price,
            currency,
            status,
            payment_status,
        } = doc;

        let subject = match (book_ref, course_ref) {
            (Some(b), None) => order::Subject::Book(b),
            (None, Some(c)) => order::Subject::Course(c),
            _ => return Err("ambiguous `order` subject".to_owned()),
        };

        Ok(Self {
            id,
            subject,
            user: user_ref,
            price: Money {
                amount: price,
                currency: money::Currency::from_code(&currency)
                    .ok_or_else(|| format!("invalid `currency`: {currency}"))?,
            },
            status,
            payment: payment_status,
            created_at,
        })
    }
}

impl ContentLake {
    /// Fetches [`Order`]s matching the provided query.
    async fn orders(
        &self,
        query: Query,
    ) -> Result<Vec<Order>, Traced<database::Error>> {
        docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| Order::try_from(d).map_err(invalid))
            .collect()
    }
}

impl Database<Select<By<Vec<Order>, user::Id>>> for ContentLake {
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user = by.into_inner();
        self.orders(
            Query::new("order", PROJECTION)
                .clause("userRef._ref == $user")
                .bind("user", user),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Select<By<Vec<Order>, read::order::DanglingFree>>>
    for ContentLake
{
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::DanglingFree>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::order::DanglingFree { placed_before } = by.into_inner();
        self.orders(
            Query::new("order", PROJECTION)
                .clause("status == $status")
                .bind("status", reservation::Status::Pending)
                .clause("price == 0")
                .clause("_createdAt < $before")
                .bind("before", placed_before.to_rfc3339()),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Create<Order>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(order): Create<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let Order {
            id,
            subject,
            user,
            price,
            status,
            payment,
            created_at,
        } = order;

        let (field, subject_id) = match subject {
            order::Subject::Book(id) => ("bookRef", id.to_string()),
            order::Subject::Course(id) => ("courseRef", id.to_string()),
        };

        let mut doc = serde_json::json!({
            "_id": id,
            "_type": "order",
            "_createdAt": created_at.to_rfc3339(),
            "userRef": { "_ref": user },
            "price": price.amount,
            "currency": price.currency.code(),
            "status": status,
            "paymentStatus": payment,
        });
        drop(doc.as_object_mut().expect("object literal").insert(
            field.to_owned(),
            serde_json::json!({ "_ref": subject_id }),
        ));

        self.create(doc).await.map_err(tracerr::wrap!())
    }
}

impl Database<Patch<order::Complete>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<order::Complete>,
    ) -> Result<Self::Ok, Self::Err> {
        let order::Complete { order } = op;
        self.mutate(vec![patch::Patch::new(order)
            .set("status", reservation::Status::Completed)
            .set("paymentStatus", reservation::PaymentStatus::Paid)
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}
