//! [`Command`] for placing an [`Order`].

use common::{
    operations::{By, Create, Patch, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{book, course, order, reservation, user, Book, Course, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing an [`Order`] of a [`Book`] or a [`Course`].
///
/// Orders are created pending; a free-of-charge subject completes the order
/// right away with a follow-up patch. The two calls are not wrapped in a
/// transaction, so a crash in between leaves a dangling pending order —
/// [`task::ReconcileOrders`] sweeps those up.
///
/// [`task::ReconcileOrders`]: crate::task::ReconcileOrders
#[derive(Clone, Copy, Debug)]
pub struct CreateOrder {
    /// Ordered [`Subject`].
    ///
    /// [`Subject`]: order::Subject
    pub subject: order::Subject,

    /// [`User`] placing the order.
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,
}

impl<Db, Ml> Command<CreateOrder> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<Book>, book::Id>>,
            Ok = Option<Book>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Course>, course::Id>>,
            Ok = Option<Course>,
            Err = Traced<database::Error>,
        > + Database<Create<Order>, Err = Traced<database::Error>>
        + Database<
            Patch<order::Complete>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOrder { subject, user } = cmd;

        let price: Money = match subject {
            order::Subject::Book(id) => {
                self.database()
                    .execute(Select(By::<Option<Book>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::SubjectNotExists)
                    .map_err(tracerr::wrap!())?
                    .price
            }
            order::Subject::Course(id) => {
                self.database()
                    .execute(Select(By::<Option<Course>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::SubjectNotExists)
                    .map_err(tracerr::wrap!())?
                    .price
            }
        };

        let mut order = Order {
            id: order::Id::new(),
            subject,
            user,
            price,
            status: reservation::Status::Pending,
            payment: reservation::PaymentStatus::Pending,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Create(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if price.is_free() {
            self.database()
                .execute(Patch(order::Complete { order: order.id }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            order.status = reservation::Status::Completed;
            order.payment = reservation::PaymentStatus::Paid;
        }

        Ok(order)
    }
}

/// Error of [`CreateOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Ordered subject does not exist.
    #[display("Ordered subject does not exist")]
    SubjectNotExists,
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{book, order, rating, reservation, user, Book},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::CreateOrder;

    async fn seed_book(db: &Mock, price: i64) -> book::Id {
        let id = book::Id::new();
        db.with_store(|s| {
            drop(s.books.insert(
                id,
                Book {
                    id,
                    title: Bilingual::new("Horse care", "العناية بالخيل"),
                    description: Bilingual::default(),
                    author: user::Id::new(),
                    price: Money {
                        amount: Decimal::from(price),
                        currency: common::money::Currency::Usd,
                    },
                    category: "care".parse().unwrap(),
                    images: Vec::new(),
                    rating: rating::Aggregate::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        id
    }

    #[tokio::test]
    async fn free_book_order_is_completed_and_paid_immediately() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let book = seed_book(&db, 0).await;

        let order = svc
            .execute(CreateOrder {
                subject: order::Subject::Book(book),
                user: user::Id::new(),
            })
            .await
            .unwrap();

        let stored = db.with_store(|s| s.orders[&order.id].clone()).await;
        assert_eq!(stored.status, reservation::Status::Completed);
        assert_eq!(stored.payment, reservation::PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn priced_book_order_awaits_the_external_payment_step() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let book = seed_book(&db, 30).await;

        let order = svc
            .execute(CreateOrder {
                subject: order::Subject::Book(book),
                user: user::Id::new(),
            })
            .await
            .unwrap();

        let stored = db.with_store(|s| s.orders[&order.id].clone()).await;
        assert_eq!(stored.status, reservation::Status::Pending);
        assert_eq!(stored.payment, reservation::PaymentStatus::Pending);
    }
}
