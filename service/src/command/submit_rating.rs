//! [`Command`] for submitting a [`Rating`].

use common::{
    operations::{By, Create, Patch, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rating, user, Rating},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting a [`Rating`].
///
/// One author gets one rating per subject. After the rating document is
/// created, the full rating set is re-fetched and the subject's denormalized
/// aggregate is patched to its mean, so the aggregate is always a function
/// of the rating set at the moment of the most recent successful
/// submission.
#[derive(Clone, Debug)]
pub struct SubmitRating {
    /// [`Subject`] being rated.
    ///
    /// [`Subject`]: rating::Subject
    pub subject: rating::Subject,

    /// [`User`] leaving the rating.
    ///
    /// [`User`]: crate::domain::User
    pub author: user::Id,

    /// [`Value`] of the rating.
    ///
    /// [`Value`]: rating::Value
    pub value: rating::Value,

    /// Optional [`Message`] accompanying the rating.
    ///
    /// [`Message`]: rating::Message
    pub message: Option<rating::Message>,
}

impl<Db, Ml> Command<SubmitRating> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Vec<Rating>, rating::Subject>>,
            Ok = Vec<Rating>,
            Err = Traced<database::Error>,
        > + Database<Create<Rating>, Err = Traced<database::Error>>
        + Database<
            Patch<rating::Reaggregate>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Rating;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitRating,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitRating {
            subject,
            author,
            value,
            message,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(subject)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.iter().any(|r| r.author == author) {
            return Err(tracerr::new!(E::AlreadyRated(author)));
        }

        let rating = Rating {
            id: rating::Id::new(),
            subject,
            author,
            value,
            message,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Create(rating.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let all = self
            .database()
            .execute(Select(By::new(subject)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.database()
            .execute(Patch(rating::Reaggregate {
                subject,
                aggregate: rating::Aggregate::recompute(
                    all.iter().map(|r| r.value),
                ),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rating)
    }
}

/// Error of [`SubmitRating`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// The author already rated the subject.
    #[display("`User(id: {_0})` has already rated this subject")]
    AlreadyRated(#[error(not(source))] user::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{book, rating, user, Book},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{ExecutionError, SubmitRating};

    async fn seed_book(db: &Mock) -> book::Id {
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
                        amount: Decimal::from(30),
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

    fn cmd(
        subject: rating::Subject,
        author: user::Id,
        value: u8,
    ) -> SubmitRating {
        SubmitRating {
            subject,
            author,
            value: rating::Value::new(value).unwrap(),
            message: None,
        }
    }

    #[tokio::test]
    async fn aggregate_tracks_the_mean_of_all_ratings() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let subject = rating::Subject::Book(seed_book(&db).await);

        let values = [5, 4, 3, 5];
        for value in values {
            drop(
                svc.execute(cmd(subject, user::Id::new(), value))
                    .await
                    .unwrap(),
            );
        }

        let aggregate = db
            .with_store(|s| s.books.values().next().unwrap().rating)
            .await;
        let expected =
            f64::from(values.iter().map(|v| u32::from(*v)).sum::<u32>())
                / values.len() as f64;
        assert!((aggregate.average - expected).abs() < 1e-9);
        assert_eq!(aggregate.count, i32::try_from(values.len()).unwrap());
    }

    #[tokio::test]
    async fn second_rating_by_the_same_author_is_rejected() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let subject = rating::Subject::Book(seed_book(&db).await);
        let author = user::Id::new();

        drop(svc.execute(cmd(subject, author, 4)).await.unwrap());
        let err = svc.execute(cmd(subject, author, 2)).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadyRated(_)));
        let (count, aggregate) = db
            .with_store(|s| {
                (s.ratings.len(), s.books.values().next().unwrap().rating)
            })
            .await;
        assert_eq!(count, 1);
        assert!((aggregate.average - 4.0).abs() < f64::EPSILON);
        assert_eq!(aggregate.count, 1);
    }
}
